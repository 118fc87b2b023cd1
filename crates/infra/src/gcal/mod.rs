//! Google Calendar adapter: refresh-token auth and the event store.

mod auth;
mod store;

pub use auth::GoogleTokenProvider;
pub use store::GoogleCalendarStore;
