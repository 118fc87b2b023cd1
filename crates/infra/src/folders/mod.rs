//! Local filesystem mirror for conference folders.

mod mirror;

pub use mirror::LocalFolderMirror;
