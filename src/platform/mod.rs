//! Platform abstraction layer
//!
//! This module provides a unified interface for platform-specific operations,
//! abstracting away differences between Unix, Windows, and other platforms.

mod filesystem;
mod traits;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use filesystem::LocalFilesystem;
pub use traits::*;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the filesystem operations used for marker files
    pub fn filesystem() -> Box<dyn FilesystemOps> {
        Box::new(LocalFilesystem::new())
    }

    /// Get the platform-specific path operations
    pub fn paths() -> Box<dyn PathOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixPaths::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsPaths::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }
}
