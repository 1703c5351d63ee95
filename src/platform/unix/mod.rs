//! Unix-specific platform implementations

mod paths;

pub use paths::UnixPaths;
