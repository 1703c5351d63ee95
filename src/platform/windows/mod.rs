//! Windows-specific platform implementations

mod paths;

pub use paths::WindowsPaths;
