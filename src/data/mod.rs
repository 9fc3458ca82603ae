pub mod fixtures;
pub mod loader;
