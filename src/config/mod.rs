pub mod defaults;
pub mod loader;
pub mod types;

pub use defaults::{DEFAULT_PROFILE, DEFAULT_REGION};
pub use loader::ConfigLoader;
pub use types::*;
