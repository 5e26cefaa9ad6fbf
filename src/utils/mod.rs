pub mod debug;

pub use debug::{init_logging, DEBUG_MODE};
