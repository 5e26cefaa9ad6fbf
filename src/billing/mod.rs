pub mod calculator;
pub mod pricing;
pub mod types;

pub use pricing::PriceTable;
pub use types::{BucketUsage, Report, StorageClass};
