//! Collaborators that feed the collector: bucket discovery and usage metrics.

pub mod cloudwatch;
pub mod s3;

use async_trait::async_trait;
use std::fmt::Display;
use thiserror::Error;

use crate::billing::StorageClass;

pub use cloudwatch::CloudWatchMetrics;
pub use s3::S3Locator;

/// Failure of a single call into a collaborator
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("bucket {0} not found")]
    NotFound(String),

    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn service(operation: &'static str, err: impl Display) -> Self {
        SourceError::Service {
            operation,
            message: err.to_string(),
        }
    }
}

/// Lists buckets and finds where each one lives
#[async_trait]
pub trait BucketLocator: Send + Sync {
    async fn list_bucket_names(&self) -> Result<Vec<String>, SourceError>;

    async fn resolve_region(&self, bucket: &str) -> Result<String, SourceError>;
}

/// Latest daily storage metrics of a bucket.
///
/// Both queries return `Ok(0.0)` when the window holds no datapoints.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn latest_object_count(&self, bucket: &str, region: &str) -> Result<f64, SourceError>;

    async fn latest_size_bytes(
        &self,
        bucket: &str,
        region: &str,
        class: &StorageClass,
    ) -> Result<f64, SourceError>;
}
