use std::sync::Arc;

use crate::billing::calculator::bytes_to_gb;
use crate::billing::{BucketUsage, PriceTable};
use crate::sources::{BucketLocator, MetricSource, SourceError};

/// Builds the usage record of a single bucket.
///
/// Every collaborator failure is absorbed here: an unresolved region stays empty
/// and metric queries fall back to `fallback_region`; a failed metric reads as zero.
pub struct UsageCollector {
    locator: Arc<dyn BucketLocator>,
    metrics: Arc<dyn MetricSource>,
    prices: Arc<PriceTable>,
    fallback_region: String,
}

impl UsageCollector {
    pub fn new(
        locator: Arc<dyn BucketLocator>,
        metrics: Arc<dyn MetricSource>,
        prices: Arc<PriceTable>,
        fallback_region: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            metrics,
            prices,
            fallback_region: fallback_region.into(),
        }
    }

    pub async fn collect(&self, bucket: &str) -> BucketUsage {
        let region = match self.locator.resolve_region(bucket).await {
            Ok(region) => region,
            Err(SourceError::NotFound(_)) => {
                tracing::warn!(bucket, "unable to find bucket region, region not found");
                String::new()
            }
            Err(e) => {
                tracing::warn!(bucket, error = %e, "unable to resolve bucket region");
                String::new()
            }
        };

        let mut usage = BucketUsage::new(bucket, region);
        let target = if usage.region_known() {
            usage.region.clone()
        } else {
            self.fallback_region.clone()
        };

        usage.object_count = self
            .metrics
            .latest_object_count(bucket, &target)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(bucket, error = %e, "object count unavailable, using 0");
                0.0
            });

        for (class, price) in self.prices.iter() {
            let size_gb = self
                .metrics
                .latest_size_bytes(bucket, &target, class)
                .await
                .map(bytes_to_gb)
                .unwrap_or_else(|e| {
                    tracing::warn!(bucket, class = %class, error = %e, "bucket size unavailable, using 0");
                    0.0
                });
            usage.record(class.clone(), size_gb, price);
        }

        tracing::debug!(
            bucket,
            region = %usage.region,
            total_size = usage.total_size,
            total_cost = usage.total_cost,
            "collected bucket usage"
        );
        usage
    }
}
