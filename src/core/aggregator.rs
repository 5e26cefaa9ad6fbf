use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::collector::UsageCollector;
use super::sink::ResultSink;
use crate::billing::{BucketUsage, Report};
use crate::sources::BucketLocator;

/// Default number of buckets collected at the same time
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Fans bucket collection out over a bounded pool of tasks.
///
/// Each bucket is handed to the sink the moment it completes; the returned
/// [`Report`] lists buckets in input order once every task has finished.
pub struct Aggregator {
    collector: Arc<UsageCollector>,
    sink: Arc<dyn ResultSink>,
}

impl Aggregator {
    pub fn new(collector: UsageCollector, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            collector: Arc::new(collector),
            sink,
        }
    }

    /// List every bucket through `locator`, then [`run`](Self::run) over them.
    ///
    /// A listing failure yields an empty report.
    pub async fn run_discovered(
        &self,
        locator: &dyn BucketLocator,
        concurrency_limit: usize,
    ) -> Report {
        let names = match locator.list_bucket_names().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list buckets, nothing to report");
                Vec::new()
            }
        };
        self.run(names, concurrency_limit).await
    }

    /// Collect every bucket with at most `concurrency_limit` (minimum 1) in flight.
    pub async fn run(&self, bucket_names: Vec<String>, concurrency_limit: usize) -> Report {
        let limit = concurrency_limit.max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        tracing::info!(buckets = bucket_names.len(), limit, "collecting bucket usage");

        let mut names = Vec::with_capacity(bucket_names.len());
        let mut tasks = Vec::with_capacity(bucket_names.len());

        for name in bucket_names {
            // Dispatch waits here while the pool is full
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("bucket semaphore is owned by this call and never closed");
            let collector = Arc::clone(&self.collector);
            let sink = Arc::clone(&self.sink);
            let bucket = name.clone();

            tasks.push(tokio::spawn(async move {
                let usage = collector.collect(&bucket).await;
                sink.emit(&usage);
                drop(permit);
                usage
            }));
            names.push(name);
        }

        let mut buckets = Vec::with_capacity(tasks.len());
        for (name, result) in names.into_iter().zip(join_all(tasks).await) {
            match result {
                Ok(usage) => buckets.push(usage),
                Err(e) => {
                    tracing::error!(bucket = %name, error = %e, "bucket collection task failed");
                    let usage = BucketUsage::new(name, "");
                    self.sink.emit(&usage);
                    buckets.push(usage);
                }
            }
        }

        Report { buckets }
    }
}
