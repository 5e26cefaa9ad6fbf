use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, StandardUnit, Statistic};
use aws_sdk_cloudwatch::Client;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{MetricSource, SourceError};
use crate::billing::StorageClass;

const S3_NAMESPACE: &str = "AWS/S3";
const NUMBER_OF_OBJECTS: &str = "NumberOfObjects";
const BUCKET_SIZE_BYTES: &str = "BucketSizeBytes";
const ALL_STORAGE_TYPES: &str = "AllStorageTypes";

/// S3 publishes storage metrics once a day
const DAY_SECONDS: i32 = 86_400;
const OBJECT_COUNT_WINDOW_DAYS: i64 = 2;
const SIZE_WINDOW_DAYS: i64 = 3;

/// Daily S3 storage metrics read from CloudWatch.
///
/// S3 storage metrics live in the bucket's own region, so one client is kept per region.
#[derive(Debug)]
pub struct CloudWatchMetrics {
    sdk_config: SdkConfig,
    clients: RwLock<HashMap<String, Client>>,
}

/// One `GetMetricStatistics` query over the `AWS/S3` namespace
struct MetricQuery<'a> {
    bucket: &'a str,
    region: &'a str,
    metric: &'static str,
    storage_type: &'a str,
    unit: StandardUnit,
    window_days: i64,
}

impl CloudWatchMetrics {
    pub fn new(sdk_config: SdkConfig) -> Self {
        Self {
            sdk_config,
            clients: RwLock::new(HashMap::new()),
        }
    }

    fn client_for(&self, region: &str) -> Client {
        if let Some(client) = self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(region)
        {
            return client.clone();
        }

        let config = aws_sdk_cloudwatch::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_owned()))
            .build();
        let client = Client::from_conf(config);

        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(region.to_owned())
            .or_insert(client)
            .clone()
    }

    async fn latest_average(&self, query: MetricQuery<'_>) -> Result<f64, SourceError> {
        let end = Utc::now();
        let start = end - Duration::days(query.window_days);

        let resp = self
            .client_for(query.region)
            .get_metric_statistics()
            .namespace(S3_NAMESPACE)
            .metric_name(query.metric)
            .dimensions(
                Dimension::builder()
                    .name("BucketName")
                    .value(query.bucket)
                    .build(),
            )
            .dimensions(
                Dimension::builder()
                    .name("StorageType")
                    .value(query.storage_type)
                    .build(),
            )
            .start_time(DateTime::from_secs(start.timestamp()))
            .end_time(DateTime::from_secs(end.timestamp()))
            .period(DAY_SECONDS)
            .statistics(Statistic::Average)
            .unit(query.unit)
            .send()
            .await
            .map_err(|e| SourceError::service("GetMetricStatistics", DisplayErrorContext(&e)))?;

        let value = newest_average(resp.datapoints());
        tracing::trace!(
            bucket = query.bucket,
            metric = query.metric,
            storage_type = query.storage_type,
            points = resp.datapoints().len(),
            value,
            "metric sample"
        );
        Ok(value)
    }
}

#[async_trait]
impl MetricSource for CloudWatchMetrics {
    async fn latest_object_count(&self, bucket: &str, region: &str) -> Result<f64, SourceError> {
        self.latest_average(MetricQuery {
            bucket,
            region,
            metric: NUMBER_OF_OBJECTS,
            storage_type: ALL_STORAGE_TYPES,
            unit: StandardUnit::Count,
            window_days: OBJECT_COUNT_WINDOW_DAYS,
        })
        .await
    }

    async fn latest_size_bytes(
        &self,
        bucket: &str,
        region: &str,
        class: &StorageClass,
    ) -> Result<f64, SourceError> {
        self.latest_average(MetricQuery {
            bucket,
            region,
            metric: BUCKET_SIZE_BYTES,
            storage_type: class.as_str(),
            unit: StandardUnit::Bytes,
            window_days: SIZE_WINDOW_DAYS,
        })
        .await
    }
}

/// Average of the most recent datapoint, or 0 when there is none
pub fn newest_average(points: &[Datapoint]) -> f64 {
    points
        .iter()
        .max_by_key(|p| p.timestamp().map(|t| (t.secs(), t.subsec_nanos())))
        .and_then(|p| p.average())
        .unwrap_or(0.0)
}
