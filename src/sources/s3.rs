use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::Client;

use super::{BucketLocator, SourceError};

/// Error codes S3 uses for a bucket that does not exist (or is not visible)
const NOT_FOUND_CODES: [&str; 2] = ["NoSuchBucket", "NotFound"];

/// Header S3 sets on HeadBucket replies, including redirects
const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// Bucket discovery through the S3 API
#[derive(Debug, Clone)]
pub struct S3Locator {
    client: Client,
}

impl S3Locator {
    /// `sdk_config` should target the discovery region
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl BucketLocator for S3Locator {
    async fn list_bucket_names(&self) -> Result<Vec<String>, SourceError> {
        let mut names = Vec::new();
        let mut continuation_token = None;

        loop {
            let resp = self
                .client
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| SourceError::service("ListBuckets", DisplayErrorContext(&e)))?;

            names.extend(
                resp.buckets()
                    .iter()
                    .filter_map(|b| b.name().map(ToOwned::to_owned)),
            );

            match resp.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_owned()),
                _ => break,
            }
        }

        tracing::debug!(count = names.len(), "listed buckets");
        Ok(names)
    }

    async fn resolve_region(&self, bucket: &str) -> Result<String, SourceError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(resp) => match resp.bucket_region() {
                Some(region) if !region.is_empty() => Ok(region.to_owned()),
                _ => Err(SourceError::service(
                    "HeadBucket",
                    "response carried no bucket region",
                )),
            },
            Err(e) => {
                // Redirects and access-denied replies still name the bucket's region
                let raw = e.raw_response();
                let region = raw.and_then(|r| r.headers().get(BUCKET_REGION_HEADER));
                let not_found = raw.is_some_and(|r| r.status().as_u16() == 404)
                    || e.as_service_error().is_some_and(|se| {
                        se.is_not_found()
                            || se.code().is_some_and(|c| NOT_FOUND_CODES.contains(&c))
                    });
                region_from_head_failure(bucket, region, not_found, DisplayErrorContext(&e))
            }
        }
    }
}

/// Decide what a failed HeadBucket call says about the bucket's region.
///
/// A region header wins over the failure itself.
fn region_from_head_failure(
    bucket: &str,
    region_header: Option<&str>,
    not_found: bool,
    detail: impl std::fmt::Display,
) -> Result<String, SourceError> {
    match region_header {
        Some(region) if !region.is_empty() => Ok(region.to_owned()),
        _ if not_found => Err(SourceError::NotFound(bucket.to_owned())),
        _ => Err(SourceError::service("HeadBucket", detail)),
    }
}
