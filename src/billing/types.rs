use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::calculator::monthly_cost;

/// Bytes per gigabyte (GiB, as S3 bills it)
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Sizes below this many GB are treated as zero for display
pub const SIZE_EPSILON_GB: f64 = 1e-9;

/// Billing category of stored bytes, named after the CloudWatch `StorageType` dimension
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageClass(String);

impl StorageClass {
    pub const STANDARD: &'static str = "StandardStorage";
    pub const INTELLIGENT_TIERING: &'static str = "IntelligentTieringStorage";
    pub const STANDARD_IA: &'static str = "StandardIAStorage";
    pub const STANDARD_IA_SIZE_OVERHEAD: &'static str = "StandardIASizeOverhead";
    pub const STANDARD_IA_OBJECT_OVERHEAD: &'static str = "StandardIAObjectOverhead";
    pub const ONE_ZONE_IA: &'static str = "OneZoneIAStorage";
    pub const ONE_ZONE_IA_SIZE_OVERHEAD: &'static str = "OneZoneIASizeOverhead";
    pub const REDUCED_REDUNDANCY: &'static str = "ReducedRedundancyStorage";
    pub const GLACIER: &'static str = "GlacierStorage";
    pub const GLACIER_STAGING: &'static str = "GlacierStagingStorage";
    pub const GLACIER_OBJECT_OVERHEAD: &'static str = "GlacierObjectOverhead";
    pub const GLACIER_S3_OBJECT_OVERHEAD: &'static str = "GlacierS3ObjectOverhead";
    pub const DEEP_ARCHIVE: &'static str = "DeepArchiveStorage";
    pub const DEEP_ARCHIVE_OBJECT_OVERHEAD: &'static str = "DeepArchiveObjectOverhead";
    pub const DEEP_ARCHIVE_S3_OBJECT_OVERHEAD: &'static str = "DeepArchiveS3ObjectOverhead";
    pub const DEEP_ARCHIVE_STAGING: &'static str = "DeepArchiveStagingStorage";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StorageClass {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Estimated storage usage and monthly cost of one bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketUsage {
    pub name: String,
    /// Empty when the region could not be resolved
    pub region: String,
    pub object_count: f64,
    pub size_by_class: BTreeMap<StorageClass, f64>,
    pub total_size: f64,
    pub cost_by_class: BTreeMap<StorageClass, f64>,
    pub total_cost: f64,
}

impl BucketUsage {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    /// Record the size of one storage class and its cost at `unit_price` per GB-month.
    ///
    /// Recording the same class twice replaces the earlier entry, so the totals
    /// always equal the sums over the per-class maps.
    pub fn record(&mut self, class: StorageClass, size_gb: f64, unit_price: f64) {
        let cost = monthly_cost(size_gb, unit_price);

        if let Some(old_size) = self.size_by_class.insert(class.clone(), size_gb) {
            self.total_size -= old_size;
        }
        if let Some(old_cost) = self.cost_by_class.insert(class, cost) {
            self.total_cost -= old_cost;
        }

        self.total_size += size_gb;
        self.total_cost += cost;
    }

    /// Storage classes worth showing in a detail view, with their size and cost
    pub fn nonzero_classes(&self) -> impl Iterator<Item = (&StorageClass, f64, f64)> {
        self.size_by_class
            .iter()
            .filter(|(_, size)| size.abs() >= SIZE_EPSILON_GB)
            .map(|(class, size)| {
                let cost = self.cost_by_class.get(class).copied().unwrap_or(0.0);
                (class, *size, cost)
            })
    }

    pub fn region_known(&self) -> bool {
        !self.region.is_empty()
    }
}

/// Usage of every bucket in a run, in bucket discovery order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub buckets: Vec<BucketUsage>,
}

impl Report {
    pub fn total_size(&self) -> f64 {
        self.buckets.iter().map(|b| b.total_size).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.buckets.iter().map(|b| b.total_cost).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_totals_in_sync() {
        let mut usage = BucketUsage::new("logs", "ap-northeast-1");
        usage.record(StorageClass::from(StorageClass::STANDARD), 100.0, 0.025);
        usage.record(StorageClass::from(StorageClass::GLACIER), 40.0, 0.005);

        let size_sum: f64 = usage.size_by_class.values().sum();
        let cost_sum: f64 = usage.cost_by_class.values().sum();
        assert!((usage.total_size - size_sum).abs() < 1e-6);
        assert!((usage.total_cost - cost_sum).abs() < 1e-6);
        assert!((usage.total_cost - 2.7).abs() < 1e-6);
    }

    #[test]
    fn test_record_twice_replaces_entry() {
        let mut usage = BucketUsage::new("logs", "");
        usage.record(StorageClass::from("A"), 10.0, 1.0);
        usage.record(StorageClass::from("A"), 4.0, 1.0);

        assert_eq!(usage.size_by_class.len(), 1);
        assert!((usage.total_size - 4.0).abs() < 1e-6);
        assert!((usage.total_cost - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_size_and_cost_keys_match() {
        let mut usage = BucketUsage::new("logs", "");
        usage.record(StorageClass::from("A"), 0.0, 0.02);
        usage.record(StorageClass::from("B"), 3.0, 0.0);

        let size_keys: Vec<_> = usage.size_by_class.keys().collect();
        let cost_keys: Vec<_> = usage.cost_by_class.keys().collect();
        assert_eq!(size_keys, cost_keys);
    }

    #[test]
    fn test_nonzero_classes_skips_noise() {
        let mut usage = BucketUsage::new("logs", "");
        usage.record(StorageClass::from("A"), 1e-12, 0.02);
        usage.record(StorageClass::from("B"), 2.0, 0.01);

        let shown: Vec<_> = usage.nonzero_classes().map(|(c, _, _)| c.as_str()).collect();
        assert_eq!(shown, vec!["B"]);
    }

    #[test]
    fn test_report_totals() {
        let mut a = BucketUsage::new("a", "");
        a.record(StorageClass::from("A"), 100.0, 0.02);
        let mut b = BucketUsage::new("b", "");
        b.record(StorageClass::from("A"), 50.0, 0.02);

        let report = Report {
            buckets: vec![a, b],
        };
        assert_eq!(report.len(), 2);
        assert!((report.total_size() - 150.0).abs() < 1e-6);
        assert!((report.total_cost() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_report_json_shape() {
        let mut usage = BucketUsage::new("media", "ap-northeast-1");
        usage.object_count = 12.0;
        usage.record(StorageClass::from(StorageClass::STANDARD), 100.0, 0.025);
        let report = Report {
            buckets: vec![usage],
        };

        let value = serde_json::to_value(&report).unwrap();
        let bucket = &value["buckets"][0];
        assert_eq!(bucket["name"], "media");
        assert_eq!(bucket["region"], "ap-northeast-1");
        assert_eq!(bucket["size_by_class"]["StandardStorage"], 100.0);
        assert_eq!(bucket["cost_by_class"]["StandardStorage"], 2.5);
    }
}
