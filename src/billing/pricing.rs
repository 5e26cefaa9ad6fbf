use std::collections::BTreeMap;

use super::StorageClass;

/// Monthly storage prices (USD per GB-month) for one pricing region
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<StorageClass, f64>,
}

impl PriceTable {
    /// Build a table from `(class, price)` pairs; later pairs win
    pub fn from_entries<I, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<StorageClass>,
    {
        Self {
            prices: entries
                .into_iter()
                .map(|(class, price)| (class.into(), price))
                .collect(),
        }
    }

    /// Asia Pacific (Tokyo) prices
    pub fn tokyo() -> Self {
        Self::from_entries([
            (StorageClass::STANDARD, 0.025),
            (StorageClass::INTELLIGENT_TIERING, 0.025),
            (StorageClass::STANDARD_IA, 0.019),
            (StorageClass::STANDARD_IA_SIZE_OVERHEAD, 0.019),
            (StorageClass::STANDARD_IA_OBJECT_OVERHEAD, 0.019),
            (StorageClass::ONE_ZONE_IA, 0.0152),
            (StorageClass::ONE_ZONE_IA_SIZE_OVERHEAD, 0.0152),
            (StorageClass::REDUCED_REDUNDANCY, 0.0259),
            (StorageClass::GLACIER, 0.005),
            (StorageClass::GLACIER_STAGING, 0.005),
            (StorageClass::GLACIER_OBJECT_OVERHEAD, 0.005),
            (StorageClass::GLACIER_S3_OBJECT_OVERHEAD, 0.025),
            (StorageClass::DEEP_ARCHIVE, 0.002),
            (StorageClass::DEEP_ARCHIVE_OBJECT_OVERHEAD, 0.002),
            (StorageClass::DEEP_ARCHIVE_S3_OBJECT_OVERHEAD, 0.025),
            (StorageClass::DEEP_ARCHIVE_STAGING, 0.002),
        ])
    }

    /// Return a copy with `overrides` applied on top (new classes are added)
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        for (class, price) in overrides {
            self.prices.insert(StorageClass::new(class.as_str()), *price);
        }
        self
    }

    /// Price of a storage class; unknown classes cost nothing
    pub fn price_of(&self, class: &StorageClass) -> f64 {
        self.prices.get(class).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StorageClass, f64)> {
        self.prices.iter().map(|(class, price)| (class, *price))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::tokyo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokyo_prices() {
        let table = PriceTable::tokyo();
        assert_eq!(table.len(), 16);
        assert_eq!(table.price_of(&StorageClass::from(StorageClass::STANDARD)), 0.025);
        assert_eq!(
            table.price_of(&StorageClass::from(StorageClass::DEEP_ARCHIVE)),
            0.002
        );
    }

    #[test]
    fn test_unknown_class_is_free() {
        let table = PriceTable::from_entries([("A", 0.02), ("B", 0.01)]);
        assert_eq!(table.price_of(&StorageClass::from("C")), 0.0);
    }

    #[test]
    fn test_unknown_class_counts_toward_size_only() {
        let table = PriceTable::from_entries([("A", 0.02)]);
        let mut usage = crate::billing::BucketUsage::new("b1", "us-east-1");
        for (class, size) in [("A", 100.0), ("Mystery", 40.0)] {
            let class = StorageClass::from(class);
            let price = table.price_of(&class);
            usage.record(class, size, price);
        }

        assert!((usage.total_size - 140.0).abs() < 1e-6);
        assert!((usage.total_cost - 2.0).abs() < 1e-6);
        assert_eq!(usage.cost_by_class[&StorageClass::from("Mystery")], 0.0);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let overrides: BTreeMap<String, f64> = [
            (StorageClass::STANDARD.to_string(), 0.023),
            ("ExpressOneZone".to_string(), 0.16),
        ]
        .into_iter()
        .collect();

        let table = PriceTable::tokyo().with_overrides(&overrides);
        assert_eq!(table.len(), 17);
        assert_eq!(table.price_of(&StorageClass::from(StorageClass::STANDARD)), 0.023);
        assert_eq!(table.price_of(&StorageClass::from("ExpressOneZone")), 0.16);
    }
}
