use crate::billing::types::BYTES_PER_GB;

/// Convert a byte count reported by CloudWatch into GB
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}

/// Monthly cost of holding `size_gb` for a full month
pub fn monthly_cost(size_gb: f64, price_per_gb_month: f64) -> f64 {
    size_gb * price_per_gb_month
}

/// Object counts are averaged by CloudWatch; show them as whole objects
pub fn round_object_count(count: f64) -> u64 {
    if count.is_finite() && count > 0.0 {
        count.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(0.0), 0.0);
        assert!((bytes_to_gb(1_073_741_824.0) - 1.0).abs() < 1e-12);
        assert!((bytes_to_gb(100.0 * 1_073_741_824.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_cost() {
        // 100 GB at $0.025/GB-month = $2.50
        assert!((monthly_cost(100.0, 0.025) - 2.5).abs() < 1e-9);
        assert_eq!(monthly_cost(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_round_object_count() {
        assert_eq!(round_object_count(10.4), 10);
        assert_eq!(round_object_count(10.6), 11);
        assert_eq!(round_object_count(-3.0), 0);
        assert_eq!(round_object_count(f64::NAN), 0);
    }
}
