use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::billing::calculator::round_object_count;
use crate::billing::BucketUsage;

pub const TABLE_HEADER: &str = " ObjectCount      GigaBytes    Charges-USD  BucketName (Region)";

/// Receives each bucket as soon as it is collected.
///
/// Implementations must emit a bucket as one unit: output of two buckets never interleaves.
pub trait ResultSink: Send + Sync {
    fn emit(&self, usage: &BucketUsage);
}

/// Discards results; the caller prints the final report instead
#[derive(Debug, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn emit(&self, _usage: &BucketUsage) {}
}

/// Prints one table row per bucket, plus per-class detail rows when verbose
pub struct ConsoleSink<W: Write + Send> {
    out: Mutex<W>,
    verbose: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(io::stdout(), verbose)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out: Mutex::new(out),
            verbose,
        }
    }

    pub fn header(&self) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", TABLE_HEADER)
    }

    pub fn footer(&self, bucket_count: usize, total_size: f64, total_cost: f64) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(
            out,
            "{:>12} {:>14.2} {:>14.2}  TOTAL ({} buckets)",
            "", total_size, total_cost, bucket_count
        )
    }

    fn write_bucket(&self, out: &mut W, usage: &BucketUsage) -> io::Result<()> {
        writeln!(out, "{}", format_summary(usage))?;
        if self.verbose {
            for line in format_details(usage) {
                writeln!(out, "{}", line)?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}

impl<W: Write + Send> ResultSink for ConsoleSink<W> {
    fn emit(&self, usage: &BucketUsage) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.write_bucket(&mut out, usage) {
            tracing::warn!(bucket = %usage.name, error = %e, "failed to write bucket result");
        }
    }
}

pub fn format_summary(usage: &BucketUsage) -> String {
    format!(
        "{:>12} {:>14.2} {:>14.2}  {} ({})",
        round_object_count(usage.object_count),
        usage.total_size,
        usage.total_cost,
        usage.name,
        usage.region
    )
}

pub fn format_details(usage: &BucketUsage) -> Vec<String> {
    usage
        .nonzero_classes()
        .map(|(class, size, cost)| format!(" {:>26.2} {:>14.2}   - {}", size, cost, class))
        .collect()
}
