//! Metric names and recording helpers for the lookup pipeline.
//!
//! Recording goes through the `metrics` facade; with no recorder installed the
//! calls are no-ops, so the library never requires an exporter.

use std::fmt;

/// Every metric the pipeline records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Lookup queries
    QueriesSuccess,
    QueriesFailed,
    FetchDuration,

    // Extraction
    RowsExtracted,
    RowsSkipped,

    // Grouping and aggregation
    VariantGroups,
    DonorProfiles,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::QueriesSuccess => "donor_lookup_queries_success_total",
            MetricName::QueriesFailed => "donor_lookup_queries_failed_total",
            MetricName::FetchDuration => "donor_lookup_fetch_duration_seconds",
            MetricName::RowsExtracted => "donor_lookup_rows_extracted_total",
            MetricName::RowsSkipped => "donor_lookup_rows_skipped_total",
            MetricName::VariantGroups => "donor_lookup_variant_groups_total",
            MetricName::DonorProfiles => "donor_lookup_donor_profiles",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            QueriesSuccess,
            QueriesFailed,
            FetchDuration,
            RowsExtracted,
            RowsSkipped,
            VariantGroups,
            DonorProfiles,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn emit_counter(name: MetricName, value: u64) {
    ::metrics::counter!(name.as_str()).increment(value);
}

pub fn emit_histogram(name: MetricName, value: f64) {
    ::metrics::histogram!(name.as_str()).record(value);
}

pub fn emit_gauge(name: MetricName, value: f64) {
    ::metrics::gauge!(name.as_str()).set(value);
}
