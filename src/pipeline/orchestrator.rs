use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::app::ports::{DonorSourcePort, FetchOutcome};
use crate::config::Config;
use crate::observability::metrics::{emit_counter, emit_gauge, emit_histogram, MetricName};
use crate::pipeline::ingestion::pacer::Pacer;
use crate::pipeline::processing::donors::{aggregate_donors, DonorProfiles};
use crate::pipeline::processing::extract::TableExtractor;
use crate::pipeline::processing::variants::VariantGrouper;
use crate::types::{QueryResult, RawRow};

/// Everything one run produced: per-name results in input order plus the
/// donor profiles folded across all of them.
#[derive(Debug)]
pub struct LookupRun {
    pub results: Vec<QueryResult>,
    pub profiles: DonorProfiles,
}

/// Runs the fetch, extract and group steps for each name, then aggregates donors
/// once every lookup has finished.
pub struct LookupPipeline {
    source: Arc<dyn DonorSourcePort>,
    extractor: TableExtractor,
    grouper: Arc<VariantGrouper>,
    pacer: Pacer,
}

impl LookupPipeline {
    pub fn new(source: Arc<dyn DonorSourcePort>, extractor: TableExtractor, grouper: VariantGrouper, pacer: Pacer) -> Self {
        Self {
            source,
            extractor,
            grouper: Arc::new(grouper),
            pacer,
        }
    }

    pub fn from_config(source: Arc<dyn DonorSourcePort>, config: &Config) -> Self {
        Self::new(
            source,
            TableExtractor::new(config.matching.contributor_format),
            VariantGrouper::new(config.matching.similarity_threshold),
            Pacer::new(config.lookup.pacing()),
        )
    }

    #[instrument(skip(self, names), fields(names = names.len()))]
    pub async fn run(&self, names: &[String]) -> LookupRun {
        let total = names.len();
        info!("Found {} unique names to process", total);

        let mut handles = Vec::with_capacity(total);
        for (i, name) in names.iter().enumerate() {
            let permit = self.pacer.acquire().await;
            info!("Processing {}/{}: {}", i + 1, total, name);

            let source = self.source.clone();
            let extractor = self.extractor;
            let grouper = self.grouper.clone();
            let task_name = name.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                lookup_one(source.as_ref(), &extractor, &grouper, &task_name).await
            });
            handles.push((name, handle));
        }

        // Fan-in: nothing is aggregated until every lookup has completed.
        let mut results = Vec::with_capacity(total);
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Lookup task for '{}' did not complete: {}", name, e);
                    QueryResult::failed(name, self.source.lookup_url(name), None, format!("lookup task failed: {}", e))
                }
            };
            results.push(result);
        }

        let profiles = aggregate_donors(&results);
        emit_gauge(MetricName::DonorProfiles, profiles.len() as f64);
        info!("Aggregated {} donor profiles from {} queries", profiles.len(), results.len());

        LookupRun { results, profiles }
    }
}

async fn lookup_one(
    source: &dyn DonorSourcePort,
    extractor: &TableExtractor,
    grouper: &VariantGrouper,
    name: &str,
) -> QueryResult {
    let started = Instant::now();
    let outcome = source.fetch(name).await;
    emit_histogram(MetricName::FetchDuration, started.elapsed().as_secs_f64());

    let result = process_outcome(name, outcome, extractor, grouper);
    if result.success {
        emit_counter(MetricName::QueriesSuccess, 1);
        info!(
            "  Found {} donations, Total: ${}",
            result.total_donations,
            format_thousands(result.total_amount)
        );
    } else {
        emit_counter(MetricName::QueriesFailed, 1);
        warn!("  Error for '{}': {}", name, result.error.as_deref().unwrap_or("unknown error"));
    }
    result
}

/// Turns one fetch outcome into the query's result. Failures carry no records.
pub fn process_outcome(name: &str, outcome: FetchOutcome, extractor: &TableExtractor, grouper: &VariantGrouper) -> QueryResult {
    match outcome {
        FetchOutcome::Table { url, status_code, rows } => {
            process_rows(name, url, status_code, &rows, extractor, grouper)
        }
        FetchOutcome::Failed { url, status_code, reason } => QueryResult::failed(name, url, status_code, reason),
    }
}

pub fn process_rows(
    name: &str,
    url: String,
    status_code: u16,
    rows: &[RawRow],
    extractor: &TableExtractor,
    grouper: &VariantGrouper,
) -> QueryResult {
    let records = extractor.extract(rows, name);
    let data_rows = rows.len().saturating_sub(1);
    emit_counter(MetricName::RowsExtracted, records.len() as u64);
    emit_counter(MetricName::RowsSkipped, data_rows.saturating_sub(records.len()) as u64);

    let variants = grouper.group(&records);
    emit_counter(MetricName::VariantGroups, variants.len() as u64);

    QueryResult::succeeded(name, url, status_code, &records, variants)
}

/// Totals across a run, as printed at the end of `lookup`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_names: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_donations: usize,
    pub total_amount: u64,
    pub total_variants: usize,
}

impl RunSummary {
    pub fn from_results(results: &[QueryResult]) -> Self {
        let successes = results.iter().filter(|r| r.success);
        Self {
            total_names: results.len(),
            successful: successes.clone().count(),
            failed: results.iter().filter(|r| !r.success).count(),
            total_donations: successes.clone().map(|r| r.total_donations).sum(),
            total_amount: successes
                .clone()
                .fold(0u64, |acc, r| acc.saturating_add(r.total_amount)),
            total_variants: successes.map(|r| r.variants.len()).sum(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "Total names processed: {}", self.total_names)?;
        writeln!(f, "Successful queries: {}", self.successful)?;
        writeln!(f, "Failed queries: {}", self.failed)?;
        writeln!(f, "Total donations found: {}", self.total_donations)?;
        writeln!(f, "Total donation amount: ${}", format_thousands(self.total_amount))?;
        write!(f, "Total variants (grouped by similar addresses): {}", self.total_variants)
    }
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
