use async_trait::async_trait;

use crate::types::RawRow;

/// What came back from looking up one name on the donor site.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    /// The results page was fetched and its table parsed (possibly empty).
    Table {
        url: String,
        status_code: u16,
        rows: Vec<RawRow>,
    },
    /// The lookup failed; `reason` is reported verbatim in the query result.
    Failed {
        url: String,
        status_code: Option<u16>,
        reason: String,
    },
}

// Ingest-side port: one lookup per queried name
#[async_trait]
pub trait DonorSourcePort: Send + Sync {
    /// URL that a lookup of `name` requests.
    fn lookup_url(&self, name: &str) -> String;

    async fn fetch(&self, name: &str) -> FetchOutcome;
}
