use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::ROW_CELL_COUNT;
use crate::error::RowError;
use crate::pipeline::processing::splitter::split_name_address;
use crate::types::{ContributorFormat, DonationRecord, RawRow};

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([\d,]+)").expect("valid amount regex"));
static STATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z]{2})\s+\d{5}").expect("valid state regex"));
static PARTY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([DR])\)").expect("valid party regex"));

/// Turns results-table rows into donation records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableExtractor {
    format: ContributorFormat,
}

impl TableExtractor {
    pub fn new(format: ContributorFormat) -> Self {
        Self { format }
    }

    /// Extracts every well-formed data row. Row 0 is the header and is always
    /// skipped; malformed rows are dropped without failing the batch.
    pub fn extract(&self, rows: &[RawRow], query_name: &str) -> Vec<DonationRecord> {
        rows.iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, row)| match self.extract_row(row, query_name) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping row {} for '{}': {}", index, query_name, e);
                    None
                }
            })
            .collect()
    }

    pub fn extract_row(&self, row: &RawRow, query_name: &str) -> Result<DonationRecord, RowError> {
        if row.len() < ROW_CELL_COUNT {
            return Err(RowError::TooFewCells(row.len()));
        }

        let (contributor_name, contributor_address) = self.split_contributor(&row[1], query_name);
        let amount_text = row[5].clone();
        let amount_numeric = parse_amount(&amount_text)?;
        let recipient_text = row[6].clone();

        Ok(DonationRecord {
            category: row[0].clone(),
            contributor_state: parse_state(&contributor_address),
            contributor_name,
            contributor_address,
            employer: row[2].clone(),
            occupation: row[3].clone(),
            date: row[4].clone(),
            amount_text,
            amount_numeric,
            recipient_party: parse_party(&recipient_text),
            recipient_text,
            jurisdiction: row[7].clone(),
        })
    }

    fn split_contributor(&self, blob: &str, query_name: &str) -> (String, String) {
        match self.format {
            ContributorFormat::Inline => split_name_address(blob, query_name),
            ContributorFormat::Multiline => split_multiline(blob),
        }
    }
}

/// Name on the first line, remaining lines joined into one address.
fn split_multiline(blob: &str) -> (String, String) {
    let mut lines = blob.lines();
    let name = lines.next().unwrap_or_default().trim().to_string();
    let address = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (name, address)
}

/// Dollar amount in the text, 0 when there is none or it is negative.
pub fn parse_amount(text: &str) -> Result<u64, RowError> {
    let Some(caps) = AMOUNT_RE.captures(text) else {
        return Ok(0);
    };
    let whole = caps.get(0).map(|m| m.start()).unwrap_or_default();
    if text[..whole].ends_with('-') {
        return Ok(0);
    }

    let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return Err(RowError::MalformedAmount(text.to_string()));
    }
    digits
        .parse::<u64>()
        .map_err(|_| RowError::MalformedAmount(text.to_string()))
}

/// Two-letter state code followed by a ZIP code, or empty.
pub fn parse_state(address: &str) -> String {
    STATE_RE
        .captures(address)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// "D" or "R" when the recipient carries a party marker like "(D)", else empty.
pub fn parse_party(recipient: &str) -> String {
    PARTY_RE
        .captures(recipient)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}
