use serde::{Deserialize, Serialize};

/// One results-table row as an ordered list of trimmed cell texts.
///
/// Positions are fixed: category, contributor blob, employer, occupation,
/// date, amount, recipient, jurisdiction.
pub type RawRow = Vec<String>;

/// How the contributor cell of a results row lays out name and address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributorFormat {
    /// "LAST, FIRSTCITY, ST 12345" with no separator between name and address.
    #[default]
    Inline,
    /// Name on the first line, address on the following lines.
    Multiline,
}

/// A single donation parsed from one results row. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DonationRecord {
    pub category: String,
    pub contributor_name: String,
    pub contributor_address: String,
    pub employer: String,
    pub occupation: String,
    pub date: String,
    pub amount_text: String,
    pub amount_numeric: u64,
    pub recipient_text: String,
    /// "D", "R" or empty.
    pub recipient_party: String,
    pub jurisdiction: String,
    /// Two-letter state code or empty.
    pub contributor_state: String,
}

/// Donations from one query whose addresses look like the same place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantGroup {
    #[serde(rename = "contributor_name")]
    pub representative_name: String,
    #[serde(rename = "contributor_address")]
    pub representative_address: String,
    #[serde(rename = "donations")]
    pub member_records: Vec<DonationRecord>,
}

impl VariantGroup {
    pub fn seeded_with(record: DonationRecord) -> Self {
        Self {
            representative_name: record.contributor_name.clone(),
            representative_address: record.contributor_address.clone(),
            member_records: vec![record],
        }
    }

    pub fn len(&self) -> usize {
        self.member_records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_records.is_empty()
    }
}

/// Outcome of looking up one name, as persisted in the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub name: String,
    pub url: String,
    pub status_code: Option<u16>,
    pub variants: Vec<VariantGroup>,
    pub total_donations: usize,
    pub total_amount: u64,
    pub success: bool,
    pub error: Option<String>,
}

impl QueryResult {
    pub fn succeeded(name: &str, url: String, status_code: u16, records: &[DonationRecord], variants: Vec<VariantGroup>) -> Self {
        Self {
            name: name.to_string(),
            url,
            status_code: Some(status_code),
            variants,
            total_donations: records.len(),
            total_amount: records
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.amount_numeric)),
            success: true,
            error: None,
        }
    }

    pub fn failed(name: &str, url: String, status_code: Option<u16>, reason: String) -> Self {
        Self {
            name: name.to_string(),
            url,
            status_code,
            variants: Vec::new(),
            total_donations: 0,
            total_amount: 0,
            success: false,
            error: Some(reason),
        }
    }

    /// All donation records of this query, in variant order.
    pub fn records(&self) -> impl Iterator<Item = &DonationRecord> {
        self.variants.iter().flat_map(|v| v.member_records.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: u64) -> DonationRecord {
        DonationRecord {
            category: "Individual".into(),
            contributor_name: "KAUR, AASEES".into(),
            contributor_address: "DUNWOODY, GA 30360".into(),
            employer: "ACME".into(),
            occupation: "ENGINEER".into(),
            date: "2022".into(),
            amount_text: format!("${}", amount),
            amount_numeric: amount,
            recipient_text: "CANDIDATE (D)".into(),
            recipient_party: "D".into(),
            jurisdiction: "Federal".into(),
            contributor_state: "GA".into(),
        }
    }

    #[test]
    fn test_succeeded_total_clamps_at_max() {
        let records = vec![record(u64::MAX), record(5)];
        let result = QueryResult::succeeded("KAUR, AASEES", "u".into(), 200, &records, Vec::new());
        assert_eq!(result.total_donations, 2);
        assert_eq!(result.total_amount, u64::MAX);
    }
}
