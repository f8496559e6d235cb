//! Donor identity keys and per-donor aggregation with party-preference labels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::STRONG_PREFERENCE_PERCENT;
use crate::types::{DonationRecord, QueryResult};

/// Case-normalized `name|state|employer|occupation` identifying one donor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonorKey(String);

impl DonorKey {
    pub fn of(record: &DonationRecord) -> Self {
        let name = record
            .contributor_name
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim();
        let key = format!(
            "{}|{}|{}|{}",
            name, record.contributor_state, record.employer, record.occupation
        );
        Self(key.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DonorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonorInfo {
    pub name: String,
    pub state: String,
    pub employer: String,
    pub occupation: String,
    /// The queried name that surfaced this donor; the smallest one when several did.
    pub query_name: String,
}

/// Which side of the two-party split a donation counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyBucket {
    Democratic,
    Republican,
    Other,
}

impl PartyBucket {
    pub fn of(party: &str) -> Self {
        match party {
            "D" => PartyBucket::Democratic,
            "R" => PartyBucket::Republican,
            _ => PartyBucket::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyTally {
    pub democratic_count: u64,
    pub democratic_amount: u64,
    pub republican_count: u64,
    pub republican_amount: u64,
    pub other_count: u64,
    pub other_amount: u64,
}

impl PartyTally {
    pub fn add(&mut self, bucket: PartyBucket, amount: u64) {
        let (count, total) = match bucket {
            PartyBucket::Democratic => (&mut self.democratic_count, &mut self.democratic_amount),
            PartyBucket::Republican => (&mut self.republican_count, &mut self.republican_amount),
            PartyBucket::Other => (&mut self.other_count, &mut self.other_amount),
        };
        *count = count.saturating_add(1);
        *total = total.saturating_add(amount);
    }

    // Totals clamp at u64::MAX.
    pub fn total_count(&self) -> u64 {
        self.democratic_count
            .saturating_add(self.republican_count)
            .saturating_add(self.other_count)
    }

    pub fn total_amount(&self) -> u64 {
        self.democratic_amount
            .saturating_add(self.republican_amount)
            .saturating_add(self.other_amount)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyPercentages {
    pub democratic_percentage: f64,
    pub republican_percentage: f64,
    pub other_percentage: f64,
}

impl PartyPercentages {
    pub fn from_tally(tally: &PartyTally) -> Self {
        let total = tally.total_count();
        if total == 0 {
            return Self::default();
        }
        let pct = |count: u64| count as f64 * 100.0 / total as f64;
        Self {
            democratic_percentage: pct(tally.democratic_count),
            republican_percentage: pct(tally.republican_count),
            other_percentage: pct(tally.other_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyPreference {
    #[serde(rename = "Strong Democratic")]
    StrongDemocratic,
    #[serde(rename = "Strong Republican")]
    StrongRepublican,
    #[serde(rename = "Lean Democratic")]
    LeanDemocratic,
    #[serde(rename = "Lean Republican")]
    LeanRepublican,
    #[serde(rename = "Mixed/Independent")]
    MixedIndependent,
    Unknown,
}

impl PartyPreference {
    pub fn classify(tally: &PartyTally, pct: &PartyPercentages) -> Self {
        if tally.total_count() == 0 {
            return PartyPreference::Unknown;
        }
        let (dem, rep) = (pct.democratic_percentage, pct.republican_percentage);
        if dem >= STRONG_PREFERENCE_PERCENT {
            PartyPreference::StrongDemocratic
        } else if rep >= STRONG_PREFERENCE_PERCENT {
            PartyPreference::StrongRepublican
        } else if dem > rep {
            PartyPreference::LeanDemocratic
        } else if rep > dem {
            PartyPreference::LeanRepublican
        } else {
            PartyPreference::MixedIndependent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartyPreference::StrongDemocratic => "Strong Democratic",
            PartyPreference::StrongRepublican => "Strong Republican",
            PartyPreference::LeanDemocratic => "Lean Democratic",
            PartyPreference::LeanRepublican => "Lean Republican",
            PartyPreference::MixedIndependent => "Mixed/Independent",
            PartyPreference::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PartyPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub donor_info: DonorInfo,
    /// Canonically ordered, so profiles compare equal whatever the fold order.
    pub member_records: Vec<DonationRecord>,
    pub party_tally: PartyTally,
    pub percentages: PartyPercentages,
    pub party_preference: PartyPreference,
}

impl DonorProfile {
    pub fn total_donations(&self) -> u64 {
        self.party_tally.total_count()
    }

    pub fn total_amount(&self) -> u64 {
        self.party_tally.total_amount()
    }
}

pub type DonorProfiles = BTreeMap<DonorKey, DonorProfile>;

#[derive(Default)]
struct ProfileBuilder {
    records: Vec<DonationRecord>,
    query_names: BTreeSet<String>,
    tally: PartyTally,
}

/// Folds donation records from any number of queries into donor profiles.
#[derive(Default)]
pub struct DonorAggregator {
    builders: BTreeMap<DonorKey, ProfileBuilder>,
}

impl DonorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, query_name: &str, record: &DonationRecord) {
        let builder = self.builders.entry(DonorKey::of(record)).or_default();
        builder.tally.add(PartyBucket::of(&record.recipient_party), record.amount_numeric);
        builder.query_names.insert(query_name.to_string());
        builder.records.push(record.clone());
    }

    /// Adds every record of a successful query; failed queries contribute nothing.
    pub fn add_query_result(&mut self, result: &QueryResult) {
        if !result.success {
            return;
        }
        for record in result.records() {
            self.add(&result.name, record);
        }
    }

    pub fn finish(self) -> DonorProfiles {
        let profiles: DonorProfiles = self
            .builders
            .into_iter()
            .map(|(key, builder)| (key, build_profile(builder)))
            .collect();
        debug!("Aggregated {} donor profiles", profiles.len());
        profiles
    }
}

fn build_profile(builder: ProfileBuilder) -> DonorProfile {
    let ProfileBuilder {
        mut records,
        query_names,
        tally,
    } = builder;
    records.sort();

    let donor_info = match records.first() {
        Some(first) => DonorInfo {
            name: first.contributor_name.split('\n').next().unwrap_or_default().trim().to_string(),
            state: first.contributor_state.clone(),
            employer: first.employer.clone(),
            occupation: first.occupation.clone(),
            query_name: query_names.into_iter().next().unwrap_or_default(),
        },
        None => DonorInfo::default(),
    };

    let percentages = PartyPercentages::from_tally(&tally);
    DonorProfile {
        donor_info,
        member_records: records,
        party_tally: tally,
        percentages,
        party_preference: PartyPreference::classify(&tally, &percentages),
    }
}

/// Builds donor profiles across all query results once every query has finished.
pub fn aggregate_donors(results: &[QueryResult]) -> DonorProfiles {
    let mut aggregator = DonorAggregator::new();
    for result in results {
        aggregator.add_query_result(result);
    }
    aggregator.finish()
}
