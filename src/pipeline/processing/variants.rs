use tracing::debug;

use crate::constants::DEFAULT_SIMILARITY_THRESHOLD;
use crate::pipeline::processing::similarity::address_similarity;
use crate::types::{DonationRecord, VariantGroup};

/// Groups the donations of a single query into address variants.
///
/// Greedy and seed-order dependent: each unconsumed record seeds a group and
/// pulls in every later-scanned unconsumed record whose address is at least
/// `threshold` similar to the seed's address. Consumed records are never
/// reconsidered, so grouping is not transitive.
pub struct VariantGrouper {
    threshold: f64,
}

impl Default for VariantGrouper {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl VariantGrouper {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn group(&self, records: &[DonationRecord]) -> Vec<VariantGroup> {
        let mut consumed = vec![false; records.len()];
        let mut groups = Vec::new();

        for (i, seed) in records.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            consumed[i] = true;
            let mut group = VariantGroup::seeded_with(seed.clone());

            for (j, other) in records.iter().enumerate() {
                if consumed[j] {
                    continue;
                }
                let score = address_similarity(&seed.contributor_address, &other.contributor_address);
                if score >= self.threshold {
                    consumed[j] = true;
                    group.member_records.push(other.clone());
                }
            }

            debug!(
                "Variant group for '{}' at '{}' has {} donations",
                group.representative_name,
                group.representative_address,
                group.len()
            );
            groups.push(group);
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, address: &str, amount: u64) -> DonationRecord {
        DonationRecord {
            category: "Individual".to_string(),
            contributor_name: name.to_string(),
            contributor_address: address.to_string(),
            employer: String::new(),
            occupation: String::new(),
            date: "01/01/2024".to_string(),
            amount_text: format!("${amount}"),
            amount_numeric: amount,
            recipient_text: String::new(),
            recipient_party: String::new(),
            jurisdiction: "Federal".to_string(),
            contributor_state: String::new(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(VariantGrouper::default().group(&[]).is_empty());
    }

    #[test]
    fn test_near_identical_addresses_share_a_group() {
        let records = vec![
            record("KAUR, AASEES", "DUNWOODY, GA 30360", 100),
            record("KAUR, AASEES", "SEATTLE, WA 98101", 50),
            record("KAUR, AASEES", "DUNWODY, GA 30360", 25),
        ];
        let groups = VariantGrouper::default().group(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].representative_address, "DUNWOODY, GA 30360");
        assert_eq!(groups[0].member_records, vec![records[0].clone(), records[2].clone()]);
        assert_eq!(groups[1].member_records, vec![records[1].clone()]);
    }

    #[test]
    fn test_every_record_lands_in_exactly_one_group() {
        let records = vec![
            record("A", "DUNWOODY, GA 30360", 1),
            record("A", "DUNWOODY, GA 30361", 2),
            record("A", "", 3),
            record("A", "", 4),
            record("A", "AUSTIN, TX 78701", 5),
            record("A", "DUNWOODY, GA 30360", 6),
        ];
        let groups = VariantGrouper::default().group(&records);

        assert!(groups.len() <= records.len());
        let mut amounts: Vec<u64> = groups
            .iter()
            .flat_map(|g| g.member_records.iter().map(|r| r.amount_numeric))
            .collect();
        amounts.sort();
        assert_eq!(amounts, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_empty_addresses_never_merge() {
        let records = vec![record("A", "", 1), record("A", "", 2)];
        let groups = VariantGrouper::default().group(&records);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_grouping_is_seeded_not_transitive() {
        // B is close to both A and C, but A and C are not close to each other.
        let a = "1234567890";
        let b = "12345678XY";
        let c = "123456WXYZ";
        assert!(address_similarity(a, b) >= 0.8);
        assert!(address_similarity(b, c) >= 0.8);
        assert!(address_similarity(a, c) < 0.8);

        let records = vec![record("N", a, 1), record("N", b, 2), record("N", c, 3)];
        let groups = VariantGrouper::default().group(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].member_records[0].amount_numeric, 3);
    }

    #[test]
    fn test_custom_threshold() {
        let records = vec![
            record("A", "DUNWOODY, GA 30360", 1),
            record("A", "DUNWOODY, GA 30361", 2),
        ];
        assert_eq!(VariantGrouper::new(1.0).group(&records).len(), 2);
        assert_eq!(VariantGrouper::new(0.5).group(&records).len(), 1);
    }
}
