// Pipeline processing: row extraction, name/address splitting, variant grouping, and donor aggregation

pub mod donors;
pub mod extract;
pub mod similarity;
pub mod splitter;
pub mod variants;

pub use donors::{aggregate_donors, DonorAggregator, DonorKey, DonorProfile, DonorProfiles, PartyPreference};
pub use extract::TableExtractor;
pub use similarity::address_similarity;
pub use splitter::split_name_address;
pub use variants::VariantGrouper;
