// Defaults shared by the config layer, the HTTP client and the matching code.

// Lookup endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.opensecrets.org/donor-lookup/results";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Matching
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.80;

/// Number of fixed cell positions in a results table row.
pub const ROW_CELL_COUNT: usize = 8;

// Output files
pub const DEFAULT_CONFIG_FILE: &str = "donor_lookup.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_REPORT_FILE: &str = "donor_lookup_results.json";
pub const DEFAULT_DONORS_CSV: &str = "donor_profiles.csv";
pub const DEFAULT_DONATIONS_CSV: &str = "donor_donations.csv";

// Environment overrides
pub const ENV_BASE_URL: &str = "DONOR_LOOKUP_BASE_URL";
pub const ENV_DELAY_MS: &str = "DONOR_LOOKUP_DELAY_MS";

// Party preference cut-off, in percent
pub const STRONG_PREFERENCE_PERCENT: f64 = 80.0;
