use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

use donor_lookup::app::ports::{DonorSourcePort, FetchOutcome};
use donor_lookup::export;
use donor_lookup::parser::parse_donation_table;
use donor_lookup::pipeline::ingestion::pacer::{Pacer, PacingLimits};
use donor_lookup::pipeline::processing::donors::{aggregate_donors, PartyPreference};
use donor_lookup::pipeline::processing::{TableExtractor, VariantGrouper};
use donor_lookup::pipeline::{LookupPipeline, RunSummary};
use donor_lookup::roster::{Member, Organization, Roster};
use donor_lookup::types::ContributorFormat;

/// Serves canned results pages, one per queried name.
struct CannedPages;

const KAUR_PAGE: &str = r#"
<table>
  <tr><th>Category</th><th>Contributor</th></tr>
  <tr><td>Individual</td><td>KAUR, AASEES<br>DUNWOODY, GA 30360</td><td>ACME</td><td>ENGINEER</td>
      <td>2022</td><td>$1,000</td><td>WARNOCK, RAPHAEL (D)</td><td>Federal</td></tr>
  <tr><td>Individual</td><td>KAUR, AASEES<br>DUNWOODY, GA 30306</td><td>ACME</td><td>ENGINEER</td>
      <td>2022</td><td>$500</td><td>OSSOFF, JON (D)</td><td>Federal</td></tr>
  <tr><td>Individual</td><td>KAUR, AASEES<br>PORTLAND, OR 97201</td><td>SELF</td><td>WRITER</td>
      <td>2021</td><td>$75</td><td>SMITH, JANE (R)</td><td>Federal</td></tr>
  <tr><td>broken row</td></tr>
</table>
"#;

#[async_trait]
impl DonorSourcePort for CannedPages {
    fn lookup_url(&self, name: &str) -> String {
        format!("https://donors.test/results?name={}", name.replace(' ', "+"))
    }

    async fn fetch(&self, name: &str) -> FetchOutcome {
        let url = self.lookup_url(name);
        match name {
            "KAUR, AASEES" => FetchOutcome::Table {
                url,
                status_code: 200,
                rows: parse_donation_table(KAUR_PAGE, ContributorFormat::Inline),
            },
            "NO RESULTS" => FetchOutcome::Table {
                url,
                status_code: 200,
                rows: Vec::new(),
            },
            _ => FetchOutcome::Failed {
                url,
                status_code: Some(503),
                reason: "Lookup returned HTTP 503".to_string(),
            },
        }
    }
}

fn roster() -> Roster {
    let member = |name: &str| Member {
        name: name.to_string(),
        position: None,
    };
    Roster::from_organizations(&[
        Organization {
            organization: "Bar Association".to_string(),
            url: None,
            members: vec![member("KAUR, AASEES"), member("NO RESULTS")],
        },
        Organization {
            organization: "Coalition".to_string(),
            url: None,
            members: vec![member("DOWN, SERVER"), member("KAUR, AASEES")],
        },
    ])
}

#[tokio::test]
async fn test_full_run_and_export() -> Result<()> {
    let pipeline = LookupPipeline::new(
        Arc::new(CannedPages),
        TableExtractor::default(),
        VariantGrouper::default(),
        Pacer::new(PacingLimits {
            delay: Duration::from_millis(5),
            concurrency: 2,
        }),
    );

    let roster = roster();
    assert_eq!(roster.len(), 3);
    let run = pipeline.run(roster.names()).await;

    let names: Vec<&str> = run.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["KAUR, AASEES", "NO RESULTS", "DOWN, SERVER"]);

    let kaur = &run.results[0];
    assert!(kaur.success);
    assert_eq!(kaur.total_donations, 3);
    assert_eq!(kaur.total_amount, 1575);
    // The two Dunwoody addresses differ by one digit; Portland stands alone.
    assert_eq!(kaur.variants.len(), 2);
    assert_eq!(kaur.variants[0].representative_name, "KAUR, AASEES");
    assert_eq!(kaur.variants[0].representative_address, "DUNWOODY, GA 30360");
    assert_eq!(kaur.variants[0].len(), 2);

    let empty = &run.results[1];
    assert!(empty.success);
    assert_eq!(empty.total_donations, 0);
    assert!(empty.variants.is_empty());

    let down = &run.results[2];
    assert!(!down.success);
    assert_eq!(down.status_code, Some(503));

    let summary = RunSummary::from_results(&run.results);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total_amount, 1575);
    assert_eq!(summary.total_variants, 2);

    assert_eq!(run.profiles.len(), 2);
    let ga = run
        .profiles
        .values()
        .find(|p| p.donor_info.state == "GA")
        .expect("Georgia donor");
    assert_eq!(ga.total_donations(), 2);
    assert_eq!(ga.party_preference, PartyPreference::StrongDemocratic);
    assert_eq!(ga.donor_info.query_name, "KAUR, AASEES");

    // Profiles rebuilt from the saved report match the live run.
    let dir = tempdir()?;
    let report = dir.path().join("report.json");
    export::save_results_json(&run.results, &report)?;
    let reloaded = export::load_results_json(&report)?;
    assert_eq!(aggregate_donors(&reloaded), run.profiles);

    let donors_csv = dir.path().join("donors.csv");
    export::export_donor_profiles_csv(&run.profiles, &donors_csv)?;
    let content = std::fs::read_to_string(&donors_csv)?;
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("Strong Republican"));

    Ok(())
}
