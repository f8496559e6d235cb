use csv::Writer;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::processing::donors::DonorProfiles;
use crate::types::QueryResult;

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Writes the per-name results as a pretty-printed JSON array.
pub fn save_results_json(results: &[QueryResult], path: &Path) -> Result<()> {
    debug!("Saving {} query results to {}", results.len(), path.display());
    let mut writer = BufWriter::new(create_file(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;
    info!("Results saved to {}", path.display());
    Ok(())
}

pub fn load_results_json(path: &Path) -> Result<Vec<QueryResult>> {
    let reader = BufReader::new(File::open(path)?);
    let results: Vec<QueryResult> = serde_json::from_reader(reader)?;
    info!("Loaded {} query results from {}", results.len(), path.display());
    Ok(results)
}

/// One row per donor with totals, party breakdown and preference label.
pub fn export_donor_profiles_csv(profiles: &DonorProfiles, path: &Path) -> Result<()> {
    debug!("Exporting {} donor profiles to CSV: {}", profiles.len(), path.display());
    let mut wtr = Writer::from_writer(create_file(path)?);

    wtr.write_record([
        "donor_key",
        "name",
        "state",
        "employer",
        "occupation",
        "query_name",
        "total_donations",
        "total_amount",
        "democratic_count",
        "democratic_amount",
        "republican_count",
        "republican_amount",
        "other_count",
        "other_amount",
        "democratic_percentage",
        "republican_percentage",
        "other_percentage",
        "party_preference",
    ])?;

    for (key, profile) in profiles {
        let info = &profile.donor_info;
        let tally = &profile.party_tally;
        let pct = &profile.percentages;
        wtr.write_record(&[
            key.to_string(),
            info.name.clone(),
            info.state.clone(),
            info.employer.clone(),
            info.occupation.clone(),
            info.query_name.clone(),
            profile.total_donations().to_string(),
            profile.total_amount().to_string(),
            tally.democratic_count.to_string(),
            tally.democratic_amount.to_string(),
            tally.republican_count.to_string(),
            tally.republican_amount.to_string(),
            tally.other_count.to_string(),
            tally.other_amount.to_string(),
            format!("{:.1}", pct.democratic_percentage),
            format!("{:.1}", pct.republican_percentage),
            format!("{:.1}", pct.other_percentage),
            profile.party_preference.label().to_string(),
        ])?;
    }

    wtr.flush()?;
    info!("Exported {} donor profiles to {}", profiles.len(), path.display());
    Ok(())
}

/// One row per donation, tagged with the key of the donor it was folded into.
pub fn export_donations_csv(profiles: &DonorProfiles, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_writer(create_file(path)?);

    wtr.write_record([
        "donor_key",
        "category",
        "contributor_name",
        "contributor_address",
        "contributor_state",
        "employer",
        "occupation",
        "date",
        "amount",
        "amount_numeric",
        "recipient",
        "recipient_party",
        "jurisdiction",
    ])?;

    let mut rows = 0usize;
    for (key, profile) in profiles {
        for record in &profile.member_records {
            let amount_numeric = record.amount_numeric.to_string();
            wtr.write_record([
                key.as_str(),
                record.category.as_str(),
                record.contributor_name.as_str(),
                record.contributor_address.as_str(),
                record.contributor_state.as_str(),
                record.employer.as_str(),
                record.occupation.as_str(),
                record.date.as_str(),
                record.amount_text.as_str(),
                amount_numeric.as_str(),
                record.recipient_text.as_str(),
                record.recipient_party.as_str(),
                record.jurisdiction.as_str(),
            ])?;
            rows += 1;
        }
    }

    wtr.flush()?;
    info!("Exported {} donations to {}", rows, path.display());
    Ok(())
}
