use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{LookupError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Ordered, de-duplicated list of names to look up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Reads a JSON array of organizations and collects their member names.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LookupError::Config(format!("Failed to read roster file '{}': {}", path.display(), e))
        })?;
        let organizations: Vec<Organization> = serde_json::from_str(&content)?;
        let roster = Self::from_organizations(&organizations);
        info!(
            "Loaded {} unique names from {} organizations in {}",
            roster.len(),
            organizations.len(),
            path.display()
        );
        Ok(roster)
    }

    /// Names in first-seen order; blank and repeated names are dropped.
    pub fn from_organizations(organizations: &[Organization]) -> Self {
        let mut seen = HashSet::new();
        let names = organizations
            .iter()
            .flat_map(|org| org.members.iter())
            .map(|member| member.name.trim())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn org(label: &str, names: &[&str]) -> Organization {
        Organization {
            organization: label.to_string(),
            url: None,
            members: names
                .iter()
                .map(|n| Member {
                    name: n.to_string(),
                    position: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_names_are_unique_and_ordered() {
        let orgs = vec![
            org("Bar Association", &["KAUR, AASEES", "John Smith", ""]),
            org("Coalition", &["  John Smith ", "Jane Roe"]),
        ];
        let roster = Roster::from_organizations(&orgs);
        assert_eq!(roster.names(), &["KAUR, AASEES", "John Smith", "Jane Roe"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"organization": "Coalition", "url": "https://example.org",
                 "members": [{{"name": "Jane Roe", "position": "Chair"}}, {{"name": "Jane Roe"}}]}},
                {{"organization": "Empty"}}]"#
        )
        .unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.names(), &["Jane Roe"]);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Roster::load("/nonexistent/roster.json"),
            Err(LookupError::Config(_))
        ));
    }
}
