// src/report/export.rs
// =============================================================================
// CSV export of the saved sites.
//
// Format: header "ID,Name,URL,Category", then one row per site in id order.
// The csv crate takes care of quoting names that contain commas or quotes.
// =============================================================================

use anyhow::{Context, Result};
use std::io;
use std::path::Path;

use crate::repository::SiteRecord;

const HEADER: [&str; 4] = ["ID", "Name", "URL", "Category"];

/// Writes the CSV report to `path`, replacing any existing file.
/// Returns how many sites were written.
pub fn export_csv(sites: &[SiteRecord], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    write_csv(sites, file)
}

pub fn write_csv<W: io::Write>(sites: &[SiteRecord], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for site in sites {
        csv.write_record([
            site.id.to_string().as_str(),
            site.name.as_str(),
            site.url.as_str(),
            site.category.as_str(),
        ])?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(sites.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(id: i64, name: &str, url: &str, category: &str) -> SiteRecord {
        SiteRecord {
            id,
            name: name.to_string(),
            url: url.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_header_only_for_empty_list() {
        let mut out = Vec::new();
        let written = write_csv(&[], &mut out).unwrap();
        assert_eq!(written, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "ID,Name,URL,Category\n");
    }

    #[test]
    fn test_rows_and_quoting() {
        let sites = vec![
            record(1, "Archive", "archive.org", "Movies"),
            record(4, "Docs, mostly", "https://example.com/?a=1", "Misc"),
        ];

        let mut out = Vec::new();
        write_csv(&sites, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID,Name,URL,Category\n\
             1,Archive,archive.org,Movies\n\
             4,\"Docs, mostly\",https://example.com/?a=1,Misc\n"
        );
    }

    #[test]
    fn test_export_to_file_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("my_sites_report.csv");
        std::fs::write(&path, "stale contents that should disappear\n").unwrap();

        let written = export_csv(&[record(2, "Example", "example.com", "")], &path).unwrap();
        assert_eq!(written, 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "ID,Name,URL,Category\n2,Example,example.com,\n");
    }
}
