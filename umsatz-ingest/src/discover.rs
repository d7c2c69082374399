//! Export-file discovery per institution naming convention.

use std::path::{Path, PathBuf};

use tracing::warn;
use umsatz_core::Institution;

fn matches_convention(institution: Institution, name: &str) -> bool {
    match institution {
        Institution::Comdirect => name.starts_with("umsaetze_") && name.ends_with(".csv"),
        Institution::TradeRepublic => name.ends_with(".pdf"),
        Institution::Olb => name.starts_with("Umsatzliste_") && name.ends_with(".csv"),
    }
}

/// Find export files for `institution` directly inside `dir`, sorted by path.
///
/// A missing or empty directory yields an empty list, not an error.
pub fn find_export_files(institution: Institution, dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("export directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| matches_convention(institution, name))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_convention_per_institution() {
        assert!(matches_convention(
            Institution::Comdirect,
            "umsaetze_2024.csv"
        ));
        assert!(!matches_convention(Institution::Comdirect, "umsaetze_2024.pdf"));
        assert!(!matches_convention(Institution::Comdirect, "export.csv"));
        assert!(matches_convention(
            Institution::TradeRepublic,
            "Kontoauszug_Januar.pdf"
        ));
        assert!(matches_convention(
            Institution::Olb,
            "Umsatzliste_2024-03.csv"
        ));
        assert!(!matches_convention(Institution::Olb, "umsaetze_2024.csv"));
    }

    #[test]
    fn test_find_is_sorted_and_shallow() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("umsaetze_b.csv"), "x").unwrap();
        fs::write(dir.path().join("umsaetze_a.csv"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("umsaetze_c.csv"), "x").unwrap();

        let files = find_export_files(Institution::Comdirect, dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["umsaetze_a.csv", "umsaetze_b.csv"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let files = find_export_files(
            Institution::Comdirect,
            Path::new("/definitely/not/here"),
        );
        assert!(files.is_empty());
    }
}
