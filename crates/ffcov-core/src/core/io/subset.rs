use super::error::LoadError;
use crate::core::models::ids::ParameterId;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Loads a set of parameter IDs from a whitespace-delimited file.
pub fn load_subset(path: &Path) -> Result<BTreeSet<ParameterId>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let subset = parse_subset(&content);
    debug!("Loaded {} parameter IDs from {:?}", subset.len(), path);
    Ok(subset)
}

/// Parses parameter IDs separated by any run of whitespace. Blank lines and repeated
/// IDs are ignored.
pub fn parse_subset(content: &str) -> BTreeSet<ParameterId> {
    content.split_whitespace().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_trims_and_deduplicates() {
        let subset = parse_subset("t1\n  t2 \n\nt1\r\nt18a\n");
        let expected: BTreeSet<ParameterId> =
            ["t1", "t2", "t18a"].into_iter().map(String::from).collect();
        assert_eq!(subset, expected);
    }

    #[test]
    fn parse_splits_ids_sharing_a_line() {
        let subset = parse_subset("t1 t2\nt3\tt4\n  t5\t t6  \n");
        let expected: BTreeSet<ParameterId> = ["t1", "t2", "t3", "t4", "t5", "t6"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(subset, expected);
    }

    #[test]
    fn empty_file_gives_empty_subset() {
        assert!(parse_subset("").is_empty());
        assert!(parse_subset("\n \n").is_empty());
    }

    #[test]
    fn load_reads_from_disk_and_reports_missing_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subset.in");
        fs::write(&path, "t43\nt44\n").unwrap();
        assert_eq!(load_subset(&path).unwrap().len(), 2);

        let result = load_subset(&dir.path().join("nope.in"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
