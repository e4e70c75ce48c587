//! Safety checks for CLI output paths.
//!
//! The CLI reads titles from a file and can write results to another one.
//! These checks stop it from truncating its own input or writing over
//! something that is clearly not a results file.

use anyhow::{bail, Result};
use std::path::Path;

/// Extensions accepted for JSON lines / text result files.
pub const OUTPUT_EXTENSIONS: &[&str] = &["jsonl", "json", "txt"];

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output must have one of the [`OUTPUT_EXTENSIONS`]
/// - Output must not be an existing directory
/// - Output cannot be the same file as any of the input paths
pub fn validate_output_path(output: &Path, input_paths: &[&Path]) -> Result<()> {
    let extension = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !OUTPUT_EXTENSIONS.contains(&extension.as_str()) {
        bail!(
            "Safety check failed: output file '{}' must end in one of: {}",
            output.display(),
            OUTPUT_EXTENSIONS.join(", ")
        );
    }

    if output.is_dir() {
        bail!(
            "Safety check failed: output '{}' is a directory",
            output.display()
        );
    }

    for input in input_paths {
        if same_file(output, input) {
            bail!(
                "Safety check failed: output '{}' cannot be the same as input '{}'",
                output.display(),
                input.display()
            );
        }
    }

    Ok(())
}

/// Compare canonical paths when both exist, raw paths otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_output_jsonl() {
        let output = PathBuf::from("/tmp/songtitle-results.jsonl");
        let input = PathBuf::from("/data/titles.txt");
        assert!(validate_output_path(&output, &[&input]).is_ok());
    }

    #[test]
    fn test_valid_output_no_inputs() {
        let output = PathBuf::from("/tmp/songs.JSON");
        assert!(validate_output_path(&output, &[]).is_ok());
    }

    #[test]
    fn test_bad_extension() {
        let output = PathBuf::from("/tmp/library.sqlite3");
        let result = validate_output_path(&output, &[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must end in one of"));
    }

    #[test]
    fn test_output_equals_input() {
        let path = PathBuf::from("/data/titles.txt");
        let result = validate_output_path(&path, &[&path]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot be the same as input"));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = std::env::temp_dir().join("songtitle-safety-dir.json");
        std::fs::create_dir_all(&dir).unwrap();
        let result = validate_output_path(&dir, &[]);
        std::fs::remove_dir(&dir).ok();
        assert!(result.unwrap_err().to_string().contains("is a directory"));
    }
}
