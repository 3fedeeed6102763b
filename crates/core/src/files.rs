//! Loading of startup data files.
//!
//! Both the default disease list and the medication catalog may be written as JSON or YAML. The
//! format is chosen from the file extension.

use crate::{TriageError, TriageResult};
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Json,
    Yaml,
}

fn data_format(path: &Path) -> TriageResult<DataFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => Ok(DataFormat::Json),
        Some("yaml") | Some("yml") => Ok(DataFormat::Yaml),
        _ => Err(TriageError::UnsupportedFileFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Reads and deserializes a JSON or YAML data file.
///
/// # Errors
///
/// Returns a `TriageError` if:
/// - the extension is not `.json`, `.yaml` or `.yml`,
/// - the file cannot be read,
/// - the contents do not deserialize into `T`.
pub fn load_data_file<T: DeserializeOwned>(path: &Path) -> TriageResult<T> {
    let format = data_format(path)?;
    let contents = std::fs::read_to_string(path).map_err(|source| TriageError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        DataFormat::Json => {
            serde_json::from_str(&contents).map_err(|source| TriageError::JsonDeserialization {
                path: path.to_path_buf(),
                source,
            })
        }
        DataFormat::Yaml => {
            serde_yaml::from_str(&contents).map_err(|source| TriageError::YamlDeserialization {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_loads_json_and_yaml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let json_path = temp_dir.path().join("list.json");
        let yaml_path = temp_dir.path().join("list.YML");
        fs::write(&json_path, r#"["Asthma", "Influenza"]"#).unwrap();
        fs::write(&yaml_path, "- Asthma\n- Influenza\n").unwrap();

        let from_json: Vec<String> = load_data_file(&json_path).unwrap();
        let from_yaml: Vec<String> = load_data_file(&yaml_path).unwrap();

        assert_eq!(from_json, vec!["Asthma", "Influenza"]);
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = load_data_file::<Vec<String>>(Path::new("diseases.txt"))
            .expect_err("txt is not supported");
        assert!(matches!(err, TriageError::UnsupportedFileFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = load_data_file::<Vec<String>>(&temp_dir.path().join("absent.json"))
            .expect_err("missing file");
        assert!(matches!(err, TriageError::FileRead { .. }));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "[\"Asthma\",").unwrap();

        let err = load_data_file::<Vec<String>>(&path).expect_err("truncated json");
        assert!(matches!(err, TriageError::JsonDeserialization { .. }));
    }
}
