//! Conversion settings from an optional TOML file

use crate::extractor::SkipList;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings shared by every document of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Directory the CSV files are written to (defaults to the current directory)
    pub output_dir: Option<PathBuf>,

    /// Section titles to leave out of the output, replacing the built-in list
    pub skip_sections: Option<Vec<String>>,
}

impl ConvertConfig {
    /// Load configuration from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ConvertConfig)` - Successfully loaded configuration
    /// * `Err(ConvertConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertConfigError> {
        let content = fs::read_to_string(&path).map_err(ConvertConfigError::IoError)?;

        let config: ConvertConfig =
            toml::from_str(&content).map_err(ConvertConfigError::ParseError)?;

        Ok(config)
    }

    /// Skip list to apply, falling back to the built-in titles
    pub fn skip_list(&self) -> SkipList {
        match &self.skip_sections {
            Some(titles) => SkipList::new(titles.iter().cloned()),
            None => SkipList::default(),
        }
    }

    /// Output directory, with a command-line override taking precedence
    pub fn output_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors that can occur when loading the configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConvertConfigError {
    /// IO error when reading the file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),
}

impl std::fmt::Display for ConvertConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConvertConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConvertConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
output_dir = "csv-out"
skip_sections = ["Introduction", "Security Considerations"]
"#;

        let config: ConvertConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("csv-out")));
        let skip = config.skip_list();
        assert!(skip.contains("security considerations"));
        assert!(!skip.contains("References"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ConvertConfig = toml::from_str("").unwrap();

        assert_eq!(config, ConvertConfig::default());
        assert_eq!(config.skip_list(), SkipList::default());
        assert_eq!(config.output_dir(None), PathBuf::from("."));
    }

    #[test]
    fn test_cli_output_dir_overrides_config() {
        let config = ConvertConfig {
            output_dir: Some(PathBuf::from("from-config")),
            skip_sections: None,
        };

        assert_eq!(config.output_dir(None), PathBuf::from("from-config"));
        assert_eq!(
            config.output_dir(Some(Path::new("from-cli"))),
            PathBuf::from("from-cli")
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: Result<ConvertConfig, _> = toml::from_str("skip = [\"Scope\"]");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = ConvertConfig::load(dir.path().join("md2csv.toml")).unwrap_err();

        assert!(matches!(err, ConvertConfigError::IoError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("md2csv.toml");
        std::fs::write(&path, "skip_sections = []\n").unwrap();

        let config = ConvertConfig::load(&path).unwrap();

        // An empty list keeps every section
        assert!(!config.skip_list().contains("References"));
    }
}
