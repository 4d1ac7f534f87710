//! Reading and writing definition files.
//!
//! The format is picked from the file extension: `.json` for JSON,
//! `.yaml` or `.yml` for YAML.

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::definition::TableDefinition;
use crate::error::{ConfigError, Result};

/// On-disk encoding of a [`TableDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from `path`'s extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl TableDefinition {
    /// Loads a definition from a JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for an unknown extension,
    /// [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] / [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let definition: Self = match format {
            Format::Json => serde_json::from_reader(reader)?,
            Format::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(
            path = %path.display(),
            ?format,
            options = definition.options.len(),
            "loaded table definition"
        );
        Ok(definition)
    }

    /// Saves the definition in the format named by `path`'s extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for an unknown extension,
    /// [`ConfigError::Io`] if the file cannot be written, or a serialization
    /// error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        match format {
            Format::Json => serde_json::to_writer_pretty(&mut writer, self)?,
            Format::Yaml => serde_yaml::to_writer(&mut writer, self)?,
        }
        writer.flush()?;
        Ok(())
    }

    /// Parses a JSON definition.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a YAML definition.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{KindDefinition, OptionDefinition};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("dir/a.yaml")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("a.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_version_defaults_when_absent() {
        let definition = TableDefinition::from_json_str(r#"{"options": []}"#).unwrap();
        assert_eq!(definition.version, "1.0");
        assert!(definition.name.is_none());
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json = r#"{
            "name": "cc",
            "options": [
                {"id": 1, "kind": "input"},
                {"id": 2, "kind": "joined", "prefixes": ["-"], "name": "D", "flags": ["render-separate"]}
            ]
        }"#;
        let yaml = r#"
name: cc
options:
  - id: 1
    kind: input
  - id: 2
    kind: joined
    prefixes: ["-"]
    name: D
    flags: [render-separate]
"#;
        assert_eq!(
            TableDefinition::from_json_str(json).unwrap(),
            TableDefinition::from_yaml_str(yaml).unwrap()
        );
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let err = TableDefinition::from_yaml_str("options: [{id: 1, kind: sometimes}]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_to_string_round_trip() {
        let mut definition = TableDefinition::new();
        definition.options.push(OptionDefinition::new(1, KindDefinition::Input));

        let yaml = definition.to_yaml_string().unwrap();
        assert_eq!(TableDefinition::from_yaml_str(&yaml).unwrap(), definition);
        let json = definition.to_json_string().unwrap();
        assert_eq!(TableDefinition::from_json_str(&json).unwrap(), definition);
    }
}
