//! Storage configuration.
//!
//! [`StorageSettings`] is the raw shape bound from the environment or a JSON
//! config file. [`StorageSettings::validate`] turns it into a
//! [`StorageConfiguration`], which can only describe one consistent backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// Backend selector as written in configuration.
///
/// Both the environment and the JSON config file go through [`FromStr`], so
/// the accepted spellings are the same everywhere.
///
/// [`FromStr`]: std::str::FromStr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum StorageType {
    #[serde(rename = "DB")]
    Db,
    FileSystem,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Db => write!(f, "DB"),
            StorageType::FileSystem => write!(f, "FileSystem"),
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "db" | "database" => Ok(StorageType::Db),
            "filesystem" => Ok(StorageType::FileSystem),
            _ => Err(Error::InvalidConfigValue(format!(
                "Storage.Type '{}' is not supported",
                s
            ))),
        }
    }
}

impl TryFrom<String> for StorageType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseSettings {
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileSystemSettings {
    pub base_directory: Option<String>,
}

/// Unvalidated `Storage` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageSettings {
    #[serde(rename = "Type")]
    pub storage_type: Option<StorageType>,
    #[serde(rename = "DB")]
    pub db: Option<DatabaseSettings>,
    pub file_system: Option<FileSystemSettings>,
}

/// Validated storage configuration. Exactly one backend is described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfiguration {
    Database { connection_string: String },
    FileSystem { base_directory: PathBuf },
}

impl StorageSettings {
    /// Parses the JSON document of a config file and extracts its `Storage` section.
    pub fn from_json_document(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(rename = "Storage", default)]
            storage: StorageSettings,
        }

        serde_json::from_str::<Document>(json)
            .map(|doc| doc.storage)
            .map_err(|e| Error::ConfigIO(format!("Invalid configuration document: {}", e)))
    }

    /// Checks the invariants of the selected backend.
    ///
    /// The filesystem base directory must already exist; it is never created.
    pub fn validate(&self) -> Result<StorageConfiguration> {
        let storage_type = self
            .storage_type
            .ok_or_else(|| Error::MissingConfigKey("Storage.Type".to_string()))?;

        match storage_type {
            StorageType::Db => {
                let connection_string = self
                    .db
                    .as_ref()
                    .and_then(|db| non_empty(db.connection_string.as_deref()))
                    .ok_or_else(|| {
                        Error::MissingConfigKey("Connection string must be specified".to_string())
                    })?;
                Ok(StorageConfiguration::Database {
                    connection_string: connection_string.to_string(),
                })
            }
            StorageType::FileSystem => {
                let base_directory = self
                    .file_system
                    .as_ref()
                    .and_then(|fs| non_empty(fs.base_directory.as_deref()))
                    .ok_or_else(|| {
                        Error::MissingConfigKey("BaseDirectory must be specified".to_string())
                    })?;
                let base_directory = Path::new(base_directory);
                if !base_directory.is_dir() {
                    return Err(Error::InvalidConfigValue(format!(
                        "BaseDirectory not exists: {}",
                        base_directory.display()
                    )));
                }
                Ok(StorageConfiguration::FileSystem {
                    base_directory: base_directory.to_path_buf(),
                })
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
