// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Section-based loading of the shared `eview.toml`.
//!
//! Every binary owns one top-level table (`[eview-gateway]`, ...) in the same
//! file. Search order:
//!
//! 1. `$EVIEW_CONFIG`, when set and non-empty
//! 2. `./eview.toml`
//! 3. `<config_dir>/eview/eview.toml`
//! 4. `/etc/eview/eview.toml`

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Name of the shared configuration file.
pub const CONFIG_FILE_NAME: &str = "eview.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "EVIEW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file {} has no [{section}] section", .path.display())]
    MissingSection { path: PathBuf, section: &'static str },
}

fn candidate_paths(env_override: Option<OsString>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = env_override
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .into_iter()
        .collect();
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths.extend(dirs::config_dir().map(|dir| dir.join("eview").join(CONFIG_FILE_NAME)));
    paths.push(Path::new("/etc/eview").join(CONFIG_FILE_NAME));
    paths
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize `[key]` from `table`; `None` when the table lacks it.
fn section<T: DeserializeOwned>(
    path: &Path,
    table: &toml::Table,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    table
        .get(key)
        .cloned()
        .map(T::deserialize)
        .transpose()
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// A configuration type stored as one section of `eview.toml`.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Top-level table name, e.g. `"eview-gateway"`.
    fn section_key() -> &'static str;

    /// Load from `path`, which must contain the section.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let table = read_table(path)?;
        section(path, &table, Self::section_key())?.ok_or_else(|| ConfigError::MissingSection {
            path: path.to_path_buf(),
            section: Self::section_key(),
        })
    }

    /// Load from the first candidate file that carries the section.
    ///
    /// Falls back to `Default` with no path when none does.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in candidate_paths(std::env::var_os(CONFIG_ENV_VAR)) {
            if !path.is_file() {
                continue;
            }
            let table = read_table(&path)?;
            if let Some(cfg) = section(&path, &table, Self::section_key())? {
                return Ok((cfg, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }
}
