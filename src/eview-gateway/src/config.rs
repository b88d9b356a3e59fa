// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for eview-gateway.
//!
//! Config is loaded from the `[eview-gateway]` section of `eview.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./eview.toml`
//! 3. `~/.config/eview/eview.toml`
//! 4. `/etc/eview/eview.toml`

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use eview_app::{parse_level, ConfigFile};
use eview_core::{SubmissionPolicy, SMS_BYTE_LIMIT};
pub use eview_history::HistoryConfig;

/// Top-level gateway configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Message admission policy
    pub policy: PolicyConfig,
    /// HTTP API listener
    pub http: HttpConfig,
    /// Submission history store
    pub history: HistoryConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Message admission policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Largest payload (UTF-8 bytes) accepted for transmission
    pub max_message_bytes: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: SMS_BYTE_LIMIT,
        }
    }
}

impl PolicyConfig {
    pub fn submission_policy(&self) -> SubmissionPolicy {
        SubmissionPolicy {
            max_message_bytes: self.max_message_bytes,
        }
    }
}

/// HTTP API listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whether `serve` starts the HTTP API
    pub enabled: bool,
    /// IP address to listen on
    pub listen: IpAddr,
    /// TCP port to listen on
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 3000,
        }
    }
}

impl GatewayConfig {
    /// Validate semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if self.policy.max_message_bytes == 0 {
            return Err("[policy].max_message_bytes must be > 0".to_string());
        }

        if self.http.enabled && self.http.port == 0 {
            return Err("[http].port must be > 0 when [http].enabled = true".to_string());
        }

        if self.history.enabled {
            if self.history.dir.trim().is_empty() {
                return Err(
                    "[history].dir must not be empty when [history].enabled = true".to_string(),
                );
            }
            if self.history.file.trim().is_empty() {
                return Err(
                    "[history].file must not be empty when [history].enabled = true".to_string(),
                );
            }
        }

        if self.history.query_limit == 0 {
            return Err("[history].query_limit must be > 0".to_string());
        }

        Ok(())
    }

    /// Generate an example configuration wrapped under the `[eview-gateway]`
    /// section header, suitable for use in a combined `eview.toml` file.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "eview-gateway")]
            inner: GatewayConfig,
        }
        let example = GatewayConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            policy: PolicyConfig::default(),
            http: HttpConfig::default(),
            history: HistoryConfig::default(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        if parse_level(level).is_none() {
            return Err(format!(
                "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                level
            ));
        }
    }
    Ok(())
}

impl ConfigFile for GatewayConfig {
    fn section_key() -> &'static str {
        "eview-gateway"
    }
}
