// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Process-wide defaults for the checker binary, loaded via the `config`
//! crate from an optional TOML file layered under `PARTCHECK_*` environment
//! variables. CLI flags (see `main.rs`) take final precedence over both.

use partcheck_domain::services::MarkFileExtension;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartCheckConfig {
    /// Default rows-per-granule used when a part carries no explicit
    /// granularity hint (overridable per invocation via `--rows-per-granule`).
    pub default_rows_per_granule: u64,
    /// Default mark file extension assumed for a part (`mrk` or `mrk2`).
    pub default_mark_extension: MarkExtensionSetting,
    /// Whether a missing `checksums.txt` sidecar is treated as an error.
    pub require_checksums: bool,
    /// Address the Prometheus metrics endpoint binds to, if enabled.
    pub metrics_listen_addr: Option<String>,
}

impl Default for PartCheckConfig {
    fn default() -> Self {
        Self {
            default_rows_per_granule: 8192,
            default_mark_extension: MarkExtensionSetting::Legacy,
            require_checksums: true,
            metrics_listen_addr: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkExtensionSetting {
    Legacy,
    Extended,
}

impl From<MarkExtensionSetting> for MarkFileExtension {
    fn from(setting: MarkExtensionSetting) -> Self {
        match setting {
            MarkExtensionSetting::Legacy => MarkFileExtension::Legacy,
            MarkExtensionSetting::Extended => MarkFileExtension::Extended,
        }
    }
}

impl PartCheckConfig {
    /// Loads configuration layering defaults, an optional TOML file at
    /// `path` (if it exists), and `PARTCHECK_*` environment variable
    /// overrides, in that order of increasing precedence.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(config::Environment::with_prefix("PARTCHECK").separator("_"));
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_file() {
        let cfg = PartCheckConfig::load(None).unwrap();
        assert_eq!(cfg.default_rows_per_granule, 8192);
        assert!(cfg.require_checksums);
    }
}
