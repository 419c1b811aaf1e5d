// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashSet, env, path::PathBuf, time::Duration};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use regex::Regex;
use serde::Deserialize;
use serde_with::{serde_as, DurationSecondsWithFrac};
use url::Url;

const ENV_PREFIX: &str = "CURATE_EXPORT_";

#[derive(Debug, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    pub subgraph: SubgraphConfig,
    pub pagination: PaginationConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

// Newtype wrapping Config to be able use serde_ignored with Figment
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct ConfigWrapper(pub Config);

// Custom Deserializer for ConfigWrapper
// This is needed to warn about unknown fields
impl<'de> Deserialize<'de> for ConfigWrapper {
    fn deserialize<D>(deserializer: D) -> Result<ConfigWrapper, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let config: Config = serde_ignored::deserialize(deserializer, |path| {
            tracing::warn!("Ignoring unknown configuration field: {}", path);
        })?;

        Ok(ConfigWrapper(config))
    }
}

impl Config {
    /// Layers the built-in defaults, the optional config file and the
    /// `CURATE_EXPORT_` environment variables, then validates the result.
    pub fn parse(filename: Option<&PathBuf>) -> Result<Self, String> {
        let config_defaults = include_str!("../default_values.toml");

        let mut figment_config = Figment::new().merge(Toml::string(config_defaults));

        if let Some(path) = filename {
            let mut config_content = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config file: {e}"))?;
            config_content = Self::substitute_env_vars(config_content)?;
            figment_config = figment_config.merge(Toml::string(&config_content));
        }

        let config: ConfigWrapper = figment_config
            .merge(Self::from_env_ignore_empty(ENV_PREFIX))
            .extract()
            .map_err(|e| e.to_string())?;

        config.0.validate()?;
        Ok(config.0)
    }

    fn from_env_ignore_empty(prefix: &str) -> Env {
        let prefixed_env = Env::prefixed(prefix).split("__");
        let ignore_prefixed: Vec<_> = prefixed_env
            .iter()
            .filter_map(|(key, value)| value.is_empty().then(|| key.into_string()))
            .collect();
        let ref_ignore = ignore_prefixed
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>();
        prefixed_env.ignore(&ref_ignore)
    }

    /// Replaces `${VAR}` references outside comment lines with the value of
    /// the environment variable. Fails listing every variable that is unset.
    fn substitute_env_vars(content: String) -> Result<String, String> {
        let reg = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;
        let mut missing_vars = Vec::new();
        let mut result = String::new();

        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let processed_line = reg.replace_all(line, |caps: &regex::Captures| {
                let var_name = &caps[1];
                env::var(var_name).unwrap_or_else(|_| {
                    missing_vars.push(var_name.to_string());
                    format!("${{{var_name}}}")
                })
            });
            result.push_str(&processed_line);
            result.push('\n');
        }

        if !missing_vars.is_empty() {
            return Err(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            ));
        }

        Ok(result.trim_end().to_string())
    }

    fn validate(&self) -> Result<(), String> {
        if self.pagination.page_size == 0 {
            return Err("pagination.page_size must be greater than 0".to_string());
        }
        if self.pagination.max_pages == Some(0) {
            return Err(
                "pagination.max_pages must be greater than 0, or left unset for no limit"
                    .to_string(),
            );
        }
        if self.pagination.max_pages.is_none() {
            tracing::debug!(
                "No `pagination.max_pages` configured, pagination stops only on a short page"
            );
        }

        if self.subgraph.request_timeout_secs == Duration::ZERO {
            return Err("subgraph.request_timeout_secs must be greater than 0".to_string());
        }

        if self.query.statuses.is_empty() {
            return Err("query.statuses must list at least one item status".to_string());
        }

        if self.targets.is_empty() {
            return Err("No targets configured. Add at least one `[[targets]]` entry.".to_string());
        }

        let mut names = HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err("targets.name must not be empty".to_string());
            }
            if target.registry_address.trim().is_empty() {
                return Err(format!(
                    "Target `{}` has an empty registry_address",
                    target.name
                ));
            }
            if !names.insert(target.name.as_str()) {
                return Err(format!("Duplicate target name `{}`", target.name));
            }
        }

        Self::warn_if_token_over_http(
            &self.subgraph.query_url,
            self.subgraph.query_auth_token.as_ref(),
            "subgraph",
        );

        Ok(())
    }

    /// Warns if an authentication token is configured with a non-HTTPS URL.
    fn warn_if_token_over_http(url: &Url, token: Option<&String>, config_path: &str) {
        let Some(token) = token else {
            return;
        };
        if token.is_empty() || url.scheme() == "https" {
            return;
        }

        // Local graph-node instances are fine
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if !is_localhost {
            tracing::warn!(
                config_path,
                url = %url,
                "Authentication token configured with non-HTTPS URL. \
                This may expose credentials to interception."
            );
        }
    }

    /// Returns the configured targets, or only those named in `names` when it
    /// is not empty. Unknown names are an error.
    pub fn select_targets(&self, names: &[String]) -> Result<Vec<&TargetConfig>, String> {
        if names.is_empty() {
            return Ok(self.targets.iter().collect());
        }

        let unknown: Vec<&str> = names
            .iter()
            .filter(|name| !self.targets.iter().any(|t| &t.name == *name))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(format!("Unknown targets: {}", unknown.join(", ")));
        }

        Ok(self
            .targets
            .iter()
            .filter(|t| names.contains(&t.name))
            .collect())
    }
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct SubgraphConfig {
    pub query_url: Url,
    pub query_auth_token: Option<String>,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub request_timeout_secs: Duration,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[cfg_attr(test, derive(PartialEq))]
pub struct PaginationConfig {
    /// Records requested per page. A page shorter than this ends pagination.
    pub page_size: u32,
    /// Upper bound on the number of pages requested for a single target.
    /// Unset means pagination only stops on a short page.
    #[serde(default)]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct QueryConfig {
    /// Item statuses passed to the `status_in` filter
    pub statuses: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputConfig {
    /// One `<target name>.csv` file per target inside `directory`
    Csv { directory: PathBuf },
}

#[derive(Debug, Deserialize, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct TargetConfig {
    /// Used as the sink name, e.g. the CSV file stem
    pub name: String,
    pub registry_address: String,
}
