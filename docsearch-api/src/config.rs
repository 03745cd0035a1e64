use std::{str::FromStr, time::Duration};

use docsearch_index::IndexClientOptions;
use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

use crate::domain::search::{
    source::{GitHubOptions, MdnOptions},
    AggregatorConfig,
};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub index: IndexSettings,
    pub sources: SourcesSettings,
    pub search: SearchSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub app_url: String,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct IndexSettings {
    pub url: String,
    #[serde(default = "default_search_index")]
    pub search_index: String,
    #[serde(default = "default_external_index")]
    pub external_index: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SourcesSettings {
    pub github: GitHubSettings,
    pub mdn: MdnSettings,
    pub readthedocs: ReadTheDocsSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct GitHubSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub default_owner: String,
    pub default_repo: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub enabled: bool,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct MdnSettings {
    pub base_url: String,
    pub locale: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub enabled: bool,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ReadTheDocsSettings {
    pub base_url: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub enabled: bool,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub page_size: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub per_source_limit: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub adapter_timeout_ms: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub overall_timeout_ms: u64,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub block_on_index_health: bool,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub index_external_results: bool,
}

fn default_search_index() -> String {
    "documentation".to_string()
}

fn default_external_index() -> String {
    "external_docs".to_string()
}

fn default_health_timeout_ms() -> u64 {
    2000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl IndexSettings {
    pub fn client_options(&self) -> IndexClientOptions {
        IndexClientOptions {
            url: self.url.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

impl GitHubSettings {
    pub fn options(&self, limit: usize) -> GitHubOptions {
        GitHubOptions {
            base_url: self.base_url.clone(),
            // An empty env override means "no token".
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
            default_owner: self.default_owner.clone(),
            default_repo: self.default_repo.clone(),
            limit,
        }
    }
}

impl MdnSettings {
    pub fn options(&self, limit: usize) -> MdnOptions {
        MdnOptions {
            base_url: self.base_url.clone(),
            locale: self.locale.clone(),
            limit,
        }
    }
}

impl SearchSettings {
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            page_size: self.page_size,
            per_source_limit: self.per_source_limit,
            adapter_timeout: Duration::from_millis(self.adapter_timeout_ms),
            overall_timeout: Duration::from_millis(self.overall_timeout_ms),
            block_on_index_health: self.block_on_index_health,
            index_external_results: self.index_external_results,
        }
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("current directory: {}", e)))?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("APP_ENVIRONMENT: {}", e)))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("DOCSEARCH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString, PartialEq)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
