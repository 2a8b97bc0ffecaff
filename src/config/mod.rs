use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub integrations: IntegrationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Static token table: each entry maps a bearer token to a subject and a
    /// set of granted permissions. The hosting platform's policy service is
    /// the source of truth in production; this table is its local stand-in.
    #[serde(default)]
    pub tokens: Vec<TokenGrant>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenGrant {
    pub subject: String,
    pub token: String,
    /// Permission names, e.g. "announcement.create" or "*" for all.
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TaxonomyConfig {
    pub max_title_length: usize,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self { max_title_length: 255 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IntegrationConfig {
    pub bitbucket: Option<BitbucketConfig>,
    pub copilot: Option<CopilotConfig>,
    pub fairwinds: Option<FairwindsConfig>,
    pub jira: Option<JiraConfig>,
    pub signals: Option<WebhookConfig>,
    pub notifications: Option<WebhookConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BitbucketConfig {
    pub enabled: bool,
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CopilotConfig {
    pub enabled: bool,
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FairwindsConfig {
    pub enabled: bool,
    pub base_url: String,
    pub token: String,
    pub organization: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraConfig {
    pub enabled: bool,
    pub base_url: String,
    pub token: String,
    pub project_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 7007)?
            .set_default("database.url", "sqlite://atrium.db")?
            .set_default("database.max_connections", 10)?
            .set_default("taxonomy.max_title_length", 255)?
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (with ATRIUM__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ATRIUM").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 7007,
            },
            database: DatabaseConfig {
                url: "sqlite://atrium.db".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig::default(),
            taxonomy: TaxonomyConfig::default(),
            integrations: IntegrationConfig::default(),
        }
    }
}
