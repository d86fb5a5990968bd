use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub mail: MailSettings,
    pub registry: RegistrySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: Some(4),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://redconnect.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub secret_key: String,
    /// Only send the session cookie over HTTPS
    pub cookie_secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret_key: "dev-secret-key".to_string(),
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_sender: String,
    pub timeout_secs: u64,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 25,
            use_tls: false,
            username: None,
            password: None,
            default_sender: "no-reply@redconnect.local".to_string(),
            timeout_secs: 10,
        }
    }
}

impl MailSettings {
    /// Outbound mail is only attempted against a non-local server with
    /// credentials
    pub fn is_configured(&self) -> bool {
        self.server != "localhost"
            && self.username.as_deref().map_or(false, |u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub seed_demo_data: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the structs
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with REDCONNECT__)
    /// 4. Plain deployment variables such as SECRET_KEY or MAIL_SERVER
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., REDCONNECT__SERVER__PORT -> server.port
            .add_source(prefixed_environment())
            .build()?;

        let settings = apply_plain_env(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }
}

fn prefixed_environment() -> Environment {
    Environment::with_prefix("REDCONNECT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Plain environment variables and the settings key each one overrides
const PLAIN_ENV_KEYS: [(&str, &str); 9] = [
    ("SECRET_KEY", "session.secret_key"),
    ("MAIL_SERVER", "mail.server"),
    ("MAIL_PORT", "mail.port"),
    ("MAIL_USE_TLS", "mail.use_tls"),
    ("MAIL_USERNAME", "mail.username"),
    ("MAIL_PASSWORD", "mail.password"),
    ("MAIL_DEFAULT_SENDER", "mail.default_sender"),
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
];

/// Override settings with the plain variables of a bare deployment
///
/// `lookup` resolves a variable name; it is `std::env::var` outside tests.
fn apply_plain_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in PLAIN_ENV_KEYS {
        let Some(value) = lookup(var) else { continue };

        builder = match key {
            "mail.port" | "server.port" => {
                let port: u16 = value.trim().parse().map_err(|_| {
                    ConfigError::Message(format!("{} must be a port number, got {:?}", var, value))
                })?;
                builder.set_override(key, i64::from(port))?
            }
            "mail.use_tls" => builder.set_override(key, value.trim().eq_ignore_ascii_case("true"))?,
            _ => builder.set_override(key, value)?,
        };
    }

    builder.build()
}
