use serde;

#[derive(Debug, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub public_url: String,
    pub webhook: WebhookSettings,
    pub title: TitleSettings,
    pub results: ResultCacheSettings,
}

#[derive(Debug, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct WebhookSettings {
    pub url: String,
    pub dispatch_wait_ms: u64,
    pub callback_token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct TitleSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ResultCacheSettings {
    pub ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

impl Settings {
    /// Address the estimate engine calls back to with finished results.
    pub fn callback_url(&self) -> String {
        format!(
            "{}/estimate/callback",
            self.public_url.trim_end_matches('/')
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Add configuration values from a file named `configuration`
    // with the .yaml extension
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration")) // .json, .toml, .yaml, .yml
        .build()?;

    // Try to convert the configuration values it read into
    // our Settings type
    let mut config: Settings = settings.try_deserialize()?;

    // Deployment-specific values come from the environment
    if let Ok(public_url) = std::env::var("PUBLIC_URL") {
        config.public_url = public_url;
    }
    if let Ok(url) = std::env::var("ESTIMATE_WEBHOOK_URL") {
        config.webhook.url = url;
    }
    if let Ok(token) = std::env::var("CALLBACK_TOKEN") {
        config.webhook.callback_token = Some(token);
    }
    if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
        config.title.api_key = api_key;
    }

    Ok(config)
}
