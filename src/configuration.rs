use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webdriver: WebDriverSettings,
    pub marketplace: MarketplaceSettings,
    pub trends: TrendsSettings,
    pub api_keys: ApiKeySettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct WebDriverSettings {
    /// Address of the chromedriver / selenium endpoint.
    pub url: String,
    /// Residual wait after document.readyState reports complete.
    pub settle_ms: u64,
    /// Upper bound of the random jitter added to settle_ms.
    pub settle_jitter_ms: u64,
    pub ready_poll_attempts: u32,
    pub ready_poll_interval_ms: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct MarketplaceSettings {
    /// e.g. https://www.amazon.it
    pub base_url: String,
    /// Search index passed as the `i` query parameter, e.g. stripbooks.
    pub category: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct TrendsSettings {
    pub base_url: String,
    pub hl: String,
    pub geo: String,
    pub tz: i32,
    pub timeframe: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApiKeySettings {
    pub openai: String,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let settings = config::Config::builder()
        .add_source(config::File::from(base_path.join("configuration.yaml")))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
