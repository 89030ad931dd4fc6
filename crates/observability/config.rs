use std::env;
use tracing::Level;
use url::Url;

#[derive(Clone)]
pub(crate) struct DiscordConfig {
    pub(crate) webhook_url: Url,
    pub(crate) min_level: Level,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
    pub(crate) discord: Option<DiscordConfig>,
    /// Parse problems collected here and logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = env::var("SERVICE_NAME")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = env::var("STAGE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let discord = discord_from_env(&mut warnings);

        Self {
            service_name,
            environment,
            component,
            discord,
            warnings,
        }
    }
}

fn discord_from_env(warnings: &mut Vec<String>) -> Option<DiscordConfig> {
    let enabled = env::var("DISCORD_NOTIFY_ENABLED")
        .ok()
        .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(true);
    if !enabled {
        return None;
    }

    let raw_url = env::var("DISCORD_WEBHOOK_URL").ok().filter(|v| !v.is_empty())?;
    let webhook_url = match Url::parse(&raw_url) {
        Ok(url) => url,
        Err(err) => {
            // The raw URL is a secret; never echo it into logs.
            warnings.push(format!(
                "DISCORD_WEBHOOK_URL is set but invalid; Discord notifications disabled (parse error: {err})"
            ));
            return None;
        }
    };

    let min_level = match env::var("DISCORD_NOTIFY_LEVEL") {
        Ok(raw) if !raw.trim().is_empty() => match parse_level(&raw) {
            Some(level) => level,
            None => {
                warnings.push(format!(
                    "DISCORD_NOTIFY_LEVEL is invalid (value: {raw}); defaulting to ERROR"
                ));
                Level::ERROR
            }
        },
        _ => Level::ERROR,
    };

    Some(DiscordConfig {
        webhook_url,
        min_level,
    })
}

fn parse_level(input: &str) -> Option<Level> {
    match input.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
