use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct InstallationsConfig {
    #[serde(default)]
    pub installations: Vec<InstallationConfig>,
}

/// One monitored Home Assistant deployment: where to reach it and which
/// entities carry its energy counters. Built once at startup and passed
/// into whatever performs fetches; nothing looks up credentials ambiently.
#[derive(Debug, Deserialize, Clone)]
pub struct InstallationConfig {
    pub id: String,
    pub url: String,
    pub token: String,
    pub entities: EntityMapping,
}

impl InstallationConfig {
    /// Long-lived access token without any `Bearer ` prefix that may have
    /// been pasted into the config file.
    pub fn access_token(&self) -> &str {
        self.token.strip_prefix("Bearer ").unwrap_or(&self.token)
    }
}

/// Entity identifiers for the cumulative counters this installation
/// exposes. Battery entities are optional; an installation has battery
/// charts only when both directions are configured.
#[derive(Debug, Deserialize, Clone)]
pub struct EntityMapping {
    pub production: String,
    pub grid_import: String,
    pub grid_export: String,
    pub battery_in: Option<String>,
    pub battery_out: Option<String>,
}

impl EntityMapping {
    pub fn has_battery(&self) -> bool {
        self.battery_in.is_some() && self.battery_out.is_some()
    }

    /// `(battery_out, battery_in)` entity ids when both are configured.
    pub fn battery_entities(&self) -> Option<(&str, &str)> {
        match (&self.battery_out, &self.battery_in) {
            (Some(out), Some(into)) => Some((out.as_str(), into.as_str())),
            _ => None,
        }
    }
}

pub fn load_installations_config() -> anyhow::Result<InstallationsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/installations"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
