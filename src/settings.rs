use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Where to fetch the schedule document; the bundled fixture is used when unset.
    pub schedule_url: Option<Url>,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_SCHEDULE_URL, APP_PORT, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const KEYS: [&str; 4] = ["APP_SCHEDULE_URL", "APP_DEBUG", "APP_ENABLE_SWAGGER", "APP_PORT"];

    fn clear_env() {
        for key in KEYS {
            // SAFETY: tests touching the environment run serially.
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let settings = Settings::from_env().unwrap();
        assert!(settings.schedule_url.is_none());
        assert!(!settings.debug);
        assert!(settings.enable_swagger);
        assert_eq!(settings.port, 8080);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        // SAFETY: tests touching the environment run serially.
        unsafe {
            std::env::set_var("APP_SCHEDULE_URL", "https://example.com/schedule.json");
            std::env::set_var("APP_DEBUG", "true");
            std::env::set_var("APP_PORT", "9090");
        }
        let settings = Settings::from_env().unwrap();
        clear_env();

        assert_eq!(
            settings.schedule_url.unwrap().as_str(),
            "https://example.com/schedule.json"
        );
        assert!(settings.debug);
        assert_eq!(settings.port, 9090);
    }
}
