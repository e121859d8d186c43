//! Environment-driven configuration.

use std::env;

const DEFAULT_API_ORIGIN: &str = "https://api.astrosetu.app/v1";

pub struct Config {
    pub api_origin: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            api_origin: try_load("ASTROSETU_API_ORIGIN", DEFAULT_API_ORIGIN),
        }
    }
}

fn try_load(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            tracing::info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_origin() {
        unsafe { env::remove_var("ASTROSETU_API_ORIGIN") };
        let config = Config::load();
        assert_eq!(config.api_origin, DEFAULT_API_ORIGIN);
    }
}
