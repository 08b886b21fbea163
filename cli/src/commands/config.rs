//! Config commands

use crate::config::Config;
use crate::ConfigCommands;
use anyhow::bail;

/// First eight characters of the key, never splitting a multibyte char.
fn mask_key(key: &str) -> String {
    format!("{}****", key.chars().take(8).collect::<String>())
}

pub async fn handle(action: ConfigCommands) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Init => {
            let config = Config::default();
            config.save()?;
            println!("Configuration initialized at ~/.rampart/config.toml");
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(None).unwrap_or_default();
            match key.as_str() {
                "api_key" => config.api_key = Some(value),
                "api_url" => config.api_url = Some(value),
                "default_format" => config.default_format = Some(value),
                _ => bail!("Unknown config key: {}", key),
            }
            config.save()?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(None).unwrap_or_default();
            let value = match key.as_str() {
                "api_key" => config.api_key.map(|k| mask_key(&k)),
                "api_url" => config.api_url,
                "default_format" => config.default_format,
                _ => bail!("Unknown config key: {}", key),
            };
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load(None).unwrap_or_default();
            println!("api_url: {}", config.api_url.unwrap_or_else(|| "(not set)".into()));
            println!(
                "api_key: {}",
                config
                    .api_key
                    .map(|k| mask_key(&k))
                    .unwrap_or_else(|| "(not set)".into())
            );
            println!(
                "default_format: {}",
                config.default_format.unwrap_or_else(|| "(not set)".into())
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_shows_at_most_eight_characters() {
        assert_eq!(mask_key("abcdefghij"), "abcdefgh****");
        assert_eq!(mask_key("abc"), "abc****");
    }

    #[test]
    fn mask_never_splits_a_multibyte_character() {
        // 'ü' is two bytes; byte-slicing at 8 would land mid-character.
        assert_eq!(mask_key("küüüüüüüü"), "küüüüüüü****");
    }
}
