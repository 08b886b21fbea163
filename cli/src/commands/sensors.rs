//! Sensor parser configuration commands

use super::ApiClient;
use crate::{output::OutputFormat, SensorCommands};
use anyhow::Context;
use rampart_triage::sensor::{RiskLevelRule, SensorParserConfig, ThreatTriageConfig};

pub async fn handle(
    action: SensorCommands,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        SensorCommands::List => {
            let configs = client.sensor_configs().await?;
            let mut names: Vec<&String> = configs.keys().collect();
            names.sort();
            for name in names {
                let config = &configs[name];
                println!("{:<24} {}", name, config.parser_class_name);
            }
        }
        SensorCommands::Get { name } => {
            let config = client.sensor_config(&name).await?;
            format.print(&config);
        }
        SensorCommands::Save { name, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file))?;
            let config: SensorParserConfig = if file.ends_with(".yaml") || file.ends_with(".yml") {
                serde_yaml::from_str(&content).with_context(|| format!("parsing {}", file))?
            } else {
                SensorParserConfig::from_json(&content)?
            };
            let saved = client.save_sensor_config(&name, &config).await?;
            println!("saved parser config for {}", name);
            format.print(&saved);
        }
        SensorCommands::Delete { name } => {
            client.delete_sensor_config(&name).await?;
            println!("deleted parser config for {}", name);
        }
        SensorCommands::Rule { sensor, rule, score, name } => {
            let mut config = client.sensor_config(&sensor).await?;
            let triage = config.threat_triage.get_or_insert_with(ThreatTriageConfig::default);
            triage.add_or_update_rule(RiskLevelRule {
                name,
                comment: None,
                rule,
                score,
            });
            client.save_sensor_config(&sensor, &config).await?;
            println!("rule saved for {}", sensor);
        }
        SensorCommands::RemoveRule { sensor, rule } => {
            let mut config = client.sensor_config(&sensor).await?;
            if let Some(triage) = config.threat_triage.as_mut() {
                triage.remove_rule(&rule);
            }
            client.save_sensor_config(&sensor, &config).await?;
            println!("rule removed for {}", sensor);
        }
    }
    Ok(())
}
