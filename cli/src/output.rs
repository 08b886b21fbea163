//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use rampart_triage::{Alert, AlertStatus, ColumnMetadata};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        match self {
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
        }
    }

    pub fn print_alerts(&self, alerts: &[Alert]) {
        match self {
            OutputFormat::Table => {
                let rows: Vec<AlertRow> = alerts.iter().map(AlertRow::from).collect();
                println!("{}", Table::new(rows));
            }
            _ => self.print(&alerts),
        }
    }

    pub fn print_columns(&self, columns: &[ColumnMetadata]) {
        match self {
            OutputFormat::Table => {
                let rows: Vec<ColumnRow> = columns.iter().map(ColumnRow::from).collect();
                println!("{}", Table::new(rows));
            }
            _ => self.print(&columns),
        }
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TIMESTAMP")]
    timestamp: String,
    #[tabled(rename = "SOURCE")]
    source_type: String,
    #[tabled(rename = "SRC")]
    ip_src_addr: String,
    #[tabled(rename = "DST")]
    ip_dst_addr: String,
    #[tabled(rename = "SCORE")]
    score: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<&Alert> for AlertRow {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id.clone(),
            timestamp: alert.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            source_type: alert.source_type.clone(),
            ip_src_addr: alert.ip_src_addr.clone().unwrap_or_default(),
            ip_dst_addr: alert.ip_dst_addr.clone().unwrap_or_default(),
            score: alert
                .score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "-".into()),
            status: colorize_status(alert.status),
        }
    }
}

fn colorize_status(status: AlertStatus) -> String {
    let text = status.as_str();
    match status {
        AlertStatus::New => text.red().to_string(),
        AlertStatus::Open => text.yellow().to_string(),
        AlertStatus::Escalate => text.magenta().to_string(),
        AlertStatus::Resolve => text.green().to_string(),
        AlertStatus::Dismiss => text.dimmed().to_string(),
    }
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "FIELD")]
    name: String,
    #[tabled(rename = "TYPE")]
    field_type: String,
}

impl From<&ColumnMetadata> for ColumnRow {
    fn from(column: &ColumnMetadata) -> Self {
        Self {
            name: column.name.clone(),
            field_type: column.field_type.clone(),
        }
    }
}
