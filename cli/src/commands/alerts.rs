//! Alert triage commands

use super::ApiClient;
use crate::{output::OutputFormat, prefs::FilePreferences, AlertCommands};
use anyhow::Context;
use colored::Colorize;
use parking_lot::RwLock;
use rampart_triage::{
    prefs, AlertStatus, AutoPollingService, Filter, QueryBuilder, ShowHideController,
};
use std::sync::Arc;
use std::time::Duration;

pub async fn handle(
    action: AlertCommands,
    client: &ApiClient,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        AlertCommands::List { status, source_type, from, size } => {
            let builder = prepared_builder()?;
            {
                let mut builder = builder.write();
                if let Some(status) = status {
                    builder.add_or_update_filter(Filter::new("alert_status", status));
                }
                if let Some(source) = source_type {
                    builder.add_or_update_filter(Filter::new("source:type", source));
                }
                builder.set_paging(from, size);
            }
            let response = client.search(&builder.read().search_request()).await?;
            println!("{} of {} alerts", response.results.len(), response.total);
            format.print_alerts(&response.results);
        }
        AlertCommands::Search { query, size } => {
            let mut builder = QueryBuilder::new();
            builder.set_search_text(&query);
            builder.set_paging(0, size);
            let response = client.search(&builder.search_request()).await?;

            let store = FilePreferences::open_default()?;
            prefs::record_recent_search(&store, &query);

            println!("{} of {} alerts", response.results.len(), response.total);
            format.print_alerts(&response.results);
        }
        AlertCommands::Get { id } => {
            let alert = client.get_alert(&id).await?;
            format.print(&alert);
        }
        AlertCommands::Resolve { ids } => {
            client.update_status(&ids, AlertStatus::Resolve).await?;
            println!("{} alert(s) resolved", ids.len());
        }
        AlertCommands::Dismiss { ids } => {
            client.update_status(&ids, AlertStatus::Dismiss).await?;
            println!("{} alert(s) dismissed", ids.len());
        }
        AlertCommands::Escalate { ids } => {
            client.update_status(&ids, AlertStatus::Escalate).await?;
            println!("{} alert(s) escalated", ids.len());
        }
        AlertCommands::Reopen { ids } => {
            client.update_status(&ids, AlertStatus::Open).await?;
            println!("{} alert(s) reopened", ids.len());
        }
        AlertCommands::Fields { indices } => {
            let columns = client.column_metadata(&indices).await?;
            format.print_columns(&columns);
        }
        AlertCommands::Recent => {
            let store = FilePreferences::open_default()?;
            for (i, query) in prefs::recent_searches(&store).iter().enumerate() {
                println!("{:2}. {}", i + 1, query);
            }
        }
        AlertCommands::Watch { interval, query } => {
            watch(client, format, interval, query).await?;
        }
        AlertCommands::Hide { status, show } => {
            let status = parse_visibility_status(&status)?;
            let builder = Arc::new(RwLock::new(QueryBuilder::new()));
            let store = Arc::new(FilePreferences::open_default()?);
            let mut controller = ShowHideController::new(builder, store);
            controller.set_visibility(status, !show);
            let verb = if show { "shown" } else { "hidden" };
            println!("{} alerts {} in future listings", status, verb);
        }
    }
    Ok(())
}

/// Only resolved and dismissed alerts carry a visibility toggle; anything
/// else is rejected here rather than silently doing nothing.
fn parse_visibility_status(input: &str) -> anyhow::Result<AlertStatus> {
    match input.to_uppercase().as_str() {
        "RESOLVE" => Ok(AlertStatus::Resolve),
        "DISMISS" => Ok(AlertStatus::Dismiss),
        other => anyhow::bail!(
            "no visibility toggle for status {}; expected RESOLVE or DISMISS",
            other
        ),
    }
}

/// Builder with persisted visibility preferences already applied, shared
/// with the polling service in watch mode.
fn prepared_builder() -> anyhow::Result<Arc<RwLock<QueryBuilder>>> {
    let builder = Arc::new(RwLock::new(QueryBuilder::new()));
    let store = Arc::new(FilePreferences::open_default()?);
    let mut controller = ShowHideController::new(builder.clone(), store);
    controller.init();
    Ok(builder)
}

/// Polls the current query until Ctrl-C, printing each refresh as it lands.
async fn watch(
    client: &ApiClient,
    format: OutputFormat,
    interval_secs: u64,
    query: Option<String>,
) -> anyhow::Result<()> {
    let builder = prepared_builder()?;
    if let Some(query) = query {
        builder.write().set_search_text(query);
    }

    let provider = Arc::new(ApiClient::new(&client.base_url, client.api_key.as_deref()));
    let service = AutoPollingService::new(
        provider,
        builder.clone(),
        Duration::from_secs(interval_secs.max(1)),
    );
    let mut refreshes = service.subscribe();

    println!(
        "watching {} every {}s (Ctrl-C to stop)",
        builder.read().query().bold(),
        interval_secs.max(1)
    );
    service.start();

    loop {
        tokio::select! {
            response = refreshes.recv() => {
                let response = response.context("refresh channel closed")?;
                println!(
                    "\n[{}] {} alert(s)",
                    chrono::Utc::now().format("%H:%M:%S"),
                    response.total
                );
                format.print_alerts(&response.results);
            }
            _ = tokio::signal::ctrl_c() => {
                service.stop();
                println!("\nstopped");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_status_parses_case_insensitively() {
        assert_eq!(
            parse_visibility_status("resolve").unwrap(),
            AlertStatus::Resolve
        );
        assert_eq!(
            parse_visibility_status("DISMISS").unwrap(),
            AlertStatus::Dismiss
        );
    }

    #[test]
    fn statuses_without_a_toggle_are_rejected() {
        for status in ["ESCALATE", "NEW", "OPEN", "bogus"] {
            let err = parse_visibility_status(status).unwrap_err();
            assert!(err.to_string().contains(&status.to_uppercase()));
        }
    }
}
