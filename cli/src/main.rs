//! Rampart CLI
//!
//! Operator console for the Rampart security-analytics platform.
//!
//! # Usage
//!
//! ```bash
//! rampart alerts list --status NEW
//! rampart alerts search "ip_src_addr:10.0.0.1"
//! rampart alerts watch --interval 15
//! rampart alerts resolve a7f3 b2c9
//! rampart pcap submit --start "2026-08-01 00:00:00" --ip-src-addr 10.0.0.1
//! rampart sensors save squid -f squid-parser.json
//! rampart config init
//! ```

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;
mod prefs;

#[derive(Parser)]
#[command(name = "rampart")]
#[command(author = "Rampart")]
#[command(version = "0.1.0")]
#[command(about = "Rampart triage console command line interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "RAMPART_API_URL")]
    api_url: Option<String>,

    /// API key for authentication
    #[arg(long, env = "RAMPART_API_KEY")]
    api_key: Option<String>,

    /// Output format [default: table, or default_format from the profile]
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage alerts
    Alerts {
        #[command(subcommand)]
        action: AlertCommands,
    },
    /// Submit and track pcap queries
    Pcap {
        #[command(subcommand)]
        action: PcapCommands,
    },
    /// Manage sensor parser configurations
    Sensors {
        #[command(subcommand)]
        action: SensorCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AlertCommands {
    /// List alerts matching the current filters
    List {
        /// Restrict to one triage status
        #[arg(long)]
        status: Option<String>,
        /// Restrict to one sensor source type
        #[arg(long)]
        source_type: Option<String>,
        /// Page offset
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Page size
        #[arg(long, default_value_t = 25)]
        size: usize,
    },
    /// Run a raw query string against the alert indices
    Search {
        query: String,
        #[arg(long, default_value_t = 25)]
        size: usize,
    },
    /// Get alert details
    Get { id: String },
    /// Mark alerts resolved
    Resolve { ids: Vec<String> },
    /// Dismiss alerts
    Dismiss { ids: Vec<String> },
    /// Escalate alerts
    Escalate { ids: Vec<String> },
    /// Reopen alerts
    Reopen { ids: Vec<String> },
    /// List filterable fields discovered from the indices
    Fields {
        /// Indices to inspect
        #[arg(long, default_value = "alerts")]
        indices: Vec<String>,
    },
    /// Show recent search history
    Recent,
    /// Poll the current query, printing each refresh until interrupted
    Watch {
        /// Poll interval in seconds
        #[arg(long, default_value_t = 15)]
        interval: u64,
        /// Extra query clause ANDed into the watch
        #[arg(long)]
        query: Option<String>,
    },
    /// Toggle visibility of resolved/dismissed alerts in future listings
    Hide {
        /// RESOLVE or DISMISS
        status: String,
        /// Show instead of hide
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
enum PcapCommands {
    /// Submit a pcap query job
    Submit {
        /// Range start, "YYYY-MM-DD HH:MM:SS" UTC (default: epoch)
        #[arg(long)]
        start: Option<String>,
        /// Range end, "YYYY-MM-DD HH:MM:SS" UTC (default: now)
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        ip_src_addr: Option<String>,
        #[arg(long)]
        ip_src_port: Option<u16>,
        #[arg(long)]
        ip_dst_addr: Option<String>,
        #[arg(long)]
        ip_dst_port: Option<u16>,
        #[arg(long)]
        protocol: Option<String>,
        /// Raw packet filter expression
        #[arg(long)]
        filter: Option<String>,
        /// Also match the reversed src/dst flow
        #[arg(long)]
        include_reverse: bool,
    },
    /// Check a submitted job
    Status { job_id: String },
}

#[derive(Subcommand)]
enum SensorCommands {
    /// List sensor parser configurations
    List,
    /// Get one sensor's parser configuration
    Get { name: String },
    /// Save a parser configuration from a JSON or YAML file
    Save {
        name: String,
        #[arg(short, long)]
        file: String,
    },
    /// Delete a sensor's parser configuration
    Delete { name: String },
    /// Add or update a threat-triage scoring rule
    Rule {
        sensor: String,
        /// Rule expression
        #[arg(long)]
        rule: String,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a threat-triage scoring rule by expression
    RemoveRule {
        sensor: String,
        #[arg(long)]
        rule: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

const DEFAULT_API_URL: &str = "http://localhost:8082/api/v1";

/// Explicit flag or env var beats the profile config; the profile beats the
/// built-in default.
fn resolve_api_url(flag: Option<String>, profile: Option<String>) -> String {
    flag.or(profile).unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// `--format` beats the profile's `default_format`; an unknown stored value
/// falls back to the table default.
fn resolve_format(
    flag: Option<output::OutputFormat>,
    profile: Option<&str>,
) -> output::OutputFormat {
    use clap::ValueEnum;
    flag.or_else(|| profile.and_then(|s| output::OutputFormat::from_str(s, true).ok()))
        .unwrap_or(output::OutputFormat::Table)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rampart=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_default();
    let api_url = resolve_api_url(cli.api_url, config.api_url);
    let api_key = cli.api_key.or(config.api_key);
    let format = resolve_format(cli.format, config.default_format.as_deref());

    let client = commands::ApiClient::new(&api_url, api_key.as_deref());

    let result = match cli.command {
        Commands::Alerts { action } => commands::alerts::handle(action, &client, format).await,
        Commands::Pcap { action } => commands::pcap::handle(action, &client, format).await,
        Commands::Sensors { action } => commands::sensors::handle(action, &client, format).await,
        Commands::Config { action } => commands::config::handle(action).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
