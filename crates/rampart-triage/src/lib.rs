//! Rampart Triage Core
//!
//! Query/filter composition and auto-refresh engine for the Rampart alert
//! triage console:
//! - Filter accumulation into composite search queries
//! - Persisted show/hide visibility preferences
//! - Periodic re-issuance of the current search (auto-polling)
//! - Pcap query submission model
//! - Sensor parser configuration model
//!
//! # Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       TRIAGE CONSOLE CORE                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐ │
//! │  │  Show/Hide   │────▶│ QueryBuilder │◀────│  Search / Time   │ │
//! │  │  Controller  │     │ (filter set) │     │  Range Inputs    │ │
//! │  └──────┬───────┘     └──────┬───────┘     └──────────────────┘ │
//! │         │                    │                                   │
//! │   change events       derived SearchRequest                      │
//! │         │                    │                                   │
//! │         ▼                    ▼                                   │
//! │  ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐ │
//! │  │  Preference  │     │ AutoPolling  │────▶│  SearchProvider  │ │
//! │  │    Store     │     │   Service    │     │   (REST, mock)   │ │
//! │  └──────────────┘     └──────────────┘     └──────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All I/O goes through the injected [`prefs::PreferenceStore`] and
//! [`polling::SearchProvider`] capabilities; the core itself never touches
//! the network or durable storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod error;
pub mod filter;
pub mod pcap;
pub mod polling;
pub mod prefs;
pub mod query;
pub mod sensor;
pub mod show_hide;

pub use error::{TriageError, TriageResult};
pub use filter::Filter;
pub use polling::{AutoPollingService, SearchProvider};
pub use prefs::{MemoryPreferences, PreferenceStore};
pub use query::QueryBuilder;
pub use show_hide::{ShowHideChanged, ShowHideController};

// =============================================================================
// Core Types
// =============================================================================

/// A single indexed alert as returned by the search backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_src_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dst_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub status: AlertStatus,
    /// Source-specific fields the console renders but does not interpret.
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Triage lifecycle state of an alert. Wire form matches the index values,
/// which are also the values of the status visibility filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    New,
    Open,
    Escalate,
    Resolve,
    Dismiss,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "NEW",
            AlertStatus::Open => "OPEN",
            AlertStatus::Escalate => "ESCALATE",
            AlertStatus::Resolve => "RESOLVE",
            AlertStatus::Dismiss => "DISMISS",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for a search request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort clause of a search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub sort_order: SortOrder,
}

/// The query projection handed to the search backend. Derived from a
/// [`QueryBuilder`] on every read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub from: usize,
    pub size: usize,
    pub sort: Vec<SortField>,
}

/// Result set for one search issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub results: Vec<Alert>,
}

/// A filterable field discovered from the search indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}
