//! Packet-capture query model
//!
//! Builds the pcap query submission the backend's job runner accepts.
//! Human-entered date-times are converted to epoch millis at build time;
//! submission itself is the console's REST client's job.

use crate::error::{TriageError, TriageResult};
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Console date-time entry format, interpreted as UTC.
pub const PCAP_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A pcap query as submitted over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcapRequest {
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_src_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_src_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dst_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_dst_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_filter: Option<String>,
    #[serde(default)]
    pub include_reverse: bool,
}

impl PcapRequest {
    /// Builds a request from optional date-time strings. An absent start
    /// defaults to epoch zero, an absent end to now; an inverted range is
    /// rejected before any submission.
    pub fn for_range(start: Option<&str>, end: Option<&str>) -> TriageResult<Self> {
        let start_time_ms = match start {
            Some(s) => parse_pcap_datetime(s)?,
            None => 0,
        };
        let end_time_ms = match end {
            Some(s) => parse_pcap_datetime(s)?,
            None => Utc::now().timestamp_millis(),
        };
        if start_time_ms > end_time_ms {
            return Err(TriageError::TimeRangeOrder {
                start: start_time_ms,
                end: end_time_ms,
            });
        }
        Ok(Self {
            start_time_ms,
            end_time_ms,
            ..Self::default()
        })
    }

    pub fn with_src(mut self, addr: Option<String>, port: Option<u16>) -> Self {
        self.ip_src_addr = addr;
        self.ip_src_port = port;
        self
    }

    pub fn with_dst(mut self, addr: Option<String>, port: Option<u16>) -> Self {
        self.ip_dst_addr = addr;
        self.ip_dst_port = port;
        self
    }

    pub fn with_protocol(mut self, protocol: Option<String>) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_packet_filter(mut self, filter: Option<String>) -> Self {
        self.packet_filter = filter;
        self
    }

    pub fn with_include_reverse(mut self, include_reverse: bool) -> Self {
        self.include_reverse = include_reverse;
        self
    }
}

/// Parses a `YYYY-MM-DD HH:MM:SS` string as UTC epoch millis.
pub fn parse_pcap_datetime(input: &str) -> TriageResult<i64> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), PCAP_TIME_FORMAT)
        .map_err(|_| TriageError::InvalidTimestamp(input.to_string()))?;
    Ok(Utc.from_utc_datetime(&naive).timestamp_millis())
}

/// Lifecycle of a submitted pcap job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PcapJobStatus {
    Submitted,
    Running,
    Finished,
    Failed,
}

/// Pcap queries run as asynchronous backend jobs; submission returns the
/// job id and status is polled separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcapJob {
    pub job_id: String,
    pub job_status: PcapJobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f64>,
}
