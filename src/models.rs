use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target_value: i64,
    pub create_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: i64,
    pub signal_id: i64,
    pub completed_value: i64,
    pub log_date: DateTime<Utc>,
}

/// Persisted dataset. Ids come from the counters and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub daily_logs: Vec<DailyLog>,
    #[serde(default = "first_id")]
    pub next_signal_id: i64,
    #[serde(default = "first_id")]
    pub next_log_id: i64,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            signals: Vec::new(),
            daily_logs: Vec::new(),
            next_signal_id: first_id(),
            next_log_id: first_id(),
        }
    }
}

fn first_id() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_value: i64,
}

/// Any `logDate` sent by the client is ignored; the server stamps the time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyLogRequest {
    pub signal_id: i64,
    #[serde(default)]
    pub completed_value: i64,
}

/// A stats row: the log with its parent signal embedded.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogWithSignal {
    #[serde(flatten)]
    pub log: DailyLog,
    pub signal: Signal,
}
