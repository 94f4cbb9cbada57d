use crate::errors::AppError;
use crate::models::{AppData, CreateDailyLogRequest, CreateSignalRequest, DailyLog, Signal};
use chrono::{DateTime, Utc};

/// Live signals allowed at any one time.
pub const MAX_SIGNALS: usize = 5;

pub fn list_signals(data: &AppData) -> Vec<Signal> {
    data.signals.clone()
}

pub fn create_signal(
    data: &mut AppData,
    request: CreateSignalRequest,
    now: DateTime<Utc>,
) -> Result<Signal, AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("signal title must not be empty"));
    }
    if data.signals.len() >= MAX_SIGNALS {
        return Err(AppError::bad_request(format!(
            "at most {MAX_SIGNALS} signals can exist at once"
        )));
    }

    let signal = Signal {
        id: data.next_signal_id,
        title: title.to_string(),
        description: request.description,
        target_value: request.target_value,
        create_at: now,
    };
    data.next_signal_id += 1;
    data.signals.push(signal.clone());

    Ok(signal)
}

/// Removes the signal and every log that references it. Returns how many
/// logs went with it.
pub fn delete_signal(data: &mut AppData, id: i64) -> Result<usize, AppError> {
    let position = data
        .signals
        .iter()
        .position(|signal| signal.id == id)
        .ok_or_else(|| AppError::not_found(format!("signal {id} not found")))?;
    data.signals.remove(position);

    let before = data.daily_logs.len();
    data.daily_logs.retain(|log| log.signal_id != id);

    Ok(before - data.daily_logs.len())
}

pub fn create_daily_log(
    data: &mut AppData,
    request: CreateDailyLogRequest,
    now: DateTime<Utc>,
) -> Result<DailyLog, AppError> {
    if !data.signals.iter().any(|signal| signal.id == request.signal_id) {
        return Err(AppError::bad_request(format!(
            "signal {} does not exist",
            request.signal_id
        )));
    }

    let log = DailyLog {
        id: data.next_log_id,
        signal_id: request.signal_id,
        completed_value: request.completed_value,
        log_date: now,
    };
    data.next_log_id += 1;
    data.daily_logs.push(log.clone());

    Ok(log)
}

/// Logs for one signal, newest first.
pub fn log_history(data: &AppData, signal_id: i64) -> Vec<DailyLog> {
    let mut logs: Vec<DailyLog> = data
        .daily_logs
        .iter()
        .filter(|log| log.signal_id == signal_id)
        .cloned()
        .collect();
    logs.sort_by(|a, b| b.log_date.cmp(&a.log_date).then(b.id.cmp(&a.id)));
    logs
}
