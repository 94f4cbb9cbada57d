use crate::models::{AppData, DailyLogWithSignal};
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsWindow {
    Weekly,
    Monthly,
    Yearly,
}

impl StatsWindow {
    pub fn days(self) -> i64 {
        match self {
            StatsWindow::Weekly => 7,
            StatsWindow::Monthly => 30,
            StatsWindow::Yearly => 365,
        }
    }
}

pub fn window_logs(data: &AppData, window: StatsWindow) -> Vec<DailyLogWithSignal> {
    window_logs_at(Utc::now(), data, window)
}

/// Logs stamped at or after `now - window`, each joined with its signal.
/// Rows are raw; nothing is summed or averaged here.
pub fn window_logs_at(
    now: DateTime<Utc>,
    data: &AppData,
    window: StatsWindow,
) -> Vec<DailyLogWithSignal> {
    let since = now - Duration::days(window.days());

    data.daily_logs
        .iter()
        .filter(|log| log.log_date >= since)
        .filter_map(|log| {
            let signal = data.signals.iter().find(|signal| signal.id == log.signal_id)?;
            Some(DailyLogWithSignal {
                log: log.clone(),
                signal: signal.clone(),
            })
        })
        .collect()
}
