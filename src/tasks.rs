//! In-memory task list for the day pager.
//!
//! Tasks belong to a calendar day. The board derives the signal ratio and the
//! segmented progress bar for any day, and only ever accepts new tasks on the
//! day the window is currently showing.

use crate::deletion::{DeleteSequence, DeleteStep};
use crate::window::DayWindow;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DAILY_CAP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(into = "f64", try_from = "f64")]
pub enum TaskStatus {
    #[default]
    Nothing,
    Quarter,
    Half,
    ThreeQuarters,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Nothing,
        TaskStatus::Quarter,
        TaskStatus::Half,
        TaskStatus::ThreeQuarters,
        TaskStatus::Done,
    ];

    pub fn value(self) -> f64 {
        match self {
            TaskStatus::Nothing => 0.0,
            TaskStatus::Quarter => 0.25,
            TaskStatus::Half => 0.5,
            TaskStatus::ThreeQuarters => 0.75,
            TaskStatus::Done => 1.0,
        }
    }

    /// Text shown on a collapsed row.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Nothing => "Nothing",
            TaskStatus::Quarter => "%25",
            TaskStatus::Half => "%50",
            TaskStatus::ThreeQuarters => "%75",
            TaskStatus::Done => "Done",
        }
    }

    /// Text on the status picker buttons.
    pub fn option_label(self) -> &'static str {
        match self {
            TaskStatus::Nothing => "Nothing",
            TaskStatus::Quarter => "0.25",
            TaskStatus::Half => "0.5",
            TaskStatus::ThreeQuarters => "0.75",
            TaskStatus::Done => "Done",
        }
    }
}

impl From<TaskStatus> for f64 {
    fn from(status: TaskStatus) -> Self {
        status.value()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidStatus(pub f64);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not one of 0, 0.25, 0.5, 0.75, 1", self.0)
    }
}

impl TryFrom<f64> for TaskStatus {
    type Error = InvalidStatus;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.value() == value)
            .ok_or(InvalidStatus(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub note: String,
    pub status: TaskStatus,
    pub day: NaiveDate,
}

/// Partial update; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub text: Option<String>,
    pub note: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskBoard {
    tasks: Vec<TaskItem>,
    cap: usize,
    window: DayWindow,
    expanded: Option<String>,
    editing: bool,
    adding: bool,
    last_id: i64,
}

impl TaskBoard {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_cap(today, DEFAULT_DAILY_CAP)
    }

    pub fn with_cap(today: NaiveDate, cap: usize) -> Self {
        Self {
            tasks: Vec::new(),
            cap,
            window: DayWindow::new(today),
            expanded: None,
            editing: false,
            adding: false,
            last_id: 0,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn window(&self) -> &DayWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut DayWindow {
        &mut self.window
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn tasks_for(&self, day: NaiveDate) -> impl Iterator<Item = &TaskItem> {
        self.tasks.iter().filter(move |task| task.day == day)
    }

    pub fn count_for(&self, day: NaiveDate) -> usize {
        self.tasks_for(day).count()
    }

    pub fn is_full(&self, day: NaiveDate) -> bool {
        self.count_for(day) >= self.cap
    }

    pub fn add_task(&mut self, text: &str) -> Option<&TaskItem> {
        self.add_task_at(text, Utc::now().timestamp_millis())
    }

    /// Add button pressed. Leaves edit mode and closes the open row even when
    /// the day is full; only opens the input when there is room.
    pub fn begin_add(&mut self) -> bool {
        self.editing = false;
        self.expanded = None;
        if self.is_full(self.window.current_day()) {
            return false;
        }
        self.adding = true;
        true
    }

    pub fn cancel_add(&mut self) {
        self.adding = false;
    }

    pub fn is_adding(&self) -> bool {
        self.adding
    }

    /// Adds a task to the day currently in view, at the head of the list.
    /// Blank labels and full days are ignored. Submitting always closes the
    /// input, the open row and edit mode.
    pub fn add_task_at(&mut self, text: &str, now_millis: i64) -> Option<&TaskItem> {
        self.adding = false;
        self.editing = false;
        self.expanded = None;

        let day = self.window.current_day();
        if text.trim().is_empty() || self.is_full(day) {
            return None;
        }

        let task = TaskItem {
            id: self.next_id(now_millis),
            text: text.to_string(),
            note: String::new(),
            status: TaskStatus::Nothing,
            day,
        };
        self.tasks.insert(0, task);
        self.tasks.first()
    }

    // Millisecond timestamps, bumped forward when two land in the same tick.
    fn next_id(&mut self, now_millis: i64) -> String {
        let id = now_millis.max(self.last_id + 1);
        self.last_id = id;
        id.to_string()
    }

    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };
        if let Some(text) = update.text {
            task.text = text;
        }
        if let Some(note) = update.note {
            task.note = note;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        true
    }

    pub fn delete_task(&mut self, id: &str) -> Option<TaskItem> {
        let position = self.tasks.iter().position(|task| task.id == id)?;
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        }
        Some(self.tasks.remove(position))
    }

    /// Long press on a row: enters edit mode so rows can be dragged.
    pub fn enter_edit_mode(&mut self) {
        self.editing = true;
    }

    pub fn exit_edit_mode(&mut self) {
        self.editing = false;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Swipe-to-delete is only live on a collapsed row while nothing is being
    /// added or dragged.
    pub fn can_start_delete(&self, id: &str) -> bool {
        !self.editing
            && !self.adding
            && self.expanded.as_deref() != Some(id)
            && self.tasks.iter().any(|task| task.id == id)
    }

    pub fn start_delete(&self, sequence: &mut DeleteSequence) -> DeleteStep {
        if !self.can_start_delete(sequence.task_id()) {
            return DeleteStep::Ignored;
        }
        sequence.start()
    }

    /// Removes the row once its delete sequence has committed.
    pub fn finish_delete(&mut self, sequence: &DeleteSequence) -> Option<TaskItem> {
        if !sequence.is_committed() {
            return None;
        }
        self.delete_task(sequence.task_id())
    }

    /// Reorders the tasks of `day` to follow `order`. Tasks of other days keep
    /// their positions; tasks of `day` missing from `order` go after the named
    /// ones in their previous order.
    pub fn reorder_day(&mut self, day: NaiveDate, order: &[&str]) {
        let mut remaining: Vec<TaskItem> = self.tasks_for(day).cloned().collect();
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(position) = remaining.iter().position(|task| task.id == *id) {
                reordered.push(remaining.remove(position));
            }
        }
        reordered.extend(remaining);

        let mut next = reordered.into_iter();
        for slot in self.tasks.iter_mut().filter(|task| task.day == day) {
            if let Some(task) = next.next() {
                *slot = task;
            }
        }
    }

    /// Opens `id`, closing whichever row was open. Toggling the open row
    /// closes it. Taps are ignored in edit mode.
    pub fn toggle_expanded(&mut self, id: &str) -> Option<&str> {
        if self.editing {
            return self.expanded.as_deref();
        }
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else if self.tasks.iter().any(|task| task.id == id) {
            self.expanded = Some(id.to_string());
        }
        self.expanded.as_deref()
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn status_sum(&self, day: NaiveDate) -> f64 {
        self.tasks_for(day).map(|task| task.status.value()).sum()
    }

    /// Average status of the day as a rounded percentage; 0 when empty.
    pub fn day_ratio(&self, day: NaiveDate) -> u32 {
        let count = self.count_for(day);
        if count == 0 {
            return 0;
        }
        (100.0 * self.status_sum(day) / count as f64).round() as u32
    }

    /// Fill level of each progress segment, one per allowed task.
    pub fn progress_segments(&self, day: NaiveDate) -> Vec<f64> {
        let sum = self.status_sum(day);
        (0..self.cap)
            .map(|segment| (sum - segment as f64).clamp(0.0, 1.0))
            .collect()
    }

    pub fn counter_label(&self, day: NaiveDate) -> String {
        format!("{}/{}", self.count_for(day), self.cap)
    }
}
