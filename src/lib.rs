pub mod calendar;
mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod reminder;
pub mod storage;

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::info;

pub use calendar::Calendar;
pub use config::Settings;
pub use controller::{ReminderListController, ReminderListListener, RowTransition};
pub use error::{AppError, AppResult};
pub use reminder::Reminder;
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, ReminderStore};

/// Shared handle to the reminder list used by the command layer
pub struct AppState {
    pub controller: Mutex<ReminderListController>,
}

impl AppState {
    pub fn new(controller: ReminderListController) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    /// Open the file-backed store described by `settings`.
    pub fn open(settings: &Settings, calendar: Calendar) -> AppResult<Self> {
        let blobs = FileBlobStore::new(&settings.data_dir)?;
        info!("Using data directory {:?}", settings.data_dir);
        let store = ReminderStore::open(Box::new(blobs));
        Ok(Self::new(ReminderListController::with_range(
            store,
            calendar,
            settings.days_before,
            settings.days_after,
        )))
    }

    /// Lock the controller, recovering from poison if needed
    fn lock_controller(&self) -> std::sync::MutexGuard<'_, ReminderListController> {
        self.controller.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One entry of the date strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStripItem {
    pub date: DateTime<Utc>,
    pub label: String,
    pub is_today: bool,
}

pub fn get_visible_reminders(state: &AppState) -> Vec<Reminder> {
    state.lock_controller().visible_reminders().to_vec()
}

pub fn get_date_strip(state: &AppState) -> Vec<DateStripItem> {
    let controller = state.lock_controller();
    let today_index = controller.today_index();
    controller
        .date_range()
        .iter()
        .enumerate()
        .map(|(i, date)| DateStripItem {
            date: *date,
            label: controller.calendar().format_date(*date),
            is_today: i == today_index,
        })
        .collect()
}

pub fn get_focused_date(state: &AppState) -> DateTime<Utc> {
    state.lock_controller().focused_date()
}

pub fn set_listener(state: &AppState, listener: Box<dyn ReminderListListener>) {
    state.lock_controller().set_listener(listener);
}

pub fn create_reminder(
    state: &AppState,
    title: &str,
    date: DateTime<Utc>,
) -> AppResult<RowTransition> {
    state.lock_controller().create_reminder(title, date)
}

pub fn toggle_reminder(state: &AppState, index: usize) -> AppResult<RowTransition> {
    state.lock_controller().toggle_completion(index)
}

pub fn filter_reminders(state: &AppState, date: DateTime<Utc>) -> RowTransition {
    state.lock_controller().filter_reminders(date)
}

pub fn update_focused_date(state: &AppState, date: DateTime<Utc>) -> RowTransition {
    state.lock_controller().update_focused_date(date)
}

pub fn fetch_reminders(state: &AppState) -> RowTransition {
    state.lock_controller().fetch_reminders()
}

pub fn delete_reminder(state: &AppState, id: &str) -> RowTransition {
    state.lock_controller().delete_reminder(id)
}

pub fn clear_reminders(state: &AppState) -> RowTransition {
    state.lock_controller().clear_reminders()
}

/// Entry point of the `reminder-list` binary.
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cli::run()
}
