//! Day-filtered view over the reminder collection.
//!
//! The controller owns the [`ReminderStore`] and derives the visible list from
//! it: every reminder on the focused calendar day, incomplete ones first, each
//! group ordered by due date. Every command returns a [`RowTransition`] and the
//! same transition is pushed to the registered [`ReminderListListener`].

use crate::calendar::Calendar;
use crate::config::{DEFAULT_DAYS_AFTER, DEFAULT_DAYS_BEFORE};
use crate::error::{AppError, AppResult};
use crate::reminder::{display_order, validate_title, Reminder};
use crate::storage::ReminderStore;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// What the presentation layer has to redraw after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTransition {
    /// The visible list changed shape; redraw everything
    FullReload,
    /// A single row moved from one position to another
    MoveRow { from: usize, to: usize },
    /// Nothing visible changed
    Unchanged,
}

/// Receives row transitions as they happen
pub trait ReminderListListener: Send {
    fn full_reload(&mut self);
    fn move_row(&mut self, from: usize, to: usize);
}

pub struct ReminderListController {
    store: ReminderStore,
    calendar: Calendar,
    focused_date: DateTime<Utc>,
    visible: Vec<Reminder>,
    date_range: Vec<DateTime<Utc>>,
    today_index: usize,
    last_focused_index: Option<usize>,
    listener: Option<Box<dyn ReminderListListener>>,
}

/// Index of `today` in the date strip, or the strip's midpoint when the clock
/// and the strip disagree.
fn today_position(calendar: &Calendar, dates: &[DateTime<Utc>], today: DateTime<Utc>) -> usize {
    calendar
        .index_of_day(dates, today)
        .unwrap_or(dates.len() / 2)
}

impl ReminderListController {
    pub fn new(store: ReminderStore, calendar: Calendar) -> Self {
        Self::with_range(store, calendar, DEFAULT_DAYS_BEFORE, DEFAULT_DAYS_AFTER)
    }

    /// Build the controller focused on today, with a date strip spanning
    /// `days_before` days back and `days_after` days ahead.
    pub fn with_range(
        store: ReminderStore,
        calendar: Calendar,
        days_before: u32,
        days_after: u32,
    ) -> Self {
        let today = calendar.now();
        let date_range = calendar.generate_date_range(days_before, days_after);
        let today_index = today_position(&calendar, &date_range, today);

        let mut controller = Self {
            store,
            calendar,
            focused_date: today,
            visible: Vec::new(),
            date_range,
            today_index,
            last_focused_index: Some(today_index),
            listener: None,
        };
        controller.refilter(today);
        controller
    }

    pub fn set_listener(&mut self, listener: Box<dyn ReminderListListener>) {
        self.listener = Some(listener);
    }

    pub fn visible_reminders(&self) -> &[Reminder] {
        &self.visible
    }

    pub fn all_reminders(&self) -> &[Reminder] {
        self.store.reminders()
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn focused_date(&self) -> DateTime<Utc> {
        self.focused_date
    }

    pub fn date_range(&self) -> &[DateTime<Utc>] {
        &self.date_range
    }

    pub fn today_index(&self) -> usize {
        self.today_index
    }

    /// Row at `index` in the visible list, if there is one.
    pub fn reminder_at(&self, index: usize) -> Option<&Reminder> {
        self.visible.get(index)
    }

    /// Focus `date` and rebuild the visible list for that day.
    pub fn filter_reminders(&mut self, date: DateTime<Utc>) -> RowTransition {
        self.refilter(date);
        self.emit(RowTransition::FullReload)
    }

    /// Navigation (date strip or picker) moved the focus.
    pub fn update_focused_date(&mut self, date: DateTime<Utc>) -> RowTransition {
        self.filter_reminders(date)
    }

    pub fn move_to_today(&mut self) -> usize {
        let today = self.calendar.now();
        self.filter_reminders(today);
        self.today_index
    }

    /// Whether `candidate` (an index into the date strip) differs from the
    /// last focused strip position. Records the candidate when it does.
    pub fn is_focused_date_changed(&mut self, candidate: usize) -> bool {
        if candidate >= self.date_range.len() || self.last_focused_index == Some(candidate) {
            return false;
        }
        self.last_focused_index = Some(candidate);
        true
    }

    /// Focus the strip entry at `index` if it is not already focused.
    pub fn select_date_index(&mut self, index: usize) -> Option<RowTransition> {
        if !self.is_focused_date_changed(index) {
            return None;
        }
        let date = self.date_range[index];
        Some(self.update_focused_date(date))
    }

    /// Reload the collection from the store and redraw the focused day.
    pub fn fetch_reminders(&mut self) -> RowTransition {
        let count = self.store.reload().len();
        debug!("Fetched {} reminders", count);
        self.filter_reminders(self.focused_date)
    }

    /// Validate and store a new reminder built from `title` and `date`.
    pub fn create_reminder(&mut self, title: &str, date: DateTime<Utc>) -> AppResult<RowTransition> {
        let reminder = Reminder::new(title, date)?;
        self.add_reminder(reminder)
    }

    /// Store `reminder`; the visible list only changes when it falls on the
    /// focused day.
    pub fn add_reminder(&mut self, reminder: Reminder) -> AppResult<RowTransition> {
        validate_title(&reminder.title)?;

        let on_focused_day = self.calendar.is_same_day(reminder.date, self.focused_date);
        info!("Adding reminder {} ({})", reminder.id, reminder.title.trim());
        self.store.add(reminder.clone())?;

        if !on_focused_day {
            return Ok(RowTransition::Unchanged);
        }

        self.visible.push(reminder);
        self.visible.sort_by(display_order);
        Ok(self.emit(RowTransition::FullReload))
    }

    /// Flip completion of the visible row at `index` and report where it
    /// moved to.
    pub fn toggle_completion(&mut self, index: usize) -> AppResult<RowTransition> {
        let id = self
            .visible
            .get(index)
            .map(|r| r.id.clone())
            .ok_or_else(|| AppError::not_found(format!("No reminder at row {}", index)))?;

        let now = self.calendar.now();
        let date = self
            .store
            .modify(&id, |r| r.toggle_completion(now))
            .map(|r| r.date)
            .ok_or_else(|| AppError::not_found(format!("Reminder {} is not stored", id)))?;

        self.refilter(date);

        let transition = match self.visible.iter().position(|r| r.id == id) {
            Some(new_index) => RowTransition::MoveRow {
                from: index,
                to: new_index,
            },
            None => {
                warn!("Toggled reminder {} vanished from the visible list", id);
                RowTransition::FullReload
            }
        };
        Ok(self.emit(transition))
    }

    /// Remove a reminder by id. Missing ids leave everything untouched.
    pub fn delete_reminder(&mut self, id: &str) -> RowTransition {
        if !self.store.delete(id) {
            return RowTransition::Unchanged;
        }
        info!("Deleted reminder {}", id);
        self.filter_reminders(self.focused_date)
    }

    /// Drop the whole collection, including what is persisted.
    pub fn clear_reminders(&mut self) -> RowTransition {
        self.store.clear();
        info!("Cleared all reminders");
        self.filter_reminders(self.focused_date)
    }

    fn refilter(&mut self, date: DateTime<Utc>) {
        self.focused_date = date;
        self.last_focused_index = self.calendar.index_of_day(&self.date_range, date);

        let calendar = &self.calendar;
        let mut visible: Vec<Reminder> = self
            .store
            .reminders()
            .iter()
            .filter(|r| calendar.is_same_day(r.date, date))
            .cloned()
            .collect();
        visible.sort_by(display_order);
        self.visible = visible;
    }

    fn emit(&mut self, transition: RowTransition) -> RowTransition {
        if let Some(listener) = self.listener.as_mut() {
            match transition {
                RowTransition::FullReload => listener.full_reload(),
                RowTransition::MoveRow { from, to } => listener.move_row(from, to),
                RowTransition::Unchanged => {}
            }
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBlobStore;
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<RowTransition>>>,
    }

    impl ReminderListListener for Recorder {
        fn full_reload(&mut self) {
            self.events.lock().unwrap().push(RowTransition::FullReload);
        }

        fn move_row(&mut self, from: usize, to: usize) {
            self.events
                .lock()
                .unwrap()
                .push(RowTransition::MoveRow { from, to });
        }
    }

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap()
    }

    fn at(day_offset: i64, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, hour, 0, 0).unwrap() + Duration::days(day_offset)
    }

    fn controller() -> ReminderListController {
        let store = ReminderStore::open(Box::new(MemoryBlobStore::new()));
        ReminderListController::new(store, Calendar::utc().pinned_at(today()))
    }

    fn assert_sorted(reminders: &[Reminder]) {
        for pair in reminders.windows(2) {
            assert_ne!(
                display_order(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater,
                "{:?} should not precede {:?}",
                pair[0].title,
                pair[1].title
            );
        }
    }

    #[test]
    fn test_starts_focused_on_today() {
        let controller = controller();
        assert_eq!(controller.date_range().len(), 61);
        assert_eq!(controller.today_index(), 30);
        assert!(controller
            .calendar()
            .is_same_day(controller.focused_date(), today()));
        assert!(controller.visible_reminders().is_empty());
    }

    #[test]
    fn test_filter_keeps_only_focused_day() {
        let mut controller = controller();
        controller.create_reminder("yesterday", at(-1, 9)).unwrap();
        controller.create_reminder("late today", at(0, 18)).unwrap();
        controller.create_reminder("early today", at(0, 7)).unwrap();
        controller.create_reminder("tomorrow", at(1, 9)).unwrap();

        assert_eq!(controller.filter_reminders(today()), RowTransition::FullReload);
        let titles: Vec<&str> = controller
            .visible_reminders()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["early today", "late today"]);
        assert_eq!(controller.all_reminders().len(), 4);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut controller = controller();
        controller.create_reminder("a", at(0, 9)).unwrap();
        controller.create_reminder("b", at(0, 8)).unwrap();

        controller.filter_reminders(today());
        let first = controller.visible_reminders().to_vec();
        controller.filter_reminders(today());
        assert_eq!(controller.visible_reminders(), first.as_slice());
    }

    #[test]
    fn test_add_on_focused_day_shows_exactly_once() {
        let mut controller = controller();
        let recorder = Recorder::default();
        controller.set_listener(Box::new(recorder.clone()));

        let reminder = Reminder::new("Stretch", at(0, 15)).unwrap();
        let id = reminder.id.clone();
        let transition = controller.add_reminder(reminder).unwrap();

        assert_eq!(transition, RowTransition::FullReload);
        let matches = controller
            .visible_reminders()
            .iter()
            .filter(|r| r.id == id)
            .count();
        assert_eq!(matches, 1);
        assert_eq!(*recorder.events.lock().unwrap(), vec![RowTransition::FullReload]);
    }

    #[test]
    fn test_add_on_other_day_leaves_visible_untouched() {
        let mut controller = controller();
        let recorder = Recorder::default();
        controller.set_listener(Box::new(recorder.clone()));

        let transition = controller.create_reminder("Next week", at(7, 9)).unwrap();

        assert_eq!(transition, RowTransition::Unchanged);
        assert!(controller.visible_reminders().is_empty());
        assert_eq!(controller.all_reminders().len(), 1);
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_title_is_rejected() {
        let mut controller = controller();
        let err = controller.create_reminder("   ", at(0, 9)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(controller.all_reminders().is_empty());

        let mut sneaky = Reminder::new("ok", at(0, 9)).unwrap();
        sneaky.title = "\t".to_string();
        assert!(controller.add_reminder(sneaky).is_err());
        assert!(controller.all_reminders().is_empty());
    }

    #[test]
    fn test_toggle_moves_completed_to_bottom() {
        let mut controller = controller();
        let recorder = Recorder::default();
        controller.create_reminder("first", at(0, 8)).unwrap();
        controller.create_reminder("second", at(0, 9)).unwrap();
        controller.create_reminder("third", at(0, 10)).unwrap();
        controller.set_listener(Box::new(recorder.clone()));

        let transition = controller.toggle_completion(0).unwrap();

        assert_eq!(transition, RowTransition::MoveRow { from: 0, to: 2 });
        let last = &controller.visible_reminders()[2];
        assert_eq!(last.title, "first");
        assert!(last.is_completed);
        assert!(last.is_consistent());
        assert_eq!(*recorder.events.lock().unwrap(), vec![transition]);
    }

    #[test]
    fn test_reopening_completed_moves_to_top() {
        let mut controller = controller();
        for (title, hour) in [("a", 8), ("b", 9), ("c", 10)] {
            controller.create_reminder(title, at(0, hour)).unwrap();
        }
        for _ in 0..3 {
            controller.toggle_completion(0).unwrap();
        }
        assert!(controller.visible_reminders().iter().all(|r| r.is_completed));

        let transition = controller.toggle_completion(2).unwrap();

        assert_eq!(transition, RowTransition::MoveRow { from: 2, to: 0 });
        let first = &controller.visible_reminders()[0];
        assert_eq!(first.title, "c");
        assert!(!first.is_completed);
        assert!(first.completed_date.is_none());
    }

    #[test]
    fn test_toggle_updates_store_and_persists() {
        let blobs = MemoryBlobStore::new();
        let store = ReminderStore::open(Box::new(blobs.clone()));
        let mut controller = ReminderListController::new(store, Calendar::utc().pinned_at(today()));
        controller.create_reminder("Persist me", at(0, 9)).unwrap();

        controller.toggle_completion(0).unwrap();

        let reopened = ReminderStore::open(Box::new(blobs));
        let stored = &reopened.reminders()[0];
        assert!(stored.is_completed);
        assert_eq!(stored.completed_date, Some(today()));
    }

    #[test]
    fn test_toggle_out_of_range_is_not_found() {
        let mut controller = controller();
        controller.create_reminder("only", at(0, 9)).unwrap();

        let err = controller.toggle_completion(5).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!controller.all_reminders()[0].is_completed);
    }

    #[test]
    fn test_toggle_uses_ids_not_positions() {
        let mut controller = controller();
        controller.create_reminder("other day", at(2, 6)).unwrap();
        controller.create_reminder("today late", at(0, 20)).unwrap();
        controller.create_reminder("today early", at(0, 6)).unwrap();

        controller.toggle_completion(0).unwrap();

        let all = controller.all_reminders();
        assert!(!all[0].is_completed);
        assert!(!all[1].is_completed);
        assert!(all[2].is_completed);
    }

    #[test]
    fn test_sort_order_after_mixed_operations() {
        let mut controller = controller();
        for hour in [14, 9, 17, 11, 8] {
            controller.create_reminder(&format!("at {}", hour), at(0, hour)).unwrap();
        }
        controller.toggle_completion(1).unwrap();
        controller.toggle_completion(0).unwrap();
        controller.toggle_completion(4).unwrap();

        assert_sorted(controller.visible_reminders());
        assert!(controller.all_reminders().iter().all(Reminder::is_consistent));
    }

    #[test]
    fn test_focused_date_change_tracking() {
        let mut controller = controller();
        let today_index = controller.today_index();

        assert!(!controller.is_focused_date_changed(today_index));
        assert!(controller.is_focused_date_changed(today_index + 1));
        assert!(!controller.is_focused_date_changed(today_index + 1));
        assert!(!controller.is_focused_date_changed(10_000));
    }

    #[test]
    fn test_select_date_index_refilters() {
        let mut controller = controller();
        controller.create_reminder("tomorrow", at(1, 9)).unwrap();

        let tomorrow_index = controller.today_index() + 1;
        assert_eq!(
            controller.select_date_index(tomorrow_index),
            Some(RowTransition::FullReload)
        );
        assert_eq!(controller.visible_reminders().len(), 1);
        assert_eq!(controller.select_date_index(tomorrow_index), None);

        assert_eq!(controller.move_to_today(), controller.today_index());
        assert!(controller.visible_reminders().is_empty());
    }

    #[test]
    fn test_update_focused_date_matches_filter() {
        let mut controller = controller();
        controller.create_reminder("yesterday", at(-1, 9)).unwrap();

        assert_eq!(controller.update_focused_date(at(-1, 0)), RowTransition::FullReload);
        assert_eq!(controller.visible_reminders().len(), 1);
        assert!(controller.is_focused_date_changed(controller.today_index()));
    }

    #[test]
    fn test_delete_reminder() {
        let mut controller = controller();
        controller.create_reminder("keep", at(0, 9)).unwrap();
        controller.create_reminder("drop", at(0, 10)).unwrap();
        let id = controller.visible_reminders()[1].id.clone();

        assert_eq!(controller.delete_reminder(&id), RowTransition::FullReload);
        assert_eq!(controller.visible_reminders().len(), 1);
        assert_eq!(controller.delete_reminder("missing"), RowTransition::Unchanged);
    }

    #[test]
    fn test_clear_reminders_empties_everything() {
        let mut controller = controller();
        controller.create_reminder("a", at(0, 9)).unwrap();
        controller.create_reminder("b", at(1, 9)).unwrap();

        assert_eq!(controller.clear_reminders(), RowTransition::FullReload);
        assert!(controller.visible_reminders().is_empty());
        assert!(controller.all_reminders().is_empty());
        assert_eq!(controller.fetch_reminders(), RowTransition::FullReload);
        assert!(controller.all_reminders().is_empty());
    }

    #[test]
    fn test_fetch_reminders_reloads_from_store() {
        let blobs = MemoryBlobStore::new();
        let calendar = Calendar::utc().pinned_at(today());
        let mut controller =
            ReminderListController::new(ReminderStore::open(Box::new(blobs.clone())), calendar.clone());

        let mut writer = ReminderListController::new(ReminderStore::open(Box::new(blobs)), calendar);
        writer.create_reminder("written elsewhere", at(0, 9)).unwrap();

        assert!(controller.visible_reminders().is_empty());
        assert_eq!(controller.fetch_reminders(), RowTransition::FullReload);
        assert_eq!(controller.visible_reminders().len(), 1);
    }

    #[test]
    fn test_short_range_is_centred_on_today() {
        let store = ReminderStore::open(Box::new(MemoryBlobStore::new()));
        let controller =
            ReminderListController::with_range(store, Calendar::utc().pinned_at(today()), 2, 2);
        assert_eq!(controller.date_range().len(), 5);
        assert_eq!(controller.today_index(), 2);
    }

    #[test]
    fn test_today_position_falls_back_to_midpoint() {
        let calendar = Calendar::utc();
        let last_month = calendar.date_range_around(at(-40, 12), 3, 3);

        assert_eq!(today_position(&calendar, &last_month, today()), 3);
        assert_eq!(today_position(&calendar, &last_month, at(-41, 9)), 2);
        assert_eq!(today_position(&calendar, &[], today()), 0);
    }
}
