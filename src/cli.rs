use crate::{
    clear_reminders, config::Settings, create_reminder, delete_reminder, filter_reminders,
    get_date_strip, get_focused_date, get_visible_reminders, set_listener, toggle_reminder,
    AppState, Calendar, ReminderListListener,
};
use anyhow::{anyhow, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Debug, Parser)]
#[command(name = "reminder-list", version, about = "Day-by-day reminder list")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show reminders for a day (today by default)
    List {
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// Create a reminder
    Add {
        title: String,
        /// Due time as "YYYY-MM-DD HH:MM" (now by default)
        #[arg(long, value_parser = parse_moment)]
        at: Option<NaiveDateTime>,
    },
    /// Toggle completion of the row at INDEX in the day's list
    Toggle {
        index: usize,
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// Delete a reminder by id
    Delete { id: String },
    /// Show the date strip
    Dates,
    /// Remove every stored reminder
    Clear,
}

/// Logs row transitions the way a view would receive them
struct LoggingListener;

impl ReminderListListener for LoggingListener {
    fn full_reload(&mut self) {
        info!("Reloading list");
    }

    fn move_row(&mut self, from: usize, to: usize) {
        info!("Moving row {} to {}", from, to);
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn parse_moment(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").map_err(|e| e.to_string())
}

fn resolve(calendar: &Calendar, local: NaiveDateTime) -> anyhow::Result<DateTime<Utc>> {
    calendar
        .at_local(local)
        .ok_or_else(|| anyhow!("{} does not exist in the local timezone", local))
}

fn focus(state: &AppState, calendar: &Calendar, date: Option<NaiveDate>) -> anyhow::Result<()> {
    if let Some(day) = date {
        let midday = day
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| anyhow!("invalid day {}", day))?;
        let instant = resolve(calendar, midday)?;
        filter_reminders(state, instant);
    }
    Ok(())
}

fn print_list(state: &AppState, calendar: &Calendar) {
    let reminders = get_visible_reminders(state);
    println!("{}", calendar.format_header_date(get_focused_date(state)));

    if reminders.is_empty() {
        println!("  (no reminders)");
        return;
    }
    for (i, reminder) in reminders.iter().enumerate() {
        let mark = if reminder.is_completed { "x" } else { " " };
        println!(
            "{:>3} [{}] {}  {}  ({})",
            i,
            mark,
            calendar.format_time(reminder.date),
            reminder.title,
            reminder.id
        );
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    let calendar = Calendar::local();
    let state = AppState::open(&settings, calendar.clone())?;
    set_listener(&state, Box::new(LoggingListener));

    match cli.command {
        Command::List { date } => {
            focus(&state, &calendar, date)?;
            print_list(&state, &calendar);
        }
        Command::Add { title, at } => {
            let date = match at {
                Some(local) => resolve(&calendar, local)?,
                None => calendar.now(),
            };
            create_reminder(&state, &title, date).context("could not create reminder")?;
            focus(&state, &calendar, Some(calendar.day_of(date)))?;
            print_list(&state, &calendar);
        }
        Command::Toggle { index, date } => {
            focus(&state, &calendar, date)?;
            toggle_reminder(&state, index).context("could not toggle reminder")?;
            print_list(&state, &calendar);
        }
        Command::Delete { id } => {
            delete_reminder(&state, &id);
            print_list(&state, &calendar);
        }
        Command::Dates => {
            for item in get_date_strip(&state) {
                let marker = if item.is_today { "*" } else { " " };
                println!("{} {}", marker, item.label);
            }
        }
        Command::Clear => {
            clear_reminders(&state);
            println!("All reminders removed");
        }
    }
    Ok(())
}
