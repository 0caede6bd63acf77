use crate::cli::{ConvertArgs, DateArgs};
use crate::config::Settings;
use crate::model::{Task, TaskBook};
use crate::storage::Store;
use crate::timer::{Countdown, Cycle, Phase};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use patro::calendar::{bs_month_length, bs_month_name, WEEKDAY_ABBREVIATIONS};
use patro::{
    ad_date_key, bs_date_key, AdDate, Anchor, BsDate, CalendarSystem, CellOffset, DateKey,
    GridCell, MonthMatrix,
};
use rand::{distributions::Alphanumeric, Rng};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Loaded store and settings shared by every command.
pub struct Session {
    pub store: Store,
    pub settings: Settings,
}

impl Session {
    /// Opens the store and reads settings as they are on disk. Commands
    /// other than `settings` must call [`Session::ensure_valid`] first.
    pub fn open() -> Result<Self> {
        let store = Store::locate()?;
        let settings = store.read_settings()?;
        Ok(Session { store, settings })
    }

    pub fn ensure_valid(&self) -> Result<()> {
        self.store.check_settings(&self.settings)
    }

    fn anchor(&self) -> Anchor {
        self.settings.anchor()
    }

    fn today_bs(&self) -> Result<BsDate> {
        let today = Local::now().date_naive();
        Ok(self
            .anchor()
            .ad_to_bs(today.year(), today.month0() as i32, today.day() as i32)?)
    }

    /// Resolves `--date`/`--ad` to a key, defaulting to today.
    fn date_key(&self, args: &DateArgs) -> Result<DateKey> {
        if args.ad {
            let (year, month0, day) = match args.date.as_deref() {
                Some(raw) => parse_ad(raw)?,
                None => {
                    let today = Local::now().date_naive();
                    (today.year(), today.month0() as i32, today.day() as i32)
                }
            };
            return Ok(ad_date_key(year, month0, day));
        }
        let bs = match args.date.as_deref() {
            Some(raw) => parse_bs(raw)?,
            None => self.today_bs()?,
        };
        Ok(bs_date_key(bs.year, bs.month, bs.day))
    }
}

pub fn cal(session: &Session, year: Option<i32>, month: Option<i32>, ad: bool) -> Result<()> {
    let tasks = session.store.load_tasks()?;
    let anchor = session.anchor();
    if ad {
        let today = Local::now().date_naive();
        let year = year.unwrap_or(today.year());
        let month0 = month.map_or(today.month0() as i32, |m| m - 1);
        let matrix = patro::build_ad_month_matrix(year, month0)?;
        let today_key = ad_date_key(today.year(), today.month0() as i32, today.day() as i32);
        let title = u32::try_from(month0 + 1)
            .ok()
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
            .map(|d| d.format("%B %Y (AD)").to_string())
            .unwrap_or_else(|| format!("{year}-{:02} (AD)", month0 + 1));
        print_matrix(&title, &matrix, &tasks, &today_key, |day| {
            ad_date_key(year, month0, day)
        });
    } else {
        let today = session.today_bs()?;
        let year = year.unwrap_or(today.year);
        let month0 = month.map_or(today.month, |m| m - 1);
        let matrix = anchor.bs_month_matrix(year, month0)?;
        let today_key = bs_date_key(today.year, today.month, today.day);
        let title = format!(
            "{} {year} (BS)",
            bs_month_name(month0).unwrap_or("Unknown")
        );
        print_matrix(&title, &matrix, &tasks, &today_key, |day| {
            bs_date_key(year, month0, day)
        });
    }
    Ok(())
}

pub fn convert(session: &Session, args: ConvertArgs) -> Result<()> {
    let anchor = session.anchor();
    if let Some(raw) = args.to_bs {
        let (year, month0, day) = parse_ad(&raw)?;
        let bs = anchor.ad_to_bs(year, month0, day)?;
        println!("{}", format_bs(&bs));
    } else if let Some(raw) = args.to_ad {
        let bs = parse_bs(&raw)?;
        let ad = anchor.bs_to_ad(bs.year, bs.month, bs.day)?;
        let date = ad.to_naive()?;
        println!("{} ({})", date.format("%Y-%m-%d"), date.format("%A"));
        println!("note: BS to AD is approximate away from the calendar anchor");
    }
    Ok(())
}

pub fn today(session: &Session) -> Result<()> {
    let today = Local::now().date_naive();
    let bs = session.today_bs()?;
    println!("AD: {} ({})", today.format("%Y-%m-%d"), today.format("%A"));
    println!("BS: {}", format_bs(&bs));
    Ok(())
}

pub fn task_add(session: &Session, title: String, date: DateArgs) -> Result<()> {
    let key = session.date_key(&date)?;
    let mut book = session.store.load_tasks()?;
    let id = generate_id();
    book.add_task(key.clone(), Task::new(id.clone(), title))
        .with_context(|| format!("adding task to {key}"))?;
    session.store.save_tasks(&book)?;
    info!(task = %id, date = %key, "task added");
    println!("Added task {} to {}", id, key);
    Ok(())
}

pub fn task_list(session: &Session, date: DateArgs, all: bool) -> Result<()> {
    let book = session.store.load_tasks()?;
    if all {
        if book.tasks.is_empty() {
            println!("(no tasks)");
        }
        for key in book.dates() {
            print_tasks(&book, key);
            println!();
        }
        return Ok(());
    }
    let key = session.date_key(&date)?;
    print_tasks(&book, &key);
    Ok(())
}

pub fn task_done(session: &Session, task_id: String, date: DateArgs) -> Result<()> {
    let key = session.date_key(&date)?;
    let mut book = session.store.load_tasks()?;
    let done = book.toggle(&key, &task_id)?;
    session.store.save_tasks(&book)?;
    debug!(task = %task_id, date = %key, done, "task toggled");
    println!(
        "Task {} marked {}",
        task_id,
        if done { "done" } else { "not done" }
    );
    Ok(())
}

pub fn task_rm(session: &Session, task_id: String, date: DateArgs) -> Result<()> {
    let key = session.date_key(&date)?;
    let mut book = session.store.load_tasks()?;
    let removed = book.remove(&key, &task_id)?;
    session.store.save_tasks(&book)?;
    info!(task = %task_id, date = %key, "task removed");
    println!("Removed task {}: {}", removed.id, removed.title);
    Ok(())
}

pub fn timer(session: &Session, sessions: u32) -> Result<()> {
    if sessions == 0 {
        bail!("--sessions must be at least 1");
    }
    let settings = &session.settings;
    let mut cycle = Cycle::new(settings.sessions_before_long_break);
    let mut stdout = io::stdout();
    loop {
        let phase = cycle.phase();
        run_phase(&mut stdout, phase, phase.duration(settings))?;
        if phase == Phase::Focus && cycle.completed_focus() + 1 >= sessions {
            info!(sessions, "timer finished");
            println!("All {} focus session(s) complete.", sessions);
            return Ok(());
        }
        let next = cycle.advance();
        debug!(from = phase.label(), to = next.label(), "phase finished");
    }
}

pub fn settings_show(session: &Session) -> Result<()> {
    let serialized = serde_yaml::to_string(&session.settings).context("serializing settings")?;
    println!("# {}", session.store.root().display());
    print!("{}", serialized);
    Ok(())
}

pub fn settings_set(
    session: &Session,
    focus: Option<u32>,
    short_break: Option<u32>,
    long_break: Option<u32>,
    long_break_every: Option<u32>,
    level: Option<String>,
) -> Result<()> {
    let mut settings = session.settings.clone();
    if let Some(v) = focus {
        settings.focus_minutes = v;
    }
    if let Some(v) = short_break {
        settings.short_break_minutes = v;
    }
    if let Some(v) = long_break {
        settings.long_break_minutes = v;
    }
    if let Some(v) = long_break_every {
        settings.sessions_before_long_break = v;
    }
    if let Some(v) = level {
        settings.log_level = v;
    }
    settings.validate()?;
    session.store.save_settings(&settings)?;
    info!("settings updated");
    println!("Settings saved");
    Ok(())
}

fn run_phase(out: &mut impl Write, phase: Phase, total: Duration) -> Result<()> {
    let step = Duration::from_secs(1);
    let mut countdown = Countdown::new(total);
    loop {
        write!(out, "\r{:<12} {}", phase.label(), countdown.clock())?;
        out.flush()?;
        if countdown.is_finished() {
            break;
        }
        thread::sleep(step);
        countdown.tick(step);
    }
    writeln!(out)?;
    Ok(())
}

fn print_matrix(
    title: &str,
    matrix: &MonthMatrix,
    tasks: &TaskBook,
    today: &DateKey,
    key_for: impl Fn(i32) -> DateKey,
) {
    println!("{title}");
    let header: Vec<String> = WEEKDAY_ABBREVIATIONS
        .iter()
        .map(|h| format!("{:^5}", h))
        .collect();
    println!("{}", header.join(""));
    for row in matrix.rows() {
        let line: String = row
            .iter()
            .map(|cell| {
                if cell.in_month() {
                    let key = key_for(cell.day as i32);
                    format_cell(cell, &key == today, tasks.has_tasks(&key))
                } else {
                    format_cell(cell, false, false)
                }
            })
            .collect();
        println!("{}", line.trim_end());
    }
    println!("[dd] today   * has tasks   (dd) other month");
}

fn format_cell(cell: &GridCell, today: bool, has_tasks: bool) -> String {
    let (open, close) = match cell.offset {
        CellOffset::Current if today => ('[', ']'),
        CellOffset::Current => (' ', ' '),
        CellOffset::Previous | CellOffset::Next => ('(', ')'),
    };
    let mark = if has_tasks { '*' } else { ' ' };
    format!("{open}{:>2}{close}{mark}", cell.day)
}

fn print_tasks(book: &TaskBook, key: &DateKey) {
    println!("{} ({})", key, system_label(key));
    let tasks = book.tasks_on(key);
    if tasks.is_empty() {
        println!("  (empty)");
    }
    for task in tasks {
        println!(
            "  [{}] {}: {}",
            if task.done { 'x' } else { ' ' },
            task.id,
            task.title
        );
    }
}

fn system_label(key: &DateKey) -> &'static str {
    match key.system() {
        CalendarSystem::Bs => "BS",
        CalendarSystem::Ad => "AD",
    }
}

fn format_bs(bs: &BsDate) -> String {
    format!(
        "{} {} {} ({:04}-{:02}-{:02})",
        bs.day,
        bs_month_name(bs.month).unwrap_or("?"),
        bs.year,
        bs.year,
        bs.month + 1,
        bs.day
    )
}

/// Parses `YYYY-MM-DD` with a 1-based month into `(year, month0, day)`.
fn parse_ymd(raw: &str) -> Result<(i32, i32, i32)> {
    let invalid = || anyhow!("invalid date format (use YYYY-MM-DD): {}", raw);
    let mut parts = raw.trim().splitn(3, '-');
    let mut next = || -> Result<i32> {
        parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(invalid)
    };
    let (year, month, day) = (next()?, next()?, next()?);
    if !(1..=12).contains(&month) || !(1..=32).contains(&day) {
        return Err(invalid());
    }
    Ok((year, month - 1, day))
}

/// A Gregorian `YYYY-MM-DD` that names a real civil date.
fn parse_ad(raw: &str) -> Result<(i32, i32, i32)> {
    let (year, month0, day) = parse_ymd(raw)?;
    AdDate::new(year, month0 as u32, day as u32)
        .to_naive()
        .with_context(|| format!("{} is not a Gregorian date", raw.trim()))?;
    Ok((year, month0, day))
}

/// A BS `YYYY-MM-DD` whose day fits the month-length table.
fn parse_bs(raw: &str) -> Result<BsDate> {
    let (year, month0, day) = parse_ymd(raw)?;
    let length = bs_month_length(month0).days();
    if day as u32 > length {
        bail!(
            "{} has {} days, got day {}",
            bs_month_name(month0).unwrap_or("month"),
            length,
            day
        );
    }
    Ok(BsDate::new(year, month0, day))
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ymd_returns_zero_based_month() {
        assert_eq!(parse_ymd("2082-04-26").unwrap(), (2082, 3, 26));
        assert_eq!(parse_ymd(" 2025-8-1 ").unwrap(), (2025, 7, 1));
    }

    #[test]
    fn parse_ymd_rejects_malformed_input() {
        assert!(parse_ymd("2082/04/26").is_err());
        assert!(parse_ymd("2082-13-01").is_err());
        assert!(parse_ymd("2082-04-33").is_err());
        assert!(parse_ymd("2082-04").is_err());
        assert!(parse_ymd("").is_err());
    }

    fn session_in(dir: &std::path::Path) -> Session {
        let store = Store::at(dir);
        let settings = store.read_settings().unwrap();
        Session { store, settings }
    }

    fn date_args(date: &str, ad: bool) -> DateArgs {
        DateArgs {
            date: Some(date.to_string()),
            ad,
        }
    }

    #[test]
    fn gregorian_input_must_be_a_real_date() {
        assert_eq!(parse_ad("2024-02-29").unwrap(), (2024, 1, 29));
        let err = parse_ad("2025-02-31").unwrap_err();
        assert!(err.to_string().contains("2025-02-31"));
        assert!(parse_ad("2025-04-31").is_err());
    }

    #[test]
    fn bs_input_must_fit_the_month_table() {
        assert_eq!(parse_bs("2082-04-32").unwrap(), BsDate::new(2082, 3, 32));
        assert_eq!(parse_bs("2082-08-29").unwrap(), BsDate::new(2082, 7, 29));
        // Mangsir has 29 days.
        let err = parse_bs("2082-08-32").unwrap_err();
        assert!(err.to_string().contains("Mangsir has 29 days"));
        assert!(parse_bs("2082-08-30").is_err());
    }

    #[test]
    fn date_keys_are_only_built_for_dates_a_grid_can_show() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        assert!(session.date_key(&date_args("2025-02-31", true)).is_err());
        assert!(session.date_key(&date_args("2082-08-32", false)).is_err());

        let key = session.date_key(&date_args("2082-08-29", false)).unwrap();
        let matrix = session.anchor().bs_month_matrix(2082, 7).unwrap();
        let reachable = matrix
            .cells()
            .filter(|cell| cell.in_month())
            .any(|cell| bs_date_key(2082, 7, cell.day as i32) == key);
        assert!(reachable);
    }

    #[test]
    fn convert_rejects_impossible_gregorian_dates() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let args = ConvertArgs {
            to_bs: Some("2025-02-31".into()),
            to_ad: None,
        };
        assert!(convert(&session, args).is_err());
    }

    #[test]
    fn broken_settings_can_be_repaired_with_settings_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        std::fs::write(
            store.slot_path(crate::storage::SETTINGS_SLOT),
            "log_level: loud\n",
        )
        .unwrap();

        let session = session_in(dir.path());
        assert!(session.ensure_valid().is_err());

        settings_set(&session, None, None, None, None, Some("warn".into())).unwrap();

        let repaired = session_in(dir.path());
        assert!(repaired.ensure_valid().is_ok());
        assert_eq!(repaired.settings.log_level, "warn");
    }

    #[test]
    fn settings_set_still_rejects_invalid_results() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        assert!(settings_set(&session, Some(0), None, None, None, None).is_err());
        assert!(!session
            .store
            .slot_path(crate::storage::SETTINGS_SLOT)
            .exists());
    }

    #[test]
    fn task_dates_are_labelled_by_calendar() {
        assert_eq!(system_label(&bs_date_key(2082, 3, 26)), "BS");
        assert_eq!(system_label(&ad_date_key(2082, 3, 26)), "AD");
    }

    #[test]
    fn cells_mark_today_tasks_and_borrowed_days() {
        let current = GridCell {
            day: 26,
            offset: CellOffset::Current,
        };
        let borrowed = GridCell {
            day: 3,
            offset: CellOffset::Next,
        };
        assert_eq!(format_cell(&current, true, true), "[26]*");
        assert_eq!(format_cell(&current, false, false), " 26  ");
        assert_eq!(format_cell(&borrowed, false, false), "( 3) ");
    }

    #[test]
    fn bs_dates_print_with_month_names() {
        assert_eq!(
            format_bs(&BsDate::new(2082, 3, 26)),
            "26 Shrawan 2082 (2082-04-26)"
        );
    }

    #[test]
    fn generated_ids_are_six_alphanumerics() {
        let id = generate_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
