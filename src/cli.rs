use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "patro",
    version,
    about = "Bikram Sambat calendar, daily tasks and Pomodoro timer"
)]
pub struct Cli {
    /// Log level override (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a month grid (BS by default)
    Cal {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=12))]
        month: Option<i32>,
        /// Show the Gregorian month instead
        #[arg(long)]
        ad: bool,
    },
    /// Convert a date between calendars
    Convert(ConvertArgs),
    /// Print today's date in both calendars
    Today,
    /// Manage tasks attached to a date
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Run Pomodoro focus sessions
    Timer {
        /// Number of focus sessions to run
        #[arg(long, default_value_t = 1)]
        sessions: u32,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommand>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ConvertArgs {
    /// Gregorian date (YYYY-MM-DD) to convert to BS
    #[arg(long)]
    pub to_bs: Option<String>,
    /// BS date (YYYY-MM-DD) to convert to Gregorian (approximate)
    #[arg(long)]
    pub to_ad: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DateArgs {
    /// Date in YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    /// Interpret and key the date as Gregorian instead of BS
    #[arg(long)]
    pub ad: bool,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task to a date
    Add {
        /// Task title
        title: String,
        #[command(flatten)]
        date: DateArgs,
    },
    /// List tasks for a date, or every date with --all
    List {
        #[command(flatten)]
        date: DateArgs,
        /// List tasks on every date
        #[arg(long, conflicts_with = "date")]
        all: bool,
    },
    /// Toggle a task's done state
    Done {
        /// Task id
        task_id: String,
        #[command(flatten)]
        date: DateArgs,
    },
    /// Remove a task
    Rm {
        /// Task id
        task_id: String,
        #[command(flatten)]
        date: DateArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set {
        /// Focus session length in minutes
        #[arg(long)]
        focus: Option<u32>,
        /// Short break length in minutes
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<u32>,
        /// Focus sessions before a long break
        #[arg(long)]
        long_break_every: Option<u32>,
        /// Default log level
        #[arg(long = "level")]
        level: Option<String>,
    },
}
