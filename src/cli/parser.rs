use crate::export::{ExportFormat, ExportKind};
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for fieldclock
#[derive(Parser, Debug)]
#[command(
    name = "fieldclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Field-worker attendance and activity tracking: geolocated check-in/check-out, activities and daily hours on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the clock to a local time instead of the system clock
    #[arg(global = true, long = "now", hide = true, value_name = "YYYY-MM-DD HH:MM")]
    pub now: Option<String>,

    /// Print results as JSON
    #[arg(global = true, long = "json")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Position reported with an attendance event or an activity.
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Reported accuracy of the fix, in meters
    #[arg(long = "accuracy", value_name = "METERS", requires = "lat")]
    pub accuracy: Option<f64>,

    /// Human-readable address (skips reverse geocoding)
    #[arg(long, requires = "lat")]
    pub address: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, $VISUAL, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start the working day (a location is required)
    CheckIn {
        #[arg(long, short = 'w')]
        worker: String,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// End the working day
    CheckOut {
        #[arg(long, short = 'w', required_unless_present = "session")]
        worker: Option<String>,

        #[arg(long, help = "Session id (defaults to the worker's session of today)")]
        session: Option<i64>,

        #[arg(long = "confirm-early", help = "Confirm a checkout before the scheduled end")]
        confirm_early: bool,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Resume a session of today after checking out
    ReCheckIn {
        #[arg(long, short = 'w', required_unless_present = "session")]
        worker: Option<String>,

        #[arg(long)]
        session: Option<i64>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Close every session of a day still checked in
    AutoCheckout {
        #[arg(long, help = "Day to close (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, help = "Checkout time (HH:MM, default from configuration)")]
        cutoff: Option<String>,
    },

    /// Start, end and list activities
    Activity {
        #[command(subcommand)]
        action: ActivityCommands,
    },

    /// Today's hours, activity counts and idle gaps
    Summary {
        #[arg(long, short = 'w')]
        worker: String,

        #[arg(long, help = "Day to summarize (YYYY-MM-DD, default today)")]
        date: Option<String>,
    },

    /// List attendance sessions
    Sessions {
        #[arg(long, short = 'w')]
        worker: Option<String>,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a START:END range (default current month)"
        )]
        period: Option<String>,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Export sessions or activities
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_enum, default_value = "sessions")]
        kind: ExportKind,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'w')]
        worker: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// Start an activity (requires being checked in today)
    Start {
        #[arg(long, short = 'w')]
        worker: String,

        #[arg(
            long = "type",
            value_name = "TYPE",
            help = "ticket-work, travel, meeting, training, work-from-home or other"
        )]
        activity_type: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "ticket", value_name = "TICKET_ID")]
        ticket: Option<String>,

        #[arg(long = "at", help = "Start time (HH:MM or YYYY-MM-DD HH:MM, default now)")]
        start: Option<String>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// End an ongoing activity
    End {
        #[arg(long, help = "Activity id (defaults to the worker's ongoing activity)")]
        id: Option<i64>,

        #[arg(long, short = 'w', required_unless_present = "id")]
        worker: Option<String>,

        #[arg(long = "at", help = "End time (HH:MM or YYYY-MM-DD HH:MM, default now)")]
        end: Option<String>,
    },

    /// List activities of a period
    List {
        #[arg(long, short = 'w')]
        worker: String,

        #[arg(long, short, help = "YYYY, YYYY-MM, YYYY-MM-DD or START:END (default today)")]
        period: Option<String>,
    },

    /// Show the ongoing activity
    Current {
        #[arg(long, short = 'w')]
        worker: String,
    },
}
