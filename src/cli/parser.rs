use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rMatlog
/// BJJ training log: check-ins, rounds and techniques on SQLite
#[derive(Parser)]
#[command(
    name = "rmatlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A BJJ training log: check in, time rounds, tag techniques and review your mat time using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this member id (overrides `trainee` in the config)
    #[arg(global = true, long = "trainee")]
    pub trainee: Option<i64>,

    /// Act at this gym id (overrides `gym` in the config)
    #[arg(global = true, long = "gym")]
    pub gym: Option<i64>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,

        #[arg(long = "set-trainee", value_name = "ID", help = "Store the default member id")]
        set_trainee: Option<i64>,

        #[arg(long = "set-gym", value_name = "ID", help = "Store the default gym id")]
        set_gym: Option<i64>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the most recent N rows")]
        limit: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite without asking")]
        force: bool,
    },

    /// Export sessions or logged techniques
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter by year/month/day or a custom range (YYYY-MM:YYYY-MM)"
        )]
        range: Option<String>,

        #[arg(long, short = 'e', help = "Export one row per logged technique")]
        events: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Registered members
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Gyms, invite codes and the roster
    Gym {
        #[command(subcommand)]
        action: GymAction,
    },

    /// Class content posted by the gym owner
    Curriculum {
        #[command(subcommand)]
        action: CurriculumAction,
    },

    /// Promotion day: add a stripe or advance the belt (owner only)
    Promote {
        member: i64,

        #[arg(long, conflicts_with = "belt")]
        stripe: bool,

        #[arg(long)]
        belt: bool,
    },

    /// Check in at the gym
    Checkin {
        #[arg(long = "type", help = "gi, nogi or open_mat (default from config)")]
        session_type: Option<String>,
    },

    /// Start, end, edit or delete rounds
    Round {
        #[command(subcommand)]
        action: RoundAction,
    },

    /// Check out, with an optional debrief
    Checkout {
        #[arg(long, help = "Close the session without writing the debrief")]
        skip: bool,

        #[arg(long, help = "Energy rating 1-5")]
        energy: Option<u8>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long = "injury", value_name = "PART:TYPE:SEVERITY")]
        injuries: Vec<String>,

        #[arg(long = "drilled", value_name = "CATEGORY:NAME")]
        drilled: Vec<String>,
    },

    /// Show the current session and round
    Status,

    /// Interactive mode: check in, run rounds and tag techniques live
    Live {
        #[arg(long = "type", help = "Check in with this session type if needed")]
        session_type: Option<String>,
    },

    /// Log a session that already happened
    Past {
        /// Date of the session (YYYY-MM-DD)
        date: String,

        #[arg(long, help = "Start time (HH:MM)")]
        start: String,

        #[arg(long, help = "End time (HH:MM)")]
        end: String,

        #[arg(long = "type")]
        session_type: Option<String>,

        #[arg(long)]
        energy: Option<u8>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long = "injury", value_name = "PART:TYPE:SEVERITY")]
        injuries: Vec<String>,

        #[arg(long = "drilled", value_name = "CATEGORY:NAME")]
        drilled: Vec<String>,

        #[arg(long = "import-curriculum", help = "Copy that day's curriculum into the drilled log")]
        import_curriculum: bool,
    },

    /// Add a finished round to a past session
    PastRound {
        session: i64,

        #[arg(long, help = "Start time (HH:MM)")]
        start: String,

        #[arg(long, help = "End time (HH:MM)")]
        end: String,

        #[arg(long = "event", value_name = "DIR:CATEGORY:TECHNIQUE[@POSITION]")]
        events: Vec<String>,

        #[arg(long, value_name = "member:ID|contact:ID|guest:NAME[:BELT]|solo")]
        opponent: Option<String>,

        #[arg(long, help = "win, draw or loss")]
        result: Option<String>,
    },

    /// List, show, edit or delete sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Injury log and the daily injury check
    Injury {
        #[command(subcommand)]
        action: InjuryAction,
    },

    /// Body weight log
    Weight {
        #[command(subcommand)]
        action: WeightAction,
    },

    /// Totals, histograms and technique counts
    Dashboard {
        #[arg(long, short)]
        period: Option<String>,
    },

    /// Win/draw/loss record per training partner
    Opponents {
        #[arg(long, short)]
        period: Option<String>,
    },

    /// Position-to-position transitions of logged techniques
    Flow {
        #[arg(long, short)]
        period: Option<String>,
    },

    /// This month's most active members at the gym
    Leaderboard,
}

#[derive(Subcommand)]
pub enum MemberAction {
    Add {
        name: String,

        #[arg(long, default_value = "white")]
        belt: String,

        #[arg(long, default_value_t = 0)]
        stripes: i64,
    },
    List,
}

#[derive(Subcommand)]
pub enum GymAction {
    /// Create a gym; you become its owner
    Create {
        name: String,

        #[arg(long, help = "Invite code (generated if omitted)")]
        code: Option<String>,
    },
    /// Join a gym with its invite code
    Join { code: String },
    /// Gyms you belong to
    List,
    /// Members and offline contacts of the current gym
    Roster,
    /// Add an offline contact (owner only)
    Contact {
        name: String,

        #[arg(long)]
        belt: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CurriculumAction {
    Post {
        #[arg(long, help = "Date of the class (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long)]
        title: String,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long = "technique", value_name = "CATEGORY:NAME")]
        techniques: Vec<String>,
    },
    List,
}

#[derive(Subcommand)]
pub enum RoundAction {
    /// Start a round in the open session
    Start,
    /// End the running round
    End {
        #[arg(long = "event", value_name = "DIR:CATEGORY:TECHNIQUE[@POSITION]")]
        events: Vec<String>,

        #[arg(long, value_name = "member:ID|contact:ID|guest:NAME[:BELT]|solo")]
        opponent: Option<String>,

        #[arg(long, help = "win, draw or loss")]
        result: Option<String>,

        #[arg(long, help = "Write no events for this round")]
        skip: bool,
    },
    /// Change a finished round
    Edit {
        id: i64,

        #[arg(
            long = "event",
            value_name = "DIR:CATEGORY:TECHNIQUE[@POSITION]",
            help = "Replaces the whole event set"
        )]
        events: Vec<String>,

        #[arg(long = "clear-events", conflicts_with = "events")]
        clear_events: bool,

        #[arg(long)]
        opponent: Option<String>,

        #[arg(long)]
        result: Option<String>,
    },
    /// Delete a round; the others are renumbered
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum SessionAction {
    List {
        #[arg(long, short)]
        period: Option<String>,
    },
    Show {
        id: i64,
    },
    Edit {
        id: i64,

        #[arg(long = "type")]
        session_type: Option<String>,

        #[arg(long)]
        energy: Option<u8>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long, help = "Start time (HH:MM)")]
        start: Option<String>,

        #[arg(long, help = "End time (HH:MM)")]
        end: Option<String>,
    },
    Del {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum InjuryAction {
    List {
        #[arg(long, help = "Include resolved injuries")]
        all: bool,
    },
    /// Report an injury outside of a check-out
    Add {
        #[arg(value_name = "PART:TYPE:SEVERITY")]
        spec: String,
    },
    Resolve {
        id: i64,
    },
    /// Review active injuries (at most once a day unless --force)
    Check {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum WeightAction {
    Add {
        kg: f64,

        #[arg(long, help = "Date (YYYY-MM-DD), default today")]
        date: Option<String>,
    },
    List,
}
