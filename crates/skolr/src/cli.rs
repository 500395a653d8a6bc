//! Clap derive structures for the `skolr` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// skolr -- administration CLI for the skolr school management server
#[derive(Debug, Parser)]
#[command(
    name = "skolr",
    version,
    about = "Manage students, teachers, classes, subjects, and grades",
    long_about = "Administration client for a skolr school management server.\n\n\
        Signs in with a username and password, keeps the session across\n\
        invocations, and scopes available operations to your account role.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "SKOLR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server base URL (overrides profile)
    #[arg(long, short = 's', env = "SKOLR_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SKOLR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SKOLR_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SKOLR_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in to the server and store the session
    Login(LoginArgs),

    /// Sign out and discard the stored session
    Logout,

    /// Show the currently signed-in account
    Whoami,

    /// Manage students
    #[command(alias = "st")]
    Students(StudentsArgs),

    /// Manage teachers
    #[command(alias = "te")]
    Teachers(TeachersArgs),

    /// Manage classes
    #[command(alias = "cl")]
    Classes(ClassesArgs),

    /// Manage subjects
    #[command(alias = "su")]
    Subjects(SubjectsArgs),

    /// Manage grades
    #[command(alias = "gr", alias = "g")]
    Grades(GradesArgs),

    /// Show the dashboard for your role
    #[command(alias = "dash")]
    Dashboard,

    /// Class reports and exports
    Reports(ReportsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted for if omitted)
    #[arg(long, short = 'u', env = "SKOLR_USERNAME")]
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STUDENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StudentsArgs {
    #[command(subcommand)]
    pub command: StudentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StudentsCommand {
    /// List students
    #[command(alias = "ls")]
    List,

    /// Show one student
    Get {
        /// Student id
        id: i64,
    },

    /// Create a student
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// School-assigned student number (unique)
        #[arg(long)]
        student_number: String,
        #[arg(long)]
        email: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<chrono::NaiveDate>,
        /// Class to enroll the student in
        #[arg(long)]
        class_id: Option<i64>,
    },

    /// Update a student
    Update {
        /// Student id
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        student_number: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        date_of_birth: Option<chrono::NaiveDate>,
        #[arg(long)]
        class_id: Option<i64>,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete {
        /// Student id
        id: i64,
    },

    /// Import students from a CSV or Excel file
    Import {
        /// Path to the file to upload
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TEACHERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TeachersArgs {
    #[command(subcommand)]
    pub command: TeachersCommand,
}

#[derive(Debug, Subcommand)]
pub enum TeachersCommand {
    /// List teachers
    #[command(alias = "ls")]
    List,

    /// Show one teacher
    Get {
        /// Teacher id
        id: i64,
    },

    /// Create a teacher
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
        /// Subject ids this teacher is qualified for (repeatable)
        #[arg(long = "subject")]
        subject_ids: Vec<i64>,
    },

    /// Update a teacher
    Update {
        /// Teacher id
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Replace the subject list (repeatable)
        #[arg(long = "subject")]
        subject_ids: Vec<i64>,
    },

    /// Delete a teacher
    #[command(alias = "rm")]
    Delete {
        /// Teacher id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLASSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClassesArgs {
    #[command(subcommand)]
    pub command: ClassesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassesCommand {
    /// List classes
    #[command(alias = "ls")]
    List,

    /// Show one class
    Get {
        /// Class id
        id: i64,
    },

    /// List the students enrolled in a class
    Students {
        /// Class id
        id: i64,
    },

    /// Create a class
    Create {
        /// Class name, e.g. "7B"
        #[arg(long)]
        name: String,
        /// School year, e.g. 2025 for 2025/26
        #[arg(long)]
        year: i32,
        /// Homeroom teacher
        #[arg(long)]
        teacher_id: Option<i64>,
    },

    /// Update a class
    Update {
        /// Class id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        teacher_id: Option<i64>,
    },

    /// Delete a class
    #[command(alias = "rm")]
    Delete {
        /// Class id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBJECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubjectsArgs {
    #[command(subcommand)]
    pub command: SubjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubjectsCommand {
    /// List subjects
    #[command(alias = "ls")]
    List,

    /// Show one subject
    Get {
        /// Subject id
        id: i64,
    },

    /// Create a subject
    Create {
        #[arg(long)]
        name: String,
        /// Short code, e.g. "MATH"
        #[arg(long)]
        code: Option<String>,
    },

    /// Update a subject
    Update {
        /// Subject id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },

    /// Delete a subject
    #[command(alias = "rm")]
    Delete {
        /// Subject id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GRADES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GradesArgs {
    #[command(subcommand)]
    pub command: GradesCommand,
}

#[derive(Debug, Subcommand)]
pub enum GradesCommand {
    /// List grades, optionally scoped to a student or class
    #[command(alias = "ls")]
    List {
        /// Only grades for this student
        #[arg(long, conflicts_with = "class")]
        student: Option<i64>,
        /// Only grades for this class
        #[arg(long)]
        class: Option<i64>,
    },

    /// Show one grade
    Get {
        /// Grade id
        id: i64,
    },

    /// Enter a grade
    Create {
        #[arg(long)]
        student_id: i64,
        #[arg(long)]
        subject_id: i64,
        /// Numeric mark on the server's grading scale
        #[arg(long)]
        value: f64,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Correct a grade
    Update {
        /// Grade id
        id: i64,
        #[arg(long)]
        student_id: i64,
        #[arg(long)]
        subject_id: i64,
        #[arg(long)]
        value: f64,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete a grade
    #[command(alias = "rm")]
    Delete {
        /// Grade id
        id: i64,
    },

    /// Import grades from a CSV or Excel file
    Import {
        /// Path to the file to upload
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Pdf,
    Csv,
    Excel,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// Show the aggregated report for a class
    Class {
        /// Class id
        id: i64,
    },

    /// Download a class report as a file
    Export {
        /// Class id
        id: i64,
        /// File format
        #[arg(long, default_value = "pdf")]
        format: ExportFormatArg,
        /// Destination path (defaults to the server-derived filename)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create or update a profile
    Init,

    /// Show the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a password in the system keyring for a profile
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
