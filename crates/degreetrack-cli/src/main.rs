//! degreetrack CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use degreetrack_core::model::RecordStatus;
use degreetrack_core::semester::Term;

mod commands;

use commands::DataArgs;

#[derive(Parser)]
#[command(
    name = "degreetrack",
    version,
    about = "Degree requirement tracking and planning"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a plan (or a directory of plans) against the degree requirements
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        /// Report files to write: text, json, markdown, html, all (comma-separated)
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory for report files
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check rules, catalog, and plans for inconsistencies
    Validate {
        #[command(flatten)]
        data: DataArgs,
    },

    /// List catalog courses
    Catalog {
        #[command(flatten)]
        data: DataArgs,

        /// Case-insensitive match on title or code
        #[arg(long)]
        search: Option<String>,

        /// Only courses of this requirement group
        #[arg(long)]
        group: Option<String>,
    },

    /// Show the plan laid out by semester
    Semesters {
        #[command(flatten)]
        data: DataArgs,

        /// Number of semesters to show
        #[arg(long)]
        count: Option<usize>,
    },

    /// Add a catalog course to the plan
    Add {
        #[command(flatten)]
        data: DataArgs,

        /// Catalog course id
        #[arg(long)]
        course: String,

        /// Term (WS or SS), defaults to the profile's start term
        #[arg(long)]
        term: Option<Term>,

        /// Year, defaults to the profile's start year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Change the status of a plan record
    Status {
        #[command(flatten)]
        data: DataArgs,

        /// Record id
        #[arg(long)]
        record: String,

        /// planned, in_progress, passed, or failed
        status: RecordStatus,
    },

    /// Move a plan record to another semester
    Move {
        #[command(flatten)]
        data: DataArgs,

        /// Record id
        #[arg(long)]
        record: String,

        /// Term (WS or SS)
        #[arg(long)]
        term: Term,

        #[arg(long)]
        year: i32,
    },

    /// Remove a record from the plan
    Remove {
        #[command(flatten)]
        data: DataArgs,

        /// Record id
        #[arg(long)]
        record: String,
    },

    /// Override the credits of a record (omit the value to clear)
    Credits {
        #[command(flatten)]
        data: DataArgs,

        /// Record id
        #[arg(long)]
        record: String,

        value: Option<u32>,
    },

    /// Render a saved JSON report as HTML or markdown
    Render {
        /// Report JSON produced by `evaluate --format json`
        #[arg(long)]
        report: PathBuf,

        /// Output format: html, markdown
        #[arg(long, default_value = "html")]
        format: String,

        /// Output file (defaults to the report path with a new extension)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a starter config, catalog, and plan
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("degreetrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            data,
            format,
            output,
        } => commands::evaluate::execute(data, format, output).await,
        Commands::Validate { data } => commands::validate::execute(data),
        Commands::Catalog {
            data,
            search,
            group,
        } => commands::catalog::execute(data, search, group),
        Commands::Semesters { data, count } => commands::semesters::execute(data, count),
        Commands::Add {
            data,
            course,
            term,
            year,
        } => commands::records::add(data, course, term, year).await,
        Commands::Status {
            data,
            record,
            status,
        } => commands::records::set_status(data, record, status).await,
        Commands::Move {
            data,
            record,
            term,
            year,
        } => commands::records::move_record(data, record, term, year).await,
        Commands::Remove { data, record } => commands::records::remove(data, record).await,
        Commands::Credits {
            data,
            record,
            value,
        } => commands::records::set_credits(data, record, value).await,
        Commands::Render {
            report,
            format,
            output,
        } => commands::render::execute(report, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
