//! CLI entry point for the NYC School Explorer.
//!
//! Loads the school demographics snapshot once and answers one dashboard
//! question per subcommand: the borough overview, the enrollment trend
//! comparison, the school details page and the cascading filter options.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use school_explorer::analyzers::borough::dashboard_report;
use school_explorer::analyzers::filter::resolve;
use school_explorer::analyzers::school::school_summary;
use school_explorer::analyzers::trend::{enrollment_trend, school_names};
use school_explorer::analyzers::types::DemographicMode;
use school_explorer::config::ExplorerConfig;
use school_explorer::model::Borough;
use school_explorer::output::{print_json, print_pretty, write_csv, write_json_file};
use school_explorer::table::SharedTable;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "school_explorer")]
#[command(about = "Explore NYC public school demographics, 2006-2012", long_about = None)]
struct Cli {
    /// Path to the demographics CSV (plain or .gz); overrides SCHOOL_DATA_PATH
    #[arg(short, long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Borough enrollment, gender, lunch and race totals plus district map totals
    Overview {
        /// Write the report to this JSON file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare enrollment trends of one or more schools
    Trend {
        /// School name to include (repeatable)
        #[arg(short, long = "school", value_name = "NAME")]
        schools: Vec<String>,

        /// Also write the trend rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// List the selectable school names instead
        #[arg(long, default_value_t = false)]
        list: bool,
    },
    /// Details for one school, chosen through the borough/district/school filter
    School {
        #[arg(short, long)]
        borough: Option<Borough>,

        #[arg(short = 'D', long)]
        district: Option<u32>,

        #[arg(short, long, value_name = "NAME")]
        school: Option<String>,

        /// Demographic breakdown to show
        #[arg(short, long, value_enum, default_value_t = Demographics::Race)]
        mode: Demographics,
    },
    /// Show the cascading filter options for a partial selection
    Filters {
        #[arg(short, long)]
        borough: Option<Borough>,

        #[arg(short = 'D', long)]
        district: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Demographics {
    Race,
    Gender,
}

impl From<Demographics> for DemographicMode {
    fn from(choice: Demographics) -> Self {
        match choice {
            Demographics::Race => DemographicMode::Race,
            Demographics::Gender => DemographicMode::Gender,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = ExplorerConfig::from_env().with_dataset(cli.data.clone());

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("school_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!(dataset = %config.dataset_path.display(), "Loading dataset");
    let table = SharedTable::default();
    if let Err(e) = table.reload(&config.dataset_path) {
        error!(error = %e, "Failed to load dataset");
        return Err(e.into());
    }

    run(cli.command, &table)
}

fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

fn run(command: Commands, shared: &SharedTable) -> Result<()> {
    let table = shared.snapshot();

    match command {
        Commands::Overview { output } => {
            let report = dashboard_report(&table);
            match output {
                Some(path) => write_json_file(&path, &report)?,
                None => print_json(&report)?,
            }
        }
        Commands::Trend { schools, csv, list } => {
            if list {
                print_json(&school_names(&table))?;
                return Ok(());
            }

            if schools.is_empty() {
                println!("Select one or more schools with --school to compare enrollment trends.");
                return Ok(());
            }

            let points = enrollment_trend(&table, schools.as_slice());
            if points.is_empty() {
                warn!(?schools, "None of the selected schools are in the dataset");
            }
            if let Some(path) = csv {
                write_csv(&path, &points)?;
            }
            print_json(&points)?;
        }
        Commands::School {
            borough,
            district,
            school,
            mode,
        } => {
            let selection = resolve(&table, borough, district, school.as_deref());
            print_pretty(&selection);

            let Some(name) = selection.school.as_deref() else {
                println!("No school matches the selected borough and district.");
                return Ok(());
            };

            if school.as_deref().is_some_and(|requested| requested != name) {
                warn!(requested = ?school, selected = name, "Requested school not in selection, using first option");
            }

            match school_summary(&table, name, mode.into()) {
                Some(summary) => {
                    info!(
                        school = %summary.name,
                        total_enrollment = summary.total_enrollment,
                        enrollment_difference = summary.enrollment_difference,
                        offering = %summary.offering(),
                        "School details"
                    );
                    print_json(&summary)?;
                }
                None => println!("No records found for {name}."),
            }
        }
        Commands::Filters { borough, district } => {
            let state = resolve(&table, borough, district, None);
            print_json(&state)?;
        }
    }

    Ok(())
}
