//! Grade watcher CLI
//!
//! Local entry point for checking credentials, seeding snapshots and polling
//! a list of students.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use grades::{
    error::{AppError, Result},
    models::{Config, Credentials, Student},
    pipeline,
    services::GradeService,
};

/// grades - RITM grade change watcher
#[derive(Parser, Debug)]
#[command(name = "grades", version, about = "RITM grade change watcher")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Login {
    /// Portal login
    #[arg(short, long)]
    login: String,

    /// Portal password
    #[arg(short, long, env = "RITM_PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<Login> for Credentials {
    fn from(login: Login) -> Self {
        Credentials::new(login.login, login.password)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether credentials log in
    Check {
        #[command(flatten)]
        login: Login,
    },

    /// Fetch every published semester as a JSON snapshot
    Fetch {
        #[command(flatten)]
        login: Login,

        /// Write the snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a list of students for grade changes
    Poll {
        /// JSON file with students and their last snapshots; updated in place
        #[arg(short, long, default_value = "storage/students.json")]
        students: PathBuf,

        /// Print changes without updating the students file
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn load_students(path: &Path) -> Result<Vec<Student>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

async fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    let config = Arc::new(config);
    let service = GradeService::new(Arc::clone(&config));

    match cli.command {
        Command::Check { login } => {
            let credentials = Credentials::from(login);
            if service.check_password(&credentials).await {
                log::info!("✓ {} logged in", credentials.login);
            } else {
                log::error!("Login failed for {}", credentials.login);
                return Err(AppError::validation("credentials rejected"));
            }
        }

        Command::Fetch { login, output } => {
            let credentials = Credentials::from(login);
            let semesters = service.fetch_all_semesters(&credentials).await;
            log::info!(
                "Fetched {} semesters for {}",
                semesters.len(),
                credentials.login
            );

            match output {
                Some(path) => {
                    save_json(&path, &semesters).await?;
                    log::info!("Snapshot saved to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&semesters)?),
            }
        }

        Command::Poll { students, dry_run } => {
            if !students.exists() {
                log::error!("Students file not found at {}", students.display());
                return Err(AppError::config("Students file not found"));
            }

            let mut roster = load_students(&students).await?;
            let outcome = pipeline::run_poll(&service, &roster).await;

            for change in outcome.changes() {
                println!("{}", change.format(&config.notify.template));
            }

            if dry_run {
                log::info!("Dry run, {} left unchanged", students.display());
                return Ok(());
            }

            for poll in outcome.polls {
                let Ok(update) = poll.result else { continue };
                if let Some(student) = roster.iter_mut().find(|s| s.login() == poll.login) {
                    student.semesters = update.semesters;
                }
            }
            save_json(&students, &roster).await?;
            log::info!("Snapshots saved to {}", students.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("    Portal: {}", config.portal.base_url);
            log::info!("    Max semesters: {}", config.portal.max_semesters);
            log::info!("    Max concurrent: {}", config.poll.max_concurrent);
        }
    }

    Ok(())
}
