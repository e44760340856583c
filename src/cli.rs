use std::path::PathBuf;

mod check;
mod prereqs;
mod terminal;
mod trace;

use check::Check;
use clap::ArgAction;
use electives::{AllowList, Checker, Config, CourseCode, HttpCatalog, Roster, Subject, storage};
use prereqs::Prereqs;
use trace::Trace;

/// Parse a course code, accepting any case and spacing.
fn parse_course(s: &str) -> Result<CourseCode, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Parse a subject, accepting any case.
fn parse_subject(s: &str) -> Result<Subject, String> {
    Subject::new(s).map_err(|e| format!("{e}"))
}

/// Parse a roster term, accepting any case.
fn parse_roster(s: &str) -> Result<Roster, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Check whether courses are technical electives
    Check(Check),

    /// Show how a single course is resolved, node by node
    Trace(Trace),

    /// Show the direct prerequisites the catalog lists for a course
    Prereqs(Prereqs),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Check(command) => command.run(config)?,
            Self::Trace(command) => command.run(config)?,
            Self::Prereqs(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// Options shared by every command that resolves prerequisites.
#[derive(Debug, clap::Args)]
pub struct ResolveArgs {
    /// Roster term to query, e.g. FA25 (defaults to the configured roster)
    #[arg(short, long, value_parser = parse_roster)]
    roster: Option<Roster>,

    /// Maximum number of prerequisite hops to follow (defaults to the
    /// configured depth)
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// File of approved courses (JSON array or one code per line)
    #[arg(short, long)]
    allow_list: Option<PathBuf>,
}

impl ResolveArgs {
    fn roster(&self, config: &Config) -> Roster {
        self.roster
            .clone()
            .unwrap_or_else(|| config.default_roster.clone())
    }

    fn max_depth(&self, config: &Config) -> usize {
        self.max_depth.unwrap_or(config.max_depth)
    }

    fn allow_list(&self, config: &Config) -> anyhow::Result<AllowList> {
        let allow_list = match &self.allow_list {
            Some(path) => {
                let list = storage::load_allow_list(path)?;
                tracing::info!(
                    "loaded {} approved course(s) from {}",
                    list.len(),
                    path.display()
                );
                list
            }
            None => config.allow_list(),
        };
        if allow_list.is_empty() {
            tracing::warn!("the allow-list is empty; no course can qualify");
        }
        Ok(allow_list)
    }

    fn checker(&self, config: &Config) -> anyhow::Result<Checker<HttpCatalog>> {
        Ok(Checker::new(
            self.allow_list(config)?,
            HttpCatalog::new(config.clone()),
        ))
    }
}
