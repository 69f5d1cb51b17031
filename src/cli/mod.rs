//! Command-line interface.

mod change;
mod home;
mod progress;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use console::style;

use attack_tracker::{
    load_settings, AnnotationKind, BackendClient, ChangeId, ClassificationTarget, CompletionStatus,
    Dimension, Settings, SqliteStore, StatusFilter, VersionPair,
};

/// Operator CLI for the ATT&CK upgrade tracker.
#[derive(Parser)]
#[command(name = "atrack", version, about = "Track MITRE ATT&CK version upgrades from the terminal")]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "ATRACK_BASE_URL")]
    base_url: Option<String>,

    /// Preferences database (overrides the config file)
    #[arg(long, global = true, env = "ATRACK_STORE")]
    store: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `attack_tracker=trace`
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// The upgrade a command applies to.
#[derive(Args, Clone)]
pub struct PairArgs {
    /// Version upgraded from, e.g. v15.1
    from: String,
    /// Version upgraded to, e.g. v16.0
    to: String,
}

impl PairArgs {
    fn pair(&self) -> VersionPair {
        VersionPair::new(&self.from, &self.to)
    }
}

/// A single change of an upgrade.
#[derive(Args, Clone)]
pub struct ChangeArgs {
    #[command(flatten)]
    pair: PairArgs,
    /// ATT&CK id of the change, e.g. T1059.001
    id: String,
}

impl ChangeArgs {
    fn id(&self) -> ChangeId {
        ChangeId::new(&self.id)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Word-level diff of two description files
    Diff {
        /// Old description (HTML)
        old: PathBuf,
        /// New description (HTML)
        new: PathBuf,
        /// Print annotated HTML instead of coloured text
        #[arg(long)]
        html: bool,
    },

    #[command(flatten)]
    Tracker(TrackerCommand),
}

/// Commands that talk to the backend or the preferences store.
#[derive(Subcommand)]
enum TrackerCommand {
    /// Change a criticality value or C/I/A toggle
    Classify {
        #[command(flatten)]
        change: ChangeArgs,
        /// client-criticality, infra-criticality, service-criticality,
        /// confidentiality, integrity or availability
        target: ClassificationTarget,
        value: i64,
        /// Evaluation status currently selected for the dimension
        #[arg(long, default_value = "not evaluated")]
        eval_status: String,
    },

    /// Set the evaluation status of a dimension
    Evaluate {
        #[command(flatten)]
        change: ChangeArgs,
        dimension: Dimension,
        status: String,
    },

    /// Save reasoning or measures text for a dimension
    Annotate {
        #[command(flatten)]
        change: ChangeArgs,
        dimension: Dimension,
        /// reasoning or measures
        kind: AnnotationKind,
        text: String,
    },

    /// Set the completion status of a change
    Status {
        #[command(flatten)]
        change: ChangeArgs,
        /// Done, "In Progress" or "Not Done"
        status: CompletionStatus,
        /// Category sent along with the update
        #[arg(long)]
        category: Option<String>,
    },

    /// Show or set the stored overview filter
    Filter {
        #[command(flatten)]
        pair: PairArgs,
        /// All, Done, "In Progress" or "Not Done"
        value: Option<StatusFilter>,
    },

    /// Previous/next change under the stored filter
    Links {
        #[command(flatten)]
        change: ChangeArgs,
        #[arg(long)]
        category: Option<String>,
    },

    /// Upload a progress spreadsheet
    Import {
        #[command(flatten)]
        pair: PairArgs,
        file: Option<PathBuf>,
    },

    /// Request a progress spreadsheet
    Export {
        #[command(flatten)]
        pair: PairArgs,
    },

    /// Show or toggle the light/dark preference
    Theme {
        #[arg(long)]
        toggle: bool,
    },

    /// Start tracking an upgrade from the selected version
    Upgrade {
        /// Known versions, newest first
        #[arg(long, value_delimiter = ',', required = true)]
        versions: Vec<String>,
        /// Version to upgrade from
        selected: String,
        /// Submit instead of only showing the hint
        #[arg(long)]
        confirm: bool,
    },
}

/// Settings plus the local preferences store, shared by every command.
pub struct App {
    settings: Settings,
    store: SqliteStore,
}

impl App {
    async fn open(base_url: Option<String>, store: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut settings = load_settings().await;
        if let Some(base_url) = base_url {
            settings.base_url = base_url.trim_end_matches('/').to_string();
        }

        let store_path = match store {
            Some(path) => path,
            None => {
                settings
                    .ensure_directories()
                    .context("Failed to create data directory")?;
                settings.store_path()
            }
        };
        let store = SqliteStore::open(&store_path)
            .with_context(|| format!("Failed to open {}", store_path.display()))?;

        Ok(Self { settings, store })
    }

    fn backend(&self) -> anyhow::Result<BackendClient> {
        BackendClient::new(&self.settings).context("Failed to create HTTP client")
    }

    fn store(&self) -> &SqliteStore {
        &self.store
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Diff { old, new, html } => change::cmd_diff(&old, &new, html).await,
        Commands::Tracker(command) => {
            let app = App::open(cli.base_url, cli.store).await?;
            dispatch(&app, command).await
        }
    }
}

async fn dispatch(app: &App, command: TrackerCommand) -> anyhow::Result<()> {
    match command {
        TrackerCommand::Classify {
            change,
            target,
            value,
            eval_status,
        } => change::cmd_classify(app, &change, target, value, &eval_status).await,
        TrackerCommand::Evaluate {
            change,
            dimension,
            status,
        } => change::cmd_evaluate(app, &change, dimension, &status).await,
        TrackerCommand::Annotate {
            change,
            dimension,
            kind,
            text,
        } => change::cmd_annotate(app, &change, dimension, kind, &text).await,
        TrackerCommand::Links { change, category } => {
            change::cmd_links(app, &change, category.as_deref()).await
        }
        TrackerCommand::Status {
            change,
            status,
            category,
        } => progress::cmd_status(app, &change, status, category).await,
        TrackerCommand::Filter { pair, value } => progress::cmd_filter(app, &pair, value),
        TrackerCommand::Import { pair, file } => progress::cmd_import(app, &pair, file.as_deref()).await,
        TrackerCommand::Export { pair } => progress::cmd_export(app, &pair).await,
        TrackerCommand::Theme { toggle } => home::cmd_theme(app, toggle),
        TrackerCommand::Upgrade {
            versions,
            selected,
            confirm,
        } => home::cmd_upgrade(app, versions, &selected, confirm).await,
    }
}

/// Print a success or error line for a notice.
fn print_notice(notice: &attack_tracker::notice::Notice) {
    let marker = if notice.is_error() {
        style("✗").red()
    } else {
        style("✓").green()
    };
    match &notice.link {
        Some(link) => println!("{} {} {} ({})", marker, notice.text, link.text, style(&link.href).cyan()),
        None => println!("{} {}", marker, notice.text),
    }
}
