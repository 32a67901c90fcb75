mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, hook::HookSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillkit",
    about = "Keep content registries in sync with the skills, MCP servers, playbooks and standards on disk",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .skillkit/ or .git/)
    #[arg(long, global = true, env = "SKILLKIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every registry against the content tree without writing
    Validate,

    /// Reconcile registries with the content tree, then validate the result
    #[command(alias = "fix")]
    Sync,

    /// Write a default .skillkit/config.yaml
    Init {
        /// Also install the git pre-commit hook
        #[arg(long)]
        hook: bool,
    },

    /// List registered entries
    List {
        /// Only this category (skill, mcp, playbook, standard, ...)
        #[arg(long)]
        category: Option<String>,
    },

    /// Per-category counts on disk and in each registry
    Status,

    /// Manage the git pre-commit hook
    Hook {
        #[command(subcommand)]
        subcommand: HookSubcommand,
    },

    /// Show or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Validate => cmd::validate::run(&root, false, cli.json),
        Commands::Sync => cmd::validate::run(&root, true, cli.json),
        Commands::Init { hook } => cmd::init::run(&root, hook),
        Commands::List { category } => cmd::list::run(&root, category.as_deref(), cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Hook { subcommand } => cmd::hook::run(&root, subcommand),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // The report has already been printed; only the exit code is left.
        if e.downcast_ref::<cmd::ValidationFailed>().is_some() {
            std::process::exit(1);
        }
        eprintln!("error: {e:#}");
        std::process::exit(2);
    }
}
