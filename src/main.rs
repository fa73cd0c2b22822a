#![forbid(unsafe_code)]
//! Bake command line interface

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use console::style;

use bake::commands::{
    execute_force, execute_init, execute_list_fns, execute_run, execute_tree, execute_version,
    ForceOptions, InitOptions, ListFnsOptions, RunOptions, TreeOptions, VersionOptions,
};
use bake::config::DEFAULT_CONFIG_FILE;
use bake::{
    find_bake_dir, has_required_files, BakeConfig, CommandTree, Generator, GoToolchain, Indexer,
};

#[derive(Parser)]
#[command(name = "bake")]
#[command(about = "Go Build + Something like Make = Bake")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, global = true, env = "BAKE_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Pass --quiet to the task binary
    #[arg(short, long, global = true, env = "QUIET")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake maintenance commands
    #[command(name = "_bake", hide = true)]
    Bake {
        #[command(subcommand)]
        command: BakeCommands,
    },

    /// A task defined in the bake directory
    #[command(external_subcommand)]
    Task(Vec<String>),
}

#[derive(Subcommand)]
enum BakeCommands {
    /// List all exported functions in the bake directory
    ListFns {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the command tree with the options of each command
    Tree {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new bake project
    Init,

    /// Force a rebuild of the generated file and the binary on the next run
    Force,

    /// Print the version of bake
    Version,
}

fn main() -> ExitCode {
    program(std::env::args().collect())
}

fn program(args: Vec<String>) -> ExitCode {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", style("ERROR:").red(), e);
            return ExitCode::FAILURE;
        }
    };

    let sink = bake::trace::dispatch(config.trace_enabled());
    let result = tracing::dispatcher::with_default(&sink, || run(cli, config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("ERROR:").red(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> Result<BakeConfig> {
    BakeConfig::load_or_default(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}

fn run(cli: Cli, config: BakeConfig) -> Result<()> {
    let cwd = std::env::current_dir()?;
    tracing::debug!("Working directory: {}", cwd.display());

    match cli.command {
        Some(Commands::Bake { command }) => run_maintenance(command, &cwd, config),
        Some(Commands::Task(args)) => run_task(args, cli.quiet, &cwd, config),
        None => run_task(Vec::new(), cli.quiet, &cwd, config),
    }
}

fn require_bake_dir(cwd: &Path, config: &BakeConfig) -> Result<PathBuf> {
    find_bake_dir(cwd, &config.dir_names).ok_or_else(|| {
        anyhow!(
            "no bake directory ({}) found from {}",
            config.dir_names.join(", "),
            cwd.display()
        )
    })
}

/// Maintenance commands never touch the generated file or the binary
fn run_maintenance(command: BakeCommands, cwd: &Path, config: BakeConfig) -> Result<()> {
    match command {
        BakeCommands::ListFns { json } => execute_list_fns(ListFnsOptions {
            dir: require_bake_dir(cwd, &config)?,
            json,
        }),
        BakeCommands::Tree { json } => execute_tree(TreeOptions {
            dir: require_bake_dir(cwd, &config)?,
            json,
        }),
        BakeCommands::Init => {
            let name = config
                .dir_names
                .first()
                .ok_or_else(|| anyhow!("no bake directory name configured"))?;
            let dir = cwd.join(name);
            let generator = Generator::new(config.clone(), GoToolchain::system(&config.go_program))?;
            execute_init(InitOptions { dir }, &generator)
        }
        BakeCommands::Force => {
            let marker = config
                .marker_files
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("no marker files configured"))?;
            execute_force(ForceOptions {
                dir: require_bake_dir(cwd, &config)?,
                marker,
            })
        }
        BakeCommands::Version => {
            let dir = find_bake_dir(cwd, &config.dir_names).unwrap_or_else(|| cwd.to_path_buf());
            execute_version(VersionOptions { dir }, &GoToolchain::system(&config.go_program))
        }
    }
}

/// Regenerate and rebuild as needed, then dispatch to the task binary
fn run_task(args: Vec<String>, quiet: bool, cwd: &Path, config: BakeConfig) -> Result<()> {
    let (dir, tree) = match find_bake_dir(cwd, &config.dir_names) {
        Some(dir) if has_required_files(&dir, &config.marker_files) => {
            let tree = Indexer::new(&dir)
                .load_tree()
                .with_context(|| format!("failed to scan {}", dir.display()))?;
            let generator = Generator::new(config.clone(), GoToolchain::system(&config.go_program))?;
            generator.generate(&dir, &tree)?;
            generator
                .build(&dir)
                .context("failed to build binary")?;
            (dir, tree)
        }
        Some(dir) => {
            tracing::debug!("Required files not present in {}", dir.display());
            (dir, CommandTree::new())
        }
        None => (cwd.to_path_buf(), CommandTree::new()),
    };
    tracing::debug!("Running bake in {} with args: {:?}", dir.display(), args);

    execute_run(
        RunOptions {
            dir,
            binary: config.binary_name.clone(),
            args,
            quiet,
        },
        &tree,
    )
}
