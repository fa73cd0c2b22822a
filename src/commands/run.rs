//! Task dispatch
//!
//! Arguments that name a bound command are forwarded unchanged to the task
//! binary in the bake directory. Anything else is answered from the command
//! tree.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::dispatch::{resolve, Resolution};
use crate::toolchain::{CommandRunner, Invocation, SystemRunner};
use crate::tree::{listing, listing_from, CommandTree};

/// Options for running a task
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Bake directory holding the task binary
    pub dir: PathBuf,
    pub binary: String,
    /// Arguments as given on the command line
    pub args: Vec<String>,
    /// Forward `--quiet` to the task binary
    pub quiet: bool,
}

impl RunOptions {
    fn invocation(&self) -> Result<Invocation> {
        let binary = self.dir.join(&self.binary);
        let mut invocation = Invocation::new(&binary.to_string_lossy(), &std::env::current_dir()?);
        if self.quiet {
            invocation = invocation.arg("--quiet");
        }
        Ok(invocation.args(self.args.iter().cloned()))
    }
}

/// Resolve the arguments against `tree` and run the matching task
pub fn execute_run(options: RunOptions, tree: &CommandTree) -> Result<()> {
    execute_run_with(options, tree, &SystemRunner)
}

pub fn execute_run_with(
    options: RunOptions,
    tree: &CommandTree,
    runner: &dyn CommandRunner,
) -> Result<()> {
    match resolve(tree, &options.args) {
        Resolution::Command { entry, .. } => {
            tracing::debug!(
                "Running {} ({}) from {}",
                entry.command_path,
                entry.function_name,
                options.dir.display()
            );
            runner.run(&options.invocation()?)?;
            Ok(())
        }
        Resolution::Group { node, path } => {
            eprintln!("{} '{}' needs a subcommand:", style("✗").red(), path);
            eprint!("{}", listing_from(node, 1, false));
            bail!("missing subcommand for '{}'", path)
        }
        Resolution::Unknown { name } => {
            bail!("unknown command '{}'", name)
        }
        Resolution::Empty => execute_help(tree),
    }
}

/// Print the available commands
pub fn execute_help(tree: &CommandTree) -> Result<()> {
    if tree.is_empty() {
        println!(
            "{} No bake commands found. Run `bake _bake init` to start a project.",
            style("!").yellow()
        );
        return Ok(());
    }
    println!("{}", style("Commands:").bold());
    print!("{}", listing(tree, false));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntryPoint;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Invocation>>,
    }

    impl CommandRunner for Recorder {
        fn run(&self, invocation: &Invocation) -> crate::Result<()> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(())
        }

        fn output(&self, _invocation: &Invocation) -> crate::Result<String> {
            Ok(String::new())
        }
    }

    fn tree() -> CommandTree {
        let mut tree = CommandTree::new();
        tree.insert(EntryPoint {
            command_path: "deploy:app".to_string(),
            description: String::new(),
            function_name: "DeployApp".to_string(),
            file: "main.go".into(),
            options: vec![],
        })
        .unwrap();
        tree
    }

    fn options(args: &[&str], quiet: bool) -> RunOptions {
        RunOptions {
            dir: PathBuf::from("/work/bakefiles"),
            binary: "bake".to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            quiet,
        }
    }

    #[test]
    fn test_forwards_all_arguments() {
        let recorder = Recorder::default();
        execute_run_with(options(&["deploy", "app", "--env", "prod"], true), &tree(), &recorder)
            .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].command_line(),
            "/work/bakefiles/bake --quiet deploy app --env prod"
        );
    }

    #[test]
    fn test_group_and_unknown_fail() {
        let recorder = Recorder::default();
        let err = execute_run_with(options(&["deploy"], false), &tree(), &recorder).unwrap_err();
        assert!(err.to_string().contains("missing subcommand for 'deploy'"));

        let err = execute_run_with(options(&["lint"], false), &tree(), &recorder).unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'lint'");
        assert!(recorder.calls.lock().unwrap().is_empty());
    }
}
