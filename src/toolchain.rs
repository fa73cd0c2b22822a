//! Go toolchain invocation
//!
//! Every external process goes through a [`CommandRunner`], so tests can
//! substitute a recording runner for the real `go` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{BakeError, Result};

/// One external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: &str, dir: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            dir: dir.to_path_buf(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Printable command line
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(&self.dir);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }
}

/// Runs external commands
pub trait CommandRunner {
    /// Run with inherited stdio; a non-zero exit is an error
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Run and capture stdout
    fn output(&self, invocation: &Invocation) -> Result<String>;
}

/// Runner backed by `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        tracing::debug!("Running {} in {}", invocation.command_line(), invocation.dir.display());
        let status = invocation
            .command()
            .status()
            .map_err(|e| toolchain_error(invocation, e.to_string()))?;
        if !status.success() {
            return Err(toolchain_error(invocation, status.to_string()));
        }
        Ok(())
    }

    fn output(&self, invocation: &Invocation) -> Result<String> {
        tracing::debug!("Running {} in {}", invocation.command_line(), invocation.dir.display());
        let output = invocation
            .command()
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| toolchain_error(invocation, e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(toolchain_error(invocation, stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn toolchain_error(invocation: &Invocation, detail: String) -> BakeError {
    BakeError::Toolchain {
        command: invocation.command_line(),
        detail,
    }
}

/// Libraries fetched into a fresh bake directory
pub const RUNTIME_LIBRARIES: &[&str] = &[
    "github.com/DavidGamba/dgtools/buildutils",
    "github.com/DavidGamba/dgtools/fsmodtime",
    "github.com/DavidGamba/dgtools/run",
    "github.com/DavidGamba/go-getoptions",
];

/// The `go` subcommands bake drives
pub struct GoToolchain {
    program: String,
    runner: Box<dyn CommandRunner>,
}

impl GoToolchain {
    pub fn new(program: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Toolchain that runs real processes
    pub fn system(program: impl Into<String>) -> Self {
        Self::new(program, Box::new(SystemRunner))
    }

    fn go(&self, dir: &Path) -> Invocation {
        Invocation::new(&self.program, dir)
    }

    pub fn fmt(&self, dir: &Path, file: &str) -> Result<()> {
        self.runner.run(&self.go(dir).args(["fmt", file]))
    }

    /// Resolve the module's dependencies
    pub fn get(&self, dir: &Path) -> Result<()> {
        self.runner.run(&self.go(dir).arg("get"))
    }

    /// Fetch the latest version of `packages`
    pub fn get_update(&self, dir: &Path, packages: &[&str]) -> Result<()> {
        self.runner
            .run(&self.go(dir).args(["get", "-u"]).args(packages.iter().copied()))
    }

    pub fn build(&self, dir: &Path, output: &str) -> Result<()> {
        self.runner.run(&self.go(dir).args(["build", "-o", output]))
    }

    pub fn mod_init(&self, dir: &Path, module: &str) -> Result<()> {
        self.runner.run(&self.go(dir).args(["mod", "init", module]))
    }

    pub fn work_init(&self, dir: &Path) -> Result<()> {
        self.runner
            .run(&self.go(dir).args(["work", "init"]).env("GOWORK", "off"))
    }

    pub fn work_use(&self, dir: &Path) -> Result<()> {
        self.runner.run(&self.go(dir).args(["work", "use", "."]))
    }

    /// `go version` output
    pub fn version(&self, dir: &Path) -> Result<String> {
        self.runner.output(&self.go(dir).arg("version"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Invocation>>>,
    }

    impl CommandRunner for Recorder {
        fn run(&self, invocation: &Invocation) -> Result<()> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(())
        }

        fn output(&self, invocation: &Invocation) -> Result<String> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok("go version go1.22.0 linux/amd64".to_string())
        }
    }

    #[test]
    fn test_command_lines() {
        let recorder = Recorder::default();
        let go = GoToolchain::new("go", Box::new(recorder.clone()));
        let dir = Path::new("/tmp/bakefiles");

        go.fmt(dir, "generated_bake.go").unwrap();
        go.build(dir, "bake").unwrap();
        go.work_init(dir).unwrap();
        go.get_update(dir, &RUNTIME_LIBRARIES[3..]).unwrap();
        assert_eq!(go.version(dir).unwrap(), "go version go1.22.0 linux/amd64");

        let calls = recorder.calls.lock().unwrap();
        let lines: Vec<String> = calls.iter().map(Invocation::command_line).collect();
        assert_eq!(
            lines,
            vec![
                "go fmt generated_bake.go",
                "go build -o bake",
                "go work init",
                "go get -u github.com/DavidGamba/go-getoptions",
                "go version",
            ]
        );
        assert_eq!(calls[2].env, vec![("GOWORK".to_string(), "off".to_string())]);
        assert!(calls.iter().all(|c| c.dir == dir));
    }

    #[test]
    fn test_missing_program_is_toolchain_error() {
        let dir = tempfile::tempdir().unwrap();
        let go = GoToolchain::system("definitely-not-a-go-binary");
        let err = go.get(dir.path()).unwrap_err();
        assert!(matches!(err, BakeError::Toolchain { ref command, .. } if command == "definitely-not-a-go-binary get"));
    }
}
