//! End-to-end pipeline tests
//!
//! Scan a bake directory on disk, build the command tree, generate the
//! wiring file and drive the build through a scripted toolchain.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use filetime::{set_file_mtime, FileTime};
use pretty_assertions::assert_eq;

use bake::generate::check;
use bake::{
    camel_to_kebab, BakeConfig, BakeError, CommandRunner, CommandTree, EntryPoint, Generator,
    GoToolchain, Indexer, Invocation, OptionKind,
};

const HEADER: &str = "package main\n\nimport (\n\t\"context\"\n\n\t\"github.com/DavidGamba/go-getoptions\"\n)\n\n";

fn bake_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        fs::write(dir.path().join(name), format!("{}{}", HEADER, body)).unwrap();
    }
    fs::write(dir.path().join("go.mod"), "module bake\n").unwrap();
    dir
}

fn set_mtime(path: &Path, secs: i64) {
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

/// Toolchain double: `go build -o <bin>` writes the binary, optionally
/// failing after a partial write
#[derive(Clone, Default)]
struct ScriptedRunner {
    calls: Arc<Mutex<Vec<String>>>,
    fail_build: bool,
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> bake::Result<()> {
        self.calls.lock().unwrap().push(invocation.args.join(" "));
        if invocation.args.first().map(String::as_str) == Some("build") {
            let output = invocation.dir.join(&invocation.args[2]);
            fs::write(&output, "partial")?;
            if self.fail_build {
                return Err(BakeError::Toolchain {
                    command: invocation.command_line(),
                    detail: "exit status: 1".to_string(),
                });
            }
        }
        Ok(())
    }

    fn output(&self, _invocation: &Invocation) -> bake::Result<String> {
        Ok(String::new())
    }
}

fn generator(runner: &ScriptedRunner) -> Generator {
    Generator::new(
        BakeConfig::default(),
        GoToolchain::new("go", Box::new(runner.clone())),
    )
    .unwrap()
}

// =============================================================================
// Scanning and extraction
// =============================================================================

mod indexing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_documented_entry_point_without_options() {
        let dir = bake_dir(&[(
            "deploy.go",
            r#"// deploy:app - Deploys the application
func DeployApp(opt *getoptions.GetOpt) getoptions.CommandFn {
	return func(ctx context.Context, opt *getoptions.GetOpt, args []string) error {
		return nil
	}
}
"#,
        )]);

        let tree = Indexer::new(dir.path()).load_tree().unwrap();
        let deploy = tree.find("deploy").unwrap();
        assert!(deploy.entry_point.is_none());
        let app = deploy.child("app").unwrap();
        let entry = app.entry_point.as_ref().unwrap();
        assert_eq!(entry.description, "Deploys the application");
        assert!(entry.options.is_empty());
    }

    #[test]
    fn test_string_option_and_var_variant_agree() {
        let dir = bake_dir(&[(
            "build.go",
            r#"func Plain(cfg *getoptions.GetOpt) getoptions.CommandFn {
	cfg.String("name", "default")
	return nil
}

func Bound(cfg *getoptions.GetOpt) getoptions.CommandFn {
	var x string
	cfg.StringVar(&x, "name", "default")
	return nil
}
"#,
        )]);

        let entries = Indexer::new(dir.path()).entry_points().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].options, entries[1].options);
        let option = &entries[0].options[0];
        assert_eq!(option.kind, OptionKind::String);
        assert_eq!(option.name, "name");
        assert_eq!(option.default_literal, "default");
    }

    #[test]
    fn test_missing_default_aborts_without_artifact() {
        let dir = bake_dir(&[(
            "build.go",
            r#"func Build(cfg *getoptions.GetOpt) getoptions.CommandFn {
	cfg.String("name")
	return nil
}
"#,
        )]);

        let err = Indexer::new(dir.path()).load_tree().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Build: String call is missing the default argument"
        );
        assert!(!dir.path().join("generated_bake.go").exists());
    }

    #[test]
    fn test_duplicate_command_path() {
        let dir = bake_dir(&[
            ("a.go", "// build - first\nfunc First(opt *getoptions.GetOpt) getoptions.CommandFn { return nil }\n"),
            ("b.go", "func Build(opt *getoptions.GetOpt) getoptions.CommandFn { return nil }\n"),
        ]);

        let err = Indexer::new(dir.path()).load_tree().unwrap_err();
        assert!(matches!(
            err,
            BakeError::DuplicateCommand { ref path, ref existing, ref function }
                if path == "build" && existing == "First" && function == "Build"
        ));
    }

    #[test]
    fn test_generated_file_is_not_rescanned() {
        let dir = bake_dir(&[
            ("main.go", "func Build(opt *getoptions.GetOpt) getoptions.CommandFn { return nil }\n"),
            ("generated_bake.go", "func Generated(opt *getoptions.GetOpt) getoptions.CommandFn { return nil }\n"),
        ]);

        let names: Vec<String> = Indexer::new(dir.path())
            .list_functions()
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Build"]);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = bake_dir(&[("broken.go", "func Build( {\n")]);
        let err = Indexer::new(dir.path()).load_tree().unwrap_err();
        assert!(err.to_string().starts_with("failed to parse file"));
        assert!(err.to_string().contains("broken.go"));
    }

    #[test]
    fn test_option_count_matches_handle_calls() {
        let dir = bake_dir(&[(
            "opts.go",
            r#"func Opts(opt *getoptions.GetOpt) getoptions.CommandFn {
	opt.Bool("a", false)
	opt.Int("b", 1)
	opt.Float64("c", 1.5)
	opt.Increment("d", 0)
	opt.StringSlice("e", 1, 2)
	opt.IntSliceVar(&ids, "f", 1, 2)
	opt.Float64Slice("g", 1, 2)
	opt.StringMap("h", 1, 2)
	opt.StringOptional("i", "x")
	return nil
}
"#,
        )]);

        let entries = Indexer::new(dir.path()).entry_points().unwrap();
        assert_eq!(entries[0].options.len(), 9);
    }
}

// =============================================================================
// Command tree properties
// =============================================================================

mod tree_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str) -> EntryPoint {
        EntryPoint {
            command_path: path.to_string(),
            description: String::new(),
            function_name: path.replace(':', "_"),
            file: "main.go".into(),
            options: vec![],
        }
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut first = CommandTree::new();
        first.insert(entry("a:b")).unwrap();
        first.insert(entry("a:c")).unwrap();

        let mut second = CommandTree::new();
        second.insert(entry("a:c")).unwrap();
        second.insert(entry("a:b")).unwrap();

        assert_eq!(first, second);
        let a = first.find("a").unwrap();
        assert_eq!(a.children.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_reserved_word_at_any_depth() {
        for path in ["func", "func:x", "x:func", "x:y:func", "x:range:y"] {
            let mut tree = CommandTree::new();
            let err = tree.insert(entry(path)).unwrap_err();
            assert!(
                matches!(err, BakeError::ReservedWord { .. }),
                "{} should be rejected",
                path
            );
            assert!(tree.is_empty(), "{} left partial state", path);
        }
    }

    #[test]
    fn test_kebab_names_are_stable() {
        assert_eq!(camel_to_kebab("AbCdEfGhIjK"), "ab-cd-ef-gh-ij-k");
        for name in ["DeployApp", "RunTests", "TFApply", "Lint"] {
            let once = camel_to_kebab(name);
            assert_eq!(camel_to_kebab(&once), once);
        }
    }
}

// =============================================================================
// Generation and build gate
// =============================================================================

mod generation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TASK: &str = r#"// deploy:app - Deploys the application
func DeployApp(opt *getoptions.GetOpt) getoptions.CommandFn {
	opt.String("env", "dev", opt.ValidValues("dev", "prod"))
	return nil
}
"#;

    #[test]
    fn test_generate_then_build() {
        let dir = bake_dir(&[("main.go", TASK)]);
        let runner = ScriptedRunner::default();
        let generator = generator(&runner);
        let tree = Indexer::new(dir.path()).load_tree().unwrap();

        assert!(generator.generate(dir.path(), &tree).unwrap());
        let generated = fs::read_to_string(dir.path().join("generated_bake.go")).unwrap();
        assert!(generated.contains("\tapp := deploy.NewCommand(\"app\", `Deploys the application`)\n"));
        assert!(generated.contains(
            "\t// app.String(\"env\", \"dev\", app.ValidValues(\"dev\", \"prod\"))\n"
        ));
        assert!(generated.contains("\tappFn := DeployApp(app)\n"));
        assert!(generated.contains("\tTM.Add(\"deploy:app\", appFn)\n"));

        assert!(generator.build(dir.path()).unwrap());
        assert!(dir.path().join("bake").exists());
        assert_eq!(
            *runner.calls.lock().unwrap(),
            vec!["fmt generated_bake.go", "get", "build -o bake"]
        );

        // Everything is older than the fresh binary
        for name in ["main.go", "go.mod", "generated_bake.go"] {
            set_mtime(&dir.path().join(name), 1_000);
        }
        assert!(!generator.generate(dir.path(), &tree).unwrap());
        assert!(!generator.build(dir.path()).unwrap());
    }

    #[test]
    fn test_failed_build_removes_binary() {
        let dir = bake_dir(&[("main.go", TASK)]);
        let runner = ScriptedRunner {
            fail_build: true,
            ..Default::default()
        };
        let generator = generator(&runner);

        let err = generator.build(dir.path()).unwrap_err();
        assert!(matches!(err, BakeError::Toolchain { .. }));
        assert!(!dir.path().join("bake").exists());
    }

    #[test]
    fn test_touching_a_source_flips_staleness() {
        let dir = bake_dir(&[("main.go", TASK)]);
        let sources = BakeConfig::default().source_patterns;
        let artifact = dir.path().join("generated_bake.go");
        fs::write(&artifact, "package main\n").unwrap();

        set_mtime(&dir.path().join("main.go"), 1_000);
        set_mtime(&dir.path().join("go.mod"), 1_000);
        set_mtime(&artifact, 2_000);
        assert!(!check(dir.path(), &["generated_bake.go"], &sources).unwrap().modified);

        set_mtime(&dir.path().join("main.go"), 3_000);
        assert!(check(dir.path(), &["generated_bake.go"], &sources).unwrap().modified);
        // Stays stale until the artifact is rewritten
        assert!(check(dir.path(), &["generated_bake.go"], &sources).unwrap().modified);

        set_mtime(&artifact, 4_000);
        assert!(!check(dir.path(), &["generated_bake.go"], &sources).unwrap().modified);
    }
}
