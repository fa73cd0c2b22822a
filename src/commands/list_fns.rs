//! `bake _bake list-fns`
//!
//! Prints every exported function of the bake directory with its type and doc
//! text, whether or not it is an entry point.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::index::Indexer;
use crate::scan::FunctionInfo;

/// Options for the list-fns command
#[derive(Debug, Clone)]
pub struct ListFnsOptions {
    pub dir: PathBuf,
    /// Emit JSON instead of text
    pub json: bool,
}

/// Execute the list-fns command
pub fn execute_list_fns(options: ListFnsOptions) -> Result<()> {
    let functions = Indexer::new(&options.dir).list_functions()?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&functions)?);
        return Ok(());
    }
    if functions.is_empty() {
        println!(
            "{} No exported functions in {}",
            style("!").yellow(),
            options.dir.display()
        );
        return Ok(());
    }
    print!("{}", format_functions(&functions));
    Ok(())
}

fn format_functions(functions: &[FunctionInfo]) -> String {
    let mut out = String::new();
    for function in functions {
        out.push_str(&format!(
            "file: {}\n\tname: {}\n\ttype: {}\n\tdesc: {}\n",
            function.file.display(),
            function.name,
            function.signature,
            function.doc
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_functions() {
        let functions = vec![FunctionInfo {
            file: PathBuf::from("bakefiles/main.go"),
            name: "Build".to_string(),
            signature: "func(opt *getoptions.GetOpt) getoptions.CommandFn".to_string(),
            doc: "build - Builds it".to_string(),
        }];
        assert_eq!(
            format_functions(&functions),
            "file: bakefiles/main.go\n\tname: Build\n\ttype: func(opt *getoptions.GetOpt) getoptions.CommandFn\n\tdesc: build - Builds it\n"
        );
    }
}
