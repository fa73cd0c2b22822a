//! Generation
//!
//! Renders the command tree into the generated Go artifact and rebuilds the
//! task binary. Both steps are gated on [`staleness::check`], so repeated runs
//! against an unchanged directory do no work.

pub mod staleness;

use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde_json::json;

use crate::config::BakeConfig;
use crate::error::Result;
use crate::toolchain::GoToolchain;
use crate::tree::{render_tree, CommandTree};

pub use staleness::{check, Staleness};

const MAIN_TEMPLATE_NAME: &str = "main";
const MAIN_TEMPLATE: &str = include_str!("../../templates/main.go.hbs");

pub struct Generator {
    config: BakeConfig,
    toolchain: GoToolchain,
    handlebars: Handlebars<'static>,
}

impl Generator {
    pub fn new(config: BakeConfig, toolchain: GoToolchain) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(MAIN_TEMPLATE_NAME, MAIN_TEMPLATE)
            .map_err(Box::new)?;
        Ok(Self {
            config,
            toolchain,
            handlebars,
        })
    }

    pub fn config(&self) -> &BakeConfig {
        &self.config
    }

    pub fn toolchain(&self) -> &GoToolchain {
        &self.toolchain
    }

    /// Full text of the generated artifact for `tree`
    pub fn render(&self, tree: &CommandTree) -> Result<String> {
        let data = json!({ "Tree": render_tree(tree) });
        Ok(self.handlebars.render(MAIN_TEMPLATE_NAME, &data)?)
    }

    /// Write the artifact unconditionally and format it
    pub fn write(&self, dir: &Path, tree: &CommandTree) -> Result<()> {
        let content = self.render(tree)?;
        let path = dir.join(&self.config.generated_file);
        fs::write(&path, content)?;
        tracing::debug!("Wrote {}", path.display());
        self.toolchain.fmt(dir, &self.config.generated_file)
    }

    /// Regenerate the artifact when it is stale or the binary is missing
    ///
    /// Returns whether the artifact was written.
    pub fn generate(&self, dir: &Path, tree: &CommandTree) -> Result<bool> {
        let status = check(
            dir,
            &[self.config.generated_file.as_str()],
            &self.config.source_patterns,
        )?;
        let binary_exists = dir.join(&self.config.binary_name).exists();
        if !status.modified && binary_exists {
            tracing::debug!("{} is up to date", self.config.generated_file);
            return Ok(false);
        }

        tracing::debug!(
            "Found source modifications on {:?}, regenerating {}",
            status.newer,
            self.config.generated_file
        );
        self.write(dir, tree)?;
        Ok(true)
    }

    /// Rebuild the task binary when any source is newer than it
    ///
    /// A failed build removes the binary so the next run retries. Returns
    /// whether a build ran.
    pub fn build(&self, dir: &Path) -> Result<bool> {
        let binary = self.config.binary_name.as_str();
        let status = check(dir, &[binary], &self.config.source_patterns)?;
        if !status.modified {
            tracing::debug!("{} is up to date", binary);
            return Ok(false);
        }

        tracing::debug!("Found modifications on {:?}, rebuilding binary", status.newer);
        if let Err(e) = self.toolchain.get(dir) {
            tracing::warn!("Dependency refresh failed: {}", e);
        }
        if let Err(e) = self.toolchain.build(dir, binary) {
            match fs::remove_file(dir.join(binary)) {
                Ok(()) => tracing::debug!("Removed partial binary {}", binary),
                Err(remove) if remove.kind() == std::io::ErrorKind::NotFound => {}
                Err(remove) => tracing::warn!("Failed to remove {}: {}", binary, remove),
            }
            return Err(e);
        }
        Ok(true)
    }
}
