//! `tome build` command implementation.

use std::path::PathBuf;

use clap::Args;
use tome_build::{BuildConfig, StaticSiteBuilder};
use tome_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args, Debug)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover tome.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Absolute URL the site will be served under (replaces `site_url` in the config).
    #[arg(long, env = "TOME_SITE_URL")]
    site_url: Option<String>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Site name (overrides config).
    #[arg(long)]
    site_name: Option<String>,

    /// Fail on broken internal links.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_url: self.site_url,
            site_name: self.site_name,
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            strict: self.strict.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.detail("Source", config.docs_resolved.source_dir.display());
        output.detail("Output", config.docs_resolved.output_dir.display());
        output.detail("Site URL", &config.site_url);

        let builder = StaticSiteBuilder::new(BuildConfig::from_config(&config));
        let report = builder.build()?;

        for issue in &report.site_url_issues {
            output.warning(&format!("Warning: {issue} (got \"{}\")", config.site_url));
        }
        for link in &report.broken_links {
            output.warning(&format!(
                "Warning: broken link in {}: {}",
                link.source, link.target
            ));
        }

        output.success(&format!(
            "Built {} page(s) and copied {} file(s) to {}",
            report.pages,
            report.files,
            config.docs_resolved.output_dir.display()
        ));
        Ok(())
    }
}
