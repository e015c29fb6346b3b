//! Subcommand implementations.

pub mod addresses;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use iplsync_core::{config, CloudInstance, FileConfig};

/// Feed and config-file options shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Cloud instance to read endpoints for: worldwide | usgovdod | usgovgcchigh | china.
    #[arg(long, value_name = "INSTANCE")]
    pub instance: Option<CloudInstance>,

    /// Base URL of the endpoint feed service.
    #[arg(long, value_name = "URL")]
    pub feed_url: Option<String>,

    /// YAML config file. Defaults to ~/.iplsync/config.yaml when it exists.
    #[arg(long, env = "IPLSYNC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// The config-file layer: the explicit `--config` file, else the default one.
    pub fn file_layer(&self) -> Result<FileConfig> {
        match &self.config {
            Some(path) => config::load_file_at(path)
                .with_context(|| format!("failed to load config '{}'", path.display())),
            None => config::load_default().context("failed to load ~/.iplsync/config.yaml"),
        }
    }

    /// Flag values as an override layer.
    pub fn flag_layer(&self) -> FileConfig {
        FileConfig {
            instance: self.instance,
            feed_url: self.feed_url.clone(),
            ..FileConfig::default()
        }
    }
}
