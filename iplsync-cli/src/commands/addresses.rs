//! `iplsync addresses`: print the deduplicated feed addresses.

use anyhow::{Context, Result};
use clap::Args;

use iplsync_core::FeedConfig;
use iplsync_engine::{extract_addresses, feed};

use super::SourceArgs;
use crate::transport::feed::HttpFeed;

/// Arguments for `iplsync addresses`.
#[derive(Args, Debug)]
pub struct AddressesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit a JSON array instead of one address per line.
    #[arg(long)]
    pub json: bool,
}

impl AddressesArgs {
    pub fn run(self) -> Result<()> {
        let layers = self.source.flag_layer().merge(self.source.file_layer()?);
        let feed_config = FeedConfig::from_layers(&layers);

        let source = HttpFeed::new(&feed_config).context("failed to set up feed client")?;
        let records = feed::fetch(&source)
            .with_context(|| format!("failed to read feed '{}'", feed_config.endpoint_url()))?;
        let entries = extract_addresses(&records);

        if self.json {
            let literals: Vec<&str> = entries.iter().map(|e| e.from_ip.as_str()).collect();
            println!("{}", serde_json::to_string_pretty(&literals)?);
            return Ok(());
        }

        for entry in &entries {
            println!("{entry}");
        }
        Ok(())
    }
}
