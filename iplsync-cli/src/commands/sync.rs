//! `iplsync sync`: create or update the IP list from the feed.

use anyhow::{Context, Result};
use clap::Args;

use iplsync_core::{FileConfig, SyncConfig};
use iplsync_engine::{pipeline, CommitOutcome, Outcome, SyncReport};

use super::SourceArgs;
use crate::transport::{feed::HttpFeed, pce::PceClient};

/// Arguments for `iplsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Fully qualified domain name of the policy engine. Required.
    #[arg(long, env = "IPLSYNC_PCE_FQDN")]
    pub fqdn: Option<String>,

    /// Port of the policy engine. [default: 8443]
    #[arg(long, env = "IPLSYNC_PCE_PORT")]
    pub port: Option<u16>,

    /// API key id or e-mail address. Required.
    #[arg(long, env = "IPLSYNC_PCE_USER")]
    pub user: Option<String>,

    /// API secret for an API key id, or password for an e-mail login. Required.
    #[arg(long, env = "IPLSYNC_PCE_PWD", hide_env_values = true)]
    pub pwd: Option<String>,

    /// Organisation id. Discovered at login, or 1 for API keys, when omitted.
    #[arg(long, env = "IPLSYNC_PCE_ORG")]
    pub org: Option<u32>,

    /// Disable TLS certificate and hostname verification.
    #[arg(short = 'x', long)]
    pub disable_tls: bool,

    /// Name of the IP list to create or update. [default: Office365]
    #[arg(long)]
    pub name: Option<String>,

    /// Provision the IP list after writing it.
    #[arg(short = 'p', long)]
    pub provision: bool,

    /// Decide create vs. update and report it without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl SyncArgs {
    fn flag_layer(&self) -> FileConfig {
        FileConfig {
            fqdn: self.fqdn.clone(),
            port: self.port,
            user: self.user.clone(),
            pwd: self.pwd.clone(),
            org: self.org,
            disable_tls: self.disable_tls.then_some(true),
            name: self.name.clone(),
            provision: self.provision.then_some(true),
            ..self.source.flag_layer()
        }
    }

    pub fn run(self) -> Result<()> {
        let layers = self.flag_layer().merge(self.source.file_layer()?);
        let config = SyncConfig::from_layers(layers)
            .context("required arguments not included; run with --help for usage")?;

        let feed = HttpFeed::new(&config.feed).context("failed to set up feed client")?;
        let pce = PceClient::connect(&config.pce).with_context(|| {
            format!("failed to connect to policy engine at {}", config.pce.base_url())
        })?;

        let report = pipeline::run(&config, &feed, &pce, self.dry_run)
            .with_context(|| format!("sync failed for IP list '{}'", config.name))?;
        print_report(&config.name, &report);
        Ok(())
    }
}

fn print_report(name: &str, report: &SyncReport) {
    let entries = report.entries;
    match &report.outcome {
        Outcome::Created(handle) => {
            println!("✓ IP List '{name}' created ({entries} entries) — {handle}")
        }
        Outcome::Updated(handle) => {
            println!("✓ IP List '{name}' updated ({entries} entries) — {handle}")
        }
        Outcome::WouldCreate => {
            println!("[dry-run] IP List '{name}' would be created ({entries} entries)")
        }
        Outcome::WouldUpdate(handle) => {
            println!("[dry-run] IP List '{name}' would be updated ({entries} entries) — {handle}")
        }
    }
    match &report.commit {
        CommitOutcome::Provisioned(_) => println!("✓ IP List '{name}' provisioned"),
        CommitOutcome::WouldProvision => println!("[dry-run] IP List '{name}' would be provisioned"),
        CommitOutcome::Skipped => {}
    }
}
