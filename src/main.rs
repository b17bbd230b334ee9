use anyhow::Context;
use clap::{Parser, Subcommand};
use gap_core::abstractions::{EvmAddressValidator, StaticProjectLookup, TracingNotifier};
use gap_core::app::{handle_fatal_error, init_logging, AppConfig, GapConfig};
use gap_core::milestones::{merge_duplicate_milestones, UnifiedMilestone};
use gap_core::payout::{format_address, PayoutAddressResolver, PayoutItem};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Offline tooling for grant timelines and donation payouts
#[derive(Parser)]
#[command(name = "gap")]
#[command(about = "Merge grant milestones and inspect donation payout addresses", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge duplicate grant milestones from a JSON timeline
    MergeMilestones {
        /// JSON file holding an array of timeline milestones
        input: PathBuf,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Resolve payout addresses for a list of projects
    ResolvePayouts {
        /// JSON object of projects keyed by slug or uid
        #[arg(long)]
        projects: PathBuf,

        /// JSON array of `{uid, slug?}` items
        #[arg(long)]
        items: PathBuf,

        /// Community whose payout address is preferred
        #[arg(long)]
        community: Option<String>,
    },
    /// Print the short display form of an address
    FormatAddress {
        /// Address to shorten
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let gap_config = match cli.config.as_deref().map(GapConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => handle_fatal_error(e.into(), cli.verbose),
    };
    let app_config = AppConfig::new(cli.verbose, gap_config);
    init_logging(&app_config);

    let result = match cli.command {
        Commands::MergeMilestones { input, compact } => run_merge_milestones(&input, compact),
        Commands::ResolvePayouts {
            projects,
            items,
            community,
        } => {
            let community = community.or_else(|| app_config.gap.payouts.community_id.clone());
            run_resolve_payouts(&projects, &items, community.as_deref()).await
        }
        Commands::FormatAddress { address } => {
            println!("{}", format_address(address.as_deref()));
            Ok(())
        }
    };

    if let Err(e) = result {
        handle_fatal_error(e, app_config.verbose);
    }
}

fn run_merge_milestones(input: &Path, compact: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read milestones from {}", input.display()))?;
    let milestones: Vec<UnifiedMilestone> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid milestone JSON in {}", input.display()))?;

    let merged = merge_duplicate_milestones(&milestones);
    debug!("Merged {} milestones into {}", milestones.len(), merged.len());

    let output = if compact {
        serde_json::to_string(&merged)?
    } else {
        serde_json::to_string_pretty(&merged)?
    };
    println!("{output}");
    Ok(())
}

async fn run_resolve_payouts(
    projects: &Path,
    items: &Path,
    community: Option<&str>,
) -> anyhow::Result<()> {
    let lookup = StaticProjectLookup::from_json_file(projects)
        .with_context(|| format!("Failed to load projects from {}", projects.display()))?;
    let content = std::fs::read_to_string(items)
        .with_context(|| format!("Failed to read items from {}", items.display()))?;
    let items: Vec<PayoutItem> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid item JSON in {}", items.display()))?;

    let resolver = PayoutAddressResolver::new(
        Arc::new(lookup),
        Arc::new(EvmAddressValidator),
        Arc::new(TracingNotifier),
    );
    resolver.resolve(&items, community).await;
    let snapshot = resolver.snapshot().await;

    for item in &items {
        let address = snapshot.payout_addresses.get(&item.uid).cloned().flatten();
        println!("{}: {}", item.uid, format_address(address.as_deref()));
    }
    if !snapshot.missing_payouts.is_empty() {
        let missing: Vec<_> = snapshot.missing_payouts.into_iter().collect();
        println!("Missing payout addresses: {}", missing.join(", "));
    }
    Ok(())
}
