use clap::Parser;
use std::path::PathBuf;

use pipeadmin::entitlement::{
    self, ActionType, Subscription, UsageCounters,
};

#[derive(Parser)]
#[command(name = "pipeadmin")]
#[command(about = "Inspect subscription entitlements from a records file")]
struct Cli {
    /// Path to a JSON file holding an array of subscription records
    #[arg(value_name = "SUBSCRIPTIONS")]
    subscriptions_path: PathBuf,

    /// Current usage as "projects,specs", e.g. --usage 1,3
    #[arg(long, value_name = "P,S")]
    usage: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_usage(raw: &str) -> anyhow::Result<UsageCounters> {
    let (projects, specs) = raw
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("usage must look like projects,specs"))?;
    Ok(UsageCounters {
        projects: projects.trim().parse()?,
        specs: specs.trim().parse()?,
    })
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let raw = std::fs::read_to_string(&args.subscriptions_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {:?}: {}", args.subscriptions_path, e))?;
    let subscriptions: Vec<Subscription> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse subscription records: {}", e))?;

    if args.verbose {
        println!("Loaded {} subscription record(s)\n", subscriptions.len());
    }

    let usage = match args.usage.as_deref() {
        Some(raw) => parse_usage(raw)?,
        None => UsageCounters::default(),
    };

    let status = entitlement::check_subscription_status(&subscriptions);
    let level = entitlement::user_access_level(&subscriptions);
    let limits = entitlement::check_usage_limits(&subscriptions, &usage);
    let plan = entitlement::plan_display_info(&subscriptions);

    println!("=== Entitlement Summary ===");
    println!("Status:        {}", status.message);
    println!("Access level:  {}", level);
    println!("Plan:          {} / {}", plan.project_label, plan.spec_label);
    if let Some(days) = status.days_until_expiry {
        println!("Days left:     {}", days);
    }
    if let Some(end) = entitlement::format_subscription_end_date(&subscriptions) {
        println!("Ends:          {}", end);
    }
    println!(
        "Projects:      {} remaining (create: {})",
        limits.projects_remaining, limits.can_create_project
    );
    println!(
        "Specs:         {} remaining (create: {})",
        limits.specs_remaining, limits.can_create_spec
    );

    if args.verbose {
        println!();
        for action in [
            ActionType::CreateProject,
            ActionType::OpenProject,
            ActionType::CreateSpec,
            ActionType::ExportData,
        ] {
            println!(
                "{:?}: {}",
                action,
                entitlement::can_perform_action(&subscriptions, action)
            );
        }
        if entitlement::should_show_upgrade_prompt(&subscriptions, &usage) {
            println!("\nAn upgrade prompt would be shown for this user.");
        }
    }

    Ok(())
}
