// ABOUTME: Entry point for the berth CLI application.
// ABOUTME: Parses arguments and dispatches to the dashboard core components.

mod cli;

use berth::actions::ActionOrchestrator;
use berth::config::Settings;
use berth::error::Result;
use berth::exec::ExecCommandComposer;
use berth::gateway::{ActionVerb, BollardGateway};
use berth::logs::LogTailService;
use berth::snapshot::{ContainerView, SnapshotBuilder};
use berth::types::ContainerId;
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;
    let mut settings = Settings::discover(&cwd)?;
    settings.apply_env_overrides();
    let settings = settings.normalized();

    // Exec composition is pure; it must not touch the daemon.
    if let Commands::Exec { container } = &cli.command {
        let composer = ExecCommandComposer::from_settings(&settings.exec);
        for (profile, command) in composer.compose(container) {
            println!("{profile}: {command}");
        }
        return Ok(());
    }

    let gateway = BollardGateway::connect(&settings.daemon)?;
    let snapshots = SnapshotBuilder::new(&settings.link.scheme, &settings.link.host);

    match cli.command {
        Commands::Ps { json } => {
            let views = snapshots.build_all(&gateway).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&views).expect("views serialize"));
            } else {
                for view in &views {
                    print_view(view);
                }
            }
            Ok(())
        }
        Commands::Logs { container, tail } => {
            let service = LogTailService::from_settings(&settings.logs);
            let id = ContainerId::new(container);
            for line in service.tail(&gateway, &id, tail).await? {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Start { container } => {
            perform(&gateway, &snapshots, &settings, container, ActionVerb::Start).await
        }
        Commands::Stop { container } => {
            perform(&gateway, &snapshots, &settings, container, ActionVerb::Stop).await
        }
        Commands::Restart { container } => {
            perform(&gateway, &snapshots, &settings, container, ActionVerb::Restart).await
        }
        Commands::Exec { .. } => unreachable!("handled before daemon connect"),
    }
}

async fn perform(
    gateway: &BollardGateway,
    snapshots: &SnapshotBuilder,
    settings: &Settings,
    container: String,
    verb: ActionVerb,
) -> Result<()> {
    let orchestrator = ActionOrchestrator::from_settings(&settings.action);
    let id = ContainerId::new(container);
    let view = orchestrator.execute(gateway, snapshots, &id, verb).await?;
    print_view(&view);
    Ok(())
}

fn print_view(view: &ContainerView) {
    let cpu = view
        .stats
        .and_then(|s| s.cpu_percent)
        .map(|c| format!("{c:.1}%"))
        .unwrap_or_else(|| "-".to_string());
    let mem = view
        .stats
        .and_then(|s| s.memory_mb)
        .map(|m| format!("{m:.0} MB"))
        .unwrap_or_else(|| "-".to_string());
    let uptime = view.uptime_human().unwrap_or_else(|| "-".to_string());
    let link = view.links.first().map(String::as_str).unwrap_or("-");

    println!(
        "{:<24} {:<10} {:>8} {:>10} {:>10}  {}",
        view.name, view.status, cpu, mem, uptime, link
    );
}
