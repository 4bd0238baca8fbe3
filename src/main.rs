//! Plane Scout demo
//!
//! Replays a seeded synthetic room scan through a session running in its own
//! task, then scatters cards onto the accepted surfaces.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use plane_scout::error::ConfigError;
use plane_scout::scan::ScanSimulator;
use plane_scout::session::{
    LogProvider, LogRenderer, PlacementSession, SessionEvent, SessionHandle,
};
use plane_scout::settings::{ScanProfile, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "plane-scout", version, about = "Replay a synthetic AR room scan")]
struct Cli {
    /// Scan profile: quick, standard or thorough
    #[arg(short, long, default_value = "standard", value_parser = parse_profile)]
    profile: ScanProfile,

    /// JSON session config (replaces the profile entirely)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scan seed
    #[arg(short, long, default_value_t = 2024)]
    seed: u64,

    /// Walls in the synthetic room
    #[arg(short, long, default_value_t = 6)]
    walls: usize,

    /// Leave the floor out of the room
    #[arg(long)]
    no_floor: bool,

    /// Skip placing cards after the scan
    #[arg(long)]
    no_scatter: bool,
}

fn parse_profile(s: &str) -> Result<ScanProfile, ConfigError> {
    ScanProfile::from_str(s).ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
}

/// Session config and a description of where it came from
fn load_config(cli: &Cli) -> Result<(SessionConfig, String), ConfigError> {
    match &cli.config {
        Some(path) => {
            let config = SessionConfig::load(path)?;
            Ok((config, format!("config {}", path.display())))
        }
        None => Ok((
            SessionConfig::from_profile(cli.profile),
            format!("{} profile", cli.profile.as_str()),
        )),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let (config, source) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Failed to load session config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Plane Scout starting ({}, seed {})", source, cli.seed);

    let mut session = PlacementSession::new(config, LogRenderer::default(), LogProvider::default());
    session.subscribe(|event: &SessionEvent| {
        if let SessionEvent::TargetReached { count } = event {
            println!("Target reached: {} surfaces", count);
        }
    });
    let (handle, task) = SessionHandle::spawn(session);

    let scan = ScanSimulator::new(cli.seed)
        .walls(cli.walls)
        .floor(!cli.no_floor)
        .generate();

    if let Err(e) = handle.start_scanning() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    // Tracking events come from their own task, as from a capture thread
    let tracker = handle.clone();
    let events = scan.events.clone();
    let feed = tokio::spawn(async move {
        for event in events {
            if tracker.submit(event).is_err() {
                break;
            }
        }
    });
    if feed.await.is_err() {
        log::error!("Tracking feed panicked");
        return ExitCode::FAILURE;
    }

    let snapshot = match handle.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "{} events from {} physical surfaces -> {} accepted",
        scan.events.len(),
        scan.physical_surfaces,
        snapshot.accepted.len()
    );
    println!("{}", snapshot.status);
    for surface in &snapshot.accepted {
        println!(
            "  {} {:<10} {:.2} x {:.2} m at ({:.2}, {:.2}, {:.2})",
            surface.id,
            surface.alignment.as_str(),
            surface.width,
            surface.height,
            surface.position.x,
            surface.position.y,
            surface.position.z
        );
    }

    if !cli.no_scatter {
        match handle.scatter().await {
            Ok(report) => println!(
                "Placed {} cards ({} failed)",
                report.placed.len(),
                report.failed.len()
            ),
            Err(e) => println!("Scatter: {}", e),
        }
    }

    if handle.shutdown().await.is_err() || task.await.is_err() {
        log::error!("Session task ended unexpectedly");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_source() {
        let cli = Cli::try_parse_from(["plane-scout", "--profile", "thorough"]).expect("args");
        let (config, source) = load_config(&cli).expect("config");
        assert_eq!(source, "thorough profile");
        assert_eq!(config.capacity, 15);
        assert!(!cli.no_scatter && !cli.no_floor);
    }

    #[test]
    fn test_config_file_replaces_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        let saved = SessionConfig {
            capacity: 7,
            ..SessionConfig::default()
        };
        saved.save(&path).expect("save");

        let cli = Cli::try_parse_from([
            "plane-scout",
            "--profile",
            "quick",
            "--config",
            path.to_str().expect("utf-8 path"),
        ])
        .expect("args");
        let (config, source) = load_config(&cli).expect("config");
        assert_eq!(config.capacity, 7);
        assert!(source.starts_with("config "));
        assert!(!source.contains("quick"));
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        assert!(Cli::try_parse_from(["plane-scout", "--profile", "bogus"]).is_err());
    }
}
