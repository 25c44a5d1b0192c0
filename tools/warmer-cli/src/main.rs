use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use warmer_core::location::{
    Clock, Coordinate, LocationSource, ScriptedFix, ScriptedSource, SystemClock, TokioClock,
    UnsupportedSource, parse_track,
};
use warmer_core::target::{parse_lat_lng, parse_target};
use warmer_core::{GameSession, SessionConfig};

mod output;

use output::{OutputFormat, render};

#[derive(Parser, Debug)]
#[command(
    name = "warmer",
    author,
    version,
    about = "Warmer/colder feedback while walking towards a target",
    long_about = "Replays a recorded track against a target coordinate and prints what the \
                  game screen would show: distance, warmer/colder/steady, and the countdown \
                  to the next accepted position.\n\n\
                  The target can be given as \"lat,lng\", as a map share link, or with \
                  --lat/--lng. Without --track the session behaves like a device with no GPS."
)]
struct Args {
    /// Target as "lat,lng" or a map share link
    #[arg(short, long, conflicts_with_all = ["lat", "lng"])]
    target: Option<String>,

    /// Target latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<String>,

    /// Target longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<String>,

    /// Recorded track to replay (lines of `delay_ms,lat,lng` or `delay_ms,error,<kind>`)
    #[arg(long)]
    track: Option<PathBuf>,

    /// JSON session config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the cadence window in milliseconds
    #[arg(long)]
    cadence_ms: Option<i64>,

    /// Override the display tick in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Stop after this many seconds (default: track length plus one cadence window)
    #[arg(long)]
    duration: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let target = read_target(&args)?;
    let config = load_config(&args)?;

    let Playback {
        source,
        clock,
        run_for,
    } = prepare_playback(args.track.as_deref(), &config)?;
    let run_for = args.duration.map(Duration::from_secs).or(run_for);

    tracing::info!("Target: {}", target);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let format = args.format;
    let printer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            match render(&payload, format) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("Failed to render payload: {e}"),
            }
        }
    });

    let mut session = GameSession::start(target, source, clock, config, tx)
        .context("Failed to start session")?;

    match run_for {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => tracing::info!("Session finished"),
                _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            tracing::info!("Interrupted");
        }
    }

    if let Some(tracker) = session.stop().await {
        if let Some(meters) = tracker.state().last_distance_meters {
            tracing::info!("Final distance: {:.1} m", meters);
        }
    }
    printer.await.context("Output task failed")?;

    Ok(())
}

fn read_target(args: &Args) -> Result<Coordinate> {
    match (&args.target, &args.lat, &args.lng) {
        (Some(target), _, _) => parse_target(target).context("Invalid target"),
        (None, Some(lat), Some(lng)) => parse_lat_lng(lat, lng).context(
            "Please enter valid coordinates (Latitude: -90 to 90, Longitude: -180 to 180)",
        ),
        _ => bail!("A target is required: use --target or --lat/--lng"),
    }
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            SessionConfig::from_json(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(cadence) = args.cadence_ms {
        config.cadence_millis = cadence;
    }
    if let Some(tick) = args.tick_ms {
        config.tick_millis = tick;
    }
    config.validate().context("Invalid session settings")?;

    Ok(config)
}

/// Where positions come from and which clock stamps them
struct Playback {
    source: Arc<dyn LocationSource>,
    clock: Arc<dyn Clock>,
    /// Natural end of the session, `None` when it runs until interrupted
    run_for: Option<Duration>,
}

fn prepare_playback(track: Option<&Path>, config: &SessionConfig) -> Result<Playback> {
    let Some(path) = track else {
        tracing::warn!("No track given, running without a location source");
        return Ok(Playback {
            source: Arc::new(UnsupportedSource),
            clock: Arc::new(SystemClock),
            run_for: None,
        });
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read track {}", path.display()))?;
    let script = parse_track(&text)
        .with_context(|| format!("Failed to parse track {}", path.display()))?;
    tracing::info!("Loaded {} fixes from {}", script.len(), path.display());

    // Replayed delays run on tokio time, so the clock has to follow it
    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
    let cadence = Duration::from_millis(config.cadence_millis.max(0) as u64);
    Ok(Playback {
        run_for: Some(track_length(&script).saturating_add(cadence)),
        source: Arc::new(ScriptedSource::new(script, Arc::clone(&clock))),
        clock,
    })
}

fn track_length(script: &[ScriptedFix]) -> Duration {
    script.iter().map(|fix| fix.delay).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use warmer_core::location::LocationError;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("warmer").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_target_forms() {
        let expected = Coordinate::new(10.0, -20.0).unwrap();
        assert_eq!(read_target(&args(&["--target", "10,-20"])).unwrap(), expected);
        assert_eq!(
            read_target(&args(&["--lat", "10", "--lng", "-20"])).unwrap(),
            expected
        );
        assert_eq!(
            read_target(&args(&["-t", "https://maps.google.com/?ll=10,-20"])).unwrap(),
            expected
        );
    }

    #[test]
    fn test_target_required() {
        assert!(read_target(&args(&[])).is_err());
        assert!(Args::try_parse_from(["warmer", "--lat", "10"]).is_err());
        assert!(Args::try_parse_from(["warmer", "-t", "1,2", "--lat", "1", "--lng", "2"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load_config(&args(&["--cadence-ms", "3000", "--tick-ms", "250"])).unwrap();
        assert_eq!(config.cadence_millis, 3_000);
        assert_eq!(config.tick_millis, 250);

        assert!(load_config(&args(&["--cadence-ms", "0"])).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_session_uses_wall_clock() {
        let playback = prepare_playback(None, &SessionConfig::default()).unwrap();
        assert!(playback.run_for.is_none());
        assert!(matches!(
            playback.source.subscribe(mpsc::channel(1).0, Default::default()),
            Err(LocationError::Unsupported)
        ));

        // Virtual time does not move a wall clock
        let before = playback.clock.now_millis();
        tokio::time::advance(Duration::from_secs(3_600)).await;
        assert!(playback.clock.now_millis() - before < 3_600_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_follows_tokio_time() {
        let path = std::env::temp_dir().join(format!("warmer-{}.track", std::process::id()));
        std::fs::write(&path, "0,1,1\n20000,1,1\n").unwrap();
        let playback = prepare_playback(Some(&path), &SessionConfig::default());
        std::fs::remove_file(&path).unwrap();
        let playback = playback.unwrap();

        assert_eq!(playback.run_for, Some(Duration::from_millis(35_000)));

        let before = playback.clock.now_millis();
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(playback.clock.now_millis() - before, 60_000);
    }

    #[test]
    fn test_missing_track_file() {
        let missing = Path::new("/nonexistent/warmer.track");
        assert!(prepare_playback(Some(missing), &SessionConfig::default()).is_err());
    }

    #[test]
    fn test_track_length() {
        let script = parse_track("100,1,1\n15000,1,1\n").unwrap();
        assert_eq!(track_length(&script), Duration::from_millis(15_100));
    }
}
