use anyhow::{bail, Context, Result};
use api_types::ContactRecord;
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use qso_map_core::{
    format_hours_minutes, Activity, ContactDetails, GeoPoint, MapConfig, SceneComposer, SceneLayer,
};
use std::path::PathBuf;

mod input;
mod output;

use input::{located_events, read_records};
use output::{write_feature_collection, GeoJsonTarget};

#[derive(Parser, Debug)]
#[command(
    name = "qso-arc",
    author,
    version,
    about = "Render logged contacts and the arc to the latest one as GeoJSON",
    long_about = "Reads contact records (a JSON array, or an `entries` query response) and \
                  writes a GeoJSON FeatureCollection with one great-circle arc from the \
                  station to the most recent contact plus an age-styled marker per contact.\n\n\
                  Longitudes are in display space: the arc is split at the prime meridian \
                  and every piece is repeated one world to the west, so the output draws \
                  without wrap artifacts on a map spanning [-360, 360)."
)]
struct Args {
    /// Input JSON file with contact records
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Map configuration (station, palette, arc tuning) as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reference time for marker ageing (RFC 3339), defaults to now
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Station latitude, overrides the config
    #[arg(long, requires = "station_lon", allow_hyphen_values = true)]
    station_lat: Option<f64>,

    /// Station longitude, overrides the config
    #[arg(long, requires = "station_lat", allow_hyphen_values = true)]
    station_lon: Option<f64>,

    /// Number of points sampled along the arc, overrides the config
    #[arg(long)]
    arc_points: Option<usize>,

    /// Also log total and last-24h on-air time
    #[arg(long)]
    activity: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<MapConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Config: {}", path.display());
            MapConfig::from_path(path).context("Failed to load config")?
        }
        None => MapConfig::default(),
    };

    if let (Some(lat), Some(lon)) = (args.station_lat, args.station_lon) {
        config.station = GeoPoint::new(lat, lon).context("Invalid station location")?;
    }
    if let Some(arc_points) = args.arc_points {
        config.arc.arc_points = arc_points;
    }

    Ok(config)
}

/// On-air time counts every logged contact, located or not
fn log_activity(timestamps: impl IntoIterator<Item = i64>, now: DateTime<Utc>) {
    let Some(activity) = Activity::from_millis(timestamps) else {
        log::info!("  No activity");
        return;
    };

    log::info!(
        "  On air: {} total, {} in the last 24h",
        format_hours_minutes(activity.active_minutes()),
        format_hours_minutes(
            activity
                .last(now, TimeDelta::days(1))
                .map_or(0, |day| day.active_minutes())
        ),
    );
}

fn log_latest(record: &ContactRecord) {
    let details = ContactDetails::from(record);
    log::info!(
        "Last QSO: {} on {} kHz {}, operator {}, location {}",
        details.recv_callsign,
        details.freq_khz(),
        details.mode,
        record.operator.as_deref().unwrap_or("-"),
        details.location_source
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let config = load_config(&args)?;
    let now = args.now.unwrap_or_else(Utc::now);
    log::info!(
        "Station: {:.4}, {:.4}",
        config.station.latitude(),
        config.station.longitude()
    );

    let records = read_records(&args.input)?;
    let (events, stats) = located_events(records)?;
    log::info!(
        "Loaded {} of {} records ({} without location skipped)",
        events.len(),
        stats.total,
        stats.unlocated
    );
    if let Some(latest) = &stats.latest {
        log_latest(latest);
    }

    let composer = SceneComposer::from_config(&config).context("Invalid map configuration")?;
    let scene = composer
        .compose(&events, now.timestamp_millis())
        .context("Failed to compose map scene")?;

    match (&scene.target, &scene.arc) {
        (Some(target), Some(arc)) => log::info!(
            "Arc to {}: {} segments, seam crossing {:?}",
            target,
            arc.len(),
            arc.crossing()
        ),
        _ => log::warn!("No located contacts, writing markers only"),
    }

    let mut target = GeoJsonTarget::new();
    let mut layer = SceneLayer::new();
    layer.replace(&mut target, &scene);
    let collection = target.to_feature_collection();
    layer.clear(&mut target);

    write_feature_collection(collection, &args.output)?;

    if args.activity {
        log_activity(stats.timestamps, now);
    }

    log::info!("Done");
    Ok(())
}
