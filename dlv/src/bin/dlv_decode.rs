//! Decode recorded DLV sensor frames.
//!
//! Frames come from hex arguments or a binary dump of consecutive 4-byte
//! reads. Output is one line per frame, as text or JSON.
//!
//! ```text
//! dlv_decode --part DLV-030D 1f400000 c0000000
//! dlv_decode --kind gage --max-psi 15 --pressure-unit inh2o --dump capture.bin --json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dlv::{
    parse_hex_bytes, DlvSensor, Frame, OutputUnits, PartNumber, PressureUnit, Reading,
    ReplayError, ReplaySource, SensorConfig, SensorError, SensorKind, SensorProfile,
    TemperatureUnit,
};
use tracing::{info, warn};

/// Decode AllSensors DLV pressure sensor frames
#[derive(Parser, Debug)]
#[command(name = "dlv_decode")]
#[command(about = "Decode AllSensors DLV pressure sensor frames into calibrated readings")]
#[command(version)]
struct Args {
    /// Hex encoded frames, one 4-byte frame per argument, e.g. "1f400000" or "1f 40 00 00"
    frames: Vec<String>,

    /// Binary dump of consecutive 4-byte frames
    #[arg(long, conflicts_with = "frames")]
    dump: Option<PathBuf>,

    /// Part number, e.g. DLV-030D
    #[arg(long, conflicts_with_all = ["kind", "max_psi"])]
    part: Option<PartNumber>,

    /// Sensor kind when not using a part number
    #[arg(long, value_enum, requires = "max_psi")]
    kind: Option<SensorKind>,

    /// Full-scale pressure in PSI when not using a part number
    #[arg(long, requires = "kind")]
    max_psi: Option<f64>,

    /// JSON sensor profile supplying part and units
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Pressure output unit (overrides profile)
    #[arg(long, value_enum)]
    pressure_unit: Option<PressureUnit>,

    /// Temperature output unit (overrides profile)
    #[arg(long, value_enum)]
    temperature_unit: Option<TemperatureUnit>,

    /// Print one JSON object per reading
    #[arg(long)]
    json: bool,

    /// Skip frames flagged stale or error by the sensor
    #[arg(long)]
    valid_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn resolve(args: &Args) -> Result<(SensorConfig, OutputUnits)> {
    let profile = args
        .profile
        .as_deref()
        .map(|path| {
            SensorProfile::load_from_file(path)
                .with_context(|| format!("Failed to load profile {}", path.display()))
        })
        .transpose()?;

    let config = match (args.part, args.kind, args.max_psi, &profile) {
        (Some(part), _, _, _) => part.config(),
        (None, Some(kind), Some(max), _) => SensorConfig::new(kind, max)?,
        (None, _, _, Some(profile)) => profile.config()?,
        _ => bail!("No sensor given: use --part, --kind with --max-psi, or --profile"),
    };

    let mut units = profile.map(|p| p.units).unwrap_or_default();
    if let Some(unit) = args.pressure_unit {
        units.pressure = unit;
    }
    if let Some(unit) = args.temperature_unit {
        units.temperature = unit;
    }

    Ok((config, units))
}

fn load_source(args: &Args) -> Result<ReplaySource> {
    if let Some(path) = &args.dump {
        return ReplaySource::from_file(path)
            .with_context(|| format!("Failed to read dump {}", path.display()));
    }
    if args.frames.is_empty() {
        bail!("No frames given: pass hex frames or --dump <file>");
    }

    let mut frames = Vec::with_capacity(args.frames.len());
    for arg in &args.frames {
        frames.push(parse_frame(arg).with_context(|| format!("frame {arg}"))?);
    }
    let bytes = bytemuck::cast_slice::<Frame, u8>(&frames).to_vec();
    Ok(ReplaySource::new(bytes))
}

/// Parse one argument as exactly one frame
fn parse_frame(arg: &str) -> Result<Frame> {
    let bytes = parse_hex_bytes(arg)?;
    Ok(Frame::try_from(&bytes[..])?)
}

fn format_reading(reading: &Reading) -> String {
    format!(
        "{:<9} pressure={:>12.5} {:<5} temperature={:>8.2} {:<4} raw_p={:>5} raw_t={:>4}",
        reading.status.to_string(),
        reading.pressure,
        reading.units.pressure.to_string(),
        reading.temperature,
        reading.units.temperature.to_string(),
        reading.raw_pressure,
        reading.raw_temperature,
    )
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (config, units) = resolve(&args)?;
    let source = load_source(&args)?;
    info!(
        frames = source.pending_frames().len(),
        trailing_bytes = source.trailing_bytes(),
        "Loaded recording"
    );

    let mut sensor = DlvSensor::new(source, config, units);
    let mut decoded = 0usize;
    let mut skipped = 0usize;

    loop {
        let reading = match sensor.read() {
            Ok(reading) => reading,
            Err(SensorError::Transport(ReplayError::Exhausted)) => break,
            Err(SensorError::Transport(ReplayError::Truncated(e))) => {
                warn!("Ignoring trailing partial frame: {e}");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        decoded += 1;
        if args.valid_only && !reading.is_valid() {
            skipped += 1;
            continue;
        }

        if args.json {
            println!("{}", serde_json::to_string(&reading)?);
        } else {
            println!("{}", format_reading(&reading));
        }
    }

    info!(decoded, skipped, "Done");
    Ok(())
}
