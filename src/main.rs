use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fall_sentinel::equipment::{self, EquipmentReading};
use fall_sentinel::helmet::{self, Detection};
use fall_sentinel::zones::ZoneTable;
use fall_sentinel::{BodySide, Classification, ClassifierConfig, Config, JsonLinesSource, LogSink, PoseSource, PostureClassifier};

#[derive(Parser)]
#[command(name = "fall-sentinel", about = "Worksite fall, equipment and zone safety checks")]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay recorded pose samples (JSON lines, `-` for stdin) through the fall classifier.
    Watch {
        samples: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
        #[arg(long, value_enum)]
        side: Option<Side>,
        /// Acknowledge each fall and keep monitoring instead of stopping.
        #[arg(long)]
        keep_going: bool,
    },
    /// Evaluate a machine against a simulated sensor reading.
    Equipment {
        machine: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check a worker image for a hard hat, optionally with detector output (JSON array of {class, confidence}).
    Helmet {
        image: PathBuf,
        #[arg(long)]
        detections: Option<PathBuf>,
    },
    /// Check whether a zone is restricted.
    Zone { name: String },
    /// Write the default configuration to a file.
    InitConfig { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Left,
    Right,
}

impl From<Side> for BodySide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => BodySide::Left,
            Side::Right => BodySide::Right,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Watch { samples, threshold, side, keep_going } => {
            let mut config = config;
            if let Some(threshold) = threshold {
                config.classifier.threshold = threshold;
            }
            if let Some(side) = side {
                config.classifier.side = side.into();
            }
            config.validate()?;
            watch(&samples, config.classifier, keep_going)
        }
        Command::Equipment { machine, seed } => check_equipment(&config, &machine, seed),
        Command::Helmet { image, detections } => check_helmet(&image, detections.as_deref()),
        Command::Zone { name } => {
            let zones = ZoneTable::new(config.zones);
            if zones.is_empty() {
                warn!("no zones configured");
            }
            println!("{}: {}", name.trim(), zones.lookup(&name));
            Ok(())
        }
        Command::InitConfig { path } => {
            Config::default().save(&path)?;
            info!("wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn open_samples(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("opening samples {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn watch(path: &Path, config: ClassifierConfig, keep_going: bool) -> Result<()> {
    info!(
        "Fall sentinel starting | threshold={:.2} | side={}",
        config.threshold,
        config.side.name()
    );

    let mut source = JsonLinesSource::new(open_samples(path)?);
    let mut classifier = PostureClassifier::new(config, LogSink)?;
    let mut falls = 0u32;
    let mut indeterminate = 0u64;

    while let Some(sample) = source.next_sample()? {
        match classifier.classify(&sample)? {
            Classification::Normal(Some(indicator)) => println!("Fall Value: {:.2}", indicator.rounded()),
            Classification::Normal(None) => {
                indeterminate += 1;
                println!("Fall Value: Calculating...");
            }
            Classification::Alerted(indicator) => {
                falls += 1;
                println!("Fall Detected, Value: {:.2}", indicator.rounded());
                if !keep_going {
                    break;
                }
                classifier.reset();
            }
        }
    }

    info!(
        "Processed {} samples | {} falls | {} indeterminate",
        classifier.samples_seen(),
        falls,
        indeterminate
    );
    Ok(())
}

fn check_equipment(config: &Config, machine: &str, seed: Option<u64>) -> Result<()> {
    let limits = config
        .equipment
        .machines
        .get(machine)
        .with_context(|| format!("unknown machine {machine:?}"))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let reading = EquipmentReading::simulated(&mut rng);
    let suitability = equipment::evaluate(&reading, limits, config.equipment.max_air_quality);

    println!("Details for {machine}");
    println!("Vibration: {:.2}", reading.vibration);
    println!("Temperature: {:.1}°C", reading.temperature);
    println!("Air Quality (AQI): {}", reading.air_quality);
    println!("Suitability: {suitability}");

    match equipment::cool_down_minutes(reading.temperature, limits.max_temperature) {
        0 => println!("A person can go near the machine."),
        minutes => println!(
            "A person should not go near the machine. It will take approximately {minutes} minutes to cool down."
        ),
    }
    Ok(())
}

fn check_helmet(image_path: &Path, detections_path: Option<&Path>) -> Result<()> {
    let image = image::open(image_path)
        .with_context(|| format!("opening image {}", image_path.display()))?
        .to_rgb8();

    let detections: Vec<Detection> = match detections_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading detections {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing detections {}", path.display()))?
        }
        None => {
            warn!("no detector output given; relying on the colour cue only");
            Vec::new()
        }
    };

    let verdict = helmet::evaluate(&detections, &image);
    info!(
        "helmet box={} no_helmet box={} yellow={}",
        verdict.helmet_detected, verdict.no_helmet_detected, verdict.yellow_detected
    );
    if verdict.helmet_present() {
        println!("Helmet is present. No issues detected.");
    } else {
        println!("No helmet, ask to wear helmet.");
    }
    Ok(())
}
