//! Command-line interface for sample_colors
//!
//! Averages colors around the given points of an image and writes them as
//! CSV (RGB and Lab per point).

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sample_colors::{sample_image, Coordinate, SamplingConfig, SamplingError, WhitePoint};

#[derive(Parser)]
#[command(name = "sample-colors")]
#[command(about = "Export averaged RGB and Lab values around image points to CSV")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample an image and write the averaged colors
    Sample {
        /// Image to sample
        image: PathBuf,

        /// Sample point as X,Y (repeatable; appended after config points)
        #[arg(short, long = "point", value_name = "X,Y")]
        points: Vec<Coordinate>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Window size (3 for 3x3)
        #[arg(short, long)]
        size: Option<i64>,

        /// Output CSV path, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reference white for Lab values: d50 or d65
        #[arg(short, long)]
        white_point: Option<WhitePoint>,

        /// Decimal places for exported values
        #[arg(long)]
        precision: Option<usize>,

        /// Append the number of averaged pixels per point
        #[arg(long)]
        sample_count: bool,

        /// Omit the file name, color profile and bit depth lines
        #[arg(long)]
        no_metadata: bool,
    },
    /// Write a default configuration file
    InitConfig {
        /// Where to write the JSON file
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sample_colors=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Sample {
            image,
            points,
            config,
            size,
            output,
            white_point,
            precision,
            sample_count,
            no_metadata,
        } => {
            let overrides = Overrides {
                points,
                size,
                output,
                white_point,
                precision,
                sample_count,
                no_metadata,
            };
            run_sample(image, config, overrides)
        }
        Commands::InitConfig { output, force } => run_init_config(output, force),
    };

    if let Err(err) = result {
        match err.downcast_ref::<SamplingError>() {
            Some(sampling) => eprintln!("Error: {}", sampling.user_message()),
            None => eprintln!("Error: {:#}", err),
        }
        tracing::debug!(error = ?err, "Command failed");
        std::process::exit(1);
    }
}

/// Command-line values that take precedence over the config file
struct Overrides {
    points: Vec<Coordinate>,
    size: Option<i64>,
    output: Option<PathBuf>,
    white_point: Option<WhitePoint>,
    precision: Option<usize>,
    sample_count: bool,
    no_metadata: bool,
}

impl Overrides {
    fn apply(self, mut config: SamplingConfig) -> SamplingConfig {
        config.points.extend(self.points);
        if let Some(size) = self.size {
            config.window_size = size;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(white_point) = self.white_point {
            config.lab_white_point = white_point;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        config.include_sample_count |= self.sample_count;
        if self.no_metadata {
            config.include_metadata = false;
        }
        config
    }
}

fn run_sample(image: PathBuf, config_path: Option<PathBuf>, overrides: Overrides) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => SamplingConfig::from_json_file(&path)?,
        None => SamplingConfig::default(),
    };
    let config = overrides.apply(config);

    if config.points.is_empty() {
        anyhow::bail!("no sample points given; use --point X,Y or a config file with \"points\"");
    }

    let report = sample_image(&image, &config)?;

    if config.output_path.as_os_str() == "-" {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        report.write_csv(&mut lock, &config)?;
        lock.flush().context("flushing stdout")?;
    } else {
        report.export_to_path(&config.output_path, &config)?;
        println!("Color values exported to {}", config.output_path.display());
    }
    Ok(())
}

fn run_init_config(output: PathBuf, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let config = SamplingConfig {
        points: vec![Coordinate::new(0, 0)],
        ..Default::default()
    };
    config.to_json_file(&output)?;

    println!("Configuration saved to {}", output.display());
    println!("  Window size: {}x{}", config.window_size, config.window_size);
    println!("  Lab white point: {}", config.lab_white_point);
    println!("  Output: {}", config.output_path.display());
    Ok(())
}
