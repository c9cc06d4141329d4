use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use owo_colors::{OwoColorize as _, Stream};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use color_mixer::{
    derive_theme, Algorithm, CachedRampQuery, Color, RampQuery, RampRequest, RampService,
    ToneSchedule,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("An IO error occurred: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not read base colors: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Mixer(#[from] color_mixer::Error),
    #[error("Nothing to derive: pass --input or at least one --set")]
    NoBases,
}

type Result<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Color ramps and derived theme colors", long_about = None)]
struct Args {
    #[clap(long, global = true, default_value = "auto")]
    color: ColorMode,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[clap(rename_all = "lowercase")]
enum ColorMode {
    Always,
    Auto,
    Never,
}

impl ColorMode {
    fn init(self) {
        match self {
            ColorMode::Always => owo_colors::set_override(true),
            ColorMode::Auto => {}
            ColorMode::Never => owo_colors::set_override(false),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print a ramp between two colors
    Ramp {
        start: String,
        end: String,
        /// Number of colors, clamped to 2..=512
        #[arg(long, default_value_t = 9, allow_negative_numbers = true)]
        steps: i64,
        /// Interpolation algorithm. Repeat to compare several.
        #[arg(long = "algo", default_value = "oklab")]
        algorithms: Vec<String>,
        /// Tone schedule for `hct_tone`
        #[arg(long)]
        schedule: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Derive a full set of theme colors from a few base colors
    Derive {
        /// JSON object mapping base names to hex colors
        #[arg(long)]
        input: Option<PathBuf>,
        /// A single base color as `name=#rrggbb`. Overrides --input.
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
        /// Ramps remembered between recipes; 0 disables the cache
        #[arg(long, default_value_t = 64)]
        cache_capacity: usize,
        #[arg(long)]
        json: bool,
    },
    /// List the supported algorithms and tone schedules
    Algorithms,
}

fn parse_assignment(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, hex)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), hex.trim().to_string()))
        }
        _ => Err(format!("expected `name=#rrggbb`, got `{value}`")),
    }
}

fn main() {
    let args = Args::parse();
    args.color.init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();

    let result = match args.command {
        Some(Commands::Ramp {
            start,
            end,
            steps,
            algorithms,
            schedule,
            json,
        }) => ramp(&mut stdout, &start, &end, steps, &algorithms, schedule.as_deref(), json),
        Some(Commands::Derive {
            input,
            assignments,
            cache_capacity,
            json,
        }) => derive(&mut stdout, input, assignments, cache_capacity, json),
        Some(Commands::Algorithms) => algorithms(&mut stdout),
        None => {
            Args::command().print_help().unwrap();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e.if_supports_color(Stream::Stderr, |s| s.red()));
        std::process::exit(1);
    }
}

fn swatch(color: Color) -> String {
    let (r, g, b) = color.components();
    format!("{}", "██".if_supports_color(Stream::Stdout, |s| s.truecolor(r, g, b)))
}

fn ramp<W: Write>(
    out: &mut W,
    start: &str,
    end: &str,
    steps: i64,
    algorithms: &[String],
    schedule: Option<&str>,
    json: bool,
) -> Result<()> {
    // Validate everything before printing anything.
    let requests = algorithms
        .iter()
        .map(|algorithm| RampRequest::parse(start, end, steps, algorithm, schedule))
        .collect::<color_mixer::Result<Vec<_>>>()?;

    let mut ramps = Vec::with_capacity(requests.len());
    for request in &requests {
        ramps.push((request.algorithm(), RampQuery.query(request)?));
    }

    if json {
        let by_algorithm: BTreeMap<&str, _> = ramps
            .iter()
            .map(|(algorithm, ramp)| (algorithm.as_str(), ramp))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &by_algorithm)?;
        writeln!(out)?;
        return Ok(());
    }

    for (algorithm, ramp) in &ramps {
        writeln!(out, "{}", algorithm.if_supports_color(Stream::Stdout, |s| s.bold()))?;
        for (i, color) in ramp.iter().enumerate() {
            writeln!(out, "  {:>3}  {} {}", i, swatch(*color), color)?;
        }
    }

    Ok(())
}

fn derive<W: Write>(
    out: &mut W,
    input: Option<PathBuf>,
    assignments: Vec<(String, String)>,
    cache_capacity: usize,
    json: bool,
) -> Result<()> {
    let mut bases: HashMap<String, String> = match input {
        Some(path) => serde_json::from_reader(std::io::BufReader::new(std::fs::File::open(path)?))?,
        None => HashMap::new(),
    };
    bases.extend(assignments);

    if bases.is_empty() {
        return Err(CliError::NoBases);
    }

    let theme = match NonZeroUsize::new(cache_capacity) {
        Some(capacity) => derive_theme(&CachedRampQuery::new(RampQuery, capacity), &bases),
        None => derive_theme(&RampQuery, &bases),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &theme)?;
        writeln!(out)?;
        return Ok(());
    }

    let width = theme.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, color) in theme.iter() {
        writeln!(out, "{:<width$}  {} {}", name, swatch(color), color)?;
    }

    Ok(())
}

fn algorithms<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", "Algorithms".if_supports_color(Stream::Stdout, |s| s.bold()))?;
    for algorithm in Algorithm::ALL {
        let note = if algorithm.uses_schedule() { "  (takes --schedule)" } else { "" };
        writeln!(out, "  {algorithm}{note}")?;
    }

    writeln!(out, "{}", "Tone schedules".if_supports_color(Stream::Stdout, |s| s.bold()))?;
    for schedule in ToneSchedule::ALL {
        writeln!(out, "  {schedule}")?;
    }

    Ok(())
}
