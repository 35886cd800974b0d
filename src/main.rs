use clap::{Parser, Subcommand};
use log::info;
use mazegen::config::{self, ConfigError, RunConfig};
use mazegen::{MazeEngine, engine, output};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

/// A cell given on the command line as `X,Y`.
#[derive(Debug, Clone, Copy)]
struct CellArg {
    x: i64,
    y: i64,
}

impl FromStr for CellArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid coordinate '{v}': {e}"))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

/// Flags that override the config file.
#[derive(clap::Args, Clone)]
struct MazeArgs {
    /// Maze width in cells
    #[arg(long)]
    width: Option<i64>,

    /// Maze height in cells
    #[arg(long)]
    height: Option<i64>,

    /// Entry cell as X,Y
    #[arg(long, allow_hyphen_values = true)]
    entry: Option<CellArg>,

    /// Exit cell as X,Y (defaults to the bottom-right corner)
    #[arg(long, allow_hyphen_values = true)]
    exit: Option<CellArg>,

    /// File the maze is written to
    #[arg(long)]
    output_file: Option<String>,

    /// Random seed (same seed and settings → same maze)
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    seed: Option<u64>,

    /// Minimum free cells between the "42" glyph and the border
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    margin: Option<u64>,
}

impl MazeArgs {
    /// The flags as a sparse TOML layer, same keys as `maze.toml`.
    fn overlay(&self) -> toml::Value {
        use toml::Value;

        let cell = |c: CellArg| Value::Array(vec![Value::Integer(c.x), Value::Integer(c.y)]);
        let mut table = toml::Table::new();
        if let Some(width) = self.width {
            table.insert("width".into(), Value::Integer(width));
        }
        if let Some(height) = self.height {
            table.insert("height".into(), Value::Integer(height));
        }
        if let Some(entry) = self.entry {
            table.insert("entry".into(), cell(entry));
        }
        if let Some(exit) = self.exit {
            table.insert("exit".into(), cell(exit));
        }
        if let Some(output_file) = &self.output_file {
            table.insert("output_file".into(), Value::String(output_file.clone()));
        }
        // Both are range-checked by clap to fit in an i64.
        if let Some(seed) = self.seed {
            table.insert("seed".into(), Value::Integer(seed as i64));
        }
        if let Some(margin) = self.margin {
            table.insert("margin".into(), Value::Integer(margin as i64));
        }
        Value::Table(table)
    }
}

#[derive(Parser)]
#[command(name = "mazegen")]
#[command(about = "Generate perfect mazes around a \"42\" glyph")]
#[command(long_about = "\
Generate perfect mazes around a \"42\" glyph

Every maze has exactly one path between any two cells. A \"42\" made of
permanently closed cells is scaled and centered in the maze when it fits.

Settings are layered, later layers win:

  stock defaults  <-  maze.toml  <-  command-line flags

Unless set explicitly, the exit is the bottom-right corner of the maze.

Output file format:

  <one hex digit per cell, one line per row>

  <entry x,y>
  <exit x,y>

Wall bits per cell: 1 = North, 2 = East, 4 = South, 8 = West (set = closed).

Run 'mazegen gen-config' to print a documented maze.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "maze.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a maze and write it to the output file
    Generate(MazeArgs),
    /// Validate the settings without generating
    Check(MazeArgs),
    /// Print a stock maze.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate(args) => {
            let settings = resolve(&cli.config, &args)?;
            let mut engine = MazeEngine::new(settings.maze.clone());
            let generation = engine.generate(settings.margin)?;
            let grid = engine.grid().ok_or("generation produced no grid")?;

            let body = output::format_maze_file(grid, settings.maze.entry(), settings.maze.exit());
            let path = Path::new(settings.maze.output_file());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, body)?;
            info!("wrote {}", path.display());

            output::print_generation_summary(&settings.maze, &generation);
        }
        Command::Check(args) => {
            let settings = resolve(&cli.config, &args)?;
            engine::check_placement(&settings.maze, settings.margin)?;
            output::print_check_summary(&settings.maze, settings.margin);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stock defaults ← config file (if present) ← command-line flags.
fn resolve(config_path: &Path, args: &MazeArgs) -> Result<RunConfig, ConfigError> {
    let file = config::load_raw_config(config_path)?;
    if file.is_none() {
        info!("no config at {}, using defaults", config_path.display());
    }
    config::resolve_config(file.into_iter().chain([args.overlay()]))
}
