//! Maze configuration: validation and layered loading.
//!
//! Two layers live here:
//!
//! - [`MazeConfig::new`] is the validator. It takes raw, untrusted values and
//!   either returns a well-formed configuration or a [`ValidationError`]
//!   naming the offending [`Field`]. Nothing is allocated before it succeeds.
//! - The loader reads a `maze.toml` file and merges it over the stock
//!   defaults, then runs the validator.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! width = 20              # Columns
//! height = 15             # Rows
//! entry = [0, 0]          # Entry cell as [x, y]
//! # exit = [19, 14]       # Exit cell as [x, y], defaults to the bottom-right corner
//! output_file = "maze.txt"
//! perfect = true          # Accepted, currently always a perfect maze
//! # seed = 42             # Omit for a fresh maze every run
//! margin = 1              # Minimum free cells between the "42" glyph and the border
//! ```
//!
//! ## Layering
//!
//! ```text
//! stock defaults  ←  maze.toml  ←  command-line flags
//! ```
//!
//! Each layer is a sparse TOML table; later layers override earlier ones key
//! by key. Unknown keys are rejected to catch typos early.

use crate::grid::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Glyph margin applied when the config does not set one.
pub const DEFAULT_MARGIN: usize = 1;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A configuration field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Width,
    Height,
    Entry,
    Exit,
    OutputFile,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Width => "width",
            Field::Height => "height",
            Field::Entry => "entry",
            Field::Exit => "exit",
            Field::OutputFile => "output_file",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be a positive integer, got {value}")]
    NotPositive { field: Field, value: i64 },
    #[error("{field} ({x}, {y}) is outside the {width}x{height} maze")]
    OutOfBounds {
        field: Field,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    #[error("a {width}x{height} maze has more cells than this platform can address")]
    TooLarge { width: usize, height: usize },
    #[error("entry and exit must be different cells, both are {0}")]
    EntryIsExit(Coord),
    #[error("output_file must be a non-empty string")]
    EmptyOutputFile,
}

impl ValidationError {
    /// The field that failed.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::NotPositive { field, .. } => *field,
            ValidationError::OutOfBounds { field, .. } => *field,
            ValidationError::TooLarge { .. } => Field::Width,
            ValidationError::EntryIsExit(_) => Field::Exit,
            ValidationError::EmptyOutputFile => Field::OutputFile,
        }
    }
}

/// A validated maze configuration.
///
/// Only constructible through [`MazeConfig::new`], so holding one means every
/// check has passed: positive dimensions, in-bounds and distinct entry/exit,
/// non-empty output identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeConfig {
    width: usize,
    height: usize,
    entry: Coord,
    exit: Coord,
    output_file: String,
    perfect: bool,
    seed: Option<u64>,
}

impl MazeConfig {
    /// Validate raw construction parameters.
    ///
    /// Checks run in order: width, height, cell count, entry bounds, exit
    /// bounds, entry ≠ exit, output identifier. The first failure is returned.
    pub fn new(
        width: i64,
        height: i64,
        entry: (i64, i64),
        exit: (i64, i64),
        output_file: impl Into<String>,
        perfect: bool,
        seed: Option<u64>,
    ) -> Result<Self, ValidationError> {
        let width = positive(Field::Width, width)?;
        let height = positive(Field::Height, height)?;
        if width.checked_mul(height).is_none() {
            return Err(ValidationError::TooLarge { width, height });
        }
        let entry = in_bounds(Field::Entry, entry, width, height)?;
        let exit = in_bounds(Field::Exit, exit, width, height)?;
        if entry == exit {
            return Err(ValidationError::EntryIsExit(entry));
        }
        let output_file = output_file.into();
        if output_file.trim().is_empty() {
            return Err(ValidationError::EmptyOutputFile);
        }
        Ok(Self {
            width,
            height,
            entry,
            exit,
            output_file,
            perfect,
            seed,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn entry(&self) -> Coord {
        self.entry
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    /// Where the caller should write the result. The engine never reads it.
    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    pub fn perfect(&self) -> bool {
        self.perfect
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

fn positive(field: Field, value: i64) -> Result<usize, ValidationError> {
    match usize::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ValidationError::NotPositive { field, value }),
    }
}

fn in_bounds(
    field: Field,
    (x, y): (i64, i64),
    width: usize,
    height: usize,
) -> Result<Coord, ValidationError> {
    match (usize::try_from(x), usize::try_from(y)) {
        (Ok(cx), Ok(cy)) if cx < width && cy < height => Ok(Coord::new(cx, cy)),
        _ => Err(ValidationError::OutOfBounds {
            field,
            x,
            y,
            width,
            height,
        }),
    }
}

// =============================================================================
// Config file
// =============================================================================

/// On-disk shape of `maze.toml`, before validation.
///
/// Integers are signed so that negative values reach the validator and are
/// reported against their field instead of failing as a type error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub width: i64,
    pub height: i64,
    /// Entry cell as `[x, y]`.
    pub entry: [i64; 2],
    /// Exit cell as `[x, y]`. Unset means the bottom-right corner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<[i64; 2]>,
    pub output_file: String,
    pub perfect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Minimum free cells between the glyph and every border.
    pub margin: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            width: 20,
            height: 15,
            entry: [0, 0],
            exit: None,
            output_file: "maze.txt".to_string(),
            perfect: true,
            seed: None,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl ConfigFile {
    /// Run the validator over the file values.
    pub fn validate(&self) -> Result<RunConfig, ValidationError> {
        let [exit_x, exit_y] = self
            .exit
            .unwrap_or([self.width.saturating_sub(1), self.height.saturating_sub(1)]);
        let maze = MazeConfig::new(
            self.width,
            self.height,
            (self.entry[0], self.entry[1]),
            (exit_x, exit_y),
            self.output_file.clone(),
            self.perfect,
            self.seed,
        )?;
        Ok(RunConfig {
            maze,
            margin: self.margin,
        })
    }
}

/// Everything a generation run needs: the maze itself plus the glyph margin
/// handed to [`MazeEngine::generate`](crate::engine::MazeEngine::generate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub maze: MazeConfig,
    pub margin: usize,
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ConfigFile::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but cannot be read or is invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge `layers` in order over the stock defaults, deserialize and validate.
pub fn resolve_config<I>(layers: I) -> Result<RunConfig, ConfigError>
where
    I: IntoIterator<Item = toml::Value>,
{
    let merged = layers
        .into_iter()
        .fold(stock_defaults_value(), merge_toml);
    let file: ConfigFile = merged.try_into()?;
    Ok(file.validate()?)
}

/// Load `path` over the stock defaults. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `maze.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mazegen configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Maze size in cells.
width = 20
height = 15

# Entry and exit cells as [x, y], counted from the top-left corner.
# Both must lie inside the maze, must differ, and must not fall inside
# the "42" glyph. The exit defaults to the bottom-right corner.
entry = [0, 0]
# exit = [19, 14]

# File the generated maze is written to.
output_file = "maze.txt"

# Accepted for compatibility. Generation always produces a perfect maze
# (exactly one path between any two cells).
perfect = true

# Random seed. The same seed and settings always produce the same maze.
# Omit for a different maze on every run.
# seed = 42

# Minimum number of free cells between the "42" glyph and each border.
# The glyph is skipped (with a warning) when the maze is too small.
margin = 1
"##
}
