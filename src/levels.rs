//! Level sources
//!
//! Levels arrive as JSON descriptors (`{"levels": [{name, rows, cols, grid}]}`).
//! Descriptors are normalized so every grid is exactly `rows × cols`, and
//! loading walks a list of sources in order, ending at a built-in level so
//! the simulation always has something to play.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid cell meaning "no brick"
pub const EMPTY_CELL: char = '0';

/// Largest row or column count a level may declare
pub const MAX_GRID_DIM: usize = 64;

/// Failure to obtain levels from one source
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read levels from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse levels: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level source contains no levels")]
    Empty,

    #[error("level {index} is {rows}x{cols}, larger than {max}x{max}", max = MAX_GRID_DIM)]
    TooLarge { index: usize, rows: usize, cols: usize },

    #[error("level {index} ('{name}') has no bricks")]
    NoBricks { index: usize, name: String },
}

/// Raw level as it appears in a level file; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub cols: Option<usize>,
    #[serde(default)]
    pub grid: Vec<String>,
}

impl LevelDescriptor {
    /// Declared rows and columns, inferred from the grid when missing
    pub fn dimensions(&self) -> (usize, usize) {
        let rows = self.rows.unwrap_or(self.grid.len());
        let cols = self
            .cols
            .unwrap_or_else(|| self.grid.first().map_or(0, |r| r.chars().count()));
        (rows, cols)
    }
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    #[serde(default)]
    levels: Vec<LevelDescriptor>,
}

/// A normalized level: `grid` has exactly `rows` rows of exactly `cols` cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    grid: Vec<Vec<char>>,
}

impl Level {
    /// Normalize a descriptor: missing rows/cols come from the grid itself,
    /// short rows are padded with empty cells and long rows are truncated.
    /// Dimensions are capped at `MAX_GRID_DIM`.
    pub fn normalize(desc: &LevelDescriptor) -> Self {
        let (rows, cols) = desc.dimensions();
        let (rows, cols) = (rows.min(MAX_GRID_DIM), cols.min(MAX_GRID_DIM));

        let grid = (0..rows)
            .map(|r| {
                let mut row: Vec<char> = desc
                    .grid
                    .get(r)
                    .map(|s| s.chars().take(cols).collect())
                    .unwrap_or_default();
                row.resize(cols, EMPTY_CELL);
                row
            })
            .collect();

        Self {
            name: desc.name.clone().unwrap_or_else(|| "Level".to_string()),
            rows,
            cols,
            grid,
        }
    }

    /// Cell at (row, col), empty when out of range
    pub fn cell(&self, row: usize, col: usize) -> char {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(EMPTY_CELL)
    }

    /// True if at least one cell holds a brick
    pub fn has_bricks(&self) -> bool {
        self.grid.iter().flatten().any(|&c| c != EMPTY_CELL)
    }

    /// Rows rendered back to strings
    pub fn grid_rows(&self) -> impl Iterator<Item = String> + '_ {
        self.grid.iter().map(|r| r.iter().collect())
    }

    /// The level used when no source can be loaded
    pub fn fallback() -> Self {
        Self::normalize(&LevelDescriptor {
            name: Some("Fallback".to_string()),
            rows: Some(6),
            cols: Some(12),
            grid: [
                "111111111111",
                "122222222221",
                "133333333331",
                "144444444441",
                "100000000001",
                "111111111111",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        })
    }
}

/// Where a level set may come from
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// A JSON level file on disk
    File(PathBuf),
    /// JSON text bundled with the host (e.g. embedded in a page)
    Inline(String),
}

/// A non-empty, ordered list of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::fallback()
    }
}

impl LevelSet {
    /// Build from already-normalized levels; `None` when empty
    pub fn new(levels: Vec<Level>) -> Option<Self> {
        if levels.is_empty() {
            None
        } else {
            Some(Self { levels })
        }
    }

    /// The single built-in fallback level
    pub fn fallback() -> Self {
        Self {
            levels: vec![Level::fallback()],
        }
    }

    /// Parse a level file's JSON text. Oversized or brickless levels make
    /// the whole file unusable.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        let mut levels = Vec::with_capacity(file.levels.len());
        for (index, desc) in file.levels.iter().enumerate() {
            let (rows, cols) = desc.dimensions();
            if rows > MAX_GRID_DIM || cols > MAX_GRID_DIM {
                return Err(LevelError::TooLarge { index, rows, cols });
            }
            let level = Level::normalize(desc);
            if !level.has_bricks() {
                return Err(LevelError::NoBricks {
                    index,
                    name: level.name,
                });
            }
            levels.push(level);
        }
        Self::new(levels).ok_or(LevelError::Empty)
    }

    /// Read and parse a level file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from a single source
    pub fn load(source: &LevelSource) -> Result<Self, LevelError> {
        match source {
            LevelSource::File(path) => Self::load_from_file(path),
            LevelSource::Inline(json) => Self::from_json(json),
        }
    }

    /// Try each source in order; the first that yields levels wins.
    /// Falls back to the built-in level when every source fails.
    pub fn load_layered<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a LevelSource>,
    {
        for source in sources {
            match Self::load(source) {
                Ok(set) => {
                    log::info!("Loaded {} level(s) from {}", set.len(), source_label(source));
                    return set;
                }
                Err(e) => log::warn!("Level source {} unusable: {e}", source_label(source)),
            }
        }
        log::warn!("No level source usable, using built-in fallback level");
        Self::fallback()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`, clamped into range
    pub fn get(&self, index: usize) -> &Level {
        &self.levels[self.clamp_index(index)]
    }

    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.levels.len() - 1)
    }

    /// Index after `index`, wrapping to the first level after the last
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 < self.levels.len() {
            index + 1
        } else {
            0
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

fn source_label(source: &LevelSource) -> String {
    match source {
        LevelSource::File(path) => path.display().to_string(),
        LevelSource::Inline(_) => "inline".to_string(),
    }
}
