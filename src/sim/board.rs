//! Board model
//!
//! A fixed 4x4 row-major matrix of optional tiles. The matrix is the only
//! source of truth for tile arrangement; tile positions are visual state.

use std::fmt::{self, Display, Formatter};

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::settings::BoardLayout;

/// Stable tile identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl Display for TileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a tile is for compaction purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCategory {
    /// Treated as empty space that gets pushed out of the way
    Filler,
    /// Movable payload
    Content,
}

/// A tile entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub category: TileCategory,
    /// Visual position in scene coordinates
    pub position: Vec2,
}

impl Tile {
    pub fn new(id: u32, category: TileCategory, position: Vec2) -> Self {
        Self {
            id: TileId(id),
            category,
            position,
        }
    }

    pub fn filler(id: u32, position: Vec2) -> Self {
        Self::new(id, TileCategory::Filler, position)
    }

    pub fn content(id: u32, position: Vec2) -> Self {
        Self::new(id, TileCategory::Content, position)
    }

    #[inline]
    pub fn is_filler(&self) -> bool {
        self.category == TileCategory::Filler
    }
}

/// Matrix coordinate (row-major, row 0 is the top row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell for a row-major index
    pub const fn from_index(index: usize) -> Self {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    pub const fn index(&self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    pub const fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    fn checked(row: usize, col: usize) -> Result<Self, BoardError> {
        let cell = Self::new(row, col);
        if cell.in_bounds() {
            Ok(cell)
        } else {
            Err(BoardError::OutOfBounds { row, col })
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board access failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the 4x4 board")]
    OutOfBounds { row: usize, col: usize },
    #[error("pattern row {row} must hold exactly 4 of 'F', 'C' or '.'")]
    InvalidPattern { row: usize },
}

/// Scene-graph provider used to seed a board
pub trait SceneGraph {
    /// Ordered children of the named container, or None if it doesn't exist
    fn children(&self, container: &str) -> Option<Vec<Tile>>;
}

/// The 4x4 tile matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [[Option<Tile>; GRID_SIZE]; GRID_SIZE],
    layout: BoardLayout,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardLayout::default())
    }
}

impl Board {
    /// Empty board
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
            layout,
        }
    }

    /// Fill cells in row-major order; extra tiles are ignored and missing
    /// tiles leave cells empty
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>, layout: BoardLayout) -> Self {
        let mut board = Self::new(layout);
        for (index, tile) in tiles.into_iter().take(CELL_COUNT).enumerate() {
            let cell = Cell::from_index(index);
            board.cells[cell.row][cell.col] = Some(tile);
        }
        board
    }

    /// Seed a board from the children of a scene container
    pub fn snapshot<S: SceneGraph + ?Sized>(scene: &S, container: &str, layout: BoardLayout) -> Self {
        match scene.children(container) {
            Some(children) => {
                if children.len() > CELL_COUNT {
                    log::warn!(
                        "Container '{}' has {} children, only the first {} are used",
                        container,
                        children.len(),
                        CELL_COUNT
                    );
                }
                Self::from_tiles(children, layout)
            }
            None => {
                log::warn!("Container '{}' not found, starting with an empty board", container);
                Self::new(layout)
            }
        }
    }

    /// Deterministic board with `filler_count` filler tiles scattered among
    /// content tiles, every tile placed on its slot
    pub fn shuffled(seed: u64, filler_count: usize, layout: BoardLayout) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let filler_count = filler_count.min(CELL_COUNT);
        let mut categories: Vec<TileCategory> = (0..CELL_COUNT)
            .map(|i| {
                if i < filler_count {
                    TileCategory::Filler
                } else {
                    TileCategory::Content
                }
            })
            .collect();
        categories.shuffle(&mut rng);

        let tiles = categories.into_iter().enumerate().map(|(i, category)| {
            Tile::new(i as u32, category, layout.slot_position(Cell::from_index(i)))
        });
        Self::from_tiles(tiles, layout)
    }

    /// Board from one string per row: `F` filler, `C` content, `.` empty.
    /// Whitespace is ignored; ids are assigned in row-major order and every
    /// tile starts on its slot.
    pub fn from_pattern(rows: [&str; GRID_SIZE], layout: BoardLayout) -> Result<Self, BoardError> {
        let mut board = Self::new(layout);
        for (row, text) in rows.iter().enumerate() {
            let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != GRID_SIZE {
                return Err(BoardError::InvalidPattern { row });
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let cell = Cell::new(row, col);
                let category = match symbol {
                    'F' => TileCategory::Filler,
                    'C' => TileCategory::Content,
                    '.' => continue,
                    _ => return Err(BoardError::InvalidPattern { row }),
                };
                board.cells[row][col] = Some(Tile::new(
                    cell.index() as u32,
                    category,
                    layout.slot_position(cell),
                ));
            }
        }
        Ok(board)
    }

    /// Category layout in the `from_pattern` format (no spaces)
    pub fn pattern(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| match slot {
                        Some(t) if t.is_filler() => 'F',
                        Some(_) => 'C',
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Tile at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<Option<&Tile>, BoardError> {
        let cell = Cell::checked(row, col)?;
        Ok(self.tile(cell))
    }

    /// Replace the tile at (row, col), returning the previous occupant
    pub fn set(&mut self, row: usize, col: usize, tile: Option<Tile>) -> Result<Option<Tile>, BoardError> {
        let cell = Cell::checked(row, col)?;
        Ok(std::mem::replace(&mut self.cells[cell.row][cell.col], tile))
    }

    /// Visual center of a cell, whether or not it holds a tile
    pub fn slot_position(&self, cell: Cell) -> Vec2 {
        self.layout.slot_position(cell)
    }

    pub(crate) fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.cells[cell.row][cell.col].as_ref()
    }

    pub(crate) fn tile_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        self.cells[cell.row][cell.col].as_mut()
    }

    pub(crate) fn category_at(&self, cell: Cell) -> Option<TileCategory> {
        self.tile(cell).map(|t| t.category)
    }

    /// Position a swap reads for a cell: the tile's own position, or the
    /// slot center when the cell is empty
    pub(crate) fn visual_position(&self, cell: Cell) -> Vec2 {
        self.tile(cell)
            .map(|t| t.position)
            .unwrap_or_else(|| self.slot_position(cell))
    }

    /// Exchange two cells and force each moved tile onto its destination
    pub(crate) fn commit_swap(&mut self, a: Cell, b: Cell, position_a: Vec2, position_b: Vec2) {
        if let Some(tile) = self.tile_mut(a) {
            tile.position = position_b;
        }
        if let Some(tile) = self.tile_mut(b) {
            tile.position = position_a;
        }
        self.swap_cells(a, b);
    }

    /// Exchange the references held by two cells
    pub(crate) fn swap_cells(&mut self, a: Cell, b: Cell) {
        let tile_a = self.cells[a.row][a.col].take();
        let tile_b = self.cells[b.row][b.col].take();
        self.cells[a.row][a.col] = tile_b;
        self.cells[b.row][b.col] = tile_a;
    }

    /// Occupied cells in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Cell, &Tile)> + '_ {
        (0..CELL_COUNT).filter_map(|i| {
            let cell = Cell::from_index(i);
            self.tile(cell).map(|t| (cell, t))
        })
    }

    /// Sorted ids of every tile on the board
    pub fn tile_ids(&self) -> Vec<TileId> {
        let mut ids: Vec<TileId> = self.tiles().map(|(_, t)| t.id).collect();
        ids.sort();
        ids
    }

    /// Cell currently holding the tile
    pub fn find(&self, id: TileId) -> Option<Cell> {
        self.tiles().find(|(_, t)| t.id == id).map(|(cell, _)| cell)
    }

    /// Number of tiles on the board
    pub fn len(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if every tile sits exactly on its cell's slot
    pub fn is_visually_synced(&self) -> bool {
        self.tiles()
            .all(|(cell, t)| (t.position - self.slot_position(cell)).length() < 0.001)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (col, slot) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                match slot {
                    Some(t) if t.is_filler() => write!(f, "--")?,
                    Some(t) => write!(f, "{:>02}", t.id.0)?,
                    None => write!(f, "..")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scene(Vec<Tile>);

    impl SceneGraph for Scene {
        fn children(&self, container: &str) -> Option<Vec<Tile>> {
            (container == "spriteFrame").then(|| self.0.clone())
        }
    }

    fn tiles(n: usize) -> Vec<Tile> {
        (0..n)
            .map(|i| Tile::content(i as u32, Vec2::new(i as f32, 0.0)))
            .collect()
    }

    #[test]
    fn test_from_tiles_row_major() {
        let board = Board::from_tiles(tiles(6), BoardLayout::default());
        assert_eq!(board.get(0, 3).unwrap().unwrap().id, TileId(3));
        assert_eq!(board.get(1, 1).unwrap().unwrap().id, TileId(5));
        assert!(board.get(1, 2).unwrap().is_none());
        assert_eq!(board.len(), 6);
    }

    #[test]
    fn test_from_tiles_ignores_extra() {
        let board = Board::from_tiles(tiles(20), BoardLayout::default());
        assert_eq!(board.len(), CELL_COUNT);
        assert_eq!(board.get(3, 3).unwrap().unwrap().id, TileId(15));
    }

    #[test]
    fn test_snapshot_from_scene() {
        let scene = Scene(tiles(16));
        let board = Board::snapshot(&scene, "spriteFrame", BoardLayout::default());
        assert_eq!(board.len(), 16);

        let missing = Board::snapshot(&scene, "nope", BoardLayout::default());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_bounds() {
        let mut board = Board::default();
        assert_eq!(
            board.get(4, 0),
            Err(BoardError::OutOfBounds { row: 4, col: 0 })
        );
        assert_eq!(
            board.set(0, 4, None),
            Err(BoardError::OutOfBounds { row: 0, col: 4 })
        );
    }

    #[test]
    fn test_set_returns_previous() {
        let mut board = Board::default();
        let tile = Tile::filler(7, Vec2::ZERO);
        assert_eq!(board.set(2, 1, Some(tile)).unwrap(), None);
        assert_eq!(board.set(2, 1, None).unwrap(), Some(tile));
        assert!(board.is_empty());
    }

    #[test]
    fn test_swap_cells_with_empty() {
        let mut board = Board::default();
        board.set(0, 0, Some(Tile::content(1, Vec2::ZERO))).unwrap();
        board.swap_cells(Cell::new(0, 0), Cell::new(1, 0));
        assert!(board.get(0, 0).unwrap().is_none());
        assert_eq!(board.find(TileId(1)), Some(Cell::new(1, 0)));
    }

    #[test]
    fn test_shuffled_is_deterministic() {
        let a = Board::shuffled(42, 5, BoardLayout::default());
        let b = Board::shuffled(42, 5, BoardLayout::default());
        assert_eq!(a, b);
        assert_eq!(a.tiles().filter(|(_, t)| t.is_filler()).count(), 5);
        assert!(a.is_visually_synced());
    }

    #[test]
    fn test_pattern_roundtrip() {
        let rows = ["F C . C", "CCCC", "....", "F F F F"];
        let board = Board::from_pattern(rows, BoardLayout::default()).unwrap();
        assert_eq!(board.pattern(), vec!["FC.C", "CCCC", "....", "FFFF"]);
        assert_eq!(board.len(), 11);
        assert_eq!(board.get(0, 3).unwrap().unwrap().id, TileId(3));
        assert!(board.is_visually_synced());
    }

    #[test]
    fn test_pattern_rejects_bad_rows() {
        let layout = BoardLayout::default();
        assert_eq!(
            Board::from_pattern(["FCC", "CCCC", "CCCC", "CCCC"], layout),
            Err(BoardError::InvalidPattern { row: 0 })
        );
        assert_eq!(
            Board::from_pattern(["FCCC", "CCCC", "CxCC", "CCCC"], layout),
            Err(BoardError::InvalidPattern { row: 2 })
        );
    }

    #[test]
    fn test_commit_swap_forces_positions() {
        let layout = BoardLayout::default();
        let mut board = Board::from_pattern(["FC..", "....", "....", "...."], layout).unwrap();
        let a = Cell::new(0, 0);
        let b = Cell::new(0, 1);
        let (pa, pb) = (board.visual_position(a), board.visual_position(b));
        board.commit_swap(a, b, pa, pb);
        assert_eq!(board.pattern()[0], "CF..");
        assert!(board.is_visually_synced());

        // Moving into an empty cell reads the slot position
        let c = Cell::new(0, 2);
        assert_eq!(board.visual_position(c), layout.slot_position(c));
    }

    #[test]
    fn test_display() {
        let mut board = Board::default();
        board.set(0, 0, Some(Tile::content(3, Vec2::ZERO))).unwrap();
        board.set(0, 1, Some(Tile::filler(4, Vec2::ZERO))).unwrap();
        let text = board.to_string();
        assert_eq!(text.lines().next(), Some("03 -- .. .."));
        assert_eq!(text.lines().count(), GRID_SIZE);
    }
}
