//! Line compaction
//!
//! A compaction runs one independent scan per line (row or column). Each
//! scan walks its line from the packing edge outward and yields one legal
//! swap at a time; the caller commits the swap before asking for the next
//! one, since the next comparison is only valid against the updated matrix.
//!
//! Left/right scans push filler tiles outward past content tiles. Top/bottom
//! scans pull content tiles inward past filler tiles or empty cells. Empty
//! cells block left/right scans.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, TileCategory};
use crate::consts::GRID_SIZE;

/// Edge the content tiles are packed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    TowardLeft,
    TowardRight,
    TowardTop,
    TowardBottom,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::TowardLeft,
        Direction::TowardRight,
        Direction::TowardTop,
        Direction::TowardBottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TowardLeft => "toward-left",
            Direction::TowardRight => "toward-right",
            Direction::TowardTop => "toward-top",
            Direction::TowardBottom => "toward-bottom",
        }
    }

    /// Map the diagonal swipe names used by the touch layer
    pub fn from_gesture_name(name: &str) -> Option<Self> {
        match name {
            "right-up" => Some(Direction::TowardRight),
            "left-up" => Some(Direction::TowardTop),
            "right-down" => Some(Direction::TowardLeft),
            "left-down" => Some(Direction::TowardBottom),
            _ => None,
        }
    }

    fn rule(&self) -> ScanRule {
        match self {
            Direction::TowardLeft | Direction::TowardRight => ScanRule::FillerOutward,
            Direction::TowardTop | Direction::TowardBottom => ScanRule::ContentInward,
        }
    }

    /// Every line for this direction, each ordered from the packing edge
    pub fn lines(&self) -> [[Cell; GRID_SIZE]; GRID_SIZE] {
        let last = GRID_SIZE - 1;
        std::array::from_fn(|line| {
            std::array::from_fn(|k| match self {
                Direction::TowardLeft => Cell::new(line, k),
                Direction::TowardRight => Cell::new(line, last - k),
                Direction::TowardTop => Cell::new(k, line),
                Direction::TowardBottom => Cell::new(last - k, line),
            })
        })
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tile is scanned for and where its swap partner sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanRule {
    /// Scanned filler swaps with the content tile just outward of it
    FillerOutward,
    /// Scanned content swaps with the filler or empty cell just inward of it
    ContentInward,
}

impl ScanRule {
    fn neighbor(&self, k: usize) -> Option<usize> {
        match self {
            ScanRule::FillerOutward => (k + 1 < GRID_SIZE).then_some(k + 1),
            ScanRule::ContentInward => k.checked_sub(1),
        }
    }

    fn is_legal(&self, scanned: Option<TileCategory>, neighbor: Option<TileCategory>) -> bool {
        match self {
            ScanRule::FillerOutward => {
                scanned == Some(TileCategory::Filler) && neighbor == Some(TileCategory::Content)
            }
            ScanRule::ContentInward => {
                scanned == Some(TileCategory::Content) && neighbor != Some(TileCategory::Content)
            }
        }
    }
}

/// One pending exchange between two cells of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPair {
    /// Cell the scan stopped on
    pub scanned: Cell,
    /// Adjacent cell it exchanges with
    pub neighbor: Cell,
}

/// Incremental scan over a single line
///
/// The cursor follows the scanned tile into the cell it was swapped into, so
/// the same tile is re-examined before the scan moves on. A sweep that made
/// any swap is followed by another sweep; the scan ends after a sweep with no
/// legal swap, which leaves the line settled.
#[derive(Debug, Clone)]
pub struct LineScan {
    cells: [Cell; GRID_SIZE],
    rule: ScanRule,
    cursor: usize,
    pending: Option<usize>,
    swapped_this_sweep: bool,
    swaps: usize,
}

impl LineScan {
    fn new(cells: [Cell; GRID_SIZE], rule: ScanRule) -> Self {
        Self {
            cells,
            rule,
            cursor: 0,
            pending: None,
            swapped_this_sweep: false,
            swaps: 0,
        }
    }

    /// One scan per line for the given direction
    pub fn for_direction(direction: Direction) -> Vec<LineScan> {
        let rule = direction.rule();
        direction
            .lines()
            .into_iter()
            .map(|cells| LineScan::new(cells, rule))
            .collect()
    }

    /// Advance to the next legal swap, or None once the line is settled
    pub fn next_swap(&mut self, board: &Board) -> Option<SwapPair> {
        debug_assert!(self.pending.is_none(), "previous swap not committed");
        loop {
            if self.cursor >= GRID_SIZE {
                if !self.swapped_this_sweep {
                    return None;
                }
                self.cursor = 0;
                self.swapped_this_sweep = false;
            }

            let k = self.cursor;
            if let Some(target) = self.rule.neighbor(k) {
                let scanned = self.cells[k];
                let neighbor = self.cells[target];
                if self
                    .rule
                    .is_legal(board.category_at(scanned), board.category_at(neighbor))
                {
                    self.pending = Some(target);
                    return Some(SwapPair { scanned, neighbor });
                }
            }
            self.cursor += 1;
        }
    }

    /// Record that the last yielded swap has been applied to the board
    pub fn commit(&mut self) {
        if let Some(target) = self.pending.take() {
            self.cursor = target;
            self.swapped_this_sweep = true;
            self.swaps += 1;
        }
    }

    /// Swaps committed so far
    pub fn swaps(&self) -> usize {
        self.swaps
    }
}

/// Compact the board without animation, returning the number of swaps
pub fn compact_immediate(board: &mut Board, direction: Direction) -> usize {
    let mut total = 0;
    for mut scan in LineScan::for_direction(direction) {
        while let Some(pair) = scan.next_swap(board) {
            let position_a = board.visual_position(pair.scanned);
            let position_b = board.visual_position(pair.neighbor);
            board.commit_swap(pair.scanned, pair.neighbor, position_a, position_b);
            scan.commit();
        }
        total += scan.swaps();
    }
    total
}

/// Number of adjacent pairs that could be swapped right now
pub fn legal_swaps(board: &Board, direction: Direction) -> usize {
    let rule = direction.rule();
    direction
        .lines()
        .iter()
        .map(|cells| {
            (0..GRID_SIZE)
                .filter(|&k| {
                    rule.neighbor(k).is_some_and(|t| {
                        rule.is_legal(board.category_at(cells[k]), board.category_at(cells[t]))
                    })
                })
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BoardLayout;
    use crate::sim::TileId;

    fn board(rows: [&str; GRID_SIZE]) -> Board {
        Board::from_pattern(rows, BoardLayout::default()).unwrap()
    }

    #[test]
    fn test_lines_start_at_packing_edge() {
        let left = Direction::TowardLeft.lines();
        assert_eq!(left[2][0], Cell::new(2, 0));
        assert_eq!(left[2][3], Cell::new(2, 3));

        let right = Direction::TowardRight.lines();
        assert_eq!(right[1][0], Cell::new(1, 3));

        let top = Direction::TowardTop.lines();
        assert_eq!(top[3][1], Cell::new(1, 3));

        let bottom = Direction::TowardBottom.lines();
        assert_eq!(bottom[0][0], Cell::new(3, 0));
        assert_eq!(bottom[0][3], Cell::new(0, 0));
    }

    #[test]
    fn test_single_row_filler_absorbed_rightward() {
        let mut b = board(["FCCC", "CCCC", "CCCC", "CCCC"]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardLeft), 3);
        assert_eq!(b.pattern()[0], "CCCF");
        assert_eq!(b.find(TileId(0)), Some(Cell::new(0, 3)));
        assert_eq!(b.find(TileId(1)), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_toward_left_worked_example() {
        let mut b = board([
            "F C C C", //
            "C F C F", //
            "F F C C", //
            "C C C C", //
        ]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardLeft), 8);
        assert_eq!(b.pattern(), vec!["CCCF", "CCFF", "CCFF", "CCCC"]);
        assert!(b.is_visually_synced());
    }

    #[test]
    fn test_toward_right_worked_example() {
        // 15 content tiles in row-major order, filler at (0, 3)
        let mut b = board(["CCCF", "CCCC", "CCCC", "CCCC"]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardRight), 3);
        assert_eq!(b.pattern(), vec!["FCCC", "CCCC", "CCCC", "CCCC"]);
        assert_eq!(b.find(TileId(3)), Some(Cell::new(0, 0)));
        assert_eq!(b.find(TileId(0)), Some(Cell::new(0, 1)));
        assert_eq!(b.find(TileId(2)), Some(Cell::new(0, 3)));
    }

    #[test]
    fn test_toward_right_empty_cell_blocks() {
        let mut b = board(["CF.F", "CCCC", "CCCC", "CCCC"]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardRight), 1);
        assert_eq!(b.pattern()[0], "FC.F");
    }

    #[test]
    fn test_toward_top_worked_example() {
        let mut b = board([
            "F C . F", //
            "C F F C", //
            "F C . F", //
            "C F C C", //
        ]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardTop), 10);
        assert_eq!(b.pattern(), vec!["CCCC", "CC.C", "FFFF", "FF.F"]);
        assert!(b.is_visually_synced());
    }

    #[test]
    fn test_toward_bottom_worked_example() {
        let mut b = board([
            "F C . F", //
            "C F F C", //
            "F C . F", //
            "C F C C", //
        ]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardBottom), 5);
        assert_eq!(b.pattern(), vec!["FF.F", "FFFF", "CC.C", "CCCC"]);
        assert!(b.is_visually_synced());
    }

    #[test]
    fn test_content_never_enters_empty_horizontally() {
        let mut b = board([".CCC", "C...", "....", "...."]);
        assert_eq!(compact_immediate(&mut b, Direction::TowardLeft), 0);
        assert_eq!(compact_immediate(&mut b, Direction::TowardRight), 0);
    }

    #[test]
    fn test_second_pass_is_noop() {
        for direction in Direction::ALL {
            let mut b = board(["FFCC", "CFCF", ".CF.", "FCFC"]);
            compact_immediate(&mut b, direction);
            assert_eq!(legal_swaps(&b, direction), 0, "{direction}");
            let settled = b.clone();
            assert_eq!(compact_immediate(&mut b, direction), 0, "{direction}");
            assert_eq!(b, settled);
        }
    }

    #[test]
    fn test_scan_follows_swapped_tile() {
        let b = board(["FCCC", "CCCC", "CCCC", "CCCC"]);
        let mut scan = LineScan::for_direction(Direction::TowardLeft).remove(0);
        let first = scan.next_swap(&b).unwrap();
        assert_eq!(first.scanned, Cell::new(0, 0));
        assert_eq!(first.neighbor, Cell::new(0, 1));

        let mut b = b;
        b.swap_cells(first.scanned, first.neighbor);
        scan.commit();

        let second = scan.next_swap(&b).unwrap();
        assert_eq!(second.scanned, Cell::new(0, 1));
        assert_eq!(second.neighbor, Cell::new(0, 2));
    }

    #[test]
    fn test_legal_swaps_counts_pairs() {
        let b = board(["FCFC", "CCCC", "CCCC", "CCCC"]);
        assert_eq!(legal_swaps(&b, Direction::TowardLeft), 2);
        assert_eq!(legal_swaps(&b, Direction::TowardRight), 1);
    }

    #[test]
    fn test_gesture_names() {
        assert_eq!(
            Direction::from_gesture_name("right-down"),
            Some(Direction::TowardLeft)
        );
        assert_eq!(
            Direction::from_gesture_name("right-up"),
            Some(Direction::TowardRight)
        );
        assert_eq!(Direction::from_gesture_name("up"), None);
    }
}
