use serde::{Deserialize, Serialize};

/// Minimum supported grid side length
pub const MIN_SIZE: usize = 3;
/// Maximum supported grid side length
pub const MAX_SIZE: usize = 12;

/// A (row, col) coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Kind of a tile: open floor or a sight-blocking wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Open,
    Wall,
}

/// Clue state of a tile
///
/// `Unknown` is a distinct case, not a sentinel integer, so that hidden clues
/// can never leak into visibility arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clue {
    Unknown,
    Known(u8),
}

impl Clue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Clue::Unknown)
    }

    pub fn known(&self) -> Option<u8> {
        match self {
            Clue::Unknown => None,
            Clue::Known(v) => Some(*v),
        }
    }
}

/// One grid cell. Coordinates are fixed at creation; kind and clue mutate
/// as the grid moves through the generation phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    row: usize,
    col: usize,
    kind: TileKind,
    clue: Clue,
}

impl Tile {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            kind: TileKind::Open,
            clue: Clue::Unknown,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn clue(&self) -> Clue {
        self.clue
    }

    pub fn is_wall(&self) -> bool {
        self.kind == TileKind::Wall
    }

    pub fn is_open(&self) -> bool {
        self.kind == TileKind::Open
    }

    pub fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
    }

    pub fn set_clue(&mut self, clue: Clue) {
        self.clue = clue;
    }
}

/// Free runs of open tiles in the four axis directions from a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpace {
    pub up: u8,
    pub right: u8,
    pub down: u8,
    pub left: u8,
}

impl FreeSpace {
    pub fn total(&self) -> u8 {
        self.up + self.right + self.down + self.left
    }
}

/// An N x N grid of tiles, N in [MIN_SIZE, MAX_SIZE]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a blank grid: every tile open with an unknown clue
    pub fn new(size: usize) -> Self {
        let mut tiles = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                tiles.push(Tile::new(row, col));
            }
        }
        Self { size, tiles }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tile(&self, pos: Position) -> &Tile {
        &self.tiles[pos.row * self.size + pos.col]
    }

    pub fn tile_mut(&mut self, pos: Position) -> &mut Tile {
        &mut self.tiles[pos.row * self.size + pos.col]
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size * size).map(move |i| Position::new(i / size, i % size))
    }

    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_wall()).count()
    }

    pub fn open_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_open()).count()
    }

    /// Number of open tiles carrying a revealed clue
    pub fn known_clue_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.is_open() && !t.clue().is_unknown())
            .count()
    }

    /// True when no open tile is left with an unknown clue
    pub fn is_complete(&self) -> bool {
        self.tiles
            .iter()
            .all(|t| t.is_wall() || !t.clue().is_unknown())
    }

    /// Free runs in the four directions, stopping at walls and the boundary.
    /// Open tiles count whether or not their clue is revealed.
    pub fn free_space(&self, pos: Position) -> FreeSpace {
        self.scan(pos, |tile| tile.is_wall())
    }

    /// Total visibility: the sum of the four free runs
    pub fn visibility(&self, pos: Position) -> u8 {
        self.free_space(pos).total()
    }

    /// Free runs where undecided tiles (open with an unknown clue) block the
    /// scan as well as walls. While tiles are still being decided this yields
    /// a lower bound on the final visibility, which is what makes the
    /// solver's over-clue prune sound.
    pub fn free_space_determined(&self, pos: Position) -> FreeSpace {
        self.scan(pos, |tile| tile.is_wall() || tile.clue().is_unknown())
    }

    /// Total visibility under the determined-tiles-only scan
    pub fn visibility_determined(&self, pos: Position) -> u8 {
        self.free_space_determined(pos).total()
    }

    fn scan(&self, pos: Position, blocks: impl Fn(&Tile) -> bool) -> FreeSpace {
        let mut fs = FreeSpace::default();
        for row in (0..pos.row).rev() {
            if blocks(self.tile(Position::new(row, pos.col))) {
                break;
            }
            fs.up += 1;
        }
        for col in pos.col + 1..self.size {
            if blocks(self.tile(Position::new(pos.row, col))) {
                break;
            }
            fs.right += 1;
        }
        for row in pos.row + 1..self.size {
            if blocks(self.tile(Position::new(row, pos.col))) {
                break;
            }
            fs.down += 1;
        }
        for col in (0..pos.col).rev() {
            if blocks(self.tile(Position::new(pos.row, col))) {
                break;
            }
            fs.left += 1;
        }
        fs
    }

    /// Parse a grid from whitespace-separated rows: `#` is a wall, `.` an
    /// open tile with a hidden clue, an integer an open tile with that clue.
    /// Returns None unless the grid is square with a supported size.
    pub fn from_string(s: &str) -> Option<Grid> {
        let rows: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
        let size = rows.len();
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return None;
        }

        let mut grid = Grid::new(size);
        for (row, line) in rows.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != size {
                return None;
            }
            for (col, token) in tokens.iter().enumerate() {
                let tile = grid.tile_mut(Position::new(row, col));
                match *token {
                    "#" => {
                        tile.set_kind(TileKind::Wall);
                        tile.set_clue(Clue::Known(0));
                    }
                    "." => {}
                    _ => {
                        let value: u8 = token.parse().ok()?;
                        tile.set_clue(Clue::Known(value));
                    }
                }
            }
        }
        Some(grid)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, "  ")?;
                }
                let tile = self.tile(Position::new(row, col));
                match (tile.kind(), tile.clue()) {
                    (TileKind::Wall, _) => write!(f, "  ■")?,
                    (TileKind::Open, Clue::Unknown) => write!(f, "  ·")?,
                    (TileKind::Open, Clue::Known(v)) => write!(f, "{:3}", v)?,
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

    #[test]
    fn test_blank_grid_visibility() {
        let grid = Grid::new(3);

        // Center sees one tile in each direction.
        assert_eq!(grid.visibility(Position::new(1, 1)), 4);
        // Corner sees two along each of its two open directions.
        assert_eq!(grid.visibility(Position::new(0, 0)), 4);
        // Edge-middle: 1 left, 1 right, 2 down.
        assert_eq!(grid.visibility(Position::new(0, 1)), 4);
    }

    #[test]
    fn test_center_wall_visibility() {
        let grid = Grid::from_string("4 2 4\n2 # 2\n4 2 4").unwrap();

        let fs = grid.free_space(Position::new(0, 1));
        assert_eq!(fs.up, 0);
        assert_eq!(fs.left, 1);
        assert_eq!(fs.right, 1);
        assert_eq!(fs.down, 0);
        assert_eq!(grid.visibility(Position::new(0, 1)), 2);

        assert_eq!(grid.visibility(Position::new(0, 0)), 4);
        assert_eq!(grid.visibility(Position::new(2, 1)), 2);
    }

    #[test]
    fn test_determined_scan_blocks_on_unknowns() {
        let grid = Grid::from_string(". 1 1\n# # #\n. . .").unwrap();
        let pos = Position::new(0, 1);

        // Wall-only scan counts the undecided neighbor at (0,0).
        assert_eq!(grid.visibility(pos), 2);
        // Determined scan stops at it.
        assert_eq!(grid.visibility_determined(pos), 1);
    }

    #[test]
    fn test_from_string_shapes() {
        assert!(Grid::from_string("# #\n# #").is_none());
        assert!(Grid::from_string("# # #\n# # #").is_none());
        assert!(Grid::from_string("1 2\n3").is_none());
        assert!(Grid::from_string("x . .\n. . .\n. . .").is_none());

        let grid = Grid::from_string(". # 2\n. . .\n. . .").unwrap();
        assert_eq!(grid.size(), 3);
        assert!(grid.tile(Position::new(0, 1)).is_wall());
        assert_eq!(grid.tile(Position::new(0, 2)).clue(), Clue::Known(2));
        assert!(grid.tile(Position::new(0, 0)).clue().is_unknown());
    }

    #[test]
    fn test_display_markers() {
        let grid = Grid::from_string("4 # .\n. . .\n. . .").unwrap();
        let text = grid.to_string();
        assert!(text.contains('■'));
        assert!(text.contains('·'));
        assert!(text.contains('4'));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_counts() {
        let grid = Grid::from_string("4 # .\n. # .\n. . .").unwrap();
        assert_eq!(grid.wall_count(), 2);
        assert_eq!(grid.open_count(), 7);
        assert_eq!(grid.known_clue_count(), 1);
        assert!(!grid.is_complete());
    }
}
