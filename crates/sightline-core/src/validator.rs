use crate::{Grid, Position};
use serde::{Deserialize, Serialize};

/// Outcome of checking a fully filled player grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Human-readable reason for the first violation found
    pub error: Option<String>,
    /// Position of the offending tile, when there is one
    pub position: Option<Position>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
            position: None,
        }
    }

    fn rejected(error: String, position: Position) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
            position: Some(position),
        }
    }
}

/// A mid-game problem: a revealed clue that can no longer be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressIssue {
    pub position: Position,
    pub message: String,
}

/// What a hint asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintAction {
    PlaceWall,
}

/// A single logically forced move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub position: Position,
    pub action: HintAction,
    pub reason: String,
}

/// Checks player grids against the puzzle rules. Never mutates its input.
pub struct Validator;

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a fully filled grid. Checks run per tile in row-major order
    /// and the first violation wins: completeness, then clue accuracy, then
    /// minimum visibility.
    pub fn validate(&self, grid: &Grid) -> ValidationResult {
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if tile.is_wall() {
                continue;
            }

            if tile.clue().is_unknown() {
                return ValidationResult::rejected("Puzzle is not complete".to_string(), pos);
            }

            let sees = grid.visibility(pos);
            if let Some(clue) = tile.clue().known() {
                if sees != clue {
                    return ValidationResult::rejected(
                        format!(
                            "Tile at row {}, col {} should see {} but sees {}",
                            pos.row + 1,
                            pos.col + 1,
                            clue,
                            sees
                        ),
                        pos,
                    );
                }
            }

            if sees == 0 {
                return ValidationResult::rejected(
                    format!(
                        "Tile at row {}, col {} cannot see any other tiles",
                        pos.row + 1,
                        pos.col + 1
                    ),
                    pos,
                );
            }
        }
        ValidationResult::ok()
    }

    /// Flag revealed clues that the player's walls have already made
    /// impossible: walls only ever reduce visibility, so a tile currently
    /// seeing less than its clue can never recover.
    pub fn check_progress(&self, grid: &Grid) -> Vec<ProgressIssue> {
        let mut issues = Vec::new();
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if !tile.is_open() {
                continue;
            }
            if let Some(clue) = tile.clue().known() {
                let sees = grid.visibility(pos);
                if sees < clue {
                    issues.push(ProgressIssue {
                        position: pos,
                        message: format!(
                            "This tile needs to see {} but can only see {}",
                            clue, sees
                        ),
                    });
                }
            }
        }
        issues
    }

    /// Best-effort single deduction: an undecided tile that cannot see
    /// anything is forced to be a wall. Returns None when no tile is forced
    /// this way; this is not a general solver.
    pub fn hint(&self, grid: &Grid) -> Option<Hint> {
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if !tile.is_open() || !tile.clue().is_unknown() {
                continue;
            }
            if grid.free_space(pos).total() == 0 {
                return Some(Hint {
                    position: pos,
                    action: HintAction::PlaceWall,
                    reason: "This tile is completely surrounded and must be a wall".to_string(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clue, TileKind};

    fn solved_3x3() -> Grid {
        Grid::from_string("4 2 4\n2 # 2\n4 2 4").unwrap()
    }

    #[test]
    fn test_accepts_correct_grid() {
        let result = Validator::new().validate(&solved_3x3());
        assert!(result.is_valid);
        assert!(result.error.is_none());
        assert!(result.position.is_none());
    }

    #[test]
    fn test_rejects_incomplete_grid() {
        let mut grid = solved_3x3();
        grid.tile_mut(Position::new(0, 0)).set_clue(Clue::Unknown);

        let result = Validator::new().validate(&grid);
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Puzzle is not complete"));
        assert_eq!(result.position, Some(Position::new(0, 0)));
    }

    #[test]
    fn test_rejects_wrong_clue() {
        let mut grid = solved_3x3();
        grid.tile_mut(Position::new(0, 1)).set_clue(Clue::Known(3));

        let result = Validator::new().validate(&grid);
        assert!(!result.is_valid);
        assert_eq!(result.position, Some(Position::new(0, 1)));
        assert!(result.error.unwrap().contains("should see 3 but sees 2"));
    }

    #[test]
    fn test_rejects_blind_tile() {
        let grid = Grid::from_string("# # #\n# 0 #\n# # #").unwrap();

        let result = Validator::new().validate(&grid);
        assert!(!result.is_valid);
        assert_eq!(result.position, Some(Position::new(1, 1)));
        assert!(result.error.unwrap().contains("cannot see any other tiles"));
    }

    #[test]
    fn test_check_progress_flags_starved_clues() {
        let mut grid = solved_3x3();
        // An extra wall in the corner starves four of the clues.
        let corner = grid.tile_mut(Position::new(0, 0));
        corner.set_kind(TileKind::Wall);
        corner.set_clue(Clue::Known(0));

        let issues = Validator::new().check_progress(&grid);
        assert_eq!(issues.len(), 4);
        assert!(issues
            .iter()
            .any(|issue| issue.position == Position::new(0, 2)));
        assert!(issues[0].message.contains("can only see"));
    }

    #[test]
    fn test_hint_finds_forced_wall() {
        let grid = Grid::from_string("# . #\n# # #\n. . .").unwrap();

        let hint = Validator::new().hint(&grid).unwrap();
        assert_eq!(hint.position, Position::new(0, 1));
        assert_eq!(hint.action, HintAction::PlaceWall);
    }

    #[test]
    fn test_hint_absent_when_nothing_forced() {
        assert!(Validator::new().hint(&Grid::new(3)).is_none());
    }
}
