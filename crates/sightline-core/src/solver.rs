use crate::{Clue, Grid, Position, TileKind};
use serde::{Deserialize, Serialize};

/// Configuration for the uniqueness solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Above this many unknown tiles the exhaustive search is skipped and the
    /// grid is optimistically reported as having exactly one solution. The
    /// approximation is surfaced through [`SolutionCount::exhaustive`].
    pub unknown_cutoff: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { unknown_cutoff: 20 }
    }
}

/// Result of a solution-counting probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionCount {
    /// Number of completions found, capped at the requested maximum
    pub count: usize,
    /// False when the unknown-count cutoff skipped the search, making the
    /// count an assumption rather than a proof
    pub exhaustive: bool,
}

/// Exhaustive backtracking solution counter.
///
/// Unknown tiles (open, clue hidden) are assigned depth-first in row-major
/// order, trying wall first and then open with the tile's current visibility
/// as its clue. Each hypothesis is undone exactly before the next branch, so
/// the search never leaks state across siblings.
pub struct Solver {
    config: SolverConfig,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a solver with the default configuration
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Create a solver with a custom configuration
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Count completions of the grid, capped at `max_solutions`
    pub fn count_solutions(&self, grid: &Grid, max_solutions: usize) -> usize {
        self.probe(grid, max_solutions).count
    }

    /// True when the grid admits exactly one completion
    pub fn has_unique_solution(&self, grid: &Grid) -> bool {
        self.count_solutions(grid, 2) == 1
    }

    /// Count completions and report whether the search was exhaustive.
    /// The unknown set is taken from the grid itself: every open tile whose
    /// clue is hidden. The caller's grid is never mutated; the search runs
    /// on a private working copy.
    pub fn probe(&self, grid: &Grid, max_solutions: usize) -> SolutionCount {
        let mut working = grid.clone();

        let unknowns: Vec<Position> = working
            .positions()
            .filter(|&pos| {
                let tile = working.tile(pos);
                tile.is_open() && tile.clue().is_unknown()
            })
            .collect();

        if unknowns.is_empty() {
            let count = if Self::all_clues_match(&working) { 1 } else { 0 };
            return SolutionCount {
                count,
                exhaustive: true,
            };
        }

        if unknowns.len() > self.config.unknown_cutoff {
            return SolutionCount {
                count: 1,
                exhaustive: false,
            };
        }

        let mut count = 0;
        Self::search(&mut working, &unknowns, 0, &mut count, max_solutions);
        SolutionCount {
            count,
            exhaustive: true,
        }
    }

    fn search(
        grid: &mut Grid,
        unknowns: &[Position],
        idx: usize,
        count: &mut usize,
        max_solutions: usize,
    ) {
        if *count >= max_solutions {
            return;
        }
        if idx == unknowns.len() {
            if Self::is_solution(grid) {
                *count += 1;
            }
            return;
        }

        let pos = unknowns[idx];

        Self::apply_wall(grid, pos);
        if Self::is_consistent(grid) {
            Self::search(grid, unknowns, idx + 1, count, max_solutions);
        }
        if *count >= max_solutions {
            Self::undo(grid, pos);
            return;
        }

        Self::apply_open(grid, pos);
        if Self::is_consistent(grid) {
            Self::search(grid, unknowns, idx + 1, count, max_solutions);
        }

        Self::undo(grid, pos);
    }

    /// Hypothesis: the tile is a wall
    fn apply_wall(grid: &mut Grid, pos: Position) {
        let tile = grid.tile_mut(pos);
        tile.set_kind(TileKind::Wall);
        tile.set_clue(Clue::Known(0));
    }

    /// Hypothesis: the tile is open, seeing exactly what is determined now
    fn apply_open(grid: &mut Grid, pos: Position) {
        grid.tile_mut(pos).set_kind(TileKind::Open);
        let sees = grid.visibility_determined(pos);
        grid.tile_mut(pos).set_clue(Clue::Known(sees));
    }

    /// Restore the tile to its undecided state
    fn undo(grid: &mut Grid, pos: Position) {
        let tile = grid.tile_mut(pos);
        tile.set_kind(TileKind::Open);
        tile.set_clue(Clue::Unknown);
    }

    /// Necessary condition while unknowns remain: no revealed clue may
    /// already be exceeded. Undecided tiles block the scan, so the current
    /// visibility is a lower bound; falling short is not pruned because a
    /// later decision can still raise it.
    fn is_consistent(grid: &Grid) -> bool {
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if tile.is_wall() {
                continue;
            }
            if let Some(clue) = tile.clue().known() {
                if grid.visibility_determined(pos) > clue {
                    return false;
                }
            }
        }
        true
    }

    /// Full check once every unknown is assigned: every open tile decided,
    /// every clue met exactly, no open tile blind.
    fn is_solution(grid: &Grid) -> bool {
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if tile.is_wall() {
                continue;
            }
            match tile.clue().known() {
                None => return false,
                Some(clue) => {
                    if grid.visibility_determined(pos) != clue {
                        return false;
                    }
                }
            }
            if grid.visibility_determined(pos) == 0 {
                return false;
            }
        }
        true
    }

    /// Consistency scan for a grid with no unknowns at all
    fn all_clues_match(grid: &Grid) -> bool {
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if tile.is_wall() {
                continue;
            }
            if let Some(clue) = tile.clue().known() {
                if grid.visibility_determined(pos) != clue {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_3x3() -> Grid {
        Grid::from_string("4 2 4\n2 # 2\n4 2 4").unwrap()
    }

    #[test]
    fn test_fully_decided_consistent_grid() {
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&solved_3x3(), 2), 1);
        assert!(solver.has_unique_solution(&solved_3x3()));
    }

    #[test]
    fn test_fully_decided_mismatched_clue() {
        let mut grid = solved_3x3();
        grid.tile_mut(Position::new(0, 1)).set_clue(Clue::Known(3));

        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&grid, 2), 0);
        assert!(!solver.has_unique_solution(&grid));
    }

    #[test]
    fn test_single_hidden_clue_stays_unique() {
        let mut grid = solved_3x3();
        grid.tile_mut(Position::new(0, 1)).set_clue(Clue::Unknown);

        let solver = Solver::new();
        assert!(solver.has_unique_solution(&grid));
    }

    #[test]
    fn test_two_completions_detected() {
        // The center clue of 1 is satisfied by opening either undecided
        // neighbor, so two completions exist.
        let grid = Grid::from_string("# . #\n. 1 #\n# # #").unwrap();

        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&grid, 2), 2);
        assert!(!solver.has_unique_solution(&grid));
    }

    #[test]
    fn test_probe_is_deterministic() {
        let mut grid = solved_3x3();
        grid.tile_mut(Position::new(2, 1)).set_clue(Clue::Unknown);

        let solver = Solver::new();
        let first = solver.probe(&grid, 2);
        let second = solver.probe(&grid, 2);
        assert_eq!(first, second);
        assert!(first.exhaustive);
    }

    #[test]
    fn test_probe_does_not_mutate_input() {
        let mut grid = solved_3x3();
        grid.tile_mut(Position::new(0, 1)).set_clue(Clue::Unknown);
        let before = grid.clone();

        let solver = Solver::new();
        solver.probe(&grid, 2);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_unknown_cutoff_assumes_unique() {
        let grid = Grid::from_string("# . #\n. 1 #\n# # #").unwrap();

        let solver = Solver::with_config(SolverConfig { unknown_cutoff: 1 });
        let probe = solver.probe(&grid, 2);
        assert_eq!(probe.count, 1);
        assert!(!probe.exhaustive);
    }

    #[test]
    fn test_solution_cap_stops_search() {
        let grid = Grid::from_string("# . #\n. 1 #\n# # #").unwrap();

        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&grid, 1), 1);
    }
}
