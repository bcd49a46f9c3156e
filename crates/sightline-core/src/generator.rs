use crate::solver::{Solver, SolverConfig};
use crate::{Clue, Grid, Position, TileKind, MAX_SIZE, MIN_SIZE};
use serde::{Deserialize, Serialize};

/// Configuration for puzzle generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Upper wall-density bound as a fraction of N^2
    pub top_density: f64,
    /// Lower wall-density bound as a fraction of N^2
    pub bottom_density: f64,
    /// Fraction of clues to keep after stripping (floor of 3 applies)
    pub clue_ratio: f64,
    /// Fraction of walls to keep after stripping (floor of 2 applies)
    pub wall_ratio: f64,
    /// Cap on full-grid passes of the max-visibility enforcer
    pub max_enforce_iterations: usize,
    /// Unknown-tile count above which uniqueness is assumed, not searched
    pub solver_unknown_cutoff: usize,
    /// Solution cap used by the uniqueness probes during stripping
    pub max_solutions_probe: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GeneratorConfig {
    /// Standard tuning: denser clue set, shallower search cutoff
    pub fn standard() -> Self {
        Self {
            top_density: 0.35,
            bottom_density: 0.20,
            clue_ratio: 0.35,
            wall_ratio: 0.30,
            max_enforce_iterations: 1000,
            solver_unknown_cutoff: 20,
            max_solutions_probe: 2,
        }
    }

    /// Challenging tuning: fewer clues and walls survive the strip, and the
    /// uniqueness search tolerates a larger unknown set before giving up
    pub fn challenging() -> Self {
        Self {
            clue_ratio: 0.30,
            wall_ratio: 0.25,
            solver_unknown_cutoff: 25,
            ..Self::standard()
        }
    }
}

/// Non-fatal diagnostics attached to a generated puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationWarning {
    /// The enforcer hit its iteration cap with max-visibility violations
    /// still present; the returned grid may contain tiles that see more
    /// than N tiles
    EnforcementCapReached { violations: usize },
    /// At least one uniqueness probe exceeded the unknown-tile cutoff, so
    /// uniqueness of the stripped puzzle is assumed rather than proven
    UniquenessAssumed { cutoff: usize },
}

impl std::fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationWarning::EnforcementCapReached { violations } => write!(
                f,
                "max-visibility enforcement did not converge: {} violation(s) remain",
                violations
            ),
            GenerationWarning::UniquenessAssumed { cutoff } => write!(
                f,
                "uniqueness assumed without search above {} unknown tiles",
                cutoff
            ),
        }
    }
}

/// A generated puzzle: the stripped player-facing grid, the full solution
/// grid it was derived from, and any diagnostics picked up along the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPuzzle {
    pub puzzle: Grid,
    pub solution: Grid,
    pub warnings: Vec<GenerationWarning>,
    /// True when every uniqueness probe during stripping ran to completion
    pub uniqueness_verified: bool,
}

/// Sight-puzzle generator
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Create a generator with both a custom configuration and a seed
    pub fn with_config_and_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a puzzle of the given side length.
    ///
    /// Sizes outside [MIN_SIZE, MAX_SIZE] are clamped; rejecting them is the
    /// caller's job. Never fails: degraded outcomes are reported through
    /// [`GeneratedPuzzle::warnings`] instead.
    pub fn generate(&mut self, size: usize) -> GeneratedPuzzle {
        let size = size.clamp(MIN_SIZE, MAX_SIZE);
        let mut grid = Grid::new(size);
        let mut warnings = Vec::new();

        self.seed_walls(&mut grid);

        let violations = self.enforce_max_visibility(&mut grid);
        if violations > 0 {
            warnings.push(GenerationWarning::EnforcementCapReached { violations });
        }

        populate_clues(&mut grid);
        let solution = grid.clone();

        let solver = Solver::with_config(SolverConfig {
            unknown_cutoff: self.config.solver_unknown_cutoff,
        });
        let uniqueness_verified = self.strip(&mut grid, &solver);
        if !uniqueness_verified {
            warnings.push(GenerationWarning::UniquenessAssumed {
                cutoff: self.config.solver_unknown_cutoff,
            });
        }

        GeneratedPuzzle {
            puzzle: grid,
            solution,
            warnings,
            uniqueness_verified,
        }
    }

    /// Place a random number of walls within the density band, then fill
    /// any tiles the walls left blind
    fn seed_walls(&mut self, grid: &mut Grid) {
        let cells = grid.size() * grid.size();
        let lo = (cells as f64 * self.config.bottom_density).round() as usize;
        let hi = (cells as f64 * self.config.top_density).floor() as usize;
        let span = hi.saturating_sub(lo);
        let target = (lo + self.rng.next_usize(span + 1)).min(cells);

        let mut placed = 0;
        while placed < target {
            let pos = Position::new(
                self.rng.next_usize(grid.size()),
                self.rng.next_usize(grid.size()),
            );
            let tile = grid.tile_mut(pos);
            if !tile.is_wall() {
                tile.set_kind(TileKind::Wall);
                tile.set_clue(Clue::Known(0));
                placed += 1;
            }
        }

        fill_holes(grid);
    }

    /// Walk the grid adding one wall per violating tile per pass until no
    /// open tile sees more than N tiles, or the iteration cap is hit.
    /// Returns the number of violations remaining (0 on convergence).
    fn enforce_max_visibility(&self, grid: &mut Grid) -> usize {
        let limit = grid.size() as u8;

        for _ in 0..self.config.max_enforce_iterations {
            let mut violation_found = false;
            for row in 0..grid.size() {
                for col in 0..grid.size() {
                    let pos = Position::new(row, col);
                    if grid.tile(pos).is_wall() || grid.visibility(pos) <= limit {
                        continue;
                    }
                    violation_found = true;
                    add_blocking_wall(grid, pos);
                }
            }
            if !violation_found {
                break;
            }
        }

        // New walls can blind neighbors.
        fill_holes(grid);

        grid.positions()
            .filter(|&pos| grid.tile(pos).is_open() && grid.visibility(pos) > limit)
            .count()
    }

    /// Strip clues and then walls, least important first, keeping every
    /// removal that leaves the puzzle uniquely solvable. Returns false if
    /// any probe was non-exhaustive (uniqueness assumed).
    fn strip(&self, grid: &mut Grid, solver: &Solver) -> bool {
        let max_probe = self.config.max_solutions_probe;
        let mut exhaustive = true;

        // Clue pass. Most important clues sort last and are kept longest.
        let mut clued: Vec<(u32, Position)> = Vec::new();
        for pos in grid.positions() {
            let tile = grid.tile(pos);
            if tile.is_open() && !tile.clue().is_unknown() {
                clued.push((tile_importance(grid, pos), pos));
            }
        }
        clued.sort_by_key(|&(importance, _)| importance);

        let target_keep = ((clued.len() as f64 * self.config.clue_ratio).floor() as usize).max(3);
        let mut removed = 0;
        for &(_, pos) in &clued {
            if clued.len() - removed <= target_keep {
                break;
            }
            let original = grid.tile(pos).clue();
            grid.tile_mut(pos).set_clue(Clue::Unknown);

            let probe = solver.probe(grid, max_probe);
            exhaustive &= probe.exhaustive;
            if probe.count == 1 {
                removed += 1;
            } else {
                grid.tile_mut(pos).set_clue(original);
            }
        }

        // Wall pass, over the post-clue-pass grid.
        let mut walls: Vec<(u32, Position)> = Vec::new();
        for pos in grid.positions() {
            if grid.tile(pos).is_wall() {
                walls.push((tile_importance(grid, pos), pos));
            }
        }
        walls.sort_by_key(|&(importance, _)| importance);

        let target_keep = ((walls.len() as f64 * self.config.wall_ratio).floor() as usize).max(2);
        let mut removed = 0;
        for &(_, pos) in &walls {
            if walls.len() - removed <= target_keep {
                break;
            }
            {
                let tile = grid.tile_mut(pos);
                tile.set_kind(TileKind::Open);
                tile.set_clue(Clue::Unknown);
            }

            let probe = solver.probe(grid, max_probe);
            exhaustive &= probe.exhaustive;
            if probe.count == 1 {
                removed += 1;
            } else {
                let tile = grid.tile_mut(pos);
                tile.set_kind(TileKind::Wall);
                tile.set_clue(Clue::Known(0));
            }
        }

        exhaustive
    }
}

/// Write every open tile's true visibility as its clue. Run strictly after
/// enforcement settles; the result is the canonical solution grid.
fn populate_clues(grid: &mut Grid) {
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let pos = Position::new(row, col);
            if grid.tile(pos).is_open() {
                let sees = grid.visibility(pos);
                grid.tile_mut(pos).set_clue(Clue::Known(sees));
            }
        }
    }
}

/// Convert every open tile that cannot see anything into a wall.
/// Returns the number of tiles converted.
fn fill_holes(grid: &mut Grid) -> usize {
    let mut filled = 0;
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let pos = Position::new(row, col);
            if grid.tile(pos).is_wall() {
                continue;
            }
            if grid.free_space(pos).total() == 0 {
                let tile = grid.tile_mut(pos);
                tile.set_kind(TileKind::Wall);
                tile.set_clue(Clue::Known(0));
                filled += 1;
            }
        }
    }
    filled
}

/// Wall off the far end of the tile's longest free run, falling back to the
/// next-longest direction if that cell is somehow already a wall
fn add_blocking_wall(grid: &mut Grid, pos: Position) {
    let fs = grid.free_space(pos);
    let mut directions = [
        (fs.up, Position::new(pos.row - fs.up as usize, pos.col)),
        (fs.right, Position::new(pos.row, pos.col + fs.right as usize)),
        (fs.down, Position::new(pos.row + fs.down as usize, pos.col)),
        (fs.left, Position::new(pos.row, pos.col - fs.left as usize)),
    ];
    directions.sort_by(|a, b| b.0.cmp(&a.0));

    for (run, target) in directions {
        if run == 0 {
            continue;
        }
        let tile = grid.tile_mut(target);
        if !tile.is_wall() {
            tile.set_kind(TileKind::Wall);
            tile.set_clue(Clue::Known(0));
            break;
        }
    }
}

/// Heuristic strip-ordering score: low-visibility tiles, edge tiles, and
/// wall-adjacent tiles matter more and are stripped later
fn tile_importance(grid: &Grid, pos: Position) -> u32 {
    let total = grid.free_space_determined(pos).total();
    let mut score: u32 = match total {
        0..=2 => 3,
        3..=4 => 2,
        _ => 1,
    };

    let last = grid.size() - 1;
    if pos.row == 0 || pos.row == last || pos.col == 0 || pos.col == last {
        score += 2;
    }

    if pos.row > 0 && grid.tile(Position::new(pos.row - 1, pos.col)).is_wall() {
        score += 1;
    }
    if pos.row < last && grid.tile(Position::new(pos.row + 1, pos.col)).is_wall() {
        score += 1;
    }
    if pos.col > 0 && grid.tile(Position::new(pos.row, pos.col - 1)).is_wall() {
        score += 1;
    }
    if pos.col < last && grid.tile(Position::new(pos.row, pos.col + 1)).is_wall() {
        score += 1;
    }

    score
}

/// Simple PRNG for no-std compatibility
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        // Use getrandom for WASM-compatible random seeding
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        let seed = u64::from_le_bytes(seed_bytes);
        Self::with_seed(seed)
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}
