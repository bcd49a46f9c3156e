//! Core engine for "sight" puzzles.
//!
//! A puzzle is an N x N grid of open tiles and walls; every open tile carries
//! a clue equal to the number of open tiles it can see along the four axes
//! before a wall or the grid edge. This crate generates such puzzles (random
//! wall seeding, max-visibility enforcement, clue population, then
//! importance-ranked stripping of clues and walls gated on uniqueness),
//! counts solutions by exhaustive backtracking, and validates player
//! submissions. Rendering and interaction live in front-end crates.

pub mod generator;
pub mod grid;
pub mod solver;
pub mod validator;

pub use generator::{GeneratedPuzzle, GenerationWarning, Generator, GeneratorConfig};
pub use grid::{Clue, FreeSpace, Grid, Position, Tile, TileKind, MAX_SIZE, MIN_SIZE};
pub use solver::{SolutionCount, Solver, SolverConfig};
pub use validator::{Hint, HintAction, ProgressIssue, ValidationResult, Validator};
