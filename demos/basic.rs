//! Basic example of using the sight-puzzle engine

use sightline_core::{Generator, Solver, Validator};

fn main() {
    // Generate a puzzle with a fixed seed so the output is reproducible
    println!("Generating a 6x6 puzzle...\n");
    let mut generator = Generator::with_seed(42);
    let result = generator.generate(6);

    println!("Puzzle:");
    print!("{}", result.puzzle);

    // Show some stats
    println!("\nClues shown: {}", result.puzzle.known_clue_count());
    println!("Walls shown: {}", result.puzzle.wall_count());
    println!("Uniqueness verified: {}", result.uniqueness_verified);
    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }

    println!("\nSolution:");
    print!("{}", result.solution);

    // The engine's own solution must pass validation
    let validator = Validator::new();
    let check = validator.validate(&result.solution);
    println!("\nSolution validates: {}", check.is_valid);

    // Count completions of the stripped puzzle (up to 2)
    let solver = Solver::new();
    let solutions = solver.count_solutions(&result.puzzle, 2);
    println!("Number of solutions (up to 2): {}", solutions);

    // Ask for a forced-wall hint on the fresh puzzle
    if let Some(hint) = validator.hint(&result.puzzle) {
        println!(
            "Hint: {} at ({}, {})",
            hint.reason, hint.position.row, hint.position.col
        );
    } else {
        println!("No forced move available as a hint.");
    }
}
