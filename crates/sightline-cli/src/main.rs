use clap::Parser;
use sightline_core::{Generator, GeneratorConfig, MAX_SIZE, MIN_SIZE};

/// Generate sight puzzles on the command line
#[derive(Parser, Debug)]
#[command(name = "sightline", version, about)]
struct Args {
    /// Side length of the puzzle grid
    #[arg(default_value_t = 6, value_parser = parse_size)]
    size: usize,

    /// Seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Use the sparser, deeper-searching tuning
    #[arg(long)]
    challenging: bool,

    /// Also print the solution grid
    #[arg(long)]
    show_solution: bool,

    /// Emit the full result as JSON instead of ASCII grids
    #[arg(long)]
    json: bool,
}

fn parse_size(s: &str) -> Result<usize, String> {
    let size: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "size must be between {} and {}",
            MIN_SIZE, MAX_SIZE
        ))
    }
}

fn main() {
    let args = Args::parse();

    let config = if args.challenging {
        GeneratorConfig::challenging()
    } else {
        GeneratorConfig::standard()
    };
    let mut generator = match args.seed {
        Some(seed) => Generator::with_config_and_seed(config, seed),
        None => Generator::with_config(config),
    };

    let result = generator.generate(args.size);

    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result).expect("result serializes");
        println!("{}", json);
        return;
    }

    println!("Puzzle ({0}x{0}):", result.puzzle.size());
    print!("{}", result.puzzle);
    println!(
        "\nClues shown: {}   Walls shown: {}   Uniqueness verified: {}",
        result.puzzle.known_clue_count(),
        result.puzzle.wall_count(),
        result.uniqueness_verified
    );

    if args.show_solution {
        println!("\nSolution:");
        print!("{}", result.solution);
    }
}
