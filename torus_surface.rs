use layered_perceptron::architecture::load_architecture;
use layered_perceptron::config::{load_config, TrainingConfig};
use layered_perceptron::export::{self, SurfaceGrid};
use layered_perceptron::training::DEFAULT_MIN_STEP_SIZE;
use layered_perceptron::{Network, Pattern, Result};
use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Learns the indicator of a disc in the unit square and plots the result.
const NUM_INPUTS: usize = 2;
const LAYERS: [usize; 2] = [7, 1];
const NUM_PATTERNS: usize = 2000;
// Training hyperparameters.
const EPOCHS: usize = 1000;
const LOWER_BOUND: f64 = 0.0;
const UPPER_BOUND: f64 = 1.0;
const STEP_SIZE: f64 = 0.1;
const SEED: u64 = 2014;
// Disc centred in the sampling square.
const RADIUS: f64 = 0.3;
// Output files.
const DATA_PATH: &str = "surface.dat";
const PNG_PATH: &str = "surface.png";
const GRID_POINTS: usize = 30;

// 1 inside the disc, 0 outside.
fn torus(x: f64, y: f64) -> f64 {
    let mid = LOWER_BOUND + (UPPER_BOUND - LOWER_BOUND) / 2.0;
    let distance = ((x - mid).powi(2) + (y - mid).powi(2)).sqrt();
    if distance <= RADIUS {
        1.0
    } else {
        0.0
    }
}

// Uniform random points in the bounds, labelled by `torus`.
fn generate_patterns<R: Rng>(rng: &mut R, count: usize) -> Vec<Pattern> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(LOWER_BOUND..UPPER_BOUND);
            let y = rng.gen_range(LOWER_BOUND..UPPER_BOUND);
            Pattern::new(vec![x, y], torus(x, y))
        })
        .collect()
}

// Built-in defaults, or the JSON config named by the first argument.
fn config_from_args(args: &[String]) -> Result<TrainingConfig> {
    match args.get(1) {
        Some(path) => load_config(path),
        None => Ok(TrainingConfig {
            epochs: EPOCHS,
            lower_bound: LOWER_BOUND,
            upper_bound: UPPER_BOUND,
            step_size: STEP_SIZE,
            decrease_learning_rate: false,
            min_step_size: DEFAULT_MIN_STEP_SIZE,
            seed: Some(SEED),
            num_patterns: Some(NUM_PATTERNS),
        }),
    }
}

// Default [7, 1] network, or the architecture named by the second argument.
fn network_from_args(args: &[String]) -> Result<Network> {
    match args.get(2) {
        Some(path) => load_architecture(path)?.build(),
        None => Network::new(NUM_INPUTS, &LAYERS),
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = config_from_args(args)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(SEED));

    let patterns = generate_patterns(&mut rng, config.num_patterns.unwrap_or(NUM_PATTERNS));
    let ones = patterns.iter().filter(|p| p.target == 1.0).count();

    let mut network = network_from_args(args)?;
    network.train(&patterns, &config.options(), &mut rng)?;

    println!("Training: {}", patterns.len());
    println!("Zeros: {}", patterns.len() - ones);
    println!("Ones : {}", ones);
    println!("\n-----FINAL WEIGHTS-----");
    for (i, weight) in network.weights().iter().enumerate() {
        println!("{}: {}", i, weight);
    }
    println!();

    let grid = SurfaceGrid::square(LOWER_BOUND, UPPER_BOUND, GRID_POINTS)?;
    export::write_surface_data(&mut network, &grid, DATA_PATH)?;
    if let Err(err) = export::plot_with_gnuplot(&grid, DATA_PATH, PNG_PATH, export::GNUPLOT) {
        warn!("could not plot surface: {}", err);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torus_inside_and_outside() {
        assert_eq!(torus(0.5, 0.5), 1.0);
        assert_eq!(torus(0.5, 0.79), 1.0);
        assert_eq!(torus(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_generate_patterns_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let patterns = generate_patterns(&mut rng, 100);
        assert_eq!(patterns.len(), 100);
        for pattern in &patterns {
            assert_eq!(pattern.input.len(), NUM_INPUTS);
            assert!(pattern.input.iter().all(|&v| (LOWER_BOUND..UPPER_BOUND).contains(&v)));
            assert_eq!(pattern.target, torus(pattern.input[0], pattern.input[1]));
        }
    }

    #[test]
    fn test_default_config() {
        let args = vec!["torus_surface".to_string()];
        let config = config_from_args(&args).unwrap();
        assert_eq!(config.epochs, EPOCHS);
        assert_eq!(config.options().step_size, STEP_SIZE);
    }
}
