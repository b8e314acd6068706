// Tests for sampling the trained surface into a data file.

use layered_perceptron::export::{plot_with_gnuplot, show_surface, write_surface_data, SurfaceGrid};
use layered_perceptron::{Network, NetworkError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use tempfile::tempdir;

fn seeded(num_inputs: usize, sizes: &[usize]) -> Network {
    let mut network = Network::new(num_inputs, sizes).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    network.initialize_weights(-1.0, 1.0, &mut rng).unwrap();
    network
}

#[test]
fn test_data_file_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("surface.dat");
    let mut network = seeded(2, &[3, 1]);
    let grid = SurfaceGrid::new((0.0, 1.0, 4), (-1.0, 1.0, 5)).unwrap();

    write_surface_data(&mut network, &grid, &path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5 + 4 * 5);
    assert!(lines[..5].iter().all(|line| line.starts_with('#')));
    assert_eq!(lines[2], "#x : [0, 1], 4 points");
    assert_eq!(lines[3], "#y : [-1, 1], 5 points");
}

#[test]
fn test_data_values_match_network() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("surface.dat");
    let mut network = seeded(2, &[3, 1]);
    let grid = SurfaceGrid::square(0.0, 1.0, 3).unwrap();

    write_surface_data(&mut network, &grid, &path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    for line in contents.lines().skip(5) {
        let values: Vec<f64> = line
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 3);
        let expected = network.predict_single(&[values[0], values[1]]).unwrap();
        assert_eq!(values[2], expected);
    }
}

#[test]
fn test_export_does_not_change_weights() {
    let dir = tempdir().unwrap();
    let mut network = seeded(2, &[2, 1]);
    let before = network.weights();
    let grid = SurfaceGrid::square(0.0, 1.0, 5).unwrap();
    write_surface_data(&mut network, &grid, dir.path().join("a.dat")).unwrap();
    assert_eq!(network.weights(), before);
}

#[test]
fn test_wrong_shape_network_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never.dat");
    let mut network = seeded(3, &[2, 1]);
    let grid = SurfaceGrid::square(0.0, 1.0, 3).unwrap();

    let result = write_surface_data(&mut network, &grid, &path);
    assert!(matches!(result, Err(NetworkError::InvalidInput { .. })));
    assert!(!path.exists());
}

#[test]
fn test_unwritable_path_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("surface.dat");
    let mut network = seeded(2, &[2, 1]);
    let grid = SurfaceGrid::square(0.0, 1.0, 3).unwrap();

    let result = write_surface_data(&mut network, &grid, &path);
    assert!(matches!(result, Err(NetworkError::Io(_))));
}

#[test]
fn test_show_surface_writes_data_before_plot_fails() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("surface.dat");
    let png = dir.path().join("surface.png");
    let mut network = seeded(2, &[3, 1]);
    let before = network.weights();
    let grid = SurfaceGrid::square(0.0, 1.0, 4).unwrap();

    let result = show_surface(&mut network, &grid, &data, &png, "no-such-plotter-7f3a");

    assert!(matches!(result, Err(NetworkError::Io(_))));
    let contents = fs::read_to_string(&data).unwrap();
    assert_eq!(contents.lines().count(), 5 + 16);
    assert!(!png.exists());
    assert_eq!(network.weights(), before);
}

#[cfg(unix)]
#[test]
fn test_plotter_that_exits_early_is_io_error() {
    // `false` exits with a failure status without reading its input.
    let dir = tempdir().unwrap();
    let grid = SurfaceGrid::square(0.0, 1.0, 3).unwrap();
    let result = plot_with_gnuplot(
        &grid,
        dir.path().join("a.dat"),
        dir.path().join("a.png"),
        "false",
    );
    assert!(matches!(result, Err(NetworkError::Io(_))));
}
