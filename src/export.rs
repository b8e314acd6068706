//! Sampling and plotting of a trained 2D → 1D function
//!
//! The trained network is evaluated on a regular grid and written as
//! `x y z` triples, which gnuplot can render as a 3D surface. Export never
//! changes the network's weights; failures are reported as `NetworkError::Io`.

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{NetworkError, Result};
use crate::network::Network;

/// Default gnuplot executable, resolved through `PATH`.
pub const GNUPLOT: &str = "gnuplot";

/// Regular sampling grid over a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGrid {
    pub min_x: f64,
    pub max_x: f64,
    pub x_points: usize,
    pub min_y: f64,
    pub max_y: f64,
    pub y_points: usize,
}

impl SurfaceGrid {
    pub fn new(
        (min_x, max_x, x_points): (f64, f64, usize),
        (min_y, max_y, y_points): (f64, f64, usize),
    ) -> Result<Self> {
        let grid = Self {
            min_x,
            max_x,
            x_points,
            min_y,
            max_y,
            y_points,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Same grid on both axes.
    pub fn square(min: f64, max: f64, points: usize) -> Result<Self> {
        Self::new((min, max, points), (min, max, points))
    }

    pub fn validate(&self) -> Result<()> {
        if self.x_points < 2 || self.y_points < 2 {
            return Err(NetworkError::parameters(
                "surface grid needs at least two points per axis",
            ));
        }
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(NetworkError::parameters(format!(
                "invalid surface ranges x [{}, {}], y [{}, {}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    fn step_x(&self) -> f64 {
        (self.max_x - self.min_x) / (self.x_points - 1) as f64
    }

    fn step_y(&self) -> f64 {
        (self.max_y - self.min_y) / (self.y_points - 1) as f64
    }

    /// Grid points, x outer and y inner.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let (step_x, step_y) = (self.step_x(), self.step_y());
        (0..self.x_points).flat_map(move |i| {
            let x = self.min_x + i as f64 * step_x;
            (0..self.y_points).map(move |j| (x, self.min_y + j as f64 * step_y))
        })
    }
}

/// Writes the sampled surface of `network` to `path`.
///
/// The file starts with a five-line `#` header naming both ranges, followed
/// by one `x y z` line per grid point.
pub fn write_surface_data(
    network: &mut Network,
    grid: &SurfaceGrid,
    path: impl AsRef<Path>,
) -> Result<()> {
    grid.validate()?;
    let mut function = network.surface_fn()?;

    let mut out = BufWriter::new(File::create(path.as_ref())?);
    writeln!(out, "#####################################################")?;
    writeln!(out, "# Data file for 3D function trained by neural network")?;
    writeln!(
        out,
        "#x : [{}, {}], {} points",
        grid.min_x, grid.max_x, grid.x_points
    )?;
    writeln!(
        out,
        "#y : [{}, {}], {} points",
        grid.min_y, grid.max_y, grid.y_points
    )?;
    writeln!(out, "#####################################################")?;

    for (x, y) in grid.points() {
        writeln!(out, "{} {} {}", x, y, function(x, y))?;
    }
    out.flush()?;

    info!("wrote surface data to {}", path.as_ref().display());
    Ok(())
}

/// Gnuplot commands that draw `data_path` on screen and then into `png_path`.
pub fn gnuplot_script(grid: &SurfaceGrid, data_path: &Path, png_path: &Path) -> String {
    let mut plot = String::new();
    plot.push_str(&format!("set xrange [{}:{}]\n", grid.min_x, grid.max_x));
    plot.push_str(&format!("set yrange [{}:{}]\n", grid.min_y, grid.max_y));
    plot.push_str(&format!("set dgrid3d {},{}\n", grid.x_points, grid.y_points));
    plot.push_str("set hidden3d\n");
    plot.push_str(&format!(
        "splot \"{}\" with lines notitle\n",
        data_path.display()
    ));

    let mut script = plot.clone();
    script.push_str("set terminal png\n");
    script.push_str(&format!("set output \"{}\"\n", png_path.display()));
    script.push_str(&plot);
    script
}

/// Pipes the plotting script into a `program` (usually [`GNUPLOT`]) process.
pub fn plot_with_gnuplot(
    grid: &SurfaceGrid,
    data_path: impl AsRef<Path>,
    png_path: impl AsRef<Path>,
    program: &str,
) -> Result<()> {
    grid.validate()?;
    let script = gnuplot_script(grid, data_path.as_ref(), png_path.as_ref());

    let mut child = Command::new(program)
        .arg("--persist")
        .stdin(Stdio::piped())
        .spawn()?;
    // stdin is dropped at the end of the block so gnuplot sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(script.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    if !status.success() {
        return Err(NetworkError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{} exited with {}", program, status),
        )));
    }

    info!("plotted surface to {}", png_path.as_ref().display());
    Ok(())
}

/// Writes the data file and plots it.
pub fn show_surface(
    network: &mut Network,
    grid: &SurfaceGrid,
    data_path: impl AsRef<Path>,
    png_path: impl AsRef<Path>,
    program: &str,
) -> Result<()> {
    write_surface_data(network, grid, data_path.as_ref())?;
    plot_with_gnuplot(grid, data_path, png_path, program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_points_cover_corners() {
        let grid = SurfaceGrid::square(0.0, 1.0, 3).unwrap();
        let points: Vec<(f64, f64)> = grid.points().collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[1], (0.0, 0.5));
        assert_eq!(points[8], (1.0, 1.0));
    }

    #[test]
    fn test_grid_validation() {
        assert!(SurfaceGrid::square(0.0, 1.0, 1).is_err());
        assert!(SurfaceGrid::square(1.0, 0.0, 5).is_err());
        assert!(SurfaceGrid::new((0.0, f64::NAN, 5), (0.0, 1.0, 5)).is_err());
    }

    #[test]
    fn test_script_contents() {
        let grid = SurfaceGrid::square(0.0, 1.0, 30).unwrap();
        let script = gnuplot_script(&grid, Path::new("out.dat"), Path::new("out.png"));
        assert!(script.starts_with("set xrange [0:1]\n"));
        assert!(script.contains("set dgrid3d 30,30\n"));
        assert!(script.contains("set output \"out.png\"\n"));
        assert_eq!(script.matches("splot \"out.dat\" with lines notitle").count(), 2);
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let grid = SurfaceGrid::square(0.0, 1.0, 2).unwrap();
        let result = plot_with_gnuplot(&grid, "a.dat", "a.png", "definitely-not-gnuplot-xyz");
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }
}
