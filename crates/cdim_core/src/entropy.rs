//! Quantize-then-compress complexity estimation.
//!
//! A continuous trajectory is discretized onto a grid of a given box size,
//! serialized, and run through a lossless compressor; the compressed byte
//! length serves as a proxy for the trajectory's algorithmic information
//! content. Sweeping the box size (or the trajectory duration) yields the
//! curve whose log-log scaling exponent approximates correlation/Lyapunov
//! dimension. This is a research heuristic, not a certified metric.

use crate::error::{Error, Result};
use crate::trajectory::{Span, Trajectory};
use crate::traits::StateScalar;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A pluggable lossless byte compressor. Only the length of the output is
/// used by the estimator, but the full byte string is returned so callers can
/// substitute dictionary-primed compressors for cross-trajectory
/// comparability. Must be `Sync` so sweeps can fan out across threads.
pub trait Compressor: Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Default compressor: zlib at a fixed level, dictionary-free.
#[derive(Debug, Clone, Copy)]
pub struct Zlib {
    level: u32,
}

impl Zlib {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Default for Zlib {
    fn default() -> Self {
        Self::new(6)
    }
}

impl Compressor for Zlib {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }
}

/// Discretizes a trajectory onto a grid of the given box size.
///
/// Each state row is widened first: complex scalars contribute all real
/// parts, then all imaginary parts, along the state axis (width `2 * dim`);
/// real scalars pass through (width `dim`). Every entry is divided by
/// `box_size` and truncated toward zero to an `i32`. Rows are flattened
/// row-major, state axis fastest, so each time point stays contiguous —
/// nearby correlated states then compress well. The ordering is fixed for
/// reproducibility: identical inputs give byte-identical output.
///
/// `span`, when given, truncates the trajectory first, with the truncator's
/// no-clamp semantics.
pub fn quantize<S: StateScalar>(
    trajectory: &Trajectory<S>,
    box_size: f64,
    span: Option<Span>,
) -> Result<Vec<i32>> {
    if !(box_size > 0.0) {
        return Err(Error::invalid(format!(
            "box size must be positive, got {box_size}"
        )));
    }
    let truncated;
    let source = match span {
        Some(span) => {
            truncated = trajectory.truncate(span)?;
            &truncated
        }
        None => trajectory,
    };

    let width = source.dim() * S::COMPONENTS;
    let mut cells = Vec::with_capacity(source.len() * width);
    for row in source.states() {
        for component in 0..S::COMPONENTS {
            for value in row {
                cells.push((value.component(component) / box_size) as i32);
            }
        }
    }
    Ok(cells)
}

/// Quantizes, serializes each cell as a native-endian `i32`, and compresses.
/// Compressor errors propagate unmodified; there is no sensible degenerate
/// value for a compressed-length statistic.
pub fn compress<S: StateScalar>(
    trajectory: &Trajectory<S>,
    box_size: f64,
    span: Option<Span>,
    compressor: &impl Compressor,
) -> Result<Vec<u8>> {
    let cells = quantize(trajectory, box_size, span)?;
    let mut bytes = Vec::with_capacity(cells.len() * std::mem::size_of::<i32>());
    for cell in &cells {
        bytes.extend_from_slice(&cell.to_ne_bytes());
    }
    compressor.compress(&bytes)
}

/// The swept parameter: box size at fixed full duration, or duration at a
/// fixed box size. Box values are spaced geometrically, durations linearly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SweepAxis {
    BoxSize { min: f64, max: f64 },
    Duration { box_size: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepSettings {
    pub axis: SweepAxis,
    pub points: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            axis: SweepAxis::BoxSize {
                min: 1e-6,
                max: 10.0,
            },
            points: 200,
        }
    }
}

/// Parallel sequences of parameter values and compressed byte lengths,
/// suitable for log-log curve fitting.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub parameter: Vec<f64>,
    pub entropy: Vec<usize>,
}

/// Computes the compressed-length curve over the configured parameter range.
/// The evaluations are independent and run in parallel; each reads only the
/// shared immutable trajectory.
pub fn sweep<S: StateScalar>(
    trajectory: &Trajectory<S>,
    settings: SweepSettings,
    compressor: &impl Compressor,
) -> Result<SweepResult> {
    if settings.points == 0 {
        return Err(Error::invalid("sweep requires at least one point"));
    }
    let parameter = match settings.axis {
        SweepAxis::BoxSize { min, max } => {
            if !(min > 0.0 && max > min) {
                return Err(Error::invalid(format!(
                    "box sweep bounds must satisfy 0 < min < max, got [{min}, {max}]"
                )));
            }
            geomspace(min, max, settings.points)
        }
        SweepAxis::Duration { box_size } => {
            if !(box_size > 0.0) {
                return Err(Error::invalid(format!(
                    "box size must be positive, got {box_size}"
                )));
            }
            let total = trajectory.final_time();
            (1..=settings.points)
                .map(|k| total * k as f64 / settings.points as f64)
                .collect()
        }
    };
    debug!(
        "sweeping {} points over {:?} for \"{}\"",
        settings.points,
        settings.axis,
        trajectory.system()
    );

    let entropy = parameter
        .par_iter()
        .map(|&value| {
            let bytes = match settings.axis {
                SweepAxis::BoxSize { .. } => compress(trajectory, value, None, compressor)?,
                SweepAxis::Duration { box_size } => {
                    compress(trajectory, box_size, Some(Span::Time(value)), compressor)?
                }
            };
            trace!("parameter {value}: {} compressed bytes", bytes.len());
            Ok(bytes.len())
        })
        .collect::<Result<Vec<usize>>>()?;

    Ok(SweepResult { parameter, entropy })
}

fn geomspace(min: f64, max: f64, points: usize) -> Vec<f64> {
    if points == 1 {
        return vec![min];
    }
    let log_min = min.ln();
    let step = (max.ln() - log_min) / (points - 1) as f64;
    (0..points)
        .map(|i| (log_min + step * i as f64).exp())
        .collect()
}
