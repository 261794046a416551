use crate::error::{Error, Result};
use crate::traits::StateScalar;
use serde::{Deserialize, Serialize};

/// Run length of an integration or truncation, either as an explicit step
/// count or as a stopping time resolved against the step size `h`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Span {
    Steps(usize),
    Time(f64),
}

impl Span {
    /// Resolves to a positive step count. `Time(t)` rounds `t / h` to the
    /// nearest integer.
    pub fn resolve(self, h: f64) -> Result<usize> {
        if !(h > 0.0) {
            return Err(Error::invalid(format!("step size h must be positive, got {h}")));
        }
        let steps = match self {
            Span::Steps(n) => n,
            // A negative or NaN quotient saturates to 0 and is rejected below.
            Span::Time(t) => (t / h).round() as usize,
        };
        if steps == 0 {
            return Err(Error::invalid(
                "span must resolve to a positive number of steps",
            ));
        }
        Ok(steps)
    }
}

/// A fixed-step trajectory of a dynamical system.
///
/// States are stored row-major, one row of `dim` scalars per time point;
/// row 0 is the initial condition, so there are `steps + 1` rows. Times sit
/// on the exact grid `times[i] == i * h`. A trajectory is immutable once
/// produced; truncation returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Trajectory<S: StateScalar> {
    states: Vec<S>,
    times: Vec<f64>,
    dim: usize,
    h: f64,
    steps: usize,
    system: String,
}

impl<S: StateScalar> Trajectory<S> {
    pub(crate) fn from_parts(
        states: Vec<S>,
        times: Vec<f64>,
        dim: usize,
        h: f64,
        system: String,
    ) -> Self {
        debug_assert_eq!(states.len() % dim, 0);
        debug_assert_eq!(states.len() / dim, times.len());
        let steps = times.len() - 1;
        Self {
            states,
            times,
            dim,
            h,
            steps,
            system,
        }
    }

    /// Dimension of the state space.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The fixed timestep.
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Number of integration steps taken.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Label of the vector field that produced this trajectory.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Number of stored time points (`steps + 1`).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The state row at time index `i`.
    pub fn state(&self, i: usize) -> &[S] {
        &self.states[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates over state rows in time order.
    pub fn states(&self) -> impl Iterator<Item = &[S]> {
        self.states.chunks_exact(self.dim)
    }

    /// Final time reached (`steps * h`).
    pub fn final_time(&self) -> f64 {
        *self.times.last().unwrap_or(&0.0)
    }

    /// True when every component of every state is finite.
    pub fn is_finite(&self) -> bool {
        self.states
            .iter()
            .all(|s| (0..S::COMPONENTS).all(|c| s.component(c).is_finite()))
    }

    /// Returns the prefix of this trajectory ending at the resolved stopping
    /// point. `h` and `system` carry over unchanged.
    ///
    /// A stopping point past the end of the trajectory is an error rather
    /// than a silent clamp: clamping would make entropy-vs-duration sweeps
    /// quietly produce flat regions.
    pub fn truncate(&self, span: Span) -> Result<Trajectory<S>> {
        let steps = span.resolve(self.h)?;
        if steps > self.steps {
            return Err(Error::invalid(format!(
                "truncation to {steps} steps exceeds trajectory length of {} steps",
                self.steps
            )));
        }
        Ok(Trajectory::from_parts(
            self.states[..(steps + 1) * self.dim].to_vec(),
            self.times[..=steps].to_vec(),
            self.dim,
            self.h,
            self.system.clone(),
        ))
    }
}
