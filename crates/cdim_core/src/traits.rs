use num_complex::Complex;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Add;

/// A trait for scalars that can populate a trajectory state vector.
/// The integrator only ever adds states and scales them by real factors, so
/// real and complex trajectories run through the same recurrence with no
/// special-casing.
pub trait StateScalar:
    Copy + Debug + PartialEq + Add<Output = Self> + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Number of real components per scalar: 1 for reals, 2 for complex.
    const COMPONENTS: usize;

    fn zero() -> Self;

    /// Multiplies by a real factor.
    fn scale(self, factor: f64) -> Self;

    /// Extracts a real component: index 0 is the real part, index 1 the
    /// imaginary part.
    fn component(self, index: usize) -> f64;
}

impl StateScalar for f64 {
    const COMPONENTS: usize = 1;

    fn zero() -> Self {
        0.0
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    fn component(self, index: usize) -> f64 {
        debug_assert!(index == 0);
        self
    }
}

impl StateScalar for Complex<f64> {
    const COMPONENTS: usize = 2;

    fn zero() -> Self {
        Complex::new(0.0, 0.0)
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    fn component(self, index: usize) -> f64 {
        debug_assert!(index < 2);
        if index == 0 {
            self.re
        } else {
            self.im
        }
    }
}

/// A vector field giving a state's instantaneous rate of change.
///
/// This is the sole extension point for adding new dynamical systems. System
/// parameters live in the implementing struct as immutable values.
///
/// `eval` must be pure: deterministic given `(t, state)` and free of side
/// effects. The integrator treats the field as a referentially transparent
/// mapping and may replay it freely; a field that reads or writes captured
/// mutable state produces silently wrong trajectories, not an error.
pub trait VectorField<S: StateScalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// state: current state
    /// out: buffer to write the derivative (same dimension as `state`)
    fn eval(&self, t: f64, state: &[S], out: &mut [S]);

    /// Identifying label carried on produced trajectories. No behavioral role.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Adapter turning a plain closure into a [`VectorField`].
pub struct FnField<S, F> {
    dim: usize,
    name: &'static str,
    f: F,
    _marker: PhantomData<fn(&S)>,
}

impl<S: StateScalar, F: Fn(f64, &[S], &mut [S])> FnField<S, F> {
    pub fn new(dim: usize, f: F) -> Self {
        Self::named(dim, "unnamed", f)
    }

    pub fn named(dim: usize, name: &'static str, f: F) -> Self {
        Self {
            dim,
            name,
            f,
            _marker: PhantomData,
        }
    }
}

impl<S: StateScalar, F: Fn(f64, &[S], &mut [S])> VectorField<S> for FnField<S, F> {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn eval(&self, t: f64, state: &[S], out: &mut [S]) {
        (self.f)(t, state, out)
    }

    fn name(&self) -> &str {
        self.name
    }
}
