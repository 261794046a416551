//! The `cdim_core` crate provides the numeric engine for compression-based
//! complexity estimation of dynamical-system trajectories.
//!
//! Key components:
//! - **Traits**: `StateScalar` (real/complex scalar abstraction), `VectorField`
//!   (the sole extension point for dynamical systems), `Compressor`.
//! - **Integrate**: fixed-step RK4 integration, eager (`integrate`) or lazy
//!   (`integrate_iter`), with the `Orbit` tagged variant at the boundary.
//! - **Trajectory**: the immutable time-indexed value type and its prefix
//!   truncation.
//! - **Entropy**: quantize-then-compress estimation of trajectory complexity
//!   and the box-size / duration sweep producing compressed-length curves.

pub mod entropy;
pub mod error;
pub mod integrate;
pub mod solver;
pub mod trajectory;
pub mod traits;
