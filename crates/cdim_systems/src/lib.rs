//! Vector-field catalog for the cdim engine.
//!
//! Each system is a plain parameter struct implementing
//! [`cdim_core::traits::VectorField`]. Parameters are immutable public
//! fields, keeping every field referentially transparent; defaults pick the
//! classical chaotic regime of each system.

pub mod kuramoto_sivashinsky;
pub mod lorenz;
pub mod rossler;
pub mod stuart_landau;

pub use kuramoto_sivashinsky::{KsGrid, KuramotoSivashinsky};
pub use lorenz::Lorenz;
pub use rossler::Rossler;
pub use stuart_landau::StuartLandau;
