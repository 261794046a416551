use cdim_core::traits::VectorField;
use num_complex::Complex;

/// The Stuart-Landau oscillator, a single complex amplitude equation:
/// dz/dt = (mu + i gamma) z - (1 + i beta) |z|^2 z
///
/// For mu > 0 the origin is unstable and trajectories settle on a limit
/// cycle of radius sqrt(mu). Exercises the complex state path end to end.
#[derive(Debug, Clone, Copy)]
pub struct StuartLandau {
    pub mu: f64,
    pub gamma: f64,
    pub beta: f64,
}

impl Default for StuartLandau {
    fn default() -> Self {
        Self {
            mu: 1.0,
            gamma: 1.0,
            beta: 0.5,
        }
    }
}

impl VectorField<Complex<f64>> for StuartLandau {
    fn dimension(&self) -> usize {
        1
    }

    fn eval(&self, _t: f64, z: &[Complex<f64>], out: &mut [Complex<f64>]) {
        let amplitude_sq = z[0].norm_sqr();
        out[0] = Complex::new(self.mu, self.gamma) * z[0]
            - Complex::new(1.0, self.beta) * z[0] * amplitude_sq;
    }

    fn name(&self) -> &str {
        "stuart-landau"
    }
}
