use cdim_core::traits::VectorField;

/// The Lorenz system:
/// dx/dt = sigma (y - x)
/// dy/dt = x (rho - z) - y
/// dz/dt = x y - beta z
#[derive(Debug, Clone, Copy)]
pub struct Lorenz {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for Lorenz {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

impl VectorField<f64> for Lorenz {
    fn dimension(&self) -> usize {
        3
    }

    fn eval(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        out[0] = self.sigma * (x[1] - x[0]);
        out[1] = x[0] * (self.rho - x[2]) - x[1];
        out[2] = x[0] * x[1] - self.beta * x[2];
    }

    fn name(&self) -> &str {
        "lorenz"
    }
}
