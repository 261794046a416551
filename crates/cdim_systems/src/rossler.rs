use cdim_core::traits::VectorField;

/// The Rössler system:
/// dx/dt = -y - z
/// dy/dt = x + a y
/// dz/dt = b + z (x - c)
#[derive(Debug, Clone, Copy)]
pub struct Rossler {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for Rossler {
    fn default() -> Self {
        Self {
            a: 0.2,
            b: 0.2,
            c: 5.7,
        }
    }
}

impl VectorField<f64> for Rossler {
    fn dimension(&self) -> usize {
        3
    }

    fn eval(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        out[0] = -x[1] - x[2];
        out[1] = x[0] + self.a * x[1];
        out[2] = self.b + x[2] * (x[0] - self.c);
    }

    fn name(&self) -> &str {
        "rossler"
    }
}
