use cdim_core::error::{Error, Result};
use cdim_core::traits::VectorField;

/// Spatial discretization of the Kuramoto-Sivashinsky domain: `n` grid
/// points on a periodic interval of the given length. Passed explicitly to
/// the field constructor so no grid constant lives in ambient state.
#[derive(Debug, Clone, Copy)]
pub struct KsGrid {
    pub n: usize,
    pub length: f64,
}

impl Default for KsGrid {
    fn default() -> Self {
        Self { n: 128, length: 22.0 }
    }
}

/// The Kuramoto-Sivashinsky equation
/// u_t = -u u_x - u_xx - u_xxxx
/// on a periodic 1D grid, with central finite differences (five-point
/// stencil for the fourth derivative). The state vector is the field sampled
/// at the grid points.
///
/// The u_xxxx term makes the semi-discrete system stiff; with the fixed-step
/// RK4 integrator the caller must keep `h` within the explicit stability
/// limit for the chosen grid.
#[derive(Debug, Clone, Copy)]
pub struct KuramotoSivashinsky {
    grid: KsGrid,
    dx: f64,
}

impl KuramotoSivashinsky {
    pub fn new(grid: KsGrid) -> Result<Self> {
        if grid.n < 5 {
            return Err(Error::invalid(format!(
                "KS grid needs at least 5 points for the fourth-derivative stencil, got {}",
                grid.n
            )));
        }
        if !(grid.length > 0.0) {
            return Err(Error::invalid(format!(
                "KS domain length must be positive, got {}",
                grid.length
            )));
        }
        let dx = grid.length / grid.n as f64;
        Ok(Self { grid, dx })
    }

    pub fn grid(&self) -> KsGrid {
        self.grid
    }
}

impl VectorField<f64> for KuramotoSivashinsky {
    fn dimension(&self) -> usize {
        self.grid.n
    }

    fn eval(&self, _t: f64, u: &[f64], out: &mut [f64]) {
        let n = self.grid.n;
        let dx = self.dx;
        let inv_2dx = 1.0 / (2.0 * dx);
        let inv_dx2 = 1.0 / (dx * dx);
        let inv_dx4 = inv_dx2 * inv_dx2;

        for i in 0..n {
            let m1 = u[(i + n - 1) % n];
            let p1 = u[(i + 1) % n];
            let m2 = u[(i + n - 2) % n];
            let p2 = u[(i + 2) % n];
            let ux = (p1 - m1) * inv_2dx;
            let uxx = (p1 - 2.0 * u[i] + m1) * inv_dx2;
            let uxxxx = (p2 - 4.0 * p1 + 6.0 * u[i] - 4.0 * m1 + m2) * inv_dx4;
            out[i] = -u[i] * ux - uxx - uxxxx;
        }
    }

    fn name(&self) -> &str {
        "kuramoto-sivashinsky"
    }
}

#[cfg(test)]
mod tests {
    use super::{KsGrid, KuramotoSivashinsky};
    use cdim_core::integrate::integrate;
    use cdim_core::trajectory::Span;
    use cdim_core::traits::VectorField;

    #[test]
    fn rejects_degenerate_grids() {
        assert!(KuramotoSivashinsky::new(KsGrid { n: 4, length: 22.0 }).is_err());
        assert!(KuramotoSivashinsky::new(KsGrid { n: 32, length: 0.0 }).is_err());
    }

    #[test]
    fn constant_profile_is_an_equilibrium() {
        let field = KuramotoSivashinsky::new(KsGrid { n: 16, length: 22.0 }).unwrap();
        let mut out = [1.0; 16];
        field.eval(0.0, &[3.0; 16], &mut out);
        for value in out {
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn coarse_grid_integration_stays_finite() {
        let field = KuramotoSivashinsky::new(KsGrid { n: 16, length: 22.0 }).unwrap();
        let v0: Vec<f64> = (0..16)
            .map(|i| {
                let x = i as f64 / 16.0 * std::f64::consts::TAU;
                0.1 * x.sin()
            })
            .collect();
        let trajectory = integrate(&field, &v0, 0.01, Span::Steps(500)).unwrap();
        assert_eq!(trajectory.dim(), 16);
        assert!(trajectory.is_finite());
    }
}
