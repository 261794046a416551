use crate::traits::{StateScalar, VectorField};

/// Classic Runge-Kutta 4th order stepper, fixed step only.
///
/// Stage buffers are preallocated once per run; `step` performs no heap
/// allocation. Local truncation error is O(h^5); no error estimation or step
/// adaptation is performed.
pub struct Rk4<S: StateScalar> {
    k1: Vec<S>,
    k2: Vec<S>,
    k3: Vec<S>,
    k4: Vec<S>,
    tmp: Vec<S>,
}

impl<S: StateScalar> Rk4<S> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![S::zero(); dim],
            k2: vec![S::zero(); dim],
            k3: vec![S::zero(); dim],
            k4: vec![S::zero(); dim],
            tmp: vec![S::zero(); dim],
        }
    }

    /// Advances `state` by one step of size `h`, updating `t`.
    pub fn step(&mut self, field: &impl VectorField<S>, t: &mut f64, state: &mut [S], h: f64) {
        let t0 = *t;

        // k1 = f(t, y)
        field.eval(t0, state, &mut self.k1);

        // k2 = f(t + h/2, y + h*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + self.k1[i].scale(h * 0.5);
        }
        field.eval(t0 + h * 0.5, &self.tmp, &mut self.k2);

        // k3 = f(t + h/2, y + h*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + self.k2[i].scale(h * 0.5);
        }
        field.eval(t0 + h * 0.5, &self.tmp, &mut self.k3);

        // k4 = f(t + h, y + h*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + self.k3[i].scale(h);
        }
        field.eval(t0 + h, &self.tmp, &mut self.k4);

        // y_next = y + h/6 * (k1 + 2k2 + 2k3 + k4)
        let sixth = h / 6.0;
        for i in 0..state.len() {
            state[i] = state[i]
                + (self.k1[i] + self.k2[i].scale(2.0) + self.k3[i].scale(2.0) + self.k4[i])
                    .scale(sixth);
        }

        *t = t0 + h;
    }
}

#[cfg(test)]
mod tests {
    use super::Rk4;
    use crate::traits::FnField;
    use num_complex::Complex;

    #[test]
    fn single_step_tracks_exponential_decay() {
        let field = FnField::new(1, |_t, x: &[f64], out: &mut [f64]| out[0] = -x[0]);
        let mut rk4 = Rk4::new(1);
        let mut t = 0.0;
        let mut state = [1.0];
        let h = 0.1;
        rk4.step(&field, &mut t, &mut state, h);
        assert!((t - h).abs() < 1e-15);
        // One step carries the O(h^5) local truncation error, ~1e-7 here.
        assert!((state[0] - (-h).exp()).abs() < 1e-6);
    }

    #[test]
    fn complex_rotation_preserves_magnitude() {
        // dz/dt = i z rotates without changing |z|.
        let field = FnField::new(1, |_t, z: &[Complex<f64>], out: &mut [Complex<f64>]| {
            out[0] = Complex::new(0.0, 1.0) * z[0];
        });
        let mut rk4 = Rk4::new(1);
        let mut t = 0.0;
        let mut state = [Complex::new(1.0, 0.0)];
        for _ in 0..100 {
            rk4.step(&field, &mut t, &mut state, 0.01);
        }
        assert!((state[0].norm() - 1.0).abs() < 1e-9);
        // After t = 1 the phase should be 1 radian.
        assert!((state[0].arg() - 1.0).abs() < 1e-6);
    }
}
