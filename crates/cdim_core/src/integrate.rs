use crate::error::{Error, Result};
use crate::solver::Rk4;
use crate::trajectory::{Span, Trajectory};
use crate::traits::{StateScalar, VectorField};
use log::debug;

fn validate<S: StateScalar>(
    field: &impl VectorField<S>,
    v0: &[S],
    h: f64,
    span: Span,
) -> Result<usize> {
    if v0.is_empty() {
        return Err(Error::invalid("initial state must have positive dimension"));
    }
    if v0.len() != field.dimension() {
        return Err(Error::invalid(format!(
            "initial state has dimension {} but field \"{}\" expects {}",
            v0.len(),
            field.name(),
            field.dimension()
        )));
    }
    span.resolve(h)
}

/// Integrates `field` from `v0` with fixed step `h`, materializing every
/// state. Memory is O(steps * dim); for memory-bound runs over large step
/// counts use [`integrate_iter`].
pub fn integrate<S: StateScalar>(
    field: &impl VectorField<S>,
    v0: &[S],
    h: f64,
    span: Span,
) -> Result<Trajectory<S>> {
    let steps = validate(field, v0, h, span)?;
    let dim = v0.len();
    debug!(
        "integrating \"{}\" ({dim}d) for {steps} steps, h = {h}",
        field.name()
    );

    let mut rk4 = Rk4::new(dim);
    let mut state = v0.to_vec();
    let mut t = 0.0;
    let mut states = Vec::with_capacity((steps + 1) * dim);
    let mut times = Vec::with_capacity(steps + 1);
    states.extend_from_slice(&state);
    times.push(0.0);

    for i in 1..=steps {
        rk4.step(field, &mut t, &mut state, h);
        // Keep the clock on the exact grid i * h rather than the accumulated
        // sum, which drifts over long runs.
        t = i as f64 * h;
        states.extend_from_slice(&state);
        times.push(t);
    }

    Ok(Trajectory::from_parts(
        states,
        times,
        dim,
        h,
        field.name().to_string(),
    ))
}

/// Integrates lazily: no step is computed until the returned iterator is
/// consumed. The iterator yields the initial state followed by one state per
/// step (`steps + 1` items total) and is single-pass; once exhausted, a fresh
/// call is required to traverse the trajectory again.
pub fn integrate_iter<S: StateScalar, F: VectorField<S>>(
    field: F,
    v0: &[S],
    h: f64,
    span: Span,
) -> Result<StateIter<S, F>> {
    let steps = validate(&field, v0, h, span)?;
    Ok(StateIter {
        field,
        rk4: Rk4::new(v0.len()),
        state: v0.to_vec(),
        t: 0.0,
        h,
        steps,
        emitted: 0,
    })
}

/// Lazy trajectory produced by [`integrate_iter`]. Owns its vector field.
pub struct StateIter<S: StateScalar, F: VectorField<S>> {
    field: F,
    rk4: Rk4<S>,
    state: Vec<S>,
    t: f64,
    h: f64,
    steps: usize,
    emitted: usize,
}

impl<S: StateScalar, F: VectorField<S>> StateIter<S, F> {
    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn dim(&self) -> usize {
        self.state.len()
    }

    /// Runs the remaining integration eagerly and returns the full
    /// trajectory. Only an unconsumed iterator can be materialized: a
    /// partially consumed one no longer starts at t = 0.
    pub fn materialize(self) -> Result<Trajectory<S>> {
        if self.emitted != 0 {
            return Err(Error::invalid(
                "cannot materialize a partially consumed lazy trajectory",
            ));
        }
        integrate(&self.field, &self.state, self.h, Span::Steps(self.steps))
    }
}

impl<S: StateScalar, F: VectorField<S>> Iterator for StateIter<S, F> {
    type Item = Vec<S>;

    fn next(&mut self) -> Option<Vec<S>> {
        if self.emitted > self.steps {
            return None;
        }
        if self.emitted == 0 {
            self.emitted = 1;
            return Some(self.state.clone());
        }
        self.rk4.step(&self.field, &mut self.t, &mut self.state, self.h);
        self.t = self.emitted as f64 * self.h;
        self.emitted += 1;
        Some(self.state.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps + 1 - self.emitted;
        (remaining, Some(remaining))
    }
}

impl<S: StateScalar, F: VectorField<S>> ExactSizeIterator for StateIter<S, F> {}

/// A trajectory at the production boundary: either fully materialized or
/// still lazy. Downstream consumers operate on the materialized case and
/// either convert or reject the lazy one.
pub enum Orbit<S: StateScalar, F: VectorField<S>> {
    Materialized(Trajectory<S>),
    Lazy(StateIter<S, F>),
}

impl<S: StateScalar, F: VectorField<S>> Orbit<S, F> {
    /// Converts to a concrete trajectory, running the lazy arm to completion.
    pub fn into_trajectory(self) -> Result<Trajectory<S>> {
        match self {
            Orbit::Materialized(trajectory) => Ok(trajectory),
            Orbit::Lazy(iter) => iter.materialize(),
        }
    }

    /// Borrows the materialized trajectory, rejecting the lazy arm.
    pub fn as_materialized(&self) -> Result<&Trajectory<S>> {
        match self {
            Orbit::Materialized(trajectory) => Ok(trajectory),
            Orbit::Lazy(_) => Err(Error::invalid(
                "lazy trajectory must be materialized before use",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{integrate, integrate_iter, Orbit};
    use crate::error::Result;
    use crate::trajectory::Span;
    use crate::traits::FnField;

    fn assert_err_contains<T>(result: Result<T>, needle: &str) {
        let err = match result {
            Ok(_) => panic!("expected error containing \"{needle}\""),
            Err(err) => err,
        };
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    fn decay() -> FnField<f64, impl Fn(f64, &[f64], &mut [f64])> {
        FnField::named(1, "decay", |_t, x: &[f64], out: &mut [f64]| out[0] = -x[0])
    }

    #[test]
    fn rejects_invalid_inputs() {
        let field = decay();
        assert_err_contains(
            integrate(&field, &[], 0.01, Span::Steps(10)),
            "positive dimension",
        );
        assert_err_contains(
            integrate(&field, &[1.0, 2.0], 0.01, Span::Steps(10)),
            "expects 1",
        );
        assert_err_contains(
            integrate(&field, &[1.0], 0.0, Span::Steps(10)),
            "h must be positive",
        );
        assert_err_contains(
            integrate(&field, &[1.0], 0.01, Span::Steps(0)),
            "positive number of steps",
        );
        assert_err_contains(
            integrate(&field, &[1.0], 0.01, Span::Time(-1.0)),
            "positive number of steps",
        );
    }

    #[test]
    fn trajectory_shape_and_time_grid() {
        let field = decay();
        let trajectory = integrate(&field, &[1.0], 0.01, Span::Time(1.0)).unwrap();
        assert_eq!(trajectory.steps(), 100);
        assert_eq!(trajectory.len(), 101);
        assert_eq!(trajectory.dim(), 1);
        assert_eq!(trajectory.system(), "decay");
        for (i, &t) in trajectory.times().iter().enumerate() {
            assert_eq!(t, i as f64 * 0.01);
        }
        assert_eq!(trajectory.final_time(), 100.0 * 0.01);
    }

    #[test]
    fn rk4_error_shrinks_at_fifth_order_per_step() {
        // Fixed step count: the accumulated relative error scales like the
        // per-step h^5 truncation error times the step count, so halving h
        // shrinks it by a factor of ~32. Relative error is used because the
        // analytic solution itself decays between the two final times.
        let field = decay();
        let steps = 20;
        let relative_error_at = |h: f64| {
            let trajectory = integrate(&field, &[1.0], h, Span::Steps(steps)).unwrap();
            let exact = (-(steps as f64) * h).exp();
            (trajectory.state(steps)[0] - exact).abs() / exact
        };
        let coarse = relative_error_at(0.1);
        let fine = relative_error_at(0.05);
        let ratio = coarse / fine;
        assert!(
            (26.0..42.0).contains(&ratio),
            "expected ~32x error reduction, got {ratio}"
        );
    }

    #[test]
    fn integration_is_deterministic() {
        // The field contract demands referential transparency; two runs over
        // the same inputs must agree bit for bit.
        let field = FnField::new(2, |t, x: &[f64], out: &mut [f64]| {
            out[0] = x[1] * (1.0 + t).sin();
            out[1] = -x[0] + 0.1 * x[1];
        });
        let a = integrate(&field, &[1.0, -0.5], 0.02, Span::Steps(500)).unwrap();
        let b = integrate(&field, &[1.0, -0.5], 0.02, Span::Steps(500)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn truncation_matches_shorter_integration_exactly() {
        let field = decay();
        let long = integrate(&field, &[1.0], 0.01, Span::Steps(100)).unwrap();
        let short = integrate(&field, &[1.0], 0.01, Span::Steps(50)).unwrap();
        let cut = long.truncate(Span::Steps(50)).unwrap();
        assert_eq!(cut, short);
    }

    #[test]
    fn lazy_iteration_matches_eager_states() {
        let field = decay();
        let eager = integrate(&field, &[1.0], 0.01, Span::Steps(50)).unwrap();
        let lazy: Vec<Vec<f64>> =
            integrate_iter(decay(), &[1.0], 0.01, Span::Steps(50)).unwrap().collect();
        assert_eq!(lazy.len(), eager.len());
        for (i, row) in lazy.iter().enumerate() {
            assert_eq!(row.as_slice(), eager.state(i));
        }
    }

    #[test]
    fn lazy_iterator_is_single_pass() {
        let mut iter = integrate_iter(decay(), &[1.0], 0.1, Span::Steps(3)).unwrap();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.by_ref().count(), 4);
        assert!(iter.next().is_none());
    }

    #[test]
    fn orbit_converts_or_rejects_lazy() {
        type RealField = FnField<f64, fn(f64, &[f64], &mut [f64])>;

        let eager = integrate(&decay(), &[1.0], 0.01, Span::Steps(20)).unwrap();
        let lazy = integrate_iter(decay(), &[1.0], 0.01, Span::Steps(20)).unwrap();

        let orbit = Orbit::Lazy(lazy);
        assert_err_contains(orbit.as_materialized(), "must be materialized");
        assert_eq!(orbit.into_trajectory().unwrap(), eager);

        let orbit: Orbit<f64, RealField> = Orbit::Materialized(eager.clone());
        assert_eq!(orbit.as_materialized().unwrap(), &eager);
    }

    #[test]
    fn partially_consumed_iterator_cannot_materialize() {
        let mut iter = integrate_iter(decay(), &[1.0], 0.01, Span::Steps(20)).unwrap();
        iter.next();
        assert_err_contains(iter.materialize(), "partially consumed");
    }
}
