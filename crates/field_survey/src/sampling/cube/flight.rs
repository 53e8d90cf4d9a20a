//! Flight phase of the cube method.
//!
//! The fast variant works on a sliding set of `q + 1` undecided units: with `q`
//! balancing columns such a set always admits a direction `u` with `Bᵀu = 0`, so moving
//! the probabilities along `u` keeps every balancing total fixed. Each step moves as far
//! as possible in one of the two directions, which pins at least one unit to 0 or 1.
use rand::RngCore;

use super::CubeMatrix;
use crate::linalg::{self, PIVOT_TOLERANCE};
use crate::sampling::rand01;

/// Components of a direction smaller than this do not bound the step length.
const DIRECTION_TOLERANCE: f64 = 1e-12;

#[derive(Debug)]
pub(super) struct FlightOutcome {
    /// Units still strictly inside `(0, 1)`, in visiting order.
    pub remaining: Vec<usize>,
    /// Number of steps taken.
    pub steps: usize,
}

#[inline]
pub(super) fn is_open(p: f64, epsilon: f64) -> bool {
    p > epsilon && p < 1.0 - epsilon
}

#[inline]
pub(super) fn snap(p: f64, epsilon: f64) -> f64 {
    if p <= epsilon {
        0.0
    } else if p >= 1.0 - epsilon {
        1.0
    } else {
        p
    }
}

/// Run the flight using the first `q` columns of `a` over the units in `order`.
///
/// Stops when the remaining undecided units admit no balancing-preserving direction.
pub(super) fn fly(
    a: &CubeMatrix,
    q: usize,
    probs: &mut [f64],
    order: &[usize],
    epsilon: f64,
    rng: &mut dyn RngCore,
) -> FlightOutcome {
    debug_assert!(q <= a.cols());
    let mut queue = order.iter().copied();
    let mut working: Vec<usize> = Vec::with_capacity(q + 1);
    let mut scratch: Vec<f64> = Vec::with_capacity(q * (q + 1));
    let mut steps = 0;

    loop {
        while working.len() < q + 1 {
            match queue.next() {
                Some(k) if is_open(probs[k], epsilon) => working.push(k),
                Some(_) => {}
                None => break,
            }
        }
        if working.is_empty() {
            break;
        }

        // Bᵀ: one row per balancing column, one column per working unit.
        let m = working.len();
        scratch.clear();
        for j in 0..q {
            scratch.extend(working.iter().map(|&k| a.row(k)[j]));
        }
        let Some(u) = linalg::null_vector(&mut scratch, q, m, PIVOT_TOLERANCE) else {
            break;
        };

        step(probs, &working, &u, epsilon, rng);
        steps += 1;
        working.retain(|&k| is_open(probs[k], epsilon));
    }

    FlightOutcome {
        remaining: working,
        steps,
    }
}

/// One martingale step along `u`.
///
/// With `l_up`/`l_down` the longest feasible moves along `+u`/`-u`, move up with
/// probability `l_down / (l_up + l_down)`, so the expected change is zero.
fn step(probs: &mut [f64], working: &[usize], u: &[f64], epsilon: f64, rng: &mut dyn RngCore) {
    // (step length, position in `working`, bound reached)
    let mut up = (f64::INFINITY, 0usize, 0.0f64);
    let mut down = (f64::INFINITY, 0usize, 0.0f64);
    for (i, (&k, &ui)) in working.iter().zip(u).enumerate() {
        if ui.abs() <= DIRECTION_TOLERANCE {
            continue;
        }
        let p = probs[k];
        let (l_up, b_up, l_down, b_down) = if ui > 0.0 {
            ((1.0 - p) / ui, 1.0, p / ui, 0.0)
        } else {
            (-p / ui, 0.0, (p - 1.0) / ui, 1.0)
        };
        if l_up < up.0 {
            up = (l_up, i, b_up);
        }
        if l_down < down.0 {
            down = (l_down, i, b_down);
        }
    }

    let go_up = rand01(rng) * (up.0 + down.0) < down.0;
    let (lambda, sign, fixed, bound) = if go_up {
        (up.0, 1.0, up.1, up.2)
    } else {
        (down.0, -1.0, down.1, down.2)
    };
    for (&k, &ui) in working.iter().zip(u) {
        probs[k] = snap(probs[k] + sign * lambda * ui, epsilon);
    }
    // The limiting unit lands exactly on its bound, whatever the rounding.
    probs[working[fixed]] = bound;
}
