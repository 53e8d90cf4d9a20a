//! Landing phase by suppression of variables.
//!
//! After the flight at most `p` units remain undecided. The landing drops the last
//! balancing column and flies again over those units, repeating with one column fewer
//! each round. The final round has no column left, where every unit is its own working
//! set, so the loop always ends with every unit decided. Remaining units are visited in
//! the order the flight left them, which is the seeded unit order.
use rand::RngCore;
use tracing::debug;

use super::flight::fly;
use super::CubeMatrix;
use crate::events::{EventSink, SamplingEvent};

/// Decide every unit in `remaining`. Returns the number of flight steps taken.
pub(super) fn land(
    a: &CubeMatrix,
    probs: &mut [f64],
    mut remaining: Vec<usize>,
    epsilon: f64,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> usize {
    let mut steps = 0;
    for kept in (0..a.cols()).rev() {
        if remaining.is_empty() {
            break;
        }
        let before = remaining.len();
        let outcome = fly(a, kept, probs, &remaining, epsilon, rng);
        steps += outcome.steps;
        remaining = outcome.remaining;

        let dropped = a.names()[kept].clone();
        debug!(
            "Landing without '{}': {} -> {} undecided.",
            dropped,
            before,
            remaining.len()
        );
        sink.send(SamplingEvent::LandingStep {
            dropped,
            undecided_before: before,
            undecided_after: remaining.len(),
        });
    }
    debug_assert!(remaining.is_empty(), "landing left undecided units");
    steps
}
