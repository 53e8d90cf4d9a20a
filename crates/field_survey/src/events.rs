//! Event types and sinks for observing sampling and survey runs.
//!
//! Samplers and the survey runner report progress as [`SamplingEvent`]s to any
//! [`EventSink`]. Pass `&mut ()` to ignore them, a [`VecSink`] to collect them, or an
//! [`FnSink`] to forward them to a closure.

/// Describes events emitted while drawing a sample.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingEvent {
    /// Emitted once the inputs were validated.
    Started {
        /// Number of frame units.
        population: usize,
        /// Target sample size.
        sample_size: usize,
        /// Balancing columns, including the inclusion-probability column.
        balancing_columns: usize,
    },

    /// Emitted when the flight phase cannot move any further.
    FlightFinished {
        /// Number of flight steps taken.
        steps: usize,
        /// Units still undecided.
        undecided: usize,
    },

    /// Emitted after each landing round that dropped one balancing variable.
    LandingStep {
        /// Name of the dropped variable.
        dropped: String,
        /// Undecided units before this round.
        undecided_before: usize,
        /// Undecided units after this round.
        undecided_after: usize,
    },

    /// Emitted when the sample is final.
    Finished {
        /// Number of selected units.
        selected: usize,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. sampler or record).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`SamplingEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SamplingEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SamplingEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SamplingEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SamplingEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SamplingEvent),
{
    #[inline]
    fn send(&mut self, event: SamplingEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SamplingEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<SamplingEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SamplingEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SamplingEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(SamplingEvent::Finished { selected: 3 });
        sink.send(SamplingEvent::Warning {
            context: "a".into(),
            message: "m".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.as_slice()[0], SamplingEvent::Finished { selected: 3 });
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(SamplingEvent::Finished { selected: 0 });
        assert_eq!(count, 1);
    }
}
