use std::iter;

use crate::{
    core::{
        sample::{Sample, Timestamp},
        store::SampleStore,
    },
    quantity::energy::{Joules, KilowattHours},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum QueryError {
    #[display("at least 2 samples are needed, the store has {count}")]
    InsufficientData { count: usize },

    #[display("the range ends at {end} before it starts at {start}")]
    InvalidRange { start: Timestamp, end: Timestamp },

    #[display("the range starts at {start}, before the first sample at {first}")]
    RangeBeforeData { start: Timestamp, first: Timestamp },

    #[display("the range ends at {end}, after the last sample at {last}")]
    RangeAfterData { end: Timestamp, last: Timestamp },

    #[display("the energy over {start}..={end} is not a finite number")]
    NonFiniteEnergy { start: Timestamp, end: Timestamp },

    #[display("could not extract `starttime` and `endtime` from the request")]
    MalformedQuery,
}

impl SampleStore {
    /// Energy consumed within `start..=end`.
    ///
    /// Power is piecewise-constant: each sample's power holds until the next sample.
    /// Both ends must lie within the loaded coverage, inclusively.
    pub fn get_energy(&self, start: Timestamp, end: Timestamp) -> Result<KilowattHours, QueryError> {
        let samples = self.samples();
        let [first, .., last] = samples else {
            return Err(QueryError::InsufficientData { count: samples.len() });
        };
        if end < start {
            return Err(QueryError::InvalidRange { start, end });
        }
        if start < first.time {
            return Err(QueryError::RangeBeforeData { start, first: first.time });
        }
        if end > last.time {
            return Err(QueryError::RangeAfterData { end, last: last.time });
        }

        let start_index = boundary_index(samples, start);
        let end_index = start_index + boundary_index(&samples[start_index..], end);
        let energy = KilowattHours::from(integrate(&samples[start_index..=end_index], start, end));
        if energy.0.is_finite() {
            Ok(energy)
        } else {
            Err(QueryError::NonFiniteEnergy { start, end })
        }
    }
}

/// Index of the last sample at or before `time`, which is the sample whose power is in effect.
///
/// The first sample must not be later than `time`.
fn boundary_index(samples: &[Sample], time: Timestamp) -> usize {
    samples.partition_point(|sample| sample.time <= time).saturating_sub(1)
}

/// Rectangular sum over the samples spanning `start..=end`.
///
/// The first sample may start before `start`, and the last sample may start before `end`:
/// only the overlapping parts of their intervals are counted.
fn integrate(window: &[Sample], start: Timestamp, end: Timestamp) -> Joules {
    let interval_ends = window.iter().skip(1).map(|sample| sample.time).chain(iter::once(end));
    window
        .iter()
        .zip(interval_ends)
        .map(|(sample, interval_end)| sample.power * (interval_end - sample.time.max(start)))
        .sum()
}
