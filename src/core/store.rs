use std::path::PathBuf;

use crate::{
    core::sample::{Sample, Timestamp},
    prelude::*,
    quantity::power::Watts,
};

pub const DEFAULT_CAPACITY: usize = 16192;

const CURRENT_LABEL: &str = "current";
const VOLTAGE_LABEL: &str = "voltage";
const TIME_LABEL: &str = "time";

/// How a record's field label is compared with the expected name.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum LabelMatching {
    /// The label must equal the expected name.
    #[default]
    Exact,

    /// The label must contain the expected name, so `currents` passes for `current`.
    ///
    /// Kept for compatibility with sensor files accepted by older readers.
    Substring,
}

impl LabelMatching {
    #[must_use]
    pub fn matches(self, label: &str, expected: &str) -> bool {
        match self {
            Self::Exact => label == expected,
            Self::Substring => label.contains(expected),
        }
    }

    fn check(self, index: usize, label: &str, expected: &'static str) -> Result<(), LoadError> {
        if self.matches(label, expected) {
            Ok(())
        } else {
            Err(LoadError::UnexpectedLabel { index, expected, found: label.to_owned() })
        }
    }
}

#[derive(Copy, Clone, Debug, bon::Builder)]
pub struct LoadOptions {
    /// Maximum number of samples the store accepts.
    #[builder(default = DEFAULT_CAPACITY)]
    pub capacity: usize,

    #[builder(default)]
    pub label_matching: LabelMatching,
}

/// Labelled value as it appears in the sensor file.
#[derive(Clone, Debug, PartialEq, derive_more::Constructor)]
pub struct Field<T> {
    pub label: String,
    pub value: T,
}

/// Unvalidated record: the fields are positional, the labels are checked on load.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub current: Field<f64>,
    pub voltage: Field<f64>,
    pub time: Field<i64>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to read `{}`", path.display())]
    Unreadable { path: PathBuf, source: std::io::Error },

    #[display("expected the sensor data to start with `[`, found {found:?}")]
    NotAnArray { found: Option<char> },

    #[display("record #{index}: expected label `{expected}`, found `{found}`")]
    UnexpectedLabel { index: usize, expected: &'static str, found: String },

    #[display("record #{index}: current {current} A and voltage {voltage} V do not give a finite power")]
    NonFinite { index: usize, current: f64, voltage: f64 },

    #[display("more than {capacity} samples")]
    CapacityExceeded { capacity: usize },

    #[display("record #{index}: time {time} does not follow {previous}")]
    OutOfOrder { index: usize, previous: Timestamp, time: Timestamp },
}

/// Power samples in strictly increasing time order, immutable once loaded.
#[derive(Debug)]
pub struct SampleStore {
    samples: Vec<Sample>,
}

impl SampleStore {
    /// Validate the raw records and collect them into a store.
    ///
    /// Any invalid record fails the whole load.
    #[instrument(skip_all, fields(capacity = options.capacity, label_matching = ?options.label_matching))]
    pub fn load<I>(records: I, options: LoadOptions) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut samples: Vec<Sample> = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let matching = options.label_matching;
            matching.check(index, &record.current.label, CURRENT_LABEL)?;
            matching.check(index, &record.voltage.label, VOLTAGE_LABEL)?;
            matching.check(index, &record.time.label, TIME_LABEL)?;

            if samples.len() >= options.capacity {
                return Err(LoadError::CapacityExceeded { capacity: options.capacity });
            }

            let (current, voltage) = (record.current.value, record.voltage.value);
            let power = Watts::from_volt_amperes(voltage, current);
            if !power.get().is_finite() {
                return Err(LoadError::NonFinite { index, current, voltage });
            }

            let sample = Sample::new(Timestamp(record.time.value), power);
            if let Some(previous) = samples.last()
                && previous.time >= sample.time
            {
                return Err(LoadError::OutOfOrder {
                    index,
                    previous: previous.time,
                    time: sample.time,
                });
            }
            samples.push(sample);
        }

        debug!(n_samples = samples.len(), "loaded");
        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamps of the first and the last sample.
    #[must_use]
    pub fn coverage(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.samples.first()?.time, self.samples.last()?.time))
    }
}
