use std::{
    fmt::{Debug, Display, Formatter},
    ops::Sub,
};

use chrono::{DateTime, Utc};

use crate::quantity::{power::Watts, time::Seconds};

/// Sample timestamp in whole seconds.
#[derive(
    Copy,
    Clone,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    derive_more::FromStr,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Calendar time, if the timestamp is representable.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl Sub for Timestamp {
    type Output = Seconds;

    /// Widened so that the difference of any two timestamps is finite.
    #[expect(clippy::cast_precision_loss)]
    fn sub(self, rhs: Self) -> Self::Output {
        Seconds::from((i128::from(self.0) - i128::from(rhs.0)) as f64)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_utc() {
            Some(time) => write!(f, "{}({time:?})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Power reading, held constant until the next sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Constructor)]
pub struct Sample {
    pub time: Timestamp,
    pub power: Watts,
}
