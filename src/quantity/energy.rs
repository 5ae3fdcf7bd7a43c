use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;

use crate::quantity::Quantity;

const SECONDS_PER_HOUR: f64 = 3600.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;

/// Watt-seconds.
pub type Joules = Quantity<1, 1>;

impl Debug for Joules {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}J", self.0)
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize)]
pub struct KilowattHours(pub f64);

impl From<Joules> for KilowattHours {
    fn from(joules: Joules) -> Self {
        Self(joules.get() / SECONDS_PER_HOUR / WATTS_PER_KILOWATT)
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}kWh", self.0)
    }
}
