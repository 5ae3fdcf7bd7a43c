pub mod integrator;
pub mod sample;
pub mod store;

pub use self::{
    integrator::QueryError,
    sample::Timestamp,
    store::{LabelMatching, LoadError, LoadOptions, RawRecord, SampleStore},
};
