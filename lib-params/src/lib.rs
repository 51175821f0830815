//! Governance parameter source for the platform economy.
//!
//! The engines read every tunable number through a [`ParameterSource`]
//! snapshot taken at operation start, so governance changes land between
//! batches rather than inside them.

pub mod errors;
pub mod fields;
pub mod params;
pub mod source;

pub use errors::{ParamError, ParamResult};
pub use fields::{FieldCategory, ParamField};
pub use params::EconomicParams;
pub use source::{MemoryParams, ParamValue, ParameterSource};
