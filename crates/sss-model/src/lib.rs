//! Triple-S survey metadata model.
//!
//! The model mirrors one metadata document: survey-wide [`Datafile`]
//! attributes, the single [`Record`] describing the data file layout, and the
//! ordered list of [`Variable`]s. Instances are filled by `sss-ingest` and then
//! only read.

pub mod enums;
pub mod survey;
pub mod variable;

pub use enums::{MultipleKind, RecordFormat, VariableFormat, VariableType, VariableUse};
pub use survey::{Datafile, Metadata, PRIORITY_ATTRIBUTES, Record};
pub use variable::{Position, Range, Spread, Variable};
