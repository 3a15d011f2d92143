pub mod report;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use report::{ConstraintResult, PointReport, SolveReport, VariableResult};
