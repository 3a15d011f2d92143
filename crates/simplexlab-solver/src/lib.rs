mod error;
mod playback;
mod problem;
mod simplex;
mod solution;
mod standard;
mod steps;
mod tableau;

pub use error::SimplexError;
pub use playback::Playback;
pub use problem::{Constraint, ConstraintCheck, Direction, Objective, PALETTE, Problem, Relation, Variable};
pub use simplex::{Run, Solver};
pub use solution::{ConstraintViolation, Extraction, Solution, SolutionStatus};
pub use standard::StandardProblem;
pub use steps::{Phase, Pivot, Series, Step, Trajectory};
pub use tableau::Tableau;
