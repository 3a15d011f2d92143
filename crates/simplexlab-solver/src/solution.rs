/// Terminal state of a simplex run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// No reduced cost is negative
    Optimal,
    /// An entering column had no positive entry
    Unbounded,
    /// A row with negative right-hand side had no negative coefficient
    Infeasible,
    /// The pivot budget ran out; the last tableau is a best effort
    IterationLimitReached,
}

/// How the final variable values were obtained
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Read off unit columns and verified against every row
    Direct,
    /// Unit-column reading failed verification; rebuilt from the tracked basis
    Reconstructed,
    /// Neither reading satisfies the constraints
    Inconsistent,
}

/// The result of a simplex run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolutionStatus,
    /// One value per original variable
    pub values: Vec<f64>,
    /// Objective value in the caller's direction
    pub objective_value: f64,
    pub extraction: Extraction,
    /// Constraint violations (populated when extraction is inconsistent)
    pub violations: Vec<ConstraintViolation>,
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Index of the constraint
    pub constraint: usize,
    /// Required value (the constraint limit)
    pub required: f64,
    /// Actual left-hand side achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl SolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::IterationLimitReached => "iteration_limit_reached",
        }
    }
}

impl Solution {
    /// False when the values violate a constraint beyond tolerance
    pub fn is_consistent(&self) -> bool {
        self.extraction != Extraction::Inconsistent
    }
}
