use std::fmt;

use crate::error::SimplexError;
use crate::solution::ConstraintViolation;

/// Display palette cycled through when a problem does not pick its own colors
pub const PALETTE: [&str; 6] = [
    "rgb(59, 130, 246)",
    "rgb(16, 185, 129)",
    "rgb(239, 68, 68)",
    "rgb(245, 158, 11)",
    "rgb(139, 92, 246)",
    "rgb(236, 72, 153)",
];

/// A linear program as authored by the presentation layer
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Decision variables, in coefficient order
    pub variables: Vec<Variable>,
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
}

/// A decision variable. The solver never reads `value` or `color`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Symbolic label such as "x₁"
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub color: Option<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    pub direction: Direction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    /// Right-hand side value
    pub limit: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub color: Option<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[cfg_attr(feature = "serde", serde(rename = "max"))]
    Maximize,
    #[cfg_attr(feature = "serde", serde(rename = "min"))]
    Minimize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Le => "≤",
            Relation::Ge => "≥",
            Relation::Eq => "=",
        })
    }
}

/// Outcome of checking one constraint at a point
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintCheck {
    pub lhs: f64,
    pub limit: f64,
    pub satisfied: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: 0.0,
            color: None,
        }
    }
}

impl Direction {
    pub fn is_maximize(self) -> bool {
        self == Direction::Maximize
    }
}

impl Constraint {
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    /// Float equality is never exact here; `=` rows pass within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.relation {
            Relation::Le => lhs <= self.limit + tolerance,
            Relation::Ge => lhs >= self.limit - tolerance,
            Relation::Eq => (lhs - self.limit).abs() <= tolerance,
        }
    }

    /// How well `values` meet this constraint, as a percentage in `[0, 100]`.
    ///
    /// `≤` scores 100 at zero and falls to 0 at 1.5× the limit. `≥` scores
    /// `lhs / limit`. `=` scores 100 on the limit and 0 at 50% deviation.
    /// A zero limit scores 100 when satisfied and 0 otherwise.
    pub fn satisfaction(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        if self.limit == 0.0 {
            return if self.is_satisfied(values, 0.0) { 100.0 } else { 0.0 };
        }
        let score = match self.relation {
            Relation::Le => 1.0 - lhs / (self.limit * 1.5),
            Relation::Ge => lhs / self.limit,
            Relation::Eq => 1.0 - (lhs - self.limit).abs() / (self.limit * 0.5),
        };
        (score * 100.0).clamp(0.0, 100.0)
    }
}

impl Problem {
    pub fn new(variables: Vec<Variable>) -> Self {
        let n = variables.len();
        Self {
            title: String::new(),
            description: String::new(),
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                direction: Direction::Maximize,
                description: String::new(),
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, direction: Direction) {
        self.objective = Objective {
            coefficients,
            direction,
            description: std::mem::take(&mut self.objective.description),
        };
    }

    pub fn add_constraint(
        &mut self,
        description: impl Into<String>,
        coefficients: Vec<f64>,
        relation: Relation,
        limit: f64,
    ) {
        self.constraints.push(Constraint {
            coefficients,
            relation,
            limit,
            description: description.into(),
            color: None,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Every coefficient vector must have one entry per variable.
    pub fn validate(&self) -> Result<(), SimplexError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(SimplexError::EmptyProblem);
        }
        if self.objective.coefficients.len() != n {
            return Err(SimplexError::dimension(
                "objective",
                n,
                self.objective.coefficients.len(),
            ));
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(SimplexError::dimension(
                    format!("constraint {}", i + 1),
                    n,
                    c.coefficients.len(),
                ));
            }
        }
        Ok(())
    }

    /// Objective value at `values`, in the problem's own direction
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    pub fn check(&self, values: &[f64], tolerance: f64) -> Vec<ConstraintCheck> {
        self.constraints
            .iter()
            .map(|c| ConstraintCheck {
                lhs: c.lhs(values),
                limit: c.limit,
                satisfied: c.is_satisfied(values, tolerance),
            })
            .collect()
    }

    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.iter().all(|&v| v >= -tolerance)
            && self.constraints.iter().all(|c| c.is_satisfied(values, tolerance))
    }

    /// Constraints violated at `values`, worst first
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for (i, c) in self.constraints.iter().enumerate() {
            if c.is_satisfied(values, tolerance) {
                continue;
            }
            let lhs = c.lhs(values);
            let amount = (lhs - c.limit).abs();
            let label = if c.description.is_empty() {
                format!("Constraint {}", i + 1)
            } else {
                c.description.clone()
            };
            let description = match c.relation {
                Relation::Le => format!("{} exceeds maximum of {:.2} by {:.2}", label, c.limit, amount),
                Relation::Ge => format!("{} is below minimum of {:.2} by {:.2}", label, c.limit, amount),
                Relation::Eq => format!("{} requires exactly {:.2} but got {:.2}", label, c.limit, lhs),
            };
            violations.push(ConstraintViolation {
                constraint: i,
                required: c.limit,
                actual: lhs,
                violation_amount: amount,
                description,
            });
        }

        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        violations
    }

    /// Fills missing colors from [`PALETTE`]; constraints continue where variables stop.
    pub fn assign_default_colors(&mut self) {
        let offset = self.variables.len();
        for (i, v) in self.variables.iter_mut().enumerate() {
            if v.color.is_none() {
                v.color = Some(PALETTE[i % PALETTE.len()].to_string());
            }
        }
        for (i, c) in self.constraints.iter_mut().enumerate() {
            if c.color.is_none() {
                c.color = Some(PALETTE[(i + offset) % PALETTE.len()].to_string());
            }
        }
    }
}
