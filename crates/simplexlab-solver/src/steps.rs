use crate::solution::SolutionStatus;
use crate::tableau::Tableau;

/// One entry of the step-by-step walkthrough.
///
/// Tableaux are stored by value; later pivots never touch earlier steps.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The initial tableau (no pivot) or the tableau right after a pivot
    Tableau {
        tableau: Tableau,
        pivot: Option<Pivot>,
        explanation: String,
    },
    /// Why the run stopped
    Verdict {
        status: SolutionStatus,
        explanation: String,
    },
    /// Final values, objective in the caller's direction
    Solution {
        values: Vec<f64>,
        objective_value: f64,
        explanation: String,
    },
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub row: usize,
    pub column: usize,
    /// Label of the entering variable, e.g. "x2"
    pub entering: String,
    /// Label of the variable that left the basis, e.g. "s1"
    pub leaving: String,
    /// `RHS / pivot element` before the pivot
    pub ratio: f64,
    pub phase: Phase,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Clearing a negative right-hand side
    Restoration,
    /// Improving the objective
    Optimization,
}

impl Step {
    pub fn explanation(&self) -> &str {
        match self {
            Step::Tableau { explanation, .. }
            | Step::Verdict { explanation, .. }
            | Step::Solution { explanation, .. } => explanation,
        }
    }

    pub fn tableau(&self) -> Option<&Tableau> {
        match self {
            Step::Tableau { tableau, .. } => Some(tableau),
            _ => None,
        }
    }

    pub fn pivot(&self) -> Option<&Pivot> {
        match self {
            Step::Tableau { pivot, .. } => pivot.as_ref(),
            _ => None,
        }
    }

    pub fn is_solution(&self) -> bool {
        matches!(self, Step::Solution { .. })
    }
}

/// Values over the tableau steps, for plotting
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    /// "Start", "Iteration 1", ...
    pub labels: Vec<String>,
    /// Objective value in the caller's direction
    pub objective: Vec<f64>,
    pub variables: Vec<Series>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn new(names: &[String]) -> Self {
        Self {
            labels: Vec::new(),
            objective: Vec::new(),
            variables: names
                .iter()
                .map(|name| Series {
                    name: name.clone(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    pub(crate) fn record(&mut self, label: String, objective: f64, values: &[f64]) {
        self.labels.push(label);
        self.objective.push(objective);
        for (series, &value) in self.variables.iter_mut().zip(values) {
            series.values.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_steps_are_tagged_by_kind() {
        let step = Step::Solution {
            values: vec![2.0, 6.0],
            objective_value: 36.0,
            explanation: "done".to_string(),
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["kind"], "solution");
        assert_eq!(value["objective_value"], 36.0);

        let verdict = Step::Verdict {
            status: SolutionStatus::IterationLimitReached,
            explanation: String::new(),
        };
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["kind"], "verdict");
        assert_eq!(value["status"], "iteration_limit_reached");
    }
}
