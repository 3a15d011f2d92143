use log::{debug, trace, warn};

use crate::error::SimplexError;
use crate::problem::Problem;
use crate::solution::{ConstraintViolation, Extraction, Solution, SolutionStatus};
use crate::standard::StandardProblem;
use crate::steps::{Phase, Pivot, Step, Trajectory};
use crate::tableau::Tableau;

const INITIAL_EXPLANATION: &str = "Initial simplex tableau. Decision variables are the columns and \
     constraints are the rows; the slack variables form the starting basis.";

/// Tableau simplex solver that records every step it takes
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Reduced costs above `-optimality_tolerance` count as non-negative
    optimality_tolerance: f64,
    /// Tolerance for recognizing unit columns
    basic_tolerance: f64,
    /// Tolerance for `Ax <= b` and negative right-hand sides
    feasibility_tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            optimality_tolerance: 1e-6,
            basic_tolerance: 1e-5,
            feasibility_tolerance: 1e-5,
        }
    }
}

/// Everything one run produced, in order
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub status: SolutionStatus,
    pub standard: StandardProblem,
    pub steps: Vec<Step>,
    pub solution: Solution,
    pub trajectory: Trajectory,
}

impl Run {
    /// Tableau the run stopped on
    pub fn final_tableau(&self) -> Option<&Tableau> {
        self.steps.iter().rev().find_map(Step::tableau)
    }

    pub fn iterations(&self) -> usize {
        self.steps.iter().filter(|step| step.pivot().is_some()).count()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Sets all three tolerances at once
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.optimality_tolerance = tol;
        self.basic_tolerance = tol;
        self.feasibility_tolerance = tol;
        self
    }

    pub fn with_optimality_tolerance(mut self, tol: f64) -> Self {
        self.optimality_tolerance = tol;
        self
    }

    pub fn with_basic_tolerance(mut self, tol: f64) -> Self {
        self.basic_tolerance = tol;
        self
    }

    pub fn with_feasibility_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tolerance = tol;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn feasibility_tolerance(&self) -> f64 {
        self.feasibility_tolerance
    }

    /// Converts `problem` to standard form and runs the simplex method on it
    pub fn solve(&self, problem: &Problem) -> Result<Run, SimplexError> {
        let standard = StandardProblem::from_problem(problem)?;
        let names: Vec<String> = problem.variables.iter().map(|v| v.name.clone()).collect();
        self.run(standard, &names, |values| {
            problem.violations(values, self.feasibility_tolerance)
        })
    }

    /// Runs the simplex method on a problem that is already in standard form
    pub fn solve_standard(&self, standard: &StandardProblem) -> Result<Run, SimplexError> {
        let names: Vec<String> = (1..=standard.num_variables()).map(|j| format!("x{}", j)).collect();
        self.run(standard.clone(), &names, |values| {
            self.row_violations(standard, values)
        })
    }

    fn run<F>(&self, standard: StandardProblem, names: &[String], violations: F) -> Result<Run, SimplexError>
    where
        F: Fn(&[f64]) -> Vec<ConstraintViolation>,
    {
        let mut tableau = Tableau::from_standard(&standard)?;
        let mut steps = vec![Step::Tableau {
            tableau: tableau.clone(),
            pivot: None,
            explanation: INITIAL_EXPLANATION.to_string(),
        }];
        let mut trajectory = Trajectory::new(names);
        trajectory.record(
            "Start".to_string(),
            standard.caller_objective(tableau.objective_value()),
            &tableau.basic_solution(),
        );

        let mut iteration = 0;
        let status = 'run: {
            // The slack basis is infeasible while any right-hand side is negative
            while let Some(row) = tableau.infeasible_row(self.feasibility_tolerance) {
                let Some(col) = tableau.restoring_column(row, self.optimality_tolerance) else {
                    debug!("row {} cannot be made feasible", row + 1);
                    break 'run SolutionStatus::Infeasible;
                };
                if iteration >= self.max_iterations {
                    break 'run SolutionStatus::IterationLimitReached;
                }
                iteration += 1;
                let step = self.pivot(&mut tableau, row, col, Phase::Restoration, iteration);
                steps.push(step);
                trajectory.record(
                    format!("Iteration {}", iteration),
                    standard.caller_objective(tableau.objective_value()),
                    &tableau.basic_solution(),
                );
            }

            loop {
                let Some(col) = tableau.entering_column(self.optimality_tolerance) else {
                    break 'run SolutionStatus::Optimal;
                };
                let Some(row) = tableau.leaving_row(col) else {
                    debug!("column {} has no positive entry", tableau.column_label(col));
                    break 'run SolutionStatus::Unbounded;
                };
                if iteration >= self.max_iterations {
                    break 'run SolutionStatus::IterationLimitReached;
                }
                iteration += 1;
                let step = self.pivot(&mut tableau, row, col, Phase::Optimization, iteration);
                steps.push(step);
                trajectory.record(
                    format!("Iteration {}", iteration),
                    standard.caller_objective(tableau.objective_value()),
                    &tableau.basic_solution(),
                );
            }
        };

        debug!("simplex stopped after {} iterations: {:?}", iteration, status);
        steps.push(Step::Verdict {
            status,
            explanation: self.verdict_explanation(status, &tableau),
        });

        let solution = self.extract_solution(&tableau, &standard, status, violations);
        steps.push(Step::Solution {
            values: solution.values.clone(),
            objective_value: solution.objective_value,
            explanation: solution_explanation(&solution, names),
        });

        Ok(Run {
            status,
            standard,
            steps,
            solution,
            trajectory,
        })
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize, phase: Phase, iteration: usize) -> Step {
        let entering = tableau.column_label(col);
        let leaving = tableau.column_label(tableau.basic_vars()[row]);
        let rhs = tableau.rhs(row);
        let ratio = rhs / tableau.rows()[row][col];

        debug!(
            "iteration {} ({:?}): {} enters, {} leaves at row {}, ratio {:.6}",
            iteration,
            phase,
            entering,
            leaving,
            row + 1,
            ratio
        );
        tableau.pivot(row, col);
        trace!("tableau after iteration {}: {:?}", iteration, tableau.rows());

        let explanation = match phase {
            Phase::Restoration => format!(
                "Iteration {}: row {} has a negative right-hand side ({:.2}). Variable {} enters the basis, \
                 replacing {}, to restore feasibility.",
                iteration,
                row + 1,
                rhs,
                entering,
                leaving
            ),
            Phase::Optimization => format!(
                "Iteration {}: variable {} enters the basis, replacing {} in row {} (ratio {:.2}).",
                iteration,
                entering,
                leaving,
                row + 1,
                ratio
            ),
        };

        Step::Tableau {
            tableau: tableau.clone(),
            pivot: Some(Pivot {
                row,
                column: col,
                entering,
                leaving,
                ratio,
                phase,
            }),
            explanation,
        }
    }

    fn verdict_explanation(&self, status: SolutionStatus, tableau: &Tableau) -> String {
        match status {
            SolutionStatus::Optimal => {
                "No negative values remain in the Z row. Optimal solution found!".to_string()
            }
            SolutionStatus::Unbounded => {
                "The problem is unbounded! There is no finite optimal solution.".to_string()
            }
            SolutionStatus::Infeasible => match tableau.infeasible_row(self.feasibility_tolerance) {
                Some(row) => format!(
                    "Row {} has a negative right-hand side but no negative coefficient. \
                     The constraints cannot all be satisfied.",
                    row + 1
                ),
                None => "The constraints cannot all be satisfied.".to_string(),
            },
            SolutionStatus::IterationLimitReached => format!(
                "Iteration limit of {} reached before optimality was proven. \
                 The last tableau is shown as a best effort.",
                self.max_iterations
            ),
        }
    }

    /// Reads the solution off the final tableau and verifies it.
    ///
    /// Values that break a row, or whose objective disagrees with the tableau,
    /// are rebuilt from the tracked basis; if those fail too the solution is
    /// reported as inconsistent with its violations.
    fn extract_solution<F>(
        &self,
        tableau: &Tableau,
        standard: &StandardProblem,
        status: SolutionStatus,
        violations: F,
    ) -> Solution
    where
        F: Fn(&[f64]) -> Vec<ConstraintViolation>,
    {
        let (mut values, z) = tableau.extract(self.basic_tolerance);
        let mut extraction = Extraction::Direct;

        if !self.is_consistent(standard, &values, z) {
            warn!("unit-column extraction disagrees with the tableau, rebuilding from the basis");
            values = tableau.basic_solution();
            extraction = Extraction::Reconstructed;

            if !self.is_consistent(standard, &values, z) {
                warn!("extracted solution is inconsistent with the constraints");
                extraction = Extraction::Inconsistent;
            }
        }

        let violations = if extraction == Extraction::Inconsistent {
            violations(&values)
        } else {
            Vec::new()
        };

        Solution {
            status,
            values,
            objective_value: standard.caller_objective(z),
            extraction,
            violations,
        }
    }

    /// `x >= 0`, `Ax <= b` and `c·x == z`, all within the feasibility tolerance
    fn is_consistent(&self, standard: &StandardProblem, values: &[f64], z: f64) -> bool {
        let objective: f64 = standard.c.iter().zip(values).map(|(coef, v)| coef * v).sum();
        let objective_tolerance = self.feasibility_tolerance * z.abs().max(1.0);
        values.iter().all(|&v| v >= -self.feasibility_tolerance)
            && standard.violated_rows(values, self.feasibility_tolerance).is_empty()
            && (objective - z).abs() <= objective_tolerance
    }

    fn row_violations(&self, standard: &StandardProblem, values: &[f64]) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = standard
            .violated_rows(values, self.feasibility_tolerance)
            .into_iter()
            .map(|i| {
                let actual: f64 = standard.a[i].iter().zip(values).map(|(coef, v)| coef * v).sum();
                let amount = actual - standard.b[i];
                ConstraintViolation {
                    constraint: i,
                    required: standard.b[i],
                    actual,
                    violation_amount: amount,
                    description: format!(
                        "Row {} exceeds maximum of {:.2} by {:.2}",
                        i + 1,
                        standard.b[i],
                        amount
                    ),
                }
            })
            .collect();
        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        violations
    }
}

fn solution_explanation(solution: &Solution, names: &[String]) -> String {
    let values = solution
        .values
        .iter()
        .zip(names)
        .map(|(value, name)| format!("{} = {:.2}", name, value))
        .collect::<Vec<_>>()
        .join(", ");
    let mut explanation = format!(
        "Final solution: objective value = {:.2}. Variable values: {}",
        solution.objective_value, values
    );
    if !solution.is_consistent() {
        explanation.push_str(&format!(
            ". Warning: this point violates {} constraint(s).",
            solution.violations.len()
        ));
    }
    explanation
}
