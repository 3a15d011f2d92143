//! Serializable views of a simplex run for the presentation layer.

use log::debug;
use serde::Serialize;
use simplexlab_solver::{
    ConstraintViolation, Extraction, Problem, SimplexError, Solver, StandardProblem, Step, Trajectory,
};

/// Everything the page needs to animate one run
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub title: String,
    pub description: String,
    pub status: String,
    pub standard: StandardProblem,
    pub steps: Vec<Step>,
    pub trajectory: Trajectory,
    pub variables: Vec<VariableResult>,
    pub constraints: Vec<ConstraintResult>,
    pub objective_value: f64,
    pub extraction: Extraction,
    pub violations: Vec<ConstraintViolation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableResult {
    pub name: String,
    pub description: String,
    pub value: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintResult {
    pub description: String,
    /// "≤", "≥" or "="
    pub relation: String,
    pub lhs: f64,
    pub limit: f64,
    pub satisfied: bool,
    /// Percentage shown on the constraint chart
    pub satisfaction: f64,
    pub color: Option<String>,
}

/// A manually chosen point checked against the problem
#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    pub objective_value: f64,
    pub feasible: bool,
    pub constraints: Vec<ConstraintResult>,
}

/// Solves `problem` and bundles the walkthrough with per-variable and per-constraint results
pub fn build(problem: &Problem, solver: &Solver) -> Result<SolveReport, SimplexError> {
    let mut problem = problem.clone();
    problem.assign_default_colors();

    let run = solver.solve(&problem)?;
    debug!(
        "report for '{}': {} after {} iterations",
        problem.title,
        run.status.as_str(),
        run.iterations()
    );

    let values = &run.solution.values;
    let variables = problem
        .variables
        .iter()
        .zip(values)
        .map(|(variable, &value)| VariableResult {
            name: variable.name.clone(),
            description: variable.description.clone(),
            value,
            color: variable.color.clone(),
        })
        .collect();
    let constraints = constraint_results(&problem, values, solver.feasibility_tolerance());

    Ok(SolveReport {
        title: problem.title.clone(),
        description: problem.description.clone(),
        status: run.status.as_str().to_string(),
        objective_value: run.solution.objective_value,
        extraction: run.solution.extraction,
        violations: run.solution.violations,
        standard: run.standard,
        steps: run.steps,
        trajectory: run.trajectory,
        variables,
        constraints,
    })
}

/// Evaluates the objective and every constraint at `values`
pub fn check_point(problem: &Problem, values: &[f64], tolerance: f64) -> Result<PointReport, SimplexError> {
    problem.validate()?;
    if values.len() != problem.num_variables() {
        return Err(SimplexError::InvalidDimension {
            context: "point".to_string(),
            expected: problem.num_variables(),
            found: values.len(),
        });
    }

    Ok(PointReport {
        objective_value: problem.objective_value(values),
        feasible: problem.is_feasible(values, tolerance),
        constraints: constraint_results(problem, values, tolerance),
    })
}

fn constraint_results(problem: &Problem, values: &[f64], tolerance: f64) -> Vec<ConstraintResult> {
    problem
        .constraints
        .iter()
        .zip(problem.check(values, tolerance))
        .map(|(constraint, check)| ConstraintResult {
            description: constraint.description.clone(),
            relation: constraint.relation.to_string(),
            lhs: check.lhs,
            limit: check.limit,
            satisfied: check.satisfied,
            satisfaction: constraint.satisfaction(values),
            color: constraint.color.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplexlab_solver::{Direction, Relation, Variable};

    fn vaccination() -> Problem {
        let mut problem = Problem::new(vec![
            Variable::new("x₁", "Stations in region 1"),
            Variable::new("x₂", "Stations in region 2"),
            Variable::new("x₃", "Stations in region 3"),
            Variable::new("x₄", "Stations in region 4"),
        ]);
        problem.title = "Vaccination campaign".to_string();
        problem.set_objective(vec![120.0, 100.0, 150.0, 90.0], Direction::Maximize);
        problem.add_constraint("Staff", vec![4.0, 5.0, 8.0, 7.0], Relation::Le, 60.0);
        problem.add_constraint("Fuel", vec![30.0, 25.0, 40.0, 20.0], Relation::Le, 500.0);
        problem.add_constraint("Kits", vec![100.0, 80.0, 120.0, 60.0], Relation::Le, 1000.0);
        problem
    }

    #[test]
    fn test_report_serializes_for_the_page() {
        let report = build(&vaccination(), &Solver::new()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "optimal");
        assert_eq!(json["title"], "Vaccination campaign");
        assert_eq!(json["extraction"], "direct");
        assert_eq!(json["steps"][0]["kind"], "tableau");
        assert!(json["steps"][0]["pivot"].is_null());

        let steps = json["steps"].as_array().unwrap();
        assert_eq!(steps.last().unwrap()["kind"], "solution");
        assert_eq!(steps[steps.len() - 2]["kind"], "verdict");
        assert_eq!(json["trajectory"]["labels"][0], "Start");
        assert_eq!(json["variables"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_report_fills_colors_and_constraint_results() {
        let report = build(&vaccination(), &Solver::new()).unwrap();

        assert!(report.variables.iter().all(|v| v.color.is_some()));
        assert_eq!(report.constraints.len(), 3);
        assert!(report.constraints.iter().all(|c| c.satisfied));
        assert_eq!(report.constraints[0].relation, "≤");

        let expected: f64 = report.variables.iter().zip([120.0, 100.0, 150.0, 90.0]).map(|(v, c)| v.value * c).sum();
        assert!((report.objective_value - expected).abs() < 1e-6);
    }

    #[test]
    fn test_report_propagates_dimension_errors() {
        let mut problem = vaccination();
        problem.objective.coefficients.pop();
        assert!(matches!(
            build(&problem, &Solver::new()),
            Err(SimplexError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_check_point() {
        let problem = vaccination();

        let inside = check_point(&problem, &[1.0, 1.0, 1.0, 1.0], 1e-6).unwrap();
        assert!(inside.feasible);
        assert!((inside.objective_value - 460.0).abs() < 1e-9);

        let outside = check_point(&problem, &[20.0, 0.0, 0.0, 0.0], 1e-6).unwrap();
        assert!(!outside.feasible);
        assert!(!outside.constraints[0].satisfied);
        assert!((outside.constraints[0].lhs - 80.0).abs() < 1e-9);

        assert!(check_point(&problem, &[1.0], 1e-6).is_err());
    }

    #[test]
    fn test_constraint_satisfaction() {
        let problem = vaccination();

        let origin = check_point(&problem, &[0.0, 0.0, 0.0, 0.0], 1e-6).unwrap();
        assert!(origin.constraints.iter().all(|c| c.satisfaction == 100.0));

        // Staff: lhs 60 against limit 60 scores 1 - 60 / 90
        let at_limit = check_point(&problem, &[15.0, 0.0, 0.0, 0.0], 1e-6).unwrap();
        assert!((at_limit.constraints[0].satisfaction - 100.0 / 3.0).abs() < 1e-9);

        let mut coverage = vaccination();
        coverage.add_constraint("Coverage", vec![1.0, 1.0, 1.0, 1.0], Relation::Ge, 8.0);
        let report = check_point(&coverage, &[1.0, 1.0, 0.0, 0.0], 1e-6).unwrap();
        assert!((report.constraints[3].satisfaction - 25.0).abs() < 1e-9);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["constraints"][3]["satisfaction"].is_number());
    }
}
