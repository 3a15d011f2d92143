use crate::error::SimplexError;
use crate::problem::{Direction, Problem, Relation};

/// `maximize c·x subject to Ax <= b, x >= 0`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StandardProblem {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    /// Objective coefficients, already negated for minimization
    pub c: Vec<f64>,
    pub maximize: bool,
    /// Index of the original constraint behind each row
    pub origins: Vec<usize>,
}

impl StandardProblem {
    /// Builds a standard problem directly from its matrices. Every row is its own origin.
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>, c: Vec<f64>, maximize: bool) -> Result<Self, SimplexError> {
        if c.is_empty() {
            return Err(SimplexError::EmptyProblem);
        }
        if a.len() != b.len() {
            return Err(SimplexError::dimension("right-hand side", a.len(), b.len()));
        }
        for (i, row) in a.iter().enumerate() {
            if row.len() != c.len() {
                return Err(SimplexError::dimension(format!("row {}", i + 1), c.len(), row.len()));
            }
        }
        let origins = (0..a.len()).collect();
        Ok(Self { a, b, c, maximize, origins })
    }

    /// Converts a problem to standard form.
    ///
    /// `>=` rows are negated into `<=` rows. An `=` row becomes two rows:
    /// the row as given and its negation.
    pub fn from_problem(problem: &Problem) -> Result<Self, SimplexError> {
        problem.validate()?;

        let maximize = problem.objective.direction == Direction::Maximize;
        let c = problem
            .objective
            .coefficients
            .iter()
            .map(|&coef| if maximize { coef } else { -coef })
            .collect();

        let mut a = Vec::with_capacity(problem.num_constraints());
        let mut b = Vec::with_capacity(problem.num_constraints());
        let mut origins = Vec::with_capacity(problem.num_constraints());

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if matches!(constraint.relation, Relation::Le | Relation::Eq) {
                a.push(constraint.coefficients.clone());
                b.push(constraint.limit);
                origins.push(i);
            }
            if matches!(constraint.relation, Relation::Ge | Relation::Eq) {
                a.push(constraint.coefficients.iter().map(|coef| -coef).collect());
                b.push(-constraint.limit);
                origins.push(i);
            }
        }

        Ok(Self { a, b, c, maximize, origins })
    }

    pub fn num_rows(&self) -> usize {
        self.a.len()
    }

    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    /// Maps an internal (maximize-sense) objective value back to the caller's direction
    pub fn caller_objective(&self, z: f64) -> f64 {
        if self.maximize { z } else { -z }
    }

    /// Rows with `A[i]·x > b[i] + tolerance`
    pub fn violated_rows(&self, x: &[f64], tolerance: f64) -> Vec<usize> {
        (0..self.num_rows())
            .filter(|&i| {
                let lhs: f64 = self.a[i].iter().zip(x).map(|(coef, value)| coef * value).sum();
                lhs > self.b[i] + tolerance
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Variable;

    fn variables(n: usize) -> Vec<Variable> {
        (1..=n).map(|i| Variable::new(format!("x{}", i), "")).collect()
    }

    #[test]
    fn test_ge_rows_are_negated() {
        let mut problem = Problem::new(variables(3));
        problem.set_objective(vec![4000.0, 4500.0, 5000.0], Direction::Minimize);
        problem.add_constraint("a", vec![20.0, 15.0, 10.0], Relation::Ge, 240.0);
        problem.add_constraint("b", vec![10.0, 20.0, 15.0], Relation::Ge, 320.0);
        problem.add_constraint("c", vec![10.0, 5.0, 15.0], Relation::Ge, 200.0);

        let standard = StandardProblem::from_problem(&problem).unwrap();

        assert!(!standard.maximize);
        assert_eq!(standard.c, vec![-4000.0, -4500.0, -5000.0]);
        assert_eq!(
            standard.a,
            vec![
                vec![-20.0, -15.0, -10.0],
                vec![-10.0, -20.0, -15.0],
                vec![-10.0, -5.0, -15.0],
            ]
        );
        assert_eq!(standard.b, vec![-240.0, -320.0, -200.0]);
        assert_eq!(standard.origins, vec![0, 1, 2]);
    }

    #[test]
    fn test_equality_splits_into_two_rows() {
        let mut problem = Problem::new(variables(2));
        problem.set_objective(vec![3.0, 2.0], Direction::Maximize);
        problem.add_constraint("cap", vec![1.0, 0.0], Relation::Le, 6.0);
        problem.add_constraint("total", vec![1.0, 1.0], Relation::Eq, 10.0);

        let standard = StandardProblem::from_problem(&problem).unwrap();

        assert_eq!(standard.num_rows(), 3);
        assert_eq!(standard.a[1], vec![1.0, 1.0]);
        assert_eq!(standard.a[2], vec![-1.0, -1.0]);
        assert_eq!(standard.b, vec![6.0, 10.0, -10.0]);
        assert_eq!(standard.origins, vec![0, 1, 1]);
    }

    #[test]
    fn test_conversion_leaves_problem_untouched() {
        let mut problem = Problem::new(variables(1));
        problem.set_objective(vec![1.0], Direction::Minimize);
        problem.add_constraint("floor", vec![2.0], Relation::Ge, 4.0);
        let before = problem.clone();

        StandardProblem::from_problem(&problem).unwrap();
        assert_eq!(problem, before);
    }

    #[test]
    fn test_conversion_fails_fast_on_dimension() {
        let mut problem = Problem::new(variables(2));
        problem.add_constraint("short", vec![1.0], Relation::Le, 1.0);
        assert!(matches!(
            StandardProblem::from_problem(&problem),
            Err(SimplexError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_new_checks_shapes() {
        assert!(StandardProblem::new(vec![vec![1.0, 2.0]], vec![1.0, 2.0], vec![1.0, 1.0], true).is_err());
        assert!(StandardProblem::new(vec![vec![1.0]], vec![1.0], vec![1.0, 1.0], true).is_err());
        assert!(StandardProblem::new(vec![], vec![], vec![], true).is_err());
        let ok = StandardProblem::new(vec![vec![1.0, 2.0]], vec![3.0], vec![1.0, 1.0], false).unwrap();
        assert_eq!(ok.caller_objective(-5.0), 5.0);
    }

    #[test]
    fn test_violated_rows() {
        let standard =
            StandardProblem::new(vec![vec![1.0, 0.0], vec![-1.0, -1.0]], vec![4.0, -10.0], vec![1.0, 1.0], true)
                .unwrap();
        assert!(standard.violated_rows(&[4.0, 6.0], 1e-5).is_empty());
        assert_eq!(standard.violated_rows(&[5.0, 0.0], 1e-5), vec![0, 1]);
    }
}
