use crate::error::SimplexError;
use crate::standard::StandardProblem;

/// Column entries this close to zero never serve as pivots.
const PIVOT_EPSILON: f64 = 1e-12;

/// Dense simplex tableau.
///
/// Rows `0..m` are constraints, row `m` is the objective ("Z") row. Columns
/// `0..n` are the original variables, `n..n + m` the slacks, and the last
/// column holds the right-hand side.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
}

impl Tableau {
    /// Initial tableau with the slack variables as basis
    pub fn new(a: &[Vec<f64>], b: &[f64], c: &[f64]) -> Result<Self, SimplexError> {
        let n_vars = c.len();
        let n_constraints = a.len();
        if n_vars == 0 {
            return Err(SimplexError::EmptyProblem);
        }
        if b.len() != n_constraints {
            return Err(SimplexError::dimension("right-hand side", n_constraints, b.len()));
        }

        let total_cols = n_vars + n_constraints + 1;
        let mut data = vec![vec![0.0; total_cols]; n_constraints + 1];

        for (i, row) in a.iter().enumerate() {
            if row.len() != n_vars {
                return Err(SimplexError::dimension(format!("row {}", i + 1), n_vars, row.len()));
            }
            data[i][..n_vars].copy_from_slice(row);
            data[i][n_vars + i] = 1.0;
            data[i][total_cols - 1] = b[i];
        }

        // Reduced costs start at -c so a maximization is optimal once none are negative
        for (j, &coef) in c.iter().enumerate() {
            data[n_constraints][j] = -coef;
        }

        Ok(Self {
            data,
            basic_vars: (n_vars..n_vars + n_constraints).collect(),
            n_vars,
        })
    }

    pub fn from_standard(problem: &StandardProblem) -> Result<Self, SimplexError> {
        Self::new(&problem.a, &problem.b, &problem.c)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn num_vars(&self) -> usize {
        self.n_vars
    }

    pub fn num_constraints(&self) -> usize {
        self.data.len() - 1
    }

    /// Value columns, excluding the right-hand side
    pub fn num_columns(&self) -> usize {
        self.n_vars + self.num_constraints()
    }

    pub fn rhs_col(&self) -> usize {
        self.num_columns()
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.rhs_col()]
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.data[self.num_constraints()]
    }

    /// Current Z in maximize sense
    pub fn objective_value(&self) -> f64 {
        self.rhs(self.num_constraints())
    }

    /// Column index of the basic variable of each constraint row
    pub fn basic_vars(&self) -> &[usize] {
        &self.basic_vars
    }

    /// `x1..` for original variables, `s1..` for slacks
    pub fn column_label(&self, col: usize) -> String {
        if col < self.n_vars {
            format!("x{}", col + 1)
        } else {
            format!("s{}", col - self.n_vars + 1)
        }
    }

    /// Most negative reduced cost below `-tolerance`; lowest index wins ties
    pub fn entering_column(&self, tolerance: f64) -> Option<usize> {
        let obj = self.objective_row();
        let mut min_val = -tolerance;
        let mut min_col = None;

        for (j, &value) in obj[..self.num_columns()].iter().enumerate() {
            if value < min_val {
                min_val = value;
                min_col = Some(j);
            }
        }

        min_col
    }

    /// Minimum ratio test over rows with a positive entry in `col`; lowest index wins ties.
    /// `None` means the column is unbounded.
    pub fn leaving_row(&self, col: usize) -> Option<usize> {
        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..self.num_constraints() {
            if let Some(ratio) = self.ratio(i, col) {
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    /// `RHS[row] / T[row][col]`, defined only for a positive entry
    pub fn ratio(&self, row: usize, col: usize) -> Option<f64> {
        let value = self.data[row][col];
        (value > PIVOT_EPSILON).then(|| self.rhs(row) / value)
    }

    /// Normalizes `row` by the pivot element and eliminates `col` from every other row
    pub fn pivot(&mut self, row: usize, col: usize) {
        let pivot_val = self.data[row][col];
        debug_assert!(pivot_val.abs() > PIVOT_EPSILON, "pivot on zero element");

        self.basic_vars[row] = col;

        for value in self.data[row].iter_mut() {
            *value /= pivot_val;
        }
        self.data[row][col] = 1.0;

        let pivot_row = self.data[row].clone();
        for (i, current) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = current[col];
            if factor == 0.0 {
                continue;
            }
            for (value, &p) in current.iter_mut().zip(&pivot_row) {
                *value -= factor * p;
            }
            current[col] = 0.0;
        }
    }

    /// Constraint row with the most negative right-hand side below `-tolerance`
    pub fn infeasible_row(&self, tolerance: f64) -> Option<usize> {
        let mut min_val = -tolerance;
        let mut min_row = None;

        for i in 0..self.num_constraints() {
            let rhs = self.rhs(i);
            if rhs < min_val {
                min_val = rhs;
                min_row = Some(i);
            }
        }

        min_row
    }

    pub fn is_dual_feasible(&self, tolerance: f64) -> bool {
        self.entering_column(tolerance).is_none()
    }

    /// Column that clears the negative right-hand side of `row`.
    ///
    /// Candidates are the entries below `-tolerance`. With a dual feasible
    /// objective row the dual ratio `Z[j] / -T[row][j]` picks the column and
    /// keeps it dual feasible; otherwise the most negative entry does.
    /// `None` means the row cannot be satisfied with non-negative variables.
    pub fn restoring_column(&self, row: usize, tolerance: f64) -> Option<usize> {
        let dual_feasible = self.is_dual_feasible(tolerance);
        let obj = self.objective_row();
        let mut best = f64::INFINITY;
        let mut best_col = None;

        for j in 0..self.num_columns() {
            let value = self.data[row][j];
            if value >= -tolerance {
                continue;
            }
            let key = if dual_feasible { obj[j].max(0.0) / -value } else { value };
            if key < best {
                best = key;
                best_col = Some(j);
            }
        }

        best_col
    }

    /// Reads the original variables off unit columns.
    ///
    /// A column is basic when exactly one constraint row holds ≈1 and every
    /// other row, the objective row included, holds ≈0. Non-basic variables
    /// sit at zero.
    pub fn extract(&self, tolerance: f64) -> (Vec<f64>, f64) {
        let n_constraints = self.num_constraints();
        let mut values = vec![0.0; self.n_vars];

        for (j, value) in values.iter_mut().enumerate() {
            let mut unit_row = None;
            let mut is_basic = true;

            for (i, row) in self.data.iter().enumerate() {
                let entry = row[j];
                if i < n_constraints && (entry - 1.0).abs() < tolerance {
                    if unit_row.is_some() {
                        is_basic = false;
                        break;
                    }
                    unit_row = Some(i);
                } else if entry.abs() > tolerance {
                    is_basic = false;
                    break;
                }
            }

            if let (true, Some(i)) = (is_basic, unit_row) {
                *value = self.rhs(i);
            }
        }

        (values, self.objective_value())
    }

    /// Basic solution of the tracked basis, restricted to the original variables
    pub fn basic_solution(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.n_vars];
        for (i, &col) in self.basic_vars.iter().enumerate() {
            if col < self.n_vars {
                values[col] = self.rhs(i);
            }
        }
        values
    }
}
