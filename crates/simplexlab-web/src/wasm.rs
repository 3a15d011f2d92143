//! WASM bindings for the simplex walkthrough
//!
//! Problems come in as plain JavaScript objects shaped like
//! `{ variables, objective, constraints }` and reports go back out as JSON.

use wasm_bindgen::prelude::*;

use crate::report;
use simplexlab_solver::{Problem, Solver, StandardProblem};

fn js_error(message: impl ToString) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn read_problem(problem: JsValue) -> Result<Problem, JsValue> {
    serde_wasm_bindgen::from_value(problem).map_err(js_error)
}

/// Solve a problem and return the full step-by-step report
#[wasm_bindgen]
pub fn solve(problem: JsValue) -> Result<JsValue, JsValue> {
    let problem = read_problem(problem)?;
    let report = report::build(&problem, &Solver::new()).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&report).map_err(js_error)
}

/// Same as `solve` with a custom pivot budget
#[wasm_bindgen]
pub fn solve_with_limit(problem: JsValue, max_iterations: usize) -> Result<JsValue, JsValue> {
    let problem = read_problem(problem)?;
    let solver = Solver::new().with_max_iterations(max_iterations);
    let report = report::build(&problem, &solver).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&report).map_err(js_error)
}

/// Return the standard form (A, b, c, maximize) the tableau is built from
#[wasm_bindgen]
pub fn standard_form(problem: JsValue) -> Result<JsValue, JsValue> {
    let problem = read_problem(problem)?;
    let standard = StandardProblem::from_problem(&problem).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&standard).map_err(js_error)
}

/// Check a manually chosen point against every constraint
#[wasm_bindgen]
pub fn check(problem: JsValue, values: Vec<f64>) -> Result<JsValue, JsValue> {
    let problem = read_problem(problem)?;
    let tolerance = Solver::new().feasibility_tolerance();
    let point = report::check_point(&problem, &values, tolerance).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&point).map_err(js_error)
}
