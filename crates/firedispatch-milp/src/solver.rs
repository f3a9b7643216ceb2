use std::fmt;

use firedispatch_core::{Result, SolverBackend, SolverConfig};
use good_lp::solvers::microlp::microlp;
use good_lp::{constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable};
use serde::Serialize;
use tracing::debug;

use crate::model::{LinearExpr, MilpModel, Relation};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TerminationStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error(String),
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationStatus::Optimal => write!(f, "optimal"),
            TerminationStatus::Infeasible => write!(f, "infeasible"),
            TerminationStatus::Unbounded => write!(f, "unbounded"),
            TerminationStatus::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    pub status: TerminationStatus,
    /// Indexed by `VarId::index`; empty unless the status is optimal.
    pub values: Vec<f64>,
}

impl SolveOutcome {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self { status: TerminationStatus::Optimal, values }
    }

    pub fn failed(status: TerminationStatus) -> Self {
        Self { status, values: Vec::new() }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == TerminationStatus::Optimal
    }
}

/// A MILP backend. One blocking call per model; the model is solved to
/// optimality or reported as failed.
pub trait Solver {
    fn name(&self) -> &str;

    fn solve(&self, model: &MilpModel) -> SolveOutcome;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, model: &MilpModel) -> SolveOutcome {
        (**self).solve(model)
    }
}

/// In-process branch and bound through good_lp's microlp backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicrolpSolver;

impl Solver for MicrolpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, model: &MilpModel) -> SolveOutcome {
        let mut vars = variables!();
        let cols: Vec<Variable> = model
            .variable_names()
            .iter()
            .map(|name| vars.add(variable().binary().name(name.clone())))
            .collect();

        let objective = to_expression(model.objective(), &cols);
        let mut problem = vars.minimise(objective).using(microlp);

        // Rows are normalised to `expr <= 0` or `expr == 0`.
        for c in model.constraints() {
            let row = match c.relation {
                Relation::LessEq => {
                    let expr = to_expression(&c.lhs.shifted(-c.rhs), &cols);
                    constraint!(expr <= 0.0)
                }
                Relation::GreaterEq => {
                    let expr = to_expression(&c.lhs.shifted(-c.rhs).negated(), &cols);
                    constraint!(expr <= 0.0)
                }
                Relation::Equal => {
                    let expr = to_expression(&c.lhs.shifted(-c.rhs), &cols);
                    constraint!(expr == 0.0)
                }
            };
            problem.add_constraint(row);
        }

        match problem.solve() {
            Ok(solution) => SolveOutcome::optimal(cols.iter().map(|v| solution.value(*v)).collect()),
            Err(ResolutionError::Infeasible) => SolveOutcome::failed(TerminationStatus::Infeasible),
            Err(ResolutionError::Unbounded) => SolveOutcome::failed(TerminationStatus::Unbounded),
            Err(e) => SolveOutcome::failed(TerminationStatus::Error(e.to_string())),
        }
    }
}

fn to_expression(expr: &LinearExpr, cols: &[Variable]) -> Expression {
    expr.terms
        .iter()
        .fold(Expression::from(expr.constant), |acc, (var, coef)| acc + *coef * cols[var.index()])
}

/// Resolves the configured backend name to a solver instance.
pub fn solver_for(config: &SolverConfig) -> Result<Box<dyn Solver>> {
    let solver: Box<dyn Solver> = match config.backend()? {
        SolverBackend::Microlp => Box::new(MicrolpSolver),
    };
    debug!(solver = solver.name(), "solver resolved");
    Ok(solver)
}
