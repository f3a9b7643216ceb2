//! Optimized helicopter dispatch.
//!
//! Fires are grouped into scenarios, each group gets refill routes and a
//! binary assignment model, the model goes to a [`Solver`], and the solution
//! is parsed into a [`DispatchReport`].

pub mod builder;
pub mod dispatcher;
pub mod model;
pub mod parse;
pub mod report;
pub mod solver;

pub use builder::{max_fleet_fuel_cost, AssignmentModel, AssignmentModelBuilder, PairCosts};
pub use dispatcher::OptimizedDispatcher;
pub use model::{LinearConstraint, LinearExpr, MilpModel, Relation, VarId};
pub use parse::SolutionParser;
pub use report::{Assignment, AssignmentOutcome, DispatchDetail, DispatchReport, GroupFailure};
pub use solver::{solver_for, MicrolpSolver, SolveOutcome, Solver, TerminationStatus};
