//! Solver-agnostic linear model over binary variables.

/// Handle to a variable of a [`MilpModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self { terms: Vec::new(), constant: value }
    }

    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            terms: self.terms.clone(),
            constant: self.constant + offset,
        }
    }

    pub fn negated(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(var, coef)| (*var, -coef)).collect(),
            constant: -self.constant,
        }
    }

    pub fn eval(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, (var, coef)| acc + coef * values[var.index()])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub lhs: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs.eval(values);
        match self.relation {
            Relation::LessEq => lhs <= self.rhs + tolerance,
            Relation::GreaterEq => lhs >= self.rhs - tolerance,
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Minimisation problem in which every variable is binary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MilpModel {
    variables: Vec<String>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl MilpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.variables.push(name.into());
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, lhs: LinearExpr, relation: Relation, rhs: f64) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            lhs,
            relation,
            rhs,
        });
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn variable_names(&self) -> &[String] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.eval(values)
    }

    /// Checks integrality and every constraint against a candidate point.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variables.len()
            && values
                .iter()
                .all(|v| v.abs() <= tolerance || (v - 1.0).abs() <= tolerance)
            && self.constraints.iter().all(|c| c.is_satisfied(values, tolerance))
    }
}
