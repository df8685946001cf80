//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Bounds, Constraint, ObjectiveSpec, Sense, Variable};
use prefixsel_expr::{ComparisonSense, ConstraintExpr, ConstraintId, Expr, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if !variable.bounds.is_valid() {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            });
        }

        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);
        Ok(id)
    }

    /// Add `count` copies of a variable and return their IDs in order.
    pub fn add_variables(
        &mut self,
        count: usize,
        variable: Variable,
    ) -> Result<Vec<VariableId>, ModelError> {
        self.variables.reserve(count);
        let ids = (0..count)
            .map(|_| self.add_variable(variable))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            component = "model",
            operation = "add_variables",
            status = "success",
            count,
            is_integer = variable.is_integer,
            "Added variable block"
        );
        Ok(ids)
    }

    /// Add a constraint to the model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ModelError> {
        if !constraint.bounds.is_valid() {
            return Err(ModelError::InvalidConstraintBounds {
                lower: constraint.bounds.lower,
                upper: constraint.bounds.upper,
            });
        }

        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(constraint);
        Ok(id)
    }

    /// Set the optimization sense shared by all objectives.
    pub fn set_sense(&mut self, sense: Sense) {
        self.sense = sense;
        tracing::debug!(
            component = "model",
            operation = "set_sense",
            status = "success",
            sense = sense.as_str(),
            "Set objective sense"
        );
    }

    /// Register an objective with a priority tier and a weight within that tier.
    ///
    /// Returns the objective's position, which indexes `Solution::objective_values`.
    pub fn add_objective(
        &mut self,
        expr: Expr,
        priority: u32,
        weight: f64,
        name: Option<&str>,
    ) -> Result<usize, ModelError> {
        if !weight.is_finite() {
            return Err(ModelError::InvalidObjectiveWeight { weight });
        }
        let (terms, constant) = expr.into_parts();
        for (var_id, coeff) in &terms {
            self.ensure_variable_exists(*var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coeff,
                });
            }
        }

        let normalized = self.normalize_terms(terms);
        tracing::debug!(
            component = "model",
            operation = "add_objective",
            status = "success",
            name = name.unwrap_or(""),
            priority,
            weight,
            terms = normalized.len(),
            "Added objective"
        );
        self.objectives.push(ObjectiveSpec {
            name: name.map(str::to_string),
            expr: Expr::new(normalized, constant),
            priority,
            weight,
        });
        Ok(self.objectives.len() - 1)
    }

    /// Add a constraint from an expression and explicit bounds.
    pub fn add_expr_constraint(
        &mut self,
        expr: Expr,
        bounds: Bounds,
    ) -> Result<ConstraintId, ModelError> {
        let constraint_id = self.add_constraint(Constraint { bounds })?;
        for (var_id, coeff) in self.normalize_terms(expr.into_linear_terms()) {
            self.set_coefficient(var_id, constraint_id, coeff)?;
        }
        Ok(constraint_id)
    }

    /// Add a constraint from a comparison expression (e.g., `x + y <= 10`).
    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
        name: Option<&str>,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        let bounds = match sense {
            ComparisonSense::LessEqual => Bounds::new(f64::NEG_INFINITY, rhs),
            ComparisonSense::GreaterEqual => Bounds::new(rhs, f64::INFINITY),
            ComparisonSense::Equal => Bounds::new(rhs, rhs),
        };
        let id = self.add_expr_constraint(expr, bounds)?;
        if let Some(name) = name {
            self.set_constraint_name(id, name.to_string())?;
        }
        Ok(id)
    }

    /// Set a coefficient in the constraint matrix.
    ///
    /// Replaces an existing coefficient at the same variable/constraint position.
    pub fn set_coefficient(
        &mut self,
        var_id: VariableId,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.ensure_variable_exists(var_id)?;
        self.ensure_constraint_exists(constraint_id)?;

        let column = self.columns.entry(var_id).or_default();
        match column.iter_mut().find(|(id, _)| *id == constraint_id) {
            Some(entry) => entry.1 = coefficient,
            None => column.push((constraint_id, coefficient)),
        }
        Ok(())
    }
}
