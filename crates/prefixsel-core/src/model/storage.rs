//! Storage access methods for the model.

use crate::types::{Constraint, ObjectiveSpec, Sense, Variable};
use prefixsel_expr::{ConstraintId, VariableId, linear_sum};
use std::collections::BTreeMap;

use super::Model;
use super::error::ModelError;

/// Objectives sharing one priority, blended by weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveTier {
    pub priority: u32,
    /// Positions of the member objectives in `Model::objectives()`.
    pub members: Vec<usize>,
    /// `Σ weight * expr` over the members, duplicates merged.
    pub terms: Vec<(VariableId, f64)>,
    pub constant: f64,
}

impl ObjectiveTier {
    /// Value of the blended tier objective at `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl Model {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get the number of coefficients in the model.
    pub fn num_coefficients(&self) -> usize {
        self.columns.values().map(|coeffs| coeffs.len()).sum()
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    /// Variables in ID order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(idx, var)| (VariableId::new(idx as u32), var))
    }

    /// Constraints in ID order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints
            .iter()
            .enumerate()
            .map(|(idx, con)| (ConstraintId::new(idx as u32), con))
    }

    /// Get the coefficient matrix in CRS (row-sparse-compressed) form.
    ///
    /// Returns a vector of rows, each containing (variable_id, coefficient) pairs.
    pub fn rows(&self) -> Vec<Vec<(VariableId, f64)>> {
        let mut rows = vec![Vec::new(); self.num_constraints()];
        for (var_id, coeffs) in &self.columns {
            for (constraint_id, coeff) in coeffs {
                if let Some(row) = rows.get_mut(constraint_id.index()) {
                    row.push((*var_id, *coeff));
                }
            }
        }
        rows
    }

    /// Get the coefficients for a specific variable (column)
    pub fn get_column(&self, var_id: VariableId) -> Option<&Vec<(ConstraintId, f64)>> {
        self.columns.get(&var_id)
    }

    /// Constraint left-hand side evaluated at `values`.
    pub fn row_activity(&self, constraint_id: ConstraintId, values: &[f64]) -> f64 {
        self.columns
            .iter()
            .flat_map(|(var_id, coeffs)| {
                coeffs
                    .iter()
                    .filter(|(id, _)| *id == constraint_id)
                    .map(move |(_, coeff)| {
                        coeff * values.get(var_id.index()).copied().unwrap_or(0.0)
                    })
            })
            .sum()
    }

    /// Optimization sense shared by all objectives.
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Registered objectives in insertion order.
    pub fn objectives(&self) -> &[ObjectiveSpec] {
        &self.objectives
    }

    /// Objectives grouped by priority, ascending.
    pub fn objective_tiers(&self) -> Vec<ObjectiveTier> {
        let mut grouped: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, objective) in self.objectives.iter().enumerate() {
            grouped.entry(objective.priority).or_default().push(idx);
        }

        grouped
            .into_iter()
            .map(|(priority, members)| {
                let blended = linear_sum(
                    members
                        .iter()
                        .map(|idx| self.objectives[*idx].weighted_expr()),
                );
                let constant = blended.constant();
                ObjectiveTier {
                    priority,
                    members,
                    terms: self.normalize_terms(blended.into_linear_terms()),
                    constant,
                }
            })
            .collect()
    }
}
