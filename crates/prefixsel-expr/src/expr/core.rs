//! Affine expression over selection variables.
//!
//! Every coefficient is fixed once the weighted risk matrix is known, so an
//! expression is just a list of `(VariableId, f64)` terms plus a constant.
//! Terms are kept in insertion order and may repeat a variable until
//! [`Expr::normalized_terms`] folds them.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::ids::VariableId;
use std::collections::BTreeMap;
use std::ops;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    terms: Vec<(VariableId, f64)>,
    constant: f64,
}

impl Expr {
    pub fn new(terms: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self { terms, constant }
    }

    pub fn from_linear(terms: Vec<(VariableId, f64)>) -> Self {
        Self::new(terms, 0.0)
    }

    /// `coeff * var`; a zero coefficient yields the empty expression.
    pub fn term(var: VariableId, coeff: f64) -> Self {
        let mut expr = Self::default();
        expr.push_term(var, coeff);
        expr
    }

    pub fn var(var: VariableId) -> Self {
        Self::term(var, 1.0)
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.constant == 0.0
    }

    pub fn into_linear_terms(self) -> Vec<(VariableId, f64)> {
        self.terms
    }

    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms, self.constant)
    }

    /// Append `coeff * var` unless `coeff` is zero.
    pub fn push_term(&mut self, var: VariableId, coeff: f64) {
        if coeff != 0.0 {
            self.terms.push((var, coeff));
        }
    }

    /// Value at `values`, indexed by `VariableId::index`. Variables past the
    /// end of `values` count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        let linear: f64 = self
            .terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum();
        linear + self.constant
    }

    pub fn scale(&self, by: f64) -> Self {
        let mut scaled = Self::from_linear(Vec::with_capacity(self.terms.len()));
        for (var, coeff) in &self.terms {
            scaled.push_term(*var, coeff * by);
        }
        scaled.constant = self.constant * by;
        scaled
    }

    /// Concatenate terms and add constants.
    pub fn add(&self, other: &Expr) -> Self {
        let mut terms = self.terms.clone();
        terms.extend_from_slice(&other.terms);
        Self::new(terms, self.constant + other.constant)
    }

    /// Terms with repeated variables summed, zero sums dropped, in id order.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut folded: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var, coeff) in &self.terms {
            *folded.entry(*var).or_default() += coeff;
        }
        folded.into_iter().filter(|(_, coeff)| *coeff != 0.0).collect()
    }

    /// `self <sense> rhs`, with the constant moved to the right-hand side.
    fn compare(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(
            Self::from_linear(self.terms.clone()),
            sense,
            rhs - self.constant,
        )
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare(rhs, ComparisonSense::GreaterEqual)
    }

    /// `self - rhs <= 0`.
    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.add(&rhs.scale(-1.0)).le_scalar(0.0)
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add(&self, &rhs)
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::add(&self, &rhs.scale(-1.0))
    }
}

impl ops::Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        self.scale(rhs)
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.scale(-1.0)
    }
}
