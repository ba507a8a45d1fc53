//! Boolean satisfiability for two-literal clauses, by reduction to SCCs of
//! the implication graph.

use std::collections::HashSet;

use bitvec::prelude::*;
use tracing::debug;

use crate::error::GraphError;
use crate::graph::{Directedness, Graph};

/// A 2-SAT instance over variables `1..=num_vars`. Literals are nonzero
/// signed integers: `v` for the variable, `-v` for its negation.
#[derive(Clone, Debug, Default)]
pub struct TwoSat {
    num_vars: usize,
    clauses: Vec<(i64, i64)>,
}

impl TwoSat {
    pub fn new(num_vars: usize) -> Self {
        TwoSat {
            num_vars,
            clauses: Vec::new(),
        }
    }

    /// Adds the clause `a ∨ b`.
    ///
    /// # Panics
    ///
    /// Panics if a literal is zero or names a variable outside `1..=num_vars`.
    pub fn clause(&mut self, a: i64, b: i64) -> &mut Self {
        for literal in [a, b] {
            assert!(
                literal != 0 && literal.unsigned_abs() as usize <= self.num_vars,
                "literal {literal} is outside the declared variable range"
            );
        }
        self.clauses.push((a, b));
        self
    }

    /// Solves the instance. On success, element `v - 1` of the result is the
    /// value of variable `v`.
    ///
    /// Each clause `a ∨ b` contributes the implications `¬a → b` and
    /// `¬b → a`. The instance is unsatisfiable iff some variable and its
    /// negation share a strongly connected component. Otherwise each
    /// variable takes the sign of whichever of its two literals appears
    /// first in Tarjan's component-emission order: components are emitted in
    /// reverse topological order of the condensation, so the first-emitted
    /// literal is the implied-last one and is safe to set true.
    pub fn solve(&self) -> Result<Vec<bool>, GraphError> {
        let n = self.num_vars as i64;
        let literals: Vec<i64> = (1..=n).chain((1..=n).map(|v| -v)).collect();
        let implications = self
            .clauses
            .iter()
            .map(|&(a, b)| (-a, b))
            .chain(self.clauses.iter().map(|&(a, b)| (-b, a)));
        let graph = Graph::with_nodes(Directedness::Directed, literals, implications)
            .expect("all literals of declared variables are nodes");

        let mut assignment = vec![false; self.num_vars];
        let mut assigned = bitvec![0; self.num_vars];
        for component in graph.tarjan() {
            let members: HashSet<i64> = component.iter().copied().collect();
            for &literal in &component {
                if members.contains(&-literal) {
                    debug!(variable = literal.abs(), "variable and negation share a component");
                    return Err(GraphError::Unsatisfiable);
                }
                let var = (literal.unsigned_abs() - 1) as usize;
                if !assigned[var] {
                    assigned.set(var, true);
                    assignment[var] = literal > 0;
                }
            }
        }
        Ok(assignment)
    }

    /// Checks an assignment against every clause.
    pub fn satisfied_by(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|&(a, b)| {
            let value = |literal: i64| {
                let var = (literal.unsigned_abs() - 1) as usize;
                (literal > 0) == assignment[var]
            };
            value(a) || value(b)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clause_is_satisfiable() {
        let mut instance = TwoSat::new(2);
        instance.clause(1, 2);
        let assignment = instance.solve().unwrap();
        assert!(instance.satisfied_by(&assignment));
    }

    #[test]
    fn forced_contradiction_is_unsatisfiable() {
        // (x1 ∨ x1) ∧ (¬x1 ∨ ¬x1) forces both values at once.
        let mut instance = TwoSat::new(1);
        instance.clause(1, 1).clause(-1, -1);
        assert_eq!(instance.solve().unwrap_err(), GraphError::Unsatisfiable);
    }

    #[test]
    fn implication_chain_is_respected() {
        // x1 and (¬x1 ∨ x2) force x2.
        let mut instance = TwoSat::new(2);
        instance.clause(1, 1).clause(-1, 2);
        let assignment = instance.solve().unwrap();
        assert_eq!(assignment, vec![true, true]);
    }

    #[test]
    fn forced_false_variable() {
        let mut instance = TwoSat::new(2);
        instance.clause(-1, -1).clause(1, -2);
        let assignment = instance.solve().unwrap();
        assert!(!assignment[0]);
        assert!(!assignment[1]);
        assert!(instance.satisfied_by(&assignment));
    }

    #[test]
    fn larger_satisfiable_instance() {
        let mut instance = TwoSat::new(3);
        instance
            .clause(1, 2)
            .clause(-1, 3)
            .clause(-2, -3)
            .clause(1, 3);
        let assignment = instance.solve().unwrap();
        assert!(instance.satisfied_by(&assignment));
    }

    #[test]
    fn no_clauses_means_everything_goes() {
        let instance = TwoSat::new(3);
        let assignment = instance.solve().unwrap();
        assert_eq!(assignment.len(), 3);
    }

    #[test]
    #[should_panic]
    fn zero_literal_is_rejected() {
        TwoSat::new(1).clause(0, 1);
    }
}
