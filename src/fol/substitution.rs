//! Variable substitutions
//!
//! [`VariableSubstitution`] is the immutable, cheaply-cloneable form passed
//! across API boundaries; [`SubstitutionBuilder`] is the mutable form used
//! inside the unifier and the engines. The builder normalises eagerly on
//! every bind, so a finished substitution never contains chains, but
//! application still resolves bindings recursively, so chains in a
//! hand-built substitution collapse on demand.

use super::clause::CNFClause;
use super::literal::Literal;
use super::sentence::Predicate;
use super::term::{Term, Variable};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An immutable mapping from variables to terms.
///
/// Clones share the underlying map. Bindings must be acyclic; the unifier
/// guarantees this via its occurs check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSubstitution {
    bindings: Arc<HashMap<Variable, Term>>,
}

impl VariableSubstitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder seeded with this substitution's bindings.
    pub fn to_builder(&self) -> SubstitutionBuilder {
        SubstitutionBuilder {
            bindings: (*self.bindings).clone(),
        }
    }

    /// Get the term a variable is bound to, if any
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter()
    }

    /// Apply this substitution to a term.
    ///
    /// Bound variables are resolved recursively, so α ↦ β, β ↦ C yields C
    /// for α.
    pub fn apply_to_term(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => match self.bindings.get(v) {
                Some(bound) => self.apply_to_term(bound),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(symbol, args) => Term::Function(
                symbol.clone(),
                args.iter().map(|arg| self.apply_to_term(arg)).collect(),
            ),
        }
    }

    /// Apply this substitution to a predicate
    pub fn apply_to_predicate(&self, predicate: &Predicate) -> Predicate {
        Predicate {
            symbol: predicate.symbol.clone(),
            args: predicate
                .args
                .iter()
                .map(|arg| self.apply_to_term(arg))
                .collect(),
        }
    }

    /// Apply this substitution to a literal
    pub fn apply_to_literal(&self, literal: &Literal) -> Literal {
        Literal {
            predicate: self.apply_to_predicate(&literal.predicate),
            polarity: literal.polarity,
        }
    }

    /// Apply this substitution to a clause. Literals that become equal
    /// after substitution collapse.
    pub fn apply_to_clause(&self, clause: &CNFClause) -> CNFClause {
        CNFClause::new(
            clause
                .literals()
                .iter()
                .map(|lit| self.apply_to_literal(lit))
                .collect(),
        )
    }
}

impl fmt::Display for VariableSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted by rendered variable for a deterministic reading
        let mut entries: Vec<(String, String)> = self
            .bindings
            .iter()
            .map(|(v, t)| (v.to_string(), t.to_string()))
            .collect();
        entries.sort();
        write!(f, "{{")?;
        for (i, (var, term)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ↦ {}", var, term)?;
        }
        write!(f, "}}")
    }
}

/// Mutable builder for a [`VariableSubstitution`], used on hot paths.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionBuilder {
    bindings: HashMap<Variable, Term>,
}

impl SubstitutionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn is_bound(&self, var: &Variable) -> bool {
        self.bindings.contains_key(var)
    }

    /// Resolve a term against the current bindings.
    pub fn resolve(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => match self.bindings.get(v) {
                Some(bound) => self.resolve(bound),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Function(symbol, args) => Term::Function(
                symbol.clone(),
                args.iter().map(|arg| self.resolve(arg)).collect(),
            ),
        }
    }

    /// Bind a variable, eagerly propagating the substitution.
    ///
    /// The bound term is resolved against existing bindings, and existing
    /// bindings mentioning the variable are rewritten, so every stored term
    /// is always fully resolved.
    pub fn bind(&mut self, var: Variable, term: Term) {
        let resolved = self.resolve(&term);

        for existing in self.bindings.values_mut() {
            *existing = substitute_variable(existing, &var, &resolved);
        }
        self.bindings.insert(var, resolved);
    }

    /// Produce an immutable snapshot without consuming the builder.
    pub fn snapshot(&self) -> VariableSubstitution {
        VariableSubstitution {
            bindings: Arc::new(self.bindings.clone()),
        }
    }

    /// Finish the builder, producing the immutable substitution.
    pub fn into_substitution(self) -> VariableSubstitution {
        VariableSubstitution {
            bindings: Arc::new(self.bindings),
        }
    }
}

/// Replace one variable by a term throughout `term`.
fn substitute_variable(term: &Term, var: &Variable, replacement: &Term) -> Term {
    match term {
        Term::Variable(v) => {
            if v == var {
                replacement.clone()
            } else {
                term.clone()
            }
        }
        Term::Constant(_) => term.clone(),
        Term::Function(symbol, args) => Term::Function(
            symbol.clone(),
            args.iter()
                .map(|arg| substitute_variable(arg, var, replacement))
                .collect(),
        ),
    }
}
