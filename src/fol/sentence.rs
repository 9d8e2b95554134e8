//! Sentences of first-order logic
//!
//! Sentences are immutable trees. Children are held behind `Arc` so that
//! transformations can share unchanged sub-trees by reference instead of
//! copying them.

use super::term::{Term, Variable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A predicate symbol with arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredicateSymbol {
    pub name: String,
    pub arity: usize,
}

impl PredicateSymbol {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        PredicateSymbol {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for PredicateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An atomic formula (predicate applied to terms)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub symbol: PredicateSymbol,
    pub args: Vec<Term>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        let arity = args.len();
        Predicate {
            symbol: PredicateSymbol::new(name, arity),
            args,
        }
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    /// Collect all variables in this predicate's arguments
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        for arg in &self.args {
            arg.collect_variables(vars);
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A sentence of first-order logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentence {
    Predicate(Predicate),
    Negation(Arc<Sentence>),
    Conjunction(Arc<Sentence>, Arc<Sentence>),
    Disjunction(Arc<Sentence>, Arc<Sentence>),
    Implication(Arc<Sentence>, Arc<Sentence>),
    Equivalence(Arc<Sentence>, Arc<Sentence>),
    UniversalQuantification(Variable, Arc<Sentence>),
    ExistentialQuantification(Variable, Arc<Sentence>),
}

impl Sentence {
    pub fn predicate(name: impl Into<String>, args: Vec<Term>) -> Arc<Sentence> {
        Arc::new(Sentence::Predicate(Predicate::new(name, args)))
    }

    pub fn atom(predicate: Predicate) -> Arc<Sentence> {
        Arc::new(Sentence::Predicate(predicate))
    }

    pub fn not(sentence: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::Negation(sentence))
    }

    pub fn and(left: Arc<Sentence>, right: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::Conjunction(left, right))
    }

    pub fn or(left: Arc<Sentence>, right: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::Disjunction(left, right))
    }

    pub fn implies(antecedent: Arc<Sentence>, consequent: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::Implication(antecedent, consequent))
    }

    pub fn iff(left: Arc<Sentence>, right: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::Equivalence(left, right))
    }

    pub fn forall(variable: Variable, body: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::UniversalQuantification(variable, body))
    }

    pub fn exists(variable: Variable, body: Arc<Sentence>) -> Arc<Sentence> {
        Arc::new(Sentence::ExistentialQuantification(variable, body))
    }

    /// Get all free variables in the sentence
    pub fn free_variables(&self) -> HashSet<Variable> {
        match self {
            Sentence::Predicate(p) => {
                let mut vars = HashSet::new();
                p.collect_variables(&mut vars);
                vars
            }
            Sentence::Negation(inner) => inner.free_variables(),
            Sentence::Conjunction(l, r)
            | Sentence::Disjunction(l, r)
            | Sentence::Implication(l, r)
            | Sentence::Equivalence(l, r) => {
                let mut vars = l.free_variables();
                vars.extend(r.free_variables());
                vars
            }
            Sentence::UniversalQuantification(var, body)
            | Sentence::ExistentialQuantification(var, body) => {
                let mut vars = body.free_variables();
                vars.remove(var);
                vars
            }
        }
    }

    /// Check if the sentence is closed (no free variables)
    pub fn is_closed(&self) -> bool {
        self.free_variables().is_empty()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::Predicate(p) => write!(f, "{}", p),
            Sentence::Negation(inner) => write!(f, "¬{}", Parenthesised(inner)),
            Sentence::Conjunction(l, r) => {
                write!(f, "{} ∧ {}", Parenthesised(l), Parenthesised(r))
            }
            Sentence::Disjunction(l, r) => {
                write!(f, "{} ∨ {}", Parenthesised(l), Parenthesised(r))
            }
            Sentence::Implication(l, r) => {
                write!(f, "{} ⇒ {}", Parenthesised(l), Parenthesised(r))
            }
            Sentence::Equivalence(l, r) => {
                write!(f, "{} ⇔ {}", Parenthesised(l), Parenthesised(r))
            }
            Sentence::UniversalQuantification(var, body) => {
                write!(f, "∀{}. {}", var, Parenthesised(body))
            }
            Sentence::ExistentialQuantification(var, body) => {
                write!(f, "∃{}. {}", var, Parenthesised(body))
            }
        }
    }
}

/// Display wrapper that parenthesises compound sub-sentences.
struct Parenthesised<'a>(&'a Sentence);

impl<'a> fmt::Display for Parenthesised<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Sentence::Predicate(_) | Sentence::Negation(_) => write!(f, "{}", self.0),
            _ => write!(f, "({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let s1 = Sentence::and(
            Sentence::predicate("P", vec![Term::variable("x")]),
            Sentence::predicate("Q", vec![]),
        );
        let s2 = Sentence::and(
            Sentence::predicate("P", vec![Term::variable("x")]),
            Sentence::predicate("Q", vec![]),
        );
        assert_eq!(s1, s2);

        let hash = |s: &Sentence| {
            let mut h = DefaultHasher::new();
            s.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&s1), hash(&s2));
    }

    #[test]
    fn test_free_variables() {
        let x = Variable::named("x");
        let s = Sentence::forall(
            x.clone(),
            Sentence::predicate("P", vec![Term::Variable(x), Term::variable("y")]),
        );
        let free = s.free_variables();
        assert_eq!(free.len(), 1);
        assert!(free.contains(&Variable::named("y")));
    }

    #[test]
    fn test_display() {
        let s = Sentence::implies(
            Sentence::predicate("King", vec![Term::variable("x")]),
            Sentence::predicate("Person", vec![Term::variable("x")]),
        );
        assert_eq!(s.to_string(), "King(x) ⇒ Person(x)");
    }
}
