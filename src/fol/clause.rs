//! Clauses and CNF sentences
//!
//! A [`CNFClause`] keeps its literals in a deterministic order keyed by a
//! per-literal structural hash. Two clauses with the same literal set
//! therefore compare equal regardless of construction order. The ordering
//! has a known weakness: a hash collision between distinct literals can
//! make logically-equal clauses compare unequal. A content-derived total
//! order would be sounder; the hash order is kept for its simplicity and
//! speed.

use super::literal::Literal;
use super::sentence::Predicate;
use super::substitution::VariableSubstitution;
use super::term::{Term, Variable, VariableSymbol};
use crate::error::EntailError;
use crate::unification::unify_predicates;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Structural hash of a literal, used as the clause-internal sort key.
/// `DefaultHasher::new()` uses fixed keys, so the order is deterministic.
fn literal_hash(literal: &Literal) -> u64 {
    let mut hasher = DefaultHasher::new();
    literal.hash(&mut hasher);
    hasher.finish()
}

/// A clause: a disjunction of literals in hash order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Literal>", into = "Vec<Literal>")]
pub struct CNFClause {
    literals: Vec<Literal>,
}

impl CNFClause {
    /// Create a clause from literals. Duplicates collapse; the result is
    /// sorted by literal hash.
    pub fn new(literals: Vec<Literal>) -> Self {
        let mut seen = HashSet::new();
        let mut literals: Vec<Literal> = literals
            .into_iter()
            .filter(|lit| seen.insert(lit.clone()))
            .collect();
        literals.sort_by_key(literal_hash);
        CNFClause { literals }
    }

    /// The empty clause, logically false.
    pub fn empty() -> Self {
        CNFClause { literals: vec![] }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Zero literals: the contradiction ⊥.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Exactly one literal.
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    fn positive_count(&self) -> usize {
        self.literals.iter().filter(|lit| lit.polarity).count()
    }

    /// At most one positive literal.
    pub fn is_horn(&self) -> bool {
        self.positive_count() <= 1
    }

    /// Exactly one positive literal.
    pub fn is_definite(&self) -> bool {
        self.positive_count() == 1
    }

    /// No positive literals.
    pub fn is_goal(&self) -> bool {
        self.positive_count() == 0
    }

    /// Contains a literal and its complement.
    pub fn is_tautology(&self) -> bool {
        for i in 0..self.literals.len() {
            for j in (i + 1)..self.literals.len() {
                if self.literals[i].predicate == self.literals[j].predicate
                    && self.literals[i].polarity != self.literals[j].polarity
                {
                    return true;
                }
            }
        }
        false
    }

    /// Collect all variables in this clause
    pub fn variables(&self) -> HashSet<Variable> {
        let mut vars = HashSet::new();
        for lit in &self.literals {
            lit.collect_variables(&mut vars);
        }
        vars
    }

    /// Apply a substitution to every literal, collapsing duplicates.
    pub fn apply(&self, subst: &VariableSubstitution) -> CNFClause {
        subst.apply_to_clause(self)
    }

    /// Rename this clause's variables apart from every other clause.
    ///
    /// Named variables get a fresh suffix; standardised variables get a
    /// fresh identity with the same provenance.
    pub fn rename_apart(&self) -> CNFClause {
        let suffix = super::term::next_symbol_id();
        let mut renaming: HashMap<Variable, Variable> = HashMap::new();
        let literals = self
            .literals
            .iter()
            .map(|lit| Literal {
                predicate: Predicate {
                    symbol: lit.predicate.symbol.clone(),
                    args: lit
                        .predicate
                        .args
                        .iter()
                        .map(|arg| rename_term(arg, suffix, &mut renaming))
                        .collect(),
                },
                polarity: lit.polarity,
            })
            .collect();
        CNFClause::new(literals)
    }

    /// Check whether this clause subsumes `other`: some substitution θ maps
    /// every literal of `self` onto a literal of `other`.
    ///
    /// Backtracking search over literal-to-literal matches, threading a
    /// single trailed substitution. Only this clause's variables are bound.
    pub fn subsumes(&self, other: &CNFClause) -> bool {
        let mut bindings = MatchBindings::new();
        find_subsumption_mapping(&self.literals, &other.literals, 0, &mut bindings)
    }

    /// All binary resolvents of this clause with `other`.
    ///
    /// `other` is renamed apart first. For every pair of opposite-sign
    /// literals with unifiable predicates, yields the unifier together with
    /// the factored resolvent.
    pub fn resolve(&self, other: &CNFClause) -> Vec<(VariableSubstitution, CNFClause)> {
        let renamed = other.rename_apart();
        let mut results = Vec::new();

        for (i, lit1) in self.literals.iter().enumerate() {
            for (j, lit2) in renamed.literals.iter().enumerate() {
                if lit1.polarity == lit2.polarity
                    || lit1.predicate.symbol != lit2.predicate.symbol
                {
                    continue;
                }
                if let Ok(mgu) = unify_predicates(&lit1.predicate, &lit2.predicate) {
                    let mut literals: Vec<Literal> = Vec::new();
                    for (k, lit) in self.literals.iter().enumerate() {
                        if k != i {
                            literals.push(mgu.apply_to_literal(lit));
                        }
                    }
                    for (k, lit) in renamed.literals.iter().enumerate() {
                        if k != j {
                            literals.push(mgu.apply_to_literal(lit));
                        }
                    }
                    results.push((mgu, CNFClause::new(literals)));
                }
            }
        }

        results
    }
}

fn rename_term(term: &Term, suffix: u64, renaming: &mut HashMap<Variable, Variable>) -> Term {
    match term {
        Term::Variable(v) => {
            let renamed = renaming
                .entry(v.clone())
                .or_insert_with(|| match &v.symbol {
                    VariableSymbol::Named(name) => {
                        Variable::named(format!("{}_{}", name, suffix))
                    }
                    VariableSymbol::Standardised(sv) => Variable::standardised(sv.refreshed()),
                })
                .clone();
            Term::Variable(renamed)
        }
        Term::Constant(_) => term.clone(),
        Term::Function(symbol, args) => Term::Function(
            symbol.clone(),
            args.iter()
                .map(|arg| rename_term(arg, suffix, renaming))
                .collect(),
        ),
    }
}

impl From<Vec<Literal>> for CNFClause {
    fn from(literals: Vec<Literal>) -> Self {
        CNFClause::new(literals)
    }
}

impl From<CNFClause> for Vec<Literal> {
    fn from(clause: CNFClause) -> Self {
        clause.literals
    }
}

impl fmt::Display for CNFClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "⊥")
        } else {
            for (i, lit) in self.literals.iter().enumerate() {
                if i > 0 {
                    write!(f, " ∨ ")?;
                }
                write!(f, "{}", lit)?;
            }
            Ok(())
        }
    }
}

// =============================================================================
// Subsumption matching
// =============================================================================

/// One-way matching substitution with a trail for backtracking.
///
/// Binds pattern variables to target sub-terms by reference; `mark` and
/// `backtrack` give O(1) undo per binding.
struct MatchBindings<'a> {
    bindings: HashMap<Variable, &'a Term>,
    trail: Vec<Variable>,
}

impl<'a> MatchBindings<'a> {
    fn new() -> Self {
        MatchBindings {
            bindings: HashMap::new(),
            trail: Vec::new(),
        }
    }

    fn mark(&self) -> usize {
        self.trail.len()
    }

    fn backtrack(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let var = self.trail.pop().unwrap();
            self.bindings.remove(&var);
        }
    }

    fn bind(&mut self, var: Variable, term: &'a Term) {
        self.trail.push(var.clone());
        self.bindings.insert(var, term);
    }
}

/// Match a pattern term against a target term, binding only pattern
/// variables.
fn match_terms<'a>(pattern: &Term, target: &'a Term, bindings: &mut MatchBindings<'a>) -> bool {
    match pattern {
        Term::Variable(v) => {
            if let Some(bound) = bindings.bindings.get(v) {
                *bound == target
            } else {
                bindings.bind(v.clone(), target);
                true
            }
        }
        Term::Constant(c1) => matches!(target, Term::Constant(c2) if c1 == c2),
        Term::Function(f1, args1) => match target {
            Term::Function(f2, args2) => {
                f1 == f2
                    && args1.len() == args2.len()
                    && args1
                        .iter()
                        .zip(args2)
                        .all(|(p, t)| match_terms(p, t, bindings))
            }
            _ => false,
        },
    }
}

fn match_literals<'a>(
    pattern: &Literal,
    target: &'a Literal,
    bindings: &mut MatchBindings<'a>,
) -> bool {
    if pattern.polarity != target.polarity
        || pattern.predicate.symbol != target.predicate.symbol
        || pattern.predicate.args.len() != target.predicate.args.len()
    {
        return false;
    }
    pattern
        .predicate
        .args
        .iter()
        .zip(&target.predicate.args)
        .all(|(p, t)| match_terms(p, t, bindings))
}

/// Recursive backtracking search for a subsumption mapping. Each subsumer
/// literal may map onto any target literal; the mapping need not be
/// injective.
fn find_subsumption_mapping<'a>(
    subsumer: &[Literal],
    target: &'a [Literal],
    lit_idx: usize,
    bindings: &mut MatchBindings<'a>,
) -> bool {
    if lit_idx >= subsumer.len() {
        return true;
    }

    let pattern = &subsumer[lit_idx];
    for candidate in target {
        if candidate.polarity != pattern.polarity {
            continue;
        }
        let mark = bindings.mark();
        if match_literals(pattern, candidate, bindings)
            && find_subsumption_mapping(subsumer, target, lit_idx + 1, bindings)
        {
            return true;
        }
        bindings.backtrack(mark);
    }

    false
}

// =============================================================================
// Definite clauses
// =============================================================================

/// A clause with exactly one positive literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CNFDefiniteClause {
    clause: CNFClause,
}

impl CNFDefiniteClause {
    /// The predicate of the single positive literal.
    pub fn consequent(&self) -> &Predicate {
        self.clause
            .literals()
            .iter()
            .find(|lit| lit.polarity)
            .map(|lit| &lit.predicate)
            .expect("definite clause has a positive literal")
    }

    /// The predicates of the negated literals.
    pub fn conjuncts(&self) -> impl Iterator<Item = &Predicate> {
        self.clause
            .literals()
            .iter()
            .filter(|lit| !lit.polarity)
            .map(|lit| &lit.predicate)
    }

    pub fn as_clause(&self) -> &CNFClause {
        &self.clause
    }

    pub fn rename_apart(&self) -> CNFDefiniteClause {
        CNFDefiniteClause {
            clause: self.clause.rename_apart(),
        }
    }
}

impl TryFrom<CNFClause> for CNFDefiniteClause {
    type Error = EntailError;

    fn try_from(clause: CNFClause) -> Result<Self, Self::Error> {
        if clause.is_definite() {
            Ok(CNFDefiniteClause { clause })
        } else {
            Err(EntailError::InvalidArgument(format!(
                "not a definite clause: {}",
                clause
            )))
        }
    }
}

impl fmt::Display for CNFDefiniteClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clause)
    }
}

// =============================================================================
// CNF sentences
// =============================================================================

/// A sentence in conjunctive normal form: an ordered set of clauses.
///
/// Equality is set equality; clause order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CNFSentence {
    clauses: IndexSet<CNFClause>,
}

impl CNFSentence {
    pub fn new(clauses: impl IntoIterator<Item = CNFClause>) -> Self {
        CNFSentence {
            clauses: clauses.into_iter().collect(),
        }
    }

    pub fn clauses(&self) -> impl Iterator<Item = &CNFClause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn contains(&self, clause: &CNFClause) -> bool {
        self.clauses.contains(clause)
    }
}

impl IntoIterator for CNFSentence {
    type Item = CNFClause;
    type IntoIter = indexmap::set::IntoIter<CNFClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl FromIterator<CNFClause> for CNFSentence {
    fn from_iter<I: IntoIterator<Item = CNFClause>>(iter: I) -> Self {
        CNFSentence::new(iter)
    }
}

impl fmt::Display for CNFSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "({})", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(polarity: bool, name: &str, args: Vec<Term>) -> Literal {
        let predicate = Predicate::new(name, args);
        if polarity {
            Literal::positive(predicate)
        } else {
            Literal::negative(predicate)
        }
    }

    #[test]
    fn test_order_insensitive_equality() {
        let c1 = CNFClause::new(vec![
            lit(true, "P", vec![Term::constant("a")]),
            lit(false, "Q", vec![Term::constant("b")]),
        ]);
        let c2 = CNFClause::new(vec![
            lit(false, "Q", vec![Term::constant("b")]),
            lit(true, "P", vec![Term::constant("a")]),
        ]);
        assert_eq!(c1, c2);

        use std::collections::hash_map::DefaultHasher;
        let hash = |c: &CNFClause| {
            let mut h = DefaultHasher::new();
            c.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&c1), hash(&c2));
    }

    #[test]
    fn test_duplicates_collapse() {
        let c = CNFClause::new(vec![
            lit(true, "P", vec![Term::constant("a")]),
            lit(true, "P", vec![Term::constant("a")]),
        ]);
        assert!(c.is_unit());
    }

    #[test]
    fn test_classification() {
        let empty = CNFClause::empty();
        assert!(empty.is_empty() && empty.is_horn() && empty.is_goal());
        assert!(!empty.is_definite());

        let unit = CNFClause::new(vec![lit(true, "P", vec![])]);
        assert!(unit.is_unit() && unit.is_horn() && unit.is_definite());
        assert!(!unit.is_goal());

        let goal = CNFClause::new(vec![lit(false, "P", vec![]), lit(false, "Q", vec![])]);
        assert!(goal.is_goal() && goal.is_horn());

        let non_horn = CNFClause::new(vec![lit(true, "P", vec![]), lit(true, "Q", vec![])]);
        assert!(!non_horn.is_horn());
    }

    #[test]
    fn test_tautology() {
        let taut = CNFClause::new(vec![lit(true, "P", vec![]), lit(false, "P", vec![])]);
        assert!(taut.is_tautology());

        let fine = CNFClause::new(vec![lit(true, "P", vec![]), lit(false, "Q", vec![])]);
        assert!(!fine.is_tautology());
    }

    #[test]
    fn test_subsumption_reflexive() {
        let c = CNFClause::new(vec![
            lit(true, "P", vec![Term::variable("x")]),
            lit(false, "Q", vec![Term::variable("y")]),
        ]);
        assert!(c.subsumes(&c));
    }

    #[test]
    fn test_subsumption_by_instance() {
        // P(x) subsumes P(a) ∨ Q(b)
        let general = CNFClause::new(vec![lit(true, "P", vec![Term::variable("x")])]);
        let specific = CNFClause::new(vec![
            lit(true, "P", vec![Term::constant("a")]),
            lit(true, "Q", vec![Term::constant("b")]),
        ]);
        assert!(general.subsumes(&specific));
        assert!(!specific.subsumes(&general));
    }

    #[test]
    fn test_subsumption_consistent_bindings() {
        // P(x) ∨ Q(x) does not subsume P(a) ∨ Q(b)
        let subsumer = CNFClause::new(vec![
            lit(true, "P", vec![Term::variable("x")]),
            lit(true, "Q", vec![Term::variable("x")]),
        ]);
        let target = CNFClause::new(vec![
            lit(true, "P", vec![Term::constant("a")]),
            lit(true, "Q", vec![Term::constant("b")]),
        ]);
        assert!(!subsumer.subsumes(&target));

        let matching = CNFClause::new(vec![
            lit(true, "P", vec![Term::constant("a")]),
            lit(true, "Q", vec![Term::constant("a")]),
        ]);
        assert!(subsumer.subsumes(&matching));
    }

    #[test]
    fn test_resolve_complementary_units() {
        let c1 = CNFClause::new(vec![lit(true, "P", vec![Term::constant("a")])]);
        let c2 = CNFClause::new(vec![lit(false, "P", vec![Term::variable("x")])]);

        let resolvents = c1.resolve(&c2);
        assert_eq!(resolvents.len(), 1);
        assert!(resolvents[0].1.is_empty());
    }

    #[test]
    fn test_resolve_carries_side_literals() {
        // P(a) ∨ Q(x), ¬P(a) ∨ R(b) resolves to Q(x) ∨ R(b)
        let c1 = CNFClause::new(vec![
            lit(true, "P", vec![Term::constant("a")]),
            lit(true, "Q", vec![Term::variable("x")]),
        ]);
        let c2 = CNFClause::new(vec![
            lit(false, "P", vec![Term::constant("a")]),
            lit(true, "R", vec![Term::constant("b")]),
        ]);

        let resolvents = c1.resolve(&c2);
        assert_eq!(resolvents.len(), 1);
        assert_eq!(resolvents[0].1.len(), 2);
    }

    #[test]
    fn test_resolve_factors_duplicates() {
        // P(x) ∨ Q(a), ¬P(b) ∨ Q(a) resolves to the unit Q(a)
        let c1 = CNFClause::new(vec![
            lit(true, "P", vec![Term::variable("x")]),
            lit(true, "Q", vec![Term::constant("a")]),
        ]);
        let c2 = CNFClause::new(vec![
            lit(false, "P", vec![Term::constant("b")]),
            lit(true, "Q", vec![Term::constant("a")]),
        ]);

        let resolvents = c1.resolve(&c2);
        assert_eq!(resolvents.len(), 1);
        assert!(resolvents[0].1.is_unit());
    }

    #[test]
    fn test_resolve_self_renames_apart() {
        // P(x) ∨ ¬P(f(x)) resolved with itself must not capture variables
        let c = CNFClause::new(vec![
            lit(true, "P", vec![Term::variable("x")]),
            lit(
                false,
                "P",
                vec![Term::function("f", vec![Term::variable("x")])],
            ),
        ]);
        let resolvents = c.resolve(&c);
        assert!(!resolvents.is_empty());
        for (_, resolvent) in &resolvents {
            assert!(!resolvent.is_empty());
        }
    }

    #[test]
    fn test_definite_clause_views() {
        let clause = CNFClause::new(vec![
            lit(true, "Evil", vec![Term::variable("x")]),
            lit(false, "King", vec![Term::variable("x")]),
            lit(false, "Greedy", vec![Term::variable("x")]),
        ]);
        let definite = CNFDefiniteClause::try_from(clause).unwrap();
        assert_eq!(definite.consequent().symbol.name, "Evil");
        let conjuncts: Vec<&str> = definite
            .conjuncts()
            .map(|p| p.symbol.name.as_str())
            .collect();
        assert_eq!(conjuncts.len(), 2);
        assert!(conjuncts.contains(&"King"));
        assert!(conjuncts.contains(&"Greedy"));
    }

    #[test]
    fn test_definite_clause_rejects_goal() {
        let goal = CNFClause::new(vec![lit(false, "P", vec![])]);
        assert!(CNFDefiniteClause::try_from(goal).is_err());
    }

    #[test]
    fn test_cnf_sentence_set_equality() {
        let c1 = CNFClause::new(vec![lit(true, "P", vec![])]);
        let c2 = CNFClause::new(vec![lit(true, "Q", vec![])]);
        let s1 = CNFSentence::new(vec![c1.clone(), c2.clone()]);
        let s2 = CNFSentence::new(vec![c2, c1]);
        assert_eq!(s1, s2);
    }
}
