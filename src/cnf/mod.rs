//! Conversion of sentences to conjunctive normal form
//!
//! The pipeline is a fixed composition of six transformations applied in
//! order: equivalence elimination, implication elimination, negation
//! normalisation, standardisation-apart, Skolemisation, and universal
//! quantifier removal with distribution of ∨ over ∧. The result is walked
//! to collect clauses; tautologies are dropped and duplicate literals
//! collapse.
//!
//! The pipeline is total over well-formed sentences.

pub mod transformations;

use crate::fol::visitor::{SentenceTransformation, SentenceVisitor};
use crate::fol::{CNFClause, CNFSentence, Literal, Predicate, Sentence};
use std::sync::Arc;
use transformations::{
    DisjunctionDistribution, EquivalenceElimination, ImplicationElimination,
    NegationNormalisation, Skolemisation, UniversalQuantifierElimination,
    VariableStandardisation,
};

/// Convert a sentence to conjunctive normal form.
pub fn to_cnf(sentence: &Arc<Sentence>) -> CNFSentence {
    let s = EquivalenceElimination.apply(sentence);
    let s = ImplicationElimination.apply(&s);
    let s = NegationNormalisation.apply(&s);
    let s = VariableStandardisation::new(Arc::clone(sentence)).apply(&s);
    let s = Skolemisation::new(Arc::clone(sentence)).apply(&s);
    let s = UniversalQuantifierElimination.apply(&s);
    let s = DisjunctionDistribution.apply(&s);

    let mut collector = ClauseCollector::default();
    collector.visit(&s);
    CNFSentence::new(collector.clauses)
}

/// Walks the top-level ∧-tree; every non-conjunction node is one clause.
#[derive(Default)]
struct ClauseCollector {
    clauses: Vec<CNFClause>,
}

impl SentenceVisitor for ClauseCollector {
    fn visit(&mut self, sentence: &Sentence) {
        if let Sentence::Conjunction(left, right) = sentence {
            self.visit(left);
            self.visit(right);
        } else {
            let mut literals = LiteralCollector::default();
            literals.visit(sentence);
            let clause = CNFClause::new(literals.literals);
            if !clause.is_tautology() {
                self.clauses.push(clause);
            }
        }
    }
}

/// Collects the literals of one maximal ∨-chain.
#[derive(Default)]
struct LiteralCollector {
    literals: Vec<Literal>,
}

impl SentenceVisitor for LiteralCollector {
    fn visit_predicate(&mut self, predicate: &Predicate) {
        self.literals.push(Literal::positive(predicate.clone()));
    }

    fn visit_negation(&mut self, inner: &Sentence) {
        match inner {
            Sentence::Predicate(predicate) => {
                self.literals.push(Literal::negative(predicate.clone()));
            }
            _ => unreachable!("negation of non-atom after normalisation: {}", inner),
        }
    }

    fn visit_conjunction(&mut self, left: &Sentence, right: &Sentence) {
        unreachable!("conjunction inside a clause: {} ∧ {}", left, right);
    }

    fn visit_implication(&mut self, antecedent: &Sentence, consequent: &Sentence) {
        unreachable!("implication after normalisation: {} ⇒ {}", antecedent, consequent);
    }

    fn visit_equivalence(&mut self, left: &Sentence, right: &Sentence) {
        unreachable!("equivalence after normalisation: {} ⇔ {}", left, right);
    }
}
