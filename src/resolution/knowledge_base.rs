//! The resolution-backed knowledge base

use super::clause_store::{FeatureVectorClauseStore, KnowledgeBaseClauseStore};
use super::query::ResolutionQuery;
use super::strategies::ResolutionStrategy;
use crate::cnf::to_cnf;
use crate::error::Result;
use crate::fol::{CNFClause, Sentence};
use crate::knowledge::KnowledgeBase;
use std::sync::Arc;

/// A first-order knowledge base answering entailment queries by
/// refutation resolution.
///
/// Asserted sentences are converted to CNF and handed to the clause store;
/// queries work on a disposable copy of that store, so a knowledge base
/// can serve any number of queries.
pub struct ResolutionKnowledgeBase {
    store: Box<dyn KnowledgeBaseClauseStore>,
    strategy: ResolutionStrategy,
}

impl ResolutionKnowledgeBase {
    /// A knowledge base over the subsumption-enforcing feature vector
    /// store and the default strategy.
    pub fn new() -> Self {
        Self::with_store(FeatureVectorClauseStore::new())
    }

    pub fn with_store(store: impl KnowledgeBaseClauseStore + 'static) -> Self {
        ResolutionKnowledgeBase {
            store: Box::new(store),
            strategy: ResolutionStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ResolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Snapshot of the stored clauses.
    pub fn clauses(&self) -> Vec<CNFClause> {
        self.store.iter().cloned().collect()
    }
}

impl Default for ResolutionKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase for ResolutionKnowledgeBase {
    type Query = ResolutionQuery;

    fn tell(&mut self, sentence: &Arc<Sentence>) -> Result<()> {
        for clause in to_cnf(sentence) {
            self.store.add(clause);
        }
        Ok(())
    }

    fn create_query(&self, query: &Arc<Sentence>) -> Result<ResolutionQuery> {
        Ok(ResolutionQuery::new(
            query,
            self.store.create_query_store(),
            self.strategy.clone(),
        ))
    }

    fn ask(&self, query: &Arc<Sentence>) -> Result<bool> {
        self.create_query(query)?.complete()
    }
}

impl std::fmt::Debug for ResolutionKnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionKnowledgeBase")
            .field("clauses", &self.store.iter().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntailError;
    use crate::fol::Term;

    #[test]
    fn test_modus_ponens() {
        // P(a), ∀x. P(x) ⇒ Q(x)  ⊢  Q(a)
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();
        kb.tell(&Sentence::forall(
            crate::fol::Variable::named("x"),
            Sentence::implies(
                Sentence::predicate("P", vec![Term::variable("x")]),
                Sentence::predicate("Q", vec![Term::variable("x")]),
            ),
        ))
        .unwrap();

        assert!(kb
            .ask(&Sentence::predicate("Q", vec![Term::constant("a")]))
            .unwrap());
    }

    #[test]
    fn test_no_entailment_saturates_false() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();

        assert!(!kb
            .ask(&Sentence::predicate("Q", vec![Term::constant("a")]))
            .unwrap());
    }

    #[test]
    fn test_query_state_machine() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();

        let mut query = kb
            .create_query(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();

        assert!(!query.is_complete());
        assert!(matches!(
            query.result(),
            Err(EntailError::InvalidState(_))
        ));

        let result = query.complete().unwrap();
        assert!(result);
        assert!(query.is_complete());
        assert!(matches!(
            query.step(),
            Err(EntailError::InvalidState(_))
        ));
    }

    #[test]
    fn test_queries_do_not_pollute_the_kb() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();
        let before = kb.clauses().len();

        let mut query = kb
            .create_query(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();
        query.complete().unwrap();

        assert_eq!(kb.clauses().len(), before);
    }

    #[test]
    fn test_cancellation_surfaces() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();

        let mut query = kb
            .create_query(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();
        query.cancellation().cancel();
        assert_eq!(query.complete(), Err(EntailError::Cancelled));
    }

    #[test]
    fn test_step_limit_surfaces() {
        let mut kb = ResolutionKnowledgeBase::new()
            .with_strategy(ResolutionStrategy::default().with_max_steps(0));
        kb.tell(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();

        let mut query = kb
            .create_query(&Sentence::predicate("P", vec![Term::constant("a")]))
            .unwrap();
        assert_eq!(query.complete(), Err(EntailError::StepLimitExceeded));
    }
}
