//! Backward chaining over definite-clause knowledge bases

pub mod query;

pub use query::{ChainingProof, ChainingQuery, ChainingStep};

use crate::cnf::to_cnf;
use crate::error::{EntailError, Result};
use crate::fol::{CNFDefiniteClause, Sentence};
use crate::knowledge::KnowledgeBase;
use indexmap::IndexMap;
use std::sync::Arc;

/// A knowledge base of definite clauses queried by goal-directed SLD
/// resolution.
///
/// Rules are indexed by the identifier of their consequent predicate, so a
/// goal only ever consults rules that could conclude it.
#[derive(Debug, Clone, Default)]
pub struct ChainingKnowledgeBase {
    rules: IndexMap<String, Vec<CNFDefiniteClause>>,
}

impl ChainingKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

impl KnowledgeBase for ChainingKnowledgeBase {
    type Query = ChainingQuery;

    /// Assert a sentence. Every clause of its CNF must be definite; a
    /// sentence with any non-definite clause is rejected whole, leaving
    /// the knowledge base unchanged.
    fn tell(&mut self, sentence: &Arc<Sentence>) -> Result<()> {
        let mut definite = Vec::new();
        for clause in to_cnf(sentence) {
            definite.push(CNFDefiniteClause::try_from(clause)?);
        }
        for clause in definite {
            let head = clause.consequent().symbol.name.clone();
            self.rules.entry(head).or_default().push(clause);
        }
        Ok(())
    }

    /// Begin a query. The query sentence must be a single predicate.
    fn create_query(&self, query: &Arc<Sentence>) -> Result<ChainingQuery> {
        match query.as_ref() {
            Sentence::Predicate(goal) => {
                Ok(ChainingQuery::new(goal.clone(), self.rules.clone()))
            }
            other => Err(EntailError::InvalidArgument(format!(
                "backward chaining queries must be atomic predicates, got: {}",
                other
            ))),
        }
    }

    fn ask(&self, query: &Arc<Sentence>) -> Result<bool> {
        self.create_query(query)?.complete()
    }
}
