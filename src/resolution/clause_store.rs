//! Clause stores backing the resolution engine
//!
//! A store owns the clauses visible to a query and knows how to find
//! resolution candidates for a clause. The default store is built on the
//! feature vector index and enforces forward and backward subsumption on
//! every add.

use crate::fol::{CNFClause, VariableSubstitution};
use crate::index::{ClauseFeature, FeatureVectorIndex};
use indexmap::IndexSet;

/// One resolution candidate: the stored partner clause, the unifier, and
/// the resolvent they produce.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub other: CNFClause,
    pub unifier: VariableSubstitution,
    pub resolvent: CNFClause,
}

/// Storage of clauses for resolution.
pub trait ClauseStore {
    /// Add a clause. Returns whether the clause constitutes new knowledge.
    fn add(&mut self, clause: CNFClause) -> bool;

    /// Iterate over the stored clauses.
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a CNFClause> + 'a>;

    /// All resolutions of the given clause against stored clauses.
    fn find_resolutions(&self, clause: &CNFClause) -> Vec<Resolution>;
}

/// A clause store that can spawn per-query working copies.
///
/// A query store is a writable snapshot: clauses added during a query
/// never leak back into the knowledge base. It is released by dropping it.
pub trait KnowledgeBaseClauseStore: ClauseStore {
    fn create_query_store(&self) -> Box<dyn ClauseStore>;
}

// =============================================================================
// ListClauseStore
// =============================================================================

/// Plain insertion-ordered store without subsumption checking.
#[derive(Debug, Clone, Default)]
pub struct ListClauseStore {
    clauses: IndexSet<CNFClause>,
}

impl ListClauseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClauseStore for ListClauseStore {
    fn add(&mut self, clause: CNFClause) -> bool {
        self.clauses.insert(clause)
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a CNFClause> + 'a> {
        Box::new(self.clauses.iter())
    }

    fn find_resolutions(&self, clause: &CNFClause) -> Vec<Resolution> {
        let mut results = Vec::new();
        for stored in &self.clauses {
            for (unifier, resolvent) in clause.resolve(stored) {
                results.push(Resolution {
                    other: stored.clone(),
                    unifier,
                    resolvent,
                });
            }
        }
        results
    }
}

impl KnowledgeBaseClauseStore for ListClauseStore {
    fn create_query_store(&self) -> Box<dyn ClauseStore> {
        Box::new(self.clone())
    }
}

// =============================================================================
// FeatureVectorClauseStore
// =============================================================================

/// Store backed by the feature vector index.
///
/// `add` performs replace-subsumed-if-not-subsumed: a clause subsumed by a
/// stored clause is rejected as redundant, and adding a clause evicts every
/// stored clause it subsumes. `find_resolutions` never yields a resolvent
/// that a stored clause already subsumes.
pub struct FeatureVectorClauseStore {
    index: FeatureVectorIndex<ClauseFeature, ()>,
    empty: Option<CNFClause>,
}

impl FeatureVectorClauseStore {
    pub fn new() -> Self {
        FeatureVectorClauseStore {
            index: FeatureVectorIndex::with_default_features(),
            empty: None,
        }
    }
}

impl Default for FeatureVectorClauseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseStore for FeatureVectorClauseStore {
    fn add(&mut self, clause: CNFClause) -> bool {
        if clause.is_empty() {
            // The contradiction is not an index key; track it separately.
            let was_new = self.empty.is_none();
            self.empty = Some(clause);
            return was_new;
        }
        self.index.try_replace_subsumed(clause, ()).unwrap_or(false)
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a CNFClause> + 'a> {
        Box::new(
            self.empty
                .iter()
                .chain(self.index.iter().map(|(clause, _)| clause)),
        )
    }

    fn find_resolutions(&self, clause: &CNFClause) -> Vec<Resolution> {
        let mut results = Vec::new();
        for (stored, _) in self.index.iter() {
            for (unifier, resolvent) in clause.resolve(stored) {
                if self.index.get_subsuming(&resolvent).is_empty() {
                    results.push(Resolution {
                        other: stored.clone(),
                        unifier,
                        resolvent,
                    });
                }
            }
        }
        results
    }
}

impl KnowledgeBaseClauseStore for FeatureVectorClauseStore {
    fn create_query_store(&self) -> Box<dyn ClauseStore> {
        let mut copy = FeatureVectorClauseStore::new();
        for clause in self.iter() {
            copy.add(clause.clone());
        }
        Box::new(copy)
    }
}

impl std::fmt::Debug for FeatureVectorClauseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureVectorClauseStore")
            .field("clauses", &self.index.len())
            .finish()
    }
}
