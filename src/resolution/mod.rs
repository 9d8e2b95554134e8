//! Refutation-resolution theorem proving
//!
//! To decide whether the knowledge base entails a query sentence, the
//! engine converts the query's negation to CNF, adds it to a working copy
//! of the clause store, and saturates clause pairs until the empty clause
//! falls out. Pair admission and ordering are pluggable
//! ([`strategies`]), as is the clause store itself ([`clause_store`]);
//! the default store enforces forward/backward subsumption through the
//! feature vector index.

pub mod clause_store;
pub mod knowledge_base;
pub mod query;
pub mod strategies;

pub use clause_store::{
    ClauseStore, FeatureVectorClauseStore, KnowledgeBaseClauseStore, ListClauseStore, Resolution,
};
pub use knowledge_base::ResolutionKnowledgeBase;
pub use query::{ResolutionQuery, ResolutionStep};
pub use strategies::{
    AnyPair, ClausePairFilter, ClausePairPriority, FewestLiterals, ResolutionStrategy,
    SetOfSupport, UnitPreference,
};
