//! entail: first-order logic representation, normalisation, and proving
//!
//! This library provides immutable data structures for first-order logic
//! sentences, a CNF conversion pipeline, most-general-unifier computation,
//! a refutation-resolution theorem prover with sub-linear subsumption
//! indexing, and a backward-chaining prover for definite-clause knowledge
//! bases.
//!
//! Equality is not axiomatised: callers needing equality reasoning must
//! assert the usual reflexivity, symmetry, transitivity, and substitution
//! axioms themselves.

pub mod cancellation;
pub mod chaining;
pub mod cnf;
pub mod error;
pub mod fol;
pub mod formatting;
pub mod index;
pub mod json;
pub mod knowledge;
pub mod resolution;
pub mod unification;

// Re-export commonly used types from fol
pub use fol::{
    CNFClause, CNFDefiniteClause, CNFSentence, Constant, FunctionName, FunctionSymbol, Literal,
    Predicate, PredicateSymbol, Sentence, SentenceTransformation, SentenceVisitor,
    SkolemFunction, StandardisedVariable, SubstitutionBuilder, Term, TermTransformation,
    Variable, VariableSubstitution, VariableSymbol,
};

pub use cancellation::CancellationSignal;
pub use chaining::{ChainingKnowledgeBase, ChainingProof, ChainingQuery, ChainingStep};
pub use cnf::to_cnf;
pub use error::{EntailError, Result};
pub use formatting::{FormatterConfig, LabelSet, SentenceFormatter};
pub use index::{default_features, ClauseFeature, FeatureVectorIndex};
pub use knowledge::KnowledgeBase;
pub use resolution::{
    AnyPair, ClausePairFilter, ClausePairPriority, ClauseStore, FeatureVectorClauseStore,
    FewestLiterals, KnowledgeBaseClauseStore, ListClauseStore, Resolution,
    ResolutionKnowledgeBase, ResolutionQuery, ResolutionStep, ResolutionStrategy, SetOfSupport,
    UnitPreference,
};
pub use unification::{
    unify_literals, unify_literals_in_place, unify_literals_with, unify_predicates,
    unify_predicates_in_place, unify_predicates_with, unify_terms, unify_terms_in_place,
    unify_terms_with, UnificationError, UnificationResult,
};
