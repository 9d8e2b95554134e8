//! First-order logic data structures
//!
//! This module provides the fundamental types for representing FOL
//! sentences: terms, sentences, literals, clauses, substitutions, and the
//! visitor/transformation contracts used for structural recursion.

pub mod clause;
pub mod literal;
pub mod sentence;
pub mod substitution;
pub mod term;
pub mod visitor;

// Re-export commonly used types
pub use clause::{CNFClause, CNFDefiniteClause, CNFSentence};
pub use literal::Literal;
pub use sentence::{Predicate, PredicateSymbol, Sentence};
pub use substitution::{SubstitutionBuilder, VariableSubstitution};
pub use term::{
    Constant, FunctionName, FunctionSymbol, SkolemFunction, StandardisedVariable, Term, Variable,
    VariableSymbol,
};
pub use visitor::{SentenceTransformation, SentenceVisitor, TermTransformation};
