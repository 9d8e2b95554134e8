//! Most-general-unifier computation over terms, predicates, and literals
//!
//! CNF conversion is a precondition: quantified sentences never reach the
//! unifier, so there is no handling for quantifiers here.

mod mgu;

pub use mgu::{
    unify_literals, unify_literals_in_place, unify_literals_with, unify_predicates,
    unify_predicates_in_place, unify_predicates_with, unify_terms, unify_terms_in_place,
    unify_terms_with, UnificationError, UnificationResult,
};

#[cfg(test)]
mod proptest_tests;
