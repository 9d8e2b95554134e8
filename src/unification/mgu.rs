//! Most General Unifier (MGU) computation
//!
//! Classic Robinson unification with an occurs check. Bindings are only
//! ever added for previously-free variables and are eagerly composed into
//! the substitution, which is what makes the result most general: a later
//! unification problem is always constrained by the bindings already made.

use crate::fol::{
    Literal, Predicate, PredicateSymbol, SubstitutionBuilder, Term, Variable,
    VariableSubstitution,
};
use thiserror::Error;

/// Result of a unification attempt
pub type UnificationResult = Result<VariableSubstitution, UnificationError>;

/// Errors that can occur during unification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnificationError {
    /// Occurs check failed - variable occurs in term
    #[error("occurs check failed: {0} occurs in {1}")]
    OccursCheck(Variable, Term),
    /// Function symbols don't match
    #[error("function symbols differ: {0} vs {1}")]
    FunctionClash(String, String),
    /// Predicate symbols don't match
    #[error("predicate symbols differ: {0} vs {1}")]
    PredicateClash(PredicateSymbol, PredicateSymbol),
    /// Argument counts don't match
    #[error("arities differ: {0} vs {1}")]
    ArityMismatch(usize, usize),
    /// Literal signs don't match
    #[error("literal polarities differ")]
    PolarityMismatch,
    /// Irreconcilable term shapes (e.g. distinct constants)
    #[error("terms clash: {0} vs {1}")]
    TermClash(Term, Term),
}

/// Unify two terms, returning a most general unifier if one exists.
pub fn unify_terms(term1: &Term, term2: &Term) -> UnificationResult {
    let mut builder = SubstitutionBuilder::new();
    unify_terms_in_place(term1, term2, &mut builder)?;
    Ok(builder.into_substitution())
}

/// Unify two terms, extending an existing substitution.
pub fn unify_terms_with(
    term1: &Term,
    term2: &Term,
    existing: &VariableSubstitution,
) -> UnificationResult {
    let mut builder = existing.to_builder();
    unify_terms_in_place(term1, term2, &mut builder)?;
    Ok(builder.into_substitution())
}

/// Unify two terms into a caller-owned builder.
///
/// On failure the builder may contain bindings made before the clash was
/// discovered; callers that need all-or-nothing behaviour should discard
/// it.
pub fn unify_terms_in_place(
    term1: &Term,
    term2: &Term,
    builder: &mut SubstitutionBuilder,
) -> Result<(), UnificationError> {
    let t1 = builder.resolve(term1);
    let t2 = builder.resolve(term2);

    match (&t1, &t2) {
        // Same term after resolution - nothing to do
        _ if t1 == t2 => Ok(()),

        // Variable cases. Resolution above means the variable is free and
        // the other side is fully substituted, so the occurs check sees
        // through already-bound aliases.
        (Term::Variable(v), t) | (t, Term::Variable(v)) => {
            if occurs_in(v, t) {
                Err(UnificationError::OccursCheck(v.clone(), t.clone()))
            } else {
                builder.bind(v.clone(), t.clone());
                Ok(())
            }
        }

        // Function terms: symbols must agree, then arguments pairwise,
        // threading the substitution left to right.
        (Term::Function(f1, args1), Term::Function(f2, args2)) => {
            if f1 != f2 {
                return Err(UnificationError::FunctionClash(
                    f1.to_string(),
                    f2.to_string(),
                ));
            }
            if args1.len() != args2.len() {
                return Err(UnificationError::ArityMismatch(args1.len(), args2.len()));
            }
            for (arg1, arg2) in args1.iter().zip(args2.iter()) {
                unify_terms_in_place(arg1, arg2, builder)?;
            }
            Ok(())
        }

        // Everything else (constant vs constant, constant vs function)
        // unifies only when equal, which was handled above.
        _ => Err(UnificationError::TermClash(t1.clone(), t2.clone())),
    }
}

/// Unify two predicates, returning a most general unifier if one exists.
pub fn unify_predicates(p1: &Predicate, p2: &Predicate) -> UnificationResult {
    let mut builder = SubstitutionBuilder::new();
    unify_predicates_in_place(p1, p2, &mut builder)?;
    Ok(builder.into_substitution())
}

/// Unify two predicates, extending an existing substitution.
pub fn unify_predicates_with(
    p1: &Predicate,
    p2: &Predicate,
    existing: &VariableSubstitution,
) -> UnificationResult {
    let mut builder = existing.to_builder();
    unify_predicates_in_place(p1, p2, &mut builder)?;
    Ok(builder.into_substitution())
}

/// Unify two predicates into a caller-owned builder.
pub fn unify_predicates_in_place(
    p1: &Predicate,
    p2: &Predicate,
    builder: &mut SubstitutionBuilder,
) -> Result<(), UnificationError> {
    if p1.symbol != p2.symbol {
        return Err(UnificationError::PredicateClash(
            p1.symbol.clone(),
            p2.symbol.clone(),
        ));
    }
    if p1.args.len() != p2.args.len() {
        return Err(UnificationError::ArityMismatch(p1.args.len(), p2.args.len()));
    }
    for (arg1, arg2) in p1.args.iter().zip(p2.args.iter()) {
        unify_terms_in_place(arg1, arg2, builder)?;
    }
    Ok(())
}

/// Unify two literals, returning a most general unifier if one exists.
pub fn unify_literals(l1: &Literal, l2: &Literal) -> UnificationResult {
    let mut builder = SubstitutionBuilder::new();
    unify_literals_in_place(l1, l2, &mut builder)?;
    Ok(builder.into_substitution())
}

/// Unify two literals, extending an existing substitution.
pub fn unify_literals_with(
    l1: &Literal,
    l2: &Literal,
    existing: &VariableSubstitution,
) -> UnificationResult {
    let mut builder = existing.to_builder();
    unify_literals_in_place(l1, l2, &mut builder)?;
    Ok(builder.into_substitution())
}

/// Unify two literals into a caller-owned builder.
pub fn unify_literals_in_place(
    l1: &Literal,
    l2: &Literal,
    builder: &mut SubstitutionBuilder,
) -> Result<(), UnificationError> {
    if l1.polarity != l2.polarity {
        return Err(UnificationError::PolarityMismatch);
    }
    unify_predicates_in_place(&l1.predicate, &l2.predicate, builder)
}

/// Check if a variable occurs in a term (occurs check)
fn occurs_in(var: &Variable, term: &Term) -> bool {
    match term {
        Term::Variable(v) => v == var,
        Term::Constant(_) => false,
        Term::Function(_, args) => args.iter().any(|arg| occurs_in(var, arg)),
    }
}
