//! Property-based tests for unification using proptest.

use super::{unify_terms, UnificationError};
use crate::fol::Term;
use proptest::prelude::*;

/// Term description used as the proptest value; built into a `Term` on use.
#[derive(Debug, Clone)]
enum TermDesc {
    Var(u8),
    Const(u8),
    Func(u8, Vec<TermDesc>),
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    if max_depth == 0 {
        prop_oneof![
            (0..4u8).prop_map(TermDesc::Var),
            (0..4u8).prop_map(TermDesc::Const),
        ]
        .boxed()
    } else {
        prop_oneof![
            3 => (0..4u8).prop_map(TermDesc::Var),
            3 => (0..4u8).prop_map(TermDesc::Const),
            2 => (0..2u8, proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=2))
                .prop_map(|(f, args)| TermDesc::Func(f, args)),
        ]
        .boxed()
    }
}

fn build_term(desc: &TermDesc) -> Term {
    match desc {
        TermDesc::Var(i) => Term::variable(format!("X{}", i)),
        TermDesc::Const(i) => Term::constant(format!("c{}", i)),
        TermDesc::Func(f, args) => Term::function(
            format!("f{}", f),
            args.iter().map(build_term).collect(),
        ),
    }
}

fn arb_term_pair(max_depth: u32) -> impl Strategy<Value = (Term, Term)> {
    (arb_term_desc(max_depth), arb_term_desc(max_depth))
        .prop_map(|(d1, d2)| (build_term(&d1), build_term(&d2)))
}

proptest! {
    /// Soundness: if unify(s, t) = σ, then sσ = tσ
    #[test]
    fn unification_soundness((t1, t2) in arb_term_pair(3)) {
        if let Ok(sigma) = unify_terms(&t1, &t2) {
            prop_assert_eq!(
                sigma.apply_to_term(&t1),
                sigma.apply_to_term(&t2),
                "unifier must make terms equal"
            );
        }
        // If unification fails, there is no property to check
    }

    /// Symmetry: unify(s, t) succeeds iff unify(t, s) succeeds
    #[test]
    fn unification_symmetry((t1, t2) in arb_term_pair(3)) {
        let r1 = unify_terms(&t1, &t2);
        let r2 = unify_terms(&t2, &t1);
        prop_assert_eq!(r1.is_ok(), r2.is_ok(), "unification should be symmetric");
    }

    /// Applying the unifier twice changes nothing: σ(σ(t)) = σ(t)
    #[test]
    fn unifier_application_idempotent((t1, t2) in arb_term_pair(3)) {
        if let Ok(sigma) = unify_terms(&t1, &t2) {
            let once = sigma.apply_to_term(&t1);
            let twice = sigma.apply_to_term(&once);
            prop_assert_eq!(once, twice);
        }
    }

    /// Occurs check: unify(X, f(...X...)) always fails
    #[test]
    fn occurs_check_fails(desc in arb_term_desc(2)) {
        let inner = build_term(&desc);
        let wrapped = Term::function("f", vec![Term::variable("X0"), inner]);
        let result = unify_terms(&Term::variable("X0"), &wrapped);
        prop_assert!(matches!(result, Err(UnificationError::OccursCheck(_, _))));
    }

    /// A variable unifies with any term it does not occur in
    #[test]
    fn fresh_variable_unifies(desc in arb_term_desc(2)) {
        let term = build_term(&desc);
        let fresh = Term::variable("Fresh");
        let result = unify_terms(&fresh, &term);
        prop_assert!(result.is_ok());
        let sigma = result.unwrap();
        prop_assert_eq!(sigma.apply_to_term(&fresh), sigma.apply_to_term(&term));
    }
}
