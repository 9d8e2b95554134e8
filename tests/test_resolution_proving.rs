//! Integration tests for the resolution prover

use entail::{
    EntailError, KnowledgeBase, ResolutionKnowledgeBase, ResolutionStrategy, Sentence,
    SetOfSupport, Term, UnitPreference, Variable,
};
use std::sync::Arc;

fn var(name: &str) -> Term {
    Term::variable(name)
}

fn con(name: &str) -> Term {
    Term::constant(name)
}

/// The Colonel West axioms (AIMA §9): selling weapons to hostile nations
/// is criminal.
fn crime_kb() -> ResolutionKnowledgeBase {
    let mut kb = ResolutionKnowledgeBase::new();

    // ∀x,y,z. American(x) ∧ Weapon(y) ∧ Sells(x,y,z) ∧ Hostile(z) ⇒ Criminal(x)
    kb.tell(&Sentence::forall(
        Variable::named("x"),
        Sentence::forall(
            Variable::named("y"),
            Sentence::forall(
                Variable::named("z"),
                Sentence::implies(
                    Sentence::and(
                        Sentence::and(
                            Sentence::predicate("American", vec![var("x")]),
                            Sentence::predicate("Weapon", vec![var("y")]),
                        ),
                        Sentence::and(
                            Sentence::predicate("Sells", vec![var("x"), var("y"), var("z")]),
                            Sentence::predicate("Hostile", vec![var("z")]),
                        ),
                    ),
                    Sentence::predicate("Criminal", vec![var("x")]),
                ),
            ),
        ),
    ))
    .unwrap();

    // Owns(Nono, M1) and Missile(M1)
    kb.tell(&Sentence::predicate("Owns", vec![con("Nono"), con("M1")]))
        .unwrap();
    kb.tell(&Sentence::predicate("Missile", vec![con("M1")]))
        .unwrap();

    // ∀x. Missile(x) ∧ Owns(Nono, x) ⇒ Sells(West, x, Nono)
    kb.tell(&Sentence::forall(
        Variable::named("x"),
        Sentence::implies(
            Sentence::and(
                Sentence::predicate("Missile", vec![var("x")]),
                Sentence::predicate("Owns", vec![con("Nono"), var("x")]),
            ),
            Sentence::predicate("Sells", vec![con("West"), var("x"), con("Nono")]),
        ),
    ))
    .unwrap();

    // ∀x. Missile(x) ⇒ Weapon(x)
    kb.tell(&Sentence::forall(
        Variable::named("x"),
        Sentence::implies(
            Sentence::predicate("Missile", vec![var("x")]),
            Sentence::predicate("Weapon", vec![var("x")]),
        ),
    ))
    .unwrap();

    // ∀x. Enemy(x, America) ⇒ Hostile(x)
    kb.tell(&Sentence::forall(
        Variable::named("x"),
        Sentence::implies(
            Sentence::predicate("Enemy", vec![var("x"), con("America")]),
            Sentence::predicate("Hostile", vec![var("x")]),
        ),
    ))
    .unwrap();

    kb.tell(&Sentence::predicate("American", vec![con("West")]))
        .unwrap();
    kb.tell(&Sentence::predicate(
        "Enemy",
        vec![con("Nono"), con("America")],
    ))
    .unwrap();

    kb
}

#[test]
fn test_west_is_criminal() {
    let kb = crime_kb();
    assert!(kb
        .ask(&Sentence::predicate("Criminal", vec![con("West")]))
        .unwrap());
}

#[test]
fn test_crime_explanation_names_participants() {
    let kb = crime_kb();
    let mut query = kb
        .create_query(&Sentence::predicate("Criminal", vec![con("West")]))
        .unwrap();
    assert!(query.complete().unwrap());

    let explanation = query.explain().unwrap();
    assert!(explanation.contains("⊥"));
    assert!(explanation.contains("from KB"));
    assert!(explanation.contains("from ¬Q"));
    assert!(explanation.contains("Criminal"));
    // The rule clauses carry standardised variables, so a legend appears
    assert!(explanation.contains("where:"));
    assert!(explanation.contains("standardisation of"));
}

#[test]
fn test_greedy_kings() {
    // KB = {King(John), Greedy(John), ∀x. King(x) ∧ Greedy(x) ⇒ Evil(x)}
    let rule = Sentence::forall(
        Variable::named("x"),
        Sentence::implies(
            Sentence::and(
                Sentence::predicate("King", vec![var("x")]),
                Sentence::predicate("Greedy", vec![var("x")]),
            ),
            Sentence::predicate("Evil", vec![var("x")]),
        ),
    );

    let mut kb = ResolutionKnowledgeBase::new();
    kb.tell_many(&[
        Sentence::predicate("King", vec![con("John")]),
        Sentence::predicate("Greedy", vec![con("John")]),
        Arc::clone(&rule),
    ])
    .unwrap();
    assert!(kb
        .ask(&Sentence::predicate("Evil", vec![con("John")]))
        .unwrap());

    // With King(John) alone the rule cannot fire
    let mut sparse = ResolutionKnowledgeBase::new();
    sparse
        .tell_many(&[Sentence::predicate("King", vec![con("John")]), rule])
        .unwrap();
    assert!(!sparse
        .ask(&Sentence::predicate("Evil", vec![var("x")]))
        .unwrap());
}

#[test]
fn test_existential_query_via_skolemised_fact() {
    let mut kb = ResolutionKnowledgeBase::new();
    // ∃x. Crown(x)
    kb.tell(&Sentence::exists(
        Variable::named("x"),
        Sentence::predicate("Crown", vec![var("x")]),
    ))
    .unwrap();

    let mut query = kb
        .create_query(&Sentence::exists(
            Variable::named("y"),
            Sentence::predicate("Crown", vec![var("y")]),
        ))
        .unwrap();
    assert!(query.complete().unwrap());

    // The explanation labels the Skolem symbol and explains it
    let explanation = query.explain().unwrap();
    assert!(explanation.contains("Skolem function"));
}

#[test]
fn test_negative_explanation_unsupported() {
    let mut kb = ResolutionKnowledgeBase::new();
    kb.tell(&Sentence::predicate("P", vec![con("a")])).unwrap();

    let mut query = kb
        .create_query(&Sentence::predicate("Q", vec![con("a")]))
        .unwrap();
    assert!(!query.complete().unwrap());
    assert!(matches!(
        query.explain(),
        Err(EntailError::InvalidState(_))
    ));
}

#[test]
fn test_universally_quantified_query() {
    // King(John) and ∀x. King(x) ⇒ Person(x) entail ∃x. Person(x)
    let mut kb = ResolutionKnowledgeBase::new();
    kb.tell(&Sentence::predicate("King", vec![con("John")]))
        .unwrap();
    kb.tell(&Sentence::forall(
        Variable::named("x"),
        Sentence::implies(
            Sentence::predicate("King", vec![var("x")]),
            Sentence::predicate("Person", vec![var("x")]),
        ),
    ))
    .unwrap();

    assert!(kb
        .ask(&Sentence::exists(
            Variable::named("x"),
            Sentence::predicate("Person", vec![var("x")]),
        ))
        .unwrap());
}

#[test]
fn test_step_limited_strategy() {
    // A generous step bound leaves provable queries provable
    let mut kb = ResolutionKnowledgeBase::new()
        .with_strategy(ResolutionStrategy::default().with_max_steps(10_000));
    kb.tell_many(&[
        Sentence::predicate("P", vec![con("a")]),
        Sentence::implies(
            Sentence::predicate("P", vec![con("a")]),
            Sentence::predicate("Q", vec![con("a")]),
        ),
    ])
    .unwrap();
    assert!(kb
        .ask(&Sentence::predicate("Q", vec![con("a")]))
        .unwrap());

    // An exhausted bound surfaces as an error, not a negative answer
    let tight = ResolutionKnowledgeBase::new()
        .with_strategy(ResolutionStrategy::default().with_max_steps(0));
    let mut query = tight
        .create_query(&Sentence::predicate("Q", vec![con("a")]))
        .unwrap();
    assert_eq!(query.complete(), Err(EntailError::StepLimitExceeded));
}

#[test]
fn test_inconsistent_kb_entails_anything() {
    // KB = {P(a), ¬P(a)} is unsatisfiable on its own, so every query is
    // entailed; the refutation needs a pair of original KB clauses
    let mut kb = ResolutionKnowledgeBase::new();
    kb.tell(&Sentence::predicate("P", vec![con("a")])).unwrap();
    kb.tell(&Sentence::not(Sentence::predicate("P", vec![con("a")])))
        .unwrap();

    assert!(kb
        .ask(&Sentence::predicate("Q", vec![con("b")]))
        .unwrap());
}

#[test]
fn test_set_of_support_restricts_to_query_descendants() {
    let strategy = ResolutionStrategy::new(SetOfSupport::new(), UnitPreference);

    // Under set of support the KB-internal contradiction is never touched,
    // so the unrelated query saturates without an answer clause
    let mut kb = ResolutionKnowledgeBase::new().with_strategy(strategy);
    kb.tell(&Sentence::predicate("P", vec![con("a")])).unwrap();
    kb.tell(&Sentence::not(Sentence::predicate("P", vec![con("a")])))
        .unwrap();
    assert!(!kb
        .ask(&Sentence::predicate("Q", vec![con("b")]))
        .unwrap());

    // Query-descended refutations still go through
    let strategy = ResolutionStrategy::new(SetOfSupport::new(), UnitPreference);
    let mut kb = ResolutionKnowledgeBase::new().with_strategy(strategy);
    kb.tell(&Sentence::predicate("P", vec![con("a")])).unwrap();
    kb.tell(&Sentence::forall(
        Variable::named("x"),
        Sentence::implies(
            Sentence::predicate("P", vec![var("x")]),
            Sentence::predicate("Q", vec![var("x")]),
        ),
    ))
    .unwrap();
    assert!(kb
        .ask(&Sentence::predicate("Q", vec![con("a")]))
        .unwrap());
}

#[test]
fn test_json_snapshot_of_proof() {
    let mut kb = ResolutionKnowledgeBase::new();
    kb.tell(&Sentence::predicate("P", vec![con("a")])).unwrap();

    let mut query = kb
        .create_query(&Sentence::predicate("P", vec![con("a")]))
        .unwrap();
    query.complete().unwrap();

    let json = serde_json::to_value(query.to_json().unwrap()).unwrap();
    assert_eq!(json["outcome"], "proved");
    assert!(!json["steps"].as_array().unwrap().is_empty());
}
