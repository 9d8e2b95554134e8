//! Goal-directed SLD search over definite clauses
//!
//! The query keeps an explicit agenda of search frames (remaining goals,
//! accumulated unifier, steps so far) and explores it depth-first, renaming
//! each rule apart before use. Proofs stream lazily from `next_proof`;
//! knowledge bases with recursive rules can have unboundedly many proofs,
//! so full enumeration is the caller's choice.

use crate::cancellation::CancellationSignal;
use crate::error::{EntailError, Result};
use crate::fol::{CNFDefiniteClause, Predicate, VariableSubstitution};
use crate::formatting::SentenceFormatter;
use crate::unification::unify_predicates_with;
use indexmap::IndexMap;

/// One rule application in a proof: the goal proved, the rule used, and
/// the goal's depth in the proof tree.
#[derive(Debug, Clone)]
pub struct ChainingStep {
    pub goal: Predicate,
    pub rule: CNFDefiniteClause,
    pub depth: usize,
}

/// A single proof of the query goal.
///
/// Steps are in application order (a preorder walk of the proof tree
/// rooted at the query goal) and share one accumulated unifier.
#[derive(Debug, Clone)]
pub struct ChainingProof {
    pub goal: Predicate,
    pub steps: Vec<ChainingStep>,
    pub unifier: VariableSubstitution,
}

impl ChainingProof {
    /// The query goal with the proof's bindings applied.
    pub fn conclusion(&self) -> Predicate {
        self.unifier.apply_to_predicate(&self.goal)
    }

    /// Render the proof tree as indented text.
    pub fn explain(&self) -> Result<String> {
        let mut formatter = SentenceFormatter::new();
        self.explain_with(&mut formatter)
    }

    pub fn explain_with(&self, formatter: &mut SentenceFormatter) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!(
            "{}\n",
            formatter.format_predicate(&self.conclusion())?
        ));
        for step in &self.steps {
            let proved = self.unifier.apply_to_predicate(&step.goal);
            out.push_str(&format!(
                "{}{} by {}\n",
                "  ".repeat(step.depth + 1),
                formatter.format_predicate(&proved)?,
                formatter.format_clause(step.rule.as_clause())?,
            ));
        }
        if formatter.has_bindings() {
            out.push_str("where:\n");
            out.push_str(&formatter.legend());
            out.push('\n');
        }
        Ok(out)
    }
}

struct Frame {
    /// Remaining goals with their proof-tree depths, front first.
    goals: Vec<(Predicate, usize)>,
    unifier: VariableSubstitution,
    steps: Vec<ChainingStep>,
}

/// An in-flight backward-chaining query.
pub struct ChainingQuery {
    goal: Predicate,
    rules: IndexMap<String, Vec<CNFDefiniteClause>>,
    agenda: Vec<Frame>,
    found: Vec<ChainingProof>,
    completed: bool,
    cancellation: CancellationSignal,
}

impl ChainingQuery {
    pub(crate) fn new(
        goal: Predicate,
        rules: IndexMap<String, Vec<CNFDefiniteClause>>,
    ) -> Self {
        let agenda = vec![Frame {
            goals: vec![(goal.clone(), 0)],
            unifier: VariableSubstitution::new(),
            steps: Vec::new(),
        }];
        ChainingQuery {
            goal,
            rules,
            agenda,
            found: Vec::new(),
            completed: false,
            cancellation: CancellationSignal::new(),
        }
    }

    /// A handle that aborts the query when cancelled.
    pub fn cancellation(&self) -> CancellationSignal {
        self.cancellation.clone()
    }

    /// Search for the next proof. Returns `None` once the search space is
    /// exhausted.
    pub fn next_proof(&mut self) -> Result<Option<ChainingProof>> {
        while let Some(frame) = self.agenda.pop() {
            if self.cancellation.is_cancelled() {
                return Err(EntailError::Cancelled);
            }

            let Some(((goal, depth), rest)) = frame.goals.split_first() else {
                let proof = ChainingProof {
                    goal: self.goal.clone(),
                    steps: frame.steps,
                    unifier: frame.unifier,
                };
                self.found.push(proof.clone());
                return Ok(Some(proof));
            };
            let goal = frame.unifier.apply_to_predicate(goal);

            let Some(bucket) = self.rules.get(&goal.symbol.name) else {
                continue;
            };

            // Push in reverse so the first-asserted rule is explored first.
            for rule in bucket.iter().rev() {
                let renamed = rule.rename_apart();
                let Ok(unifier) =
                    unify_predicates_with(renamed.consequent(), &goal, &frame.unifier)
                else {
                    continue;
                };

                let mut goals: Vec<(Predicate, usize)> = renamed
                    .conjuncts()
                    .map(|conjunct| (conjunct.clone(), depth + 1))
                    .collect();
                goals.extend(rest.iter().cloned());

                let mut steps = frame.steps.clone();
                steps.push(ChainingStep {
                    goal: goal.clone(),
                    rule: rule.clone(),
                    depth: *depth,
                });

                self.agenda.push(Frame {
                    goals,
                    unifier,
                    steps,
                });
            }
        }

        self.completed = true;
        Ok(None)
    }

    /// Exhaust the search space and return every proof.
    pub fn all_proofs(&mut self) -> Result<Vec<ChainingProof>> {
        while self.next_proof()?.is_some() {}
        Ok(self.found.clone())
    }

    /// Run until the first proof (or exhaustion) and return whether the
    /// goal is provable.
    pub fn complete(&mut self) -> Result<bool> {
        if !self.completed && self.found.is_empty() {
            self.next_proof()?;
            self.completed = true;
        }
        Ok(!self.found.is_empty())
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// The query outcome. Fails with `InvalidState` before completion.
    pub fn result(&self) -> Result<bool> {
        if self.completed {
            Ok(!self.found.is_empty())
        } else {
            Err(EntailError::InvalidState(
                "query result read before completion".into(),
            ))
        }
    }

    /// Proofs discovered so far.
    pub fn proofs(&self) -> &[ChainingProof] {
        &self.found
    }
}

impl std::fmt::Debug for ChainingQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainingQuery")
            .field("goal", &self.goal)
            .field("agenda", &self.agenda.len())
            .field("found", &self.found.len())
            .field("completed", &self.completed)
            .finish()
    }
}
