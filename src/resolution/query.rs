//! The refutation-resolution query state machine
//!
//! A query negates the asked sentence, adds its clauses to a per-query
//! working copy of the knowledge base store, and saturates clause pairs
//! from a priority frontier until the empty clause is derived (proved) or
//! the frontier runs dry (not proved). Pair admission and ordering are
//! delegated to the configured [`ResolutionStrategy`].
//!
//! The search is sound and refutation-complete but need not terminate on
//! negative instances; callers bound it with `max_steps` or cancellation.

use super::clause_store::ClauseStore;
use super::strategies::ResolutionStrategy;
use crate::cancellation::CancellationSignal;
use crate::cnf::to_cnf;
use crate::error::{EntailError, Result};
use crate::fol::{CNFClause, Sentence, VariableSubstitution};
use crate::formatting::SentenceFormatter;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// One recorded inference: the two parent clauses and the unifier that
/// produced the derived clause under which the step is keyed.
#[derive(Debug, Clone)]
pub struct ResolutionStep {
    pub clause1: CNFClause,
    pub clause2: CNFClause,
    pub unifier: VariableSubstitution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryState {
    Running,
    Complete { result: bool },
}

struct PendingPair {
    left: CNFClause,
    right: CNFClause,
}

/// An in-flight (or finished) resolution query.
pub struct ResolutionQuery {
    store: Box<dyn ClauseStore>,
    strategy: ResolutionStrategy,
    cancellation: CancellationSignal,
    /// Clauses that were in the knowledge base when the query started.
    kb_clauses: IndexSet<CNFClause>,
    /// Clauses of the negated query.
    query_clauses: IndexSet<CNFClause>,
    pending: Vec<PendingPair>,
    enqueued: HashSet<(CNFClause, CNFClause)>,
    /// Step ledger keyed by derived clause, in derivation order.
    steps: IndexMap<CNFClause, ResolutionStep>,
    state: QueryState,
    steps_taken: usize,
}

impl ResolutionQuery {
    pub(crate) fn new(
        query: &Arc<Sentence>,
        mut store: Box<dyn ClauseStore>,
        strategy: ResolutionStrategy,
    ) -> Self {
        let kb_clauses: IndexSet<CNFClause> = store.iter().cloned().collect();

        let negated = to_cnf(&Sentence::not(Arc::clone(query)));
        let mut query_clauses = IndexSet::new();
        for clause in negated {
            store.add(clause.clone());
            query_clauses.insert(clause);
        }

        let support: Vec<CNFClause> = query_clauses.iter().cloned().collect();
        strategy.filter.begin_query(&support);

        let kb_seed: Vec<CNFClause> = kb_clauses.iter().cloned().collect();
        let mut this = ResolutionQuery {
            store,
            strategy,
            cancellation: CancellationSignal::new(),
            kb_clauses,
            query_clauses: query_clauses.clone(),
            pending: Vec::new(),
            enqueued: HashSet::new(),
            steps: IndexMap::new(),
            state: QueryState::Running,
            steps_taken: 0,
        };

        // Every resolvable pair among the initial clauses is offered to
        // the filter, negated-query clauses first.
        for clause in &query_clauses {
            this.enqueue_partners(clause);
        }
        for clause in &kb_seed {
            this.enqueue_partners(clause);
        }
        this
    }

    /// A handle that aborts the query when cancelled.
    pub fn cancellation(&self) -> CancellationSignal {
        self.cancellation.clone()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, QueryState::Complete { .. })
    }

    /// The query outcome. Fails with `InvalidState` before completion.
    pub fn result(&self) -> Result<bool> {
        match self.state {
            QueryState::Complete { result } => Ok(result),
            QueryState::Running => Err(EntailError::InvalidState(
                "query result read before completion".into(),
            )),
        }
    }

    /// The recorded proof steps, keyed by derived clause.
    pub fn steps(&self) -> &IndexMap<CNFClause, ResolutionStep> {
        &self.steps
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    fn enqueue_partners(&mut self, clause: &CNFClause) {
        for resolution in self.store.find_resolutions(clause) {
            self.enqueue(resolution.other, clause.clone());
        }
    }

    fn enqueue(&mut self, left: CNFClause, right: CNFClause) {
        if !self.strategy.filter.accept(&left, &right) {
            return;
        }
        if self.enqueued.contains(&(left.clone(), right.clone()))
            || self.enqueued.contains(&(right.clone(), left.clone()))
        {
            return;
        }
        self.enqueued.insert((left.clone(), right.clone()));
        self.pending.push(PendingPair { left, right });
    }

    /// Pick the maximal pending pair under the strategy's comparator.
    /// `pending` is in insertion order and only a strictly greater pair
    /// displaces the current best, so ties break stably.
    fn select_pair(&mut self) -> Option<PendingPair> {
        if self.pending.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 1..self.pending.len() {
            let candidate = (&self.pending[i].left, &self.pending[i].right);
            let current = (&self.pending[best].left, &self.pending[best].right);
            if self.strategy.priority.compare(candidate, current) == std::cmp::Ordering::Greater
            {
                best = i;
            }
        }
        Some(self.pending.remove(best))
    }

    /// Work one clause pair off the frontier.
    ///
    /// Fails with `InvalidState` once the query is complete and with
    /// `Cancelled` when the query's cancellation signal is raised.
    pub fn step(&mut self) -> Result<()> {
        if self.is_complete() {
            return Err(EntailError::InvalidState(
                "cannot step a completed query".into(),
            ));
        }
        if self.cancellation.is_cancelled() {
            return Err(EntailError::Cancelled);
        }

        let Some(pair) = self.select_pair() else {
            self.state = QueryState::Complete { result: false };
            return Ok(());
        };
        self.steps_taken += 1;

        for (unifier, resolvent) in pair.left.resolve(&pair.right) {
            if resolvent.is_empty() {
                self.steps.insert(
                    resolvent,
                    ResolutionStep {
                        clause1: pair.left.clone(),
                        clause2: pair.right.clone(),
                        unifier,
                    },
                );
                self.state = QueryState::Complete { result: true };
                return Ok(());
            }

            if resolvent.is_tautology() {
                continue;
            }

            if self.store.add(resolvent.clone()) {
                self.steps.insert(
                    resolvent.clone(),
                    ResolutionStep {
                        clause1: pair.left.clone(),
                        clause2: pair.right.clone(),
                        unifier,
                    },
                );
                self.strategy.filter.on_derived(&resolvent);
                self.enqueue_partners(&resolvent);
            }
        }

        Ok(())
    }

    /// Run the query to completion, honouring cancellation and the
    /// strategy's step bound.
    pub fn complete(&mut self) -> Result<bool> {
        while !self.is_complete() {
            if let Some(max_steps) = self.strategy.max_steps {
                if self.steps_taken >= max_steps {
                    return Err(EntailError::StepLimitExceeded);
                }
            }
            self.step()?;
        }
        self.result()
    }

    /// Render the refutation as readable text, with a legend for
    /// normalisation symbols. Only positive results can be explained.
    pub fn explain(&self) -> Result<String> {
        let mut formatter = SentenceFormatter::new();
        self.explain_with(&mut formatter)
    }

    pub fn explain_with(&self, formatter: &mut SentenceFormatter) -> Result<String> {
        match self.state {
            QueryState::Complete { result: true } => {}
            QueryState::Complete { result: false } => {
                return Err(EntailError::InvalidState(
                    "negative results cannot be explained".into(),
                ));
            }
            QueryState::Running => {
                return Err(EntailError::InvalidState(
                    "query is not complete".into(),
                ));
            }
        }

        // Walk the step DAG breadth-first from ⊥, keeping only the last
        // occurrence of each clause, so that reversing the walk yields a
        // topologically sorted derivation.
        let mut sequence: Vec<CNFClause> = Vec::new();
        let mut frontier: VecDeque<CNFClause> = VecDeque::from([CNFClause::empty()]);
        while let Some(clause) = frontier.pop_front() {
            let Some(step) = self.steps.get(&clause) else {
                continue;
            };
            if let Some(pos) = sequence.iter().position(|c| c == &clause) {
                sequence.remove(pos);
            }
            sequence.push(clause.clone());
            frontier.push_back(step.clause1.clone());
            frontier.push_back(step.clause2.clone());
        }
        sequence.reverse();

        let index_of: HashMap<&CNFClause, usize> = sequence
            .iter()
            .enumerate()
            .map(|(i, clause)| (clause, i + 1))
            .collect();

        let mut out = String::new();
        for (i, clause) in sequence.iter().enumerate() {
            let step = &self.steps[clause];
            let describe = |c: &CNFClause| -> String {
                if let Some(n) = index_of.get(c) {
                    format!("#{}", n)
                } else if self.query_clauses.contains(c) {
                    "from ¬Q".to_string()
                } else if self.kb_clauses.contains(c) {
                    "from KB".to_string()
                } else {
                    "from store".to_string()
                }
            };

            out.push_str(&format!(
                "#{}: {}\n     from {} ({}) and {} ({})\n     unifier {}\n",
                i + 1,
                formatter.format_clause(clause)?,
                formatter.format_clause(&step.clause1)?,
                describe(&step.clause1),
                formatter.format_clause(&step.clause2)?,
                describe(&step.clause2),
                formatter.format_substitution(&step.unifier)?,
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

impl std::fmt::Debug for ResolutionQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionQuery")
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .field("steps", &self.steps.len())
            .field("steps_taken", &self.steps_taken)
            .finish()
    }
}
