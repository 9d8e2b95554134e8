//! Pluggable pair selection strategies for the resolution loop
//!
//! The engine is configured with a filter deciding which clause pairs are
//! worth queueing at all, and a priority comparator deciding which queued
//! pair to work on next. Search strategies (unit preference, shortest
//! clause first, and so on) are expressed entirely through these two
//! hooks.

use crate::fol::CNFClause;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Gate on clause pairs before they enter the frontier.
///
/// The query signals its lifecycle to the filter so that stateful
/// strategies can track clause provenance; stateless filters ignore the
/// signals.
pub trait ClausePairFilter {
    fn accept(&self, left: &CNFClause, right: &CNFClause) -> bool;

    /// Signalled when a query starts, with the negated-query clauses.
    fn begin_query(&self, _support: &[CNFClause]) {}

    /// Signalled when a derived clause enters the query store.
    fn on_derived(&self, _clause: &CNFClause) {}
}

/// Total order on clause pairs; the engine dequeues a maximal pair, with
/// ties broken by insertion order.
pub trait ClausePairPriority {
    fn compare(
        &self,
        a: (&CNFClause, &CNFClause),
        b: (&CNFClause, &CNFClause),
    ) -> Ordering;
}

/// Accepts every pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyPair;

impl ClausePairFilter for AnyPair {
    fn accept(&self, _left: &CNFClause, _right: &CNFClause) -> bool {
        true
    }
}

/// Set-of-support restriction: a pair is admitted only when at least one
/// side is a negated-query clause or descends from one.
///
/// Tracks the support set from the query's lifecycle signals, in the
/// manner of a prover sink. One instance serves one query at a time;
/// `begin_query` resets the tracked set. Refutation-complete whenever the
/// knowledge base on its own is satisfiable.
#[derive(Debug, Default)]
pub struct SetOfSupport {
    support: RefCell<HashSet<CNFClause>>,
}

impl SetOfSupport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClausePairFilter for SetOfSupport {
    fn accept(&self, left: &CNFClause, right: &CNFClause) -> bool {
        let support = self.support.borrow();
        support.contains(left) || support.contains(right)
    }

    fn begin_query(&self, support: &[CNFClause]) {
        let mut set = self.support.borrow_mut();
        set.clear();
        set.extend(support.iter().cloned());
    }

    fn on_derived(&self, clause: &CNFClause) {
        self.support.borrow_mut().insert(clause.clone());
    }
}

/// Unit preference: pairs containing a unit clause first, smaller pairs
/// before larger ones within each class.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitPreference;

impl ClausePairPriority for UnitPreference {
    fn compare(
        &self,
        a: (&CNFClause, &CNFClause),
        b: (&CNFClause, &CNFClause),
    ) -> Ordering {
        let has_unit = |p: (&CNFClause, &CNFClause)| p.0.is_unit() || p.1.is_unit();
        let size = |p: (&CNFClause, &CNFClause)| p.0.len() + p.1.len();
        has_unit(a)
            .cmp(&has_unit(b))
            .then_with(|| size(b).cmp(&size(a)))
    }
}

/// Shortest pair first, by total literal count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FewestLiterals;

impl ClausePairPriority for FewestLiterals {
    fn compare(
        &self,
        a: (&CNFClause, &CNFClause),
        b: (&CNFClause, &CNFClause),
    ) -> Ordering {
        let size = |p: (&CNFClause, &CNFClause)| p.0.len() + p.1.len();
        size(b).cmp(&size(a))
    }
}

/// Configuration for the resolution loop.
#[derive(Clone)]
pub struct ResolutionStrategy {
    pub filter: Arc<dyn ClausePairFilter>,
    pub priority: Arc<dyn ClausePairPriority>,
    /// Bound on `complete()`; `None` runs until the frontier is exhausted.
    pub max_steps: Option<usize>,
}

impl ResolutionStrategy {
    pub fn new(
        filter: impl ClausePairFilter + 'static,
        priority: impl ClausePairPriority + 'static,
    ) -> Self {
        ResolutionStrategy {
            filter: Arc::new(filter),
            priority: Arc::new(priority),
            max_steps: None,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        ResolutionStrategy::new(AnyPair, UnitPreference)
    }
}

impl std::fmt::Debug for ResolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionStrategy")
            .field("max_steps", &self.max_steps)
            .finish()
    }
}
