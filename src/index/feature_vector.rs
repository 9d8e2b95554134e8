//! Feature vector indexing for sub-linear subsumption queries.
//!
//! Feature vectors give a necessary condition for subsumption: if clause C
//! subsumes clause D then, for every feature, C's magnitude is at most D's.
//! Storing clauses in a trie keyed by their sorted feature vector lets both
//! directions of the question ("which stored clauses could subsume this
//! one?", "which stored clauses could this one subsume?") be answered
//! without touching most of the index. The vector test is necessary but not
//! sufficient, so every candidate is re-checked with real clause
//! subsumption before being returned.

use crate::error::{EntailError, Result};
use crate::fol::CNFClause;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A feature selector derives the `(feature, magnitude)` components of a
/// clause. Components with zero magnitude are dropped during
/// canonicalisation, which keeps the feature universe open.
pub type FeatureSelector<F> = Box<dyn Fn(&CNFClause) -> Vec<(F, usize)>>;

/// The stock feature domain: predicate name and polarity.
pub type ClauseFeature = (String, bool);

/// The stock feature selector: occurrence counts per predicate-polarity
/// pair.
pub fn default_features(clause: &CNFClause) -> Vec<(ClauseFeature, usize)> {
    let mut counts: BTreeMap<ClauseFeature, usize> = BTreeMap::new();
    for lit in clause.literals() {
        *counts
            .entry((lit.predicate.symbol.name.clone(), lit.polarity))
            .or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

type EventHandler = Box<dyn FnMut(&CNFClause)>;

/// A node in the feature vector trie.
///
/// The path from the root to a node spells a prefix of a sorted feature
/// vector; values live at the node whose path equals the whole vector.
/// `BTreeMap` keeps children ordered by feature (magnitude secondary), so
/// traversal order is deterministic in both directions.
struct TrieNode<F: Ord, V> {
    entries: IndexMap<CNFClause, V>,
    children: BTreeMap<(F, usize), TrieNode<F, V>>,
}

impl<F: Ord, V> TrieNode<F, V> {
    fn new() -> Self {
        TrieNode {
            entries: IndexMap::new(),
            children: BTreeMap::new(),
        }
    }

    fn is_prunable(&self) -> bool {
        self.entries.is_empty() && self.children.is_empty()
    }
}

/// A clause-keyed index supporting sub-linear subsumption queries.
///
/// Parametric in the feature domain `F` (any total order) and the stored
/// value type `V`. The empty clause is rejected as a key: it subsumes
/// everything and has an empty vector.
pub struct FeatureVectorIndex<F: Ord + Clone, V> {
    selector: FeatureSelector<F>,
    root: TrieNode<F, V>,
    len: usize,
    key_added: Vec<EventHandler>,
    key_removed: Vec<EventHandler>,
}

impl<V> FeatureVectorIndex<ClauseFeature, V> {
    /// An index over the stock predicate-polarity feature domain.
    pub fn with_default_features() -> Self {
        FeatureVectorIndex::new(default_features)
    }
}

impl<F: Ord + Clone, V> FeatureVectorIndex<F, V> {
    pub fn new(selector: impl Fn(&CNFClause) -> Vec<(F, usize)> + 'static) -> Self {
        FeatureVectorIndex {
            selector: Box::new(selector),
            root: TrieNode::new(),
            len: 0,
            key_added: Vec::new(),
            key_removed: Vec::new(),
        }
    }

    /// Register a handler fired after a key is added.
    pub fn on_key_added(&mut self, handler: impl FnMut(&CNFClause) + 'static) {
        self.key_added.push(Box::new(handler));
    }

    /// Register a handler fired after a key is removed.
    pub fn on_key_removed(&mut self, handler: impl FnMut(&CNFClause) + 'static) {
        self.key_removed.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The canonical sorted feature vector of a clause: duplicate features
    /// merged, zero magnitudes dropped.
    fn vector(&self, clause: &CNFClause) -> Vec<(F, usize)> {
        let mut merged: BTreeMap<F, usize> = BTreeMap::new();
        for (feature, magnitude) in (self.selector)(clause) {
            *merged.entry(feature).or_insert(0) += magnitude;
        }
        merged
            .into_iter()
            .filter(|(_, magnitude)| *magnitude > 0)
            .collect()
    }

    /// Add a key/value entry. Returns whether the key was new; an existing
    /// key has its value replaced.
    ///
    /// The empty clause is rejected with `InvalidArgument`.
    pub fn add(&mut self, key: CNFClause, value: V) -> Result<bool> {
        if key.is_empty() {
            return Err(EntailError::InvalidArgument(
                "the empty clause cannot be used as an index key".into(),
            ));
        }

        let vector = self.vector(&key);
        let mut node = &mut self.root;
        for component in vector {
            node = node.children.entry(component).or_insert_with(TrieNode::new);
        }

        let was_new = node.entries.insert(key.clone(), value).is_none();
        if was_new {
            self.len += 1;
            for handler in &mut self.key_added {
                handler(&key);
            }
        }
        Ok(was_new)
    }

    /// Look up the value stored for exactly this key.
    pub fn try_get(&self, key: &CNFClause) -> Option<&V> {
        let vector = self.vector(key);
        let mut node = &self.root;
        for component in &vector {
            node = node.children.get(component)?;
        }
        node.entries.get(key)
    }

    /// Remove a key, pruning trie nodes that end childless and entry-less.
    pub fn remove(&mut self, key: &CNFClause) -> Option<V> {
        let vector = self.vector(key);
        let removed = remove_recursive(&mut self.root, &vector, key);
        if removed.is_some() {
            self.len -= 1;
            for handler in &mut self.key_removed {
                handler(key);
            }
        }
        removed
    }

    /// All entries in deterministic trie order.
    pub fn iter(&self) -> impl Iterator<Item = (&CNFClause, &V)> {
        let mut out = Vec::with_capacity(self.len);
        collect_entries(&self.root, &mut out);
        out.into_iter()
    }

    /// Stored clauses that subsume the query clause.
    ///
    /// Vector candidates (componentwise ≤ the query's vector) are verified
    /// with real clause subsumption before being returned.
    pub fn get_subsuming(&self, query: &CNFClause) -> Vec<(&CNFClause, &V)> {
        let vector = self.vector(query);
        let mut out = Vec::new();
        collect_subsuming(&self.root, &vector, query, &mut out);
        out
    }

    /// Stored clauses that the query clause subsumes.
    pub fn get_subsumed(&self, query: &CNFClause) -> Vec<(&CNFClause, &V)> {
        let vector = self.vector(query);
        let mut out = Vec::new();
        collect_subsumed(&self.root, &vector, query, &mut out);
        out
    }

    /// Remove every stored clause the query subsumes, returning the removed
    /// entries. Emptied sub-trees are pruned.
    pub fn remove_subsumed(&mut self, query: &CNFClause) -> Vec<(CNFClause, V)> {
        let keys: Vec<CNFClause> = self
            .get_subsumed(query)
            .into_iter()
            .map(|(key, _)| key.clone())
            .collect();

        let mut removed = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.remove(&key) {
                removed.push((key, value));
            }
        }
        removed
    }

    /// Add the clause after evicting everything it subsumes, unless some
    /// stored clause subsumes it, in which case nothing changes and `false`
    /// is returned.
    pub fn try_replace_subsumed(&mut self, key: CNFClause, value: V) -> Result<bool> {
        if key.is_empty() {
            return Err(EntailError::InvalidArgument(
                "the empty clause cannot be used as an index key".into(),
            ));
        }
        if !self.get_subsuming(&key).is_empty() {
            return Ok(false);
        }
        self.remove_subsumed(&key);
        self.add(key, value)?;
        Ok(true)
    }
}

impl<F: Ord + Clone, V> fmt::Debug for FeatureVectorIndex<F, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureVectorIndex")
            .field("len", &self.len)
            .finish()
    }
}

fn remove_recursive<F: Ord + Clone, V>(
    node: &mut TrieNode<F, V>,
    vector: &[(F, usize)],
    key: &CNFClause,
) -> Option<V> {
    match vector.split_first() {
        None => node.entries.shift_remove(key),
        Some((component, rest)) => {
            let child = node.children.get_mut(component)?;
            let removed = remove_recursive(child, rest, key);
            if child.is_prunable() {
                node.children.remove(component);
            }
            removed
        }
    }
}

fn collect_entries<'a, F: Ord, V>(
    node: &'a TrieNode<F, V>,
    out: &mut Vec<(&'a CNFClause, &'a V)>,
) {
    for (key, value) in &node.entries {
        out.push((key, value));
    }
    for child in node.children.values() {
        collect_entries(child, out);
    }
}

/// Forward traversal: find stored vectors that embed into the query vector
/// with componentwise ≤ magnitudes. Features absent from a stored vector
/// act as zero, so any suffix of the query may be skipped.
fn collect_subsuming<'a, F: Ord + Clone, V>(
    node: &'a TrieNode<F, V>,
    query_vector: &[(F, usize)],
    query: &CNFClause,
    out: &mut Vec<(&'a CNFClause, &'a V)>,
) {
    // A stored vector ending here consumed all its components; any query
    // features left over are irrelevant (stored magnitude zero ≤ anything).
    for (key, value) in &node.entries {
        if key.subsumes(query) {
            out.push((key, value));
        }
    }

    for (skip, (feature, magnitude)) in query_vector.iter().enumerate() {
        let lower = (feature.clone(), 0);
        let upper = (feature.clone(), *magnitude);
        for (_, child) in node.children.range(lower..=upper) {
            collect_subsuming(child, &query_vector[skip + 1..], query, out);
        }
    }
}

/// Backward traversal: find stored vectors the query vector embeds into
/// with componentwise ≥ magnitudes. Stored vectors may carry extra
/// features; a stored vector that runs past the query's last feature
/// qualifies wholesale.
fn collect_subsumed<'a, F: Ord + Clone, V>(
    node: &'a TrieNode<F, V>,
    query_vector: &[(F, usize)],
    query: &CNFClause,
    out: &mut Vec<(&'a CNFClause, &'a V)>,
) {
    let Some(((feature, magnitude), rest)) = query_vector.split_first() else {
        collect_verified(node, query, out);
        return;
    };

    for ((child_feature, child_magnitude), child) in &node.children {
        match child_feature.cmp(feature) {
            // Extra stored feature the query lacks: consume it, keep
            // looking for the query feature deeper.
            Ordering::Less => collect_subsumed(child, query_vector, query, out),
            Ordering::Equal if child_magnitude >= magnitude => {
                collect_subsumed(child, rest, query, out)
            }
            Ordering::Equal => {}
            // Children are feature-sorted: once past the query feature, no
            // stored vector below can still contain it.
            Ordering::Greater => break,
        }
    }
    // Entries ending at this node lack the query feature entirely, so the
    // query cannot subsume them.
}

/// Collect every entry in the subtree whose key the query really subsumes.
fn collect_verified<'a, F: Ord, V>(
    node: &'a TrieNode<F, V>,
    query: &CNFClause,
    out: &mut Vec<(&'a CNFClause, &'a V)>,
) {
    for (key, value) in &node.entries {
        if query.subsumes(key) {
            out.push((key, value));
        }
    }
    for child in node.children.values() {
        collect_verified(child, query, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Literal, Predicate, Term};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn clause(literals: Vec<(bool, &str, Vec<Term>)>) -> CNFClause {
        CNFClause::new(
            literals
                .into_iter()
                .map(|(polarity, name, args)| {
                    let predicate = Predicate::new(name, args);
                    if polarity {
                        Literal::positive(predicate)
                    } else {
                        Literal::negative(predicate)
                    }
                })
                .collect(),
        )
    }

    fn p_a() -> CNFClause {
        clause(vec![(true, "P", vec![Term::constant("a")])])
    }

    fn p_a_q_b() -> CNFClause {
        clause(vec![
            (true, "P", vec![Term::constant("a")]),
            (true, "Q", vec![Term::constant("b")]),
        ])
    }

    #[test]
    fn test_add_get_remove() {
        let mut index = FeatureVectorIndex::with_default_features();
        assert!(index.add(p_a(), 1).unwrap());
        assert!(!index.add(p_a(), 2).unwrap());
        assert_eq!(index.len(), 1);

        assert_eq!(index.try_get(&p_a()), Some(&2));
        assert_eq!(index.try_get(&p_a_q_b()), None);

        assert_eq!(index.remove(&p_a()), Some(2));
        assert_eq!(index.remove(&p_a()), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_clause_rejected() {
        let mut index = FeatureVectorIndex::with_default_features();
        assert!(matches!(
            index.add(CNFClause::empty(), 0),
            Err(EntailError::InvalidArgument(_))
        ));
        assert!(matches!(
            index.try_replace_subsumed(CNFClause::empty(), 0),
            Err(EntailError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_get_subsuming_returns_both() {
        let mut index = FeatureVectorIndex::with_default_features();
        index.add(p_a(), 1).unwrap();
        index.add(p_a_q_b(), 2).unwrap();

        let subsuming = index.get_subsuming(&p_a_q_b());
        assert_eq!(subsuming.len(), 2);
    }

    #[test]
    fn test_get_subsumed_returns_both() {
        let mut index = FeatureVectorIndex::with_default_features();
        index.add(p_a(), 1).unwrap();
        index.add(p_a_q_b(), 2).unwrap();

        let subsumed = index.get_subsumed(&p_a());
        assert_eq!(subsumed.len(), 2);

        // The larger clause subsumes only itself
        let subsumed = index.get_subsumed(&p_a_q_b());
        assert_eq!(subsumed.len(), 1);
    }

    #[test]
    fn test_vector_candidates_are_verified() {
        // Q(a,a) and Q(a,b) share a feature vector but neither subsumes
        // the other
        let qaa = clause(vec![(
            true,
            "Q",
            vec![Term::constant("a"), Term::constant("a")],
        )]);
        let qab = clause(vec![(
            true,
            "Q",
            vec![Term::constant("a"), Term::constant("b")],
        )]);

        let mut index = FeatureVectorIndex::with_default_features();
        index.add(qaa.clone(), 1).unwrap();

        let subsuming = index.get_subsuming(&qab);
        assert!(subsuming.is_empty());

        // A variable generalisation subsumes both
        let qxy = clause(vec![(
            true,
            "Q",
            vec![Term::variable("x"), Term::variable("y")],
        )]);
        index.add(qxy, 2).unwrap();
        assert_eq!(index.get_subsuming(&qab).len(), 1);
        assert_eq!(index.get_subsuming(&qaa).len(), 2);
    }

    #[test]
    fn test_try_replace_subsumed() {
        let mut index = FeatureVectorIndex::with_default_features();
        index.add(p_a_q_b(), 1).unwrap();

        // {P(a)} subsumes the stored clause: it is evicted and replaced
        assert!(index.try_replace_subsumed(p_a(), 2).unwrap());
        assert_eq!(index.len(), 1);
        assert_eq!(index.try_get(&p_a()), Some(&2));
        assert_eq!(index.try_get(&p_a_q_b()), None);

        // The evicted clause cannot come back: {P(a)} subsumes it
        assert!(!index.try_replace_subsumed(p_a_q_b(), 3).unwrap());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_subsumed_prunes() {
        let mut index = FeatureVectorIndex::with_default_features();
        index.add(p_a_q_b(), 1).unwrap();
        index.add(
            clause(vec![(true, "R", vec![Term::constant("c")])]),
            2,
        )
        .unwrap();

        let removed = index.remove_subsumed(&p_a());
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].0, p_a_q_b());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_events_fire_on_confirmed_mutations() {
        let added: Rc<RefCell<Vec<CNFClause>>> = Rc::new(RefCell::new(vec![]));
        let removed: Rc<RefCell<Vec<CNFClause>>> = Rc::new(RefCell::new(vec![]));

        let mut index = FeatureVectorIndex::with_default_features();
        let added_log = Rc::clone(&added);
        index.on_key_added(move |key| added_log.borrow_mut().push(key.clone()));
        let removed_log = Rc::clone(&removed);
        index.on_key_removed(move |key| removed_log.borrow_mut().push(key.clone()));

        index.add(p_a(), 1).unwrap();
        index.add(p_a(), 2).unwrap(); // value replaced, key not new
        assert_eq!(added.borrow().len(), 1);

        index.remove(&p_a());
        index.remove(&p_a());
        assert_eq!(removed.borrow().len(), 1);
    }

    #[test]
    fn test_iteration_is_deterministic() {
        let mut a = FeatureVectorIndex::with_default_features();
        let mut b = FeatureVectorIndex::with_default_features();
        let clauses = vec![
            p_a(),
            p_a_q_b(),
            clause(vec![(false, "P", vec![Term::variable("x")])]),
            clause(vec![(true, "R", vec![])]),
        ];
        for (i, c) in clauses.iter().enumerate() {
            a.add(c.clone(), i).unwrap();
        }
        for (i, c) in clauses.iter().enumerate().rev() {
            b.add(c.clone(), i).unwrap();
        }

        let keys_a: Vec<&CNFClause> = a.iter().map(|(k, _)| k).collect();
        let keys_b: Vec<&CNFClause> = b.iter().map(|(k, _)| k).collect();
        // Trie order depends only on the vectors, not insertion order
        assert_eq!(keys_a, keys_b);
    }

    #[test]
    fn test_open_feature_universe() {
        // Clauses with entirely disjoint predicates coexist; queries only
        // see the relevant region of the trie
        let mut index = FeatureVectorIndex::with_default_features();
        index.add(clause(vec![(true, "A", vec![])]), 1).unwrap();
        index.add(clause(vec![(true, "Z", vec![])]), 2).unwrap();

        let q = clause(vec![(true, "A", vec![]), (true, "Z", vec![])]);
        assert_eq!(index.get_subsuming(&q).len(), 2);
        assert_eq!(index.get_subsumed(&clause(vec![(true, "A", vec![])])).len(), 1);
    }
}
