//! Keyed reconciliation of scene nodes.
//!
//! A render pass produces an ordered list of desired items; [`reconcile`]
//! diffs their keys against the keys already in the scene and
//! [`KeyedNodes::apply`] creates, updates and removes nodes to match.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Outcome of diffing existing keys against desired items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<K> {
    /// Indices into the desired items that need new nodes.
    pub enter: Vec<usize>,
    /// Indices into the desired items whose nodes already exist.
    pub update: Vec<usize>,
    /// Existing keys no longer wanted.
    pub exit: Vec<K>,
}

/// Diff `existing` keys against `desired` items.
///
/// When several desired items share a key only the first is kept.
pub fn reconcile<T, K, F>(existing: &[K], desired: &[T], key_fn: F) -> Reconciliation<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let existing_set: HashSet<&K> = existing.iter().collect();
    let mut seen: HashSet<K> = HashSet::with_capacity(desired.len());
    let mut enter = Vec::new();
    let mut update = Vec::new();

    for (i, item) in desired.iter().enumerate() {
        let key = key_fn(item);
        if !seen.insert(key.clone()) {
            continue;
        }
        if existing_set.contains(&key) {
            update.push(i);
        } else {
            enter.push(i);
        }
    }

    let exit = existing
        .iter()
        .filter(|k| !seen.contains(*k))
        .cloned()
        .collect();

    Reconciliation {
        enter,
        update,
        exit,
    }
}

/// Counts from one [`KeyedNodes::apply`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// An ordered collection of retained nodes, each with a string key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedNodes<N> {
    nodes: Vec<(String, N)>,
}

impl<N> Default for KeyedNodes<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N> KeyedNodes<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.nodes.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&N> {
        self.nodes.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().map(|(_, n)| n)
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.nodes.len();
        self.nodes.clear();
        removed
    }

    /// Bring the collection in line with `desired`.
    ///
    /// Existing nodes are updated in place and keep their identity, new keys
    /// get fresh nodes, stale keys are dropped. The final order follows
    /// `desired`.
    pub fn apply<T, KF, C, U>(
        &mut self,
        desired: &[T],
        key_fn: KF,
        mut create: C,
        mut update: U,
    ) -> ApplyStats
    where
        KF: Fn(&T) -> String,
        C: FnMut(&T) -> N,
        U: FnMut(&mut N, &T),
    {
        let diff = reconcile(&self.keys(), desired, &key_fn);
        let stats = ApplyStats {
            entered: diff.enter.len(),
            updated: diff.update.len(),
            exited: diff.exit.len(),
        };

        let mut old: HashMap<String, N> = self.nodes.drain(..).collect();
        let mut keep: Vec<usize> = diff.enter.iter().chain(diff.update.iter()).copied().collect();
        keep.sort_unstable();

        for i in keep {
            let item = &desired[i];
            let key = key_fn(item);
            let node = match old.remove(&key) {
                Some(mut node) => {
                    update(&mut node, item);
                    node
                }
                None => create(item),
            };
            self.nodes.push((key, node));
        }

        stats
    }
}
