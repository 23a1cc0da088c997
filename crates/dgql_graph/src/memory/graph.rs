//! Node storage and mutation application.

use crate::backend::Assigned;
use crate::error::{GraphError, GraphResult};
use crate::uid::Uid;
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Predicate holding a node's type name, as in Dgraph.
pub(crate) const TYPE_PREDICATE: &str = "dgraph.type";

/// Node storage, ordered by uid.
pub(crate) type Nodes = BTreeMap<Uid, Node>;

/// A stored node.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Node {
    pub scalars: BTreeMap<String, Value>,
    pub edges: BTreeMap<String, Edge>,
}

impl Node {
    pub(crate) fn has(&self, predicate: &str) -> bool {
        self.scalars.contains_key(predicate) || self.edges.contains_key(predicate)
    }
}

/// An outgoing edge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Edge {
    /// Set from a nested object; rendered as an object.
    One(Uid),
    /// Set from an array; rendered as an array.
    Many(Vec<Uid>),
}

/// Read view of a transaction: committed nodes overlaid with staged ones.
pub(crate) struct View<'a> {
    committed: &'a Nodes,
    staged: &'a Nodes,
}

impl<'a> View<'a> {
    pub(crate) fn new(committed: &'a Nodes, staged: &'a Nodes) -> Self {
        Self { committed, staged }
    }

    pub(crate) fn node(&self, uid: Uid) -> Option<&'a Node> {
        self.staged.get(&uid).or_else(|| self.committed.get(&uid))
    }

    /// All visible uids, ascending.
    pub(crate) fn uids(&self) -> BTreeSet<Uid> {
        self.committed
            .keys()
            .chain(self.staged.keys())
            .copied()
            .collect()
    }
}

/// Compares a stored scalar with a query value.
pub(crate) fn scalar_matches(value: &Value, text: &str) -> bool {
    match value {
        Value::String(s) => s == text,
        Value::Number(n) => n.to_string() == text,
        Value::Bool(b) => b.to_string() == text,
        _ => false,
    }
}

/// Applies one set-payload to a copy of a transaction's staged nodes.
///
/// The first write to a committed node stages a copy of it and records
/// that copy in `bases`, so the commit can tell this transaction's
/// changes apart from the node's state at the time.
pub(crate) struct Applier<'a> {
    committed: &'a Nodes,
    staged: &'a mut Nodes,
    bases: &'a mut Nodes,
    next_uid: &'a AtomicU64,
    blanks: Assigned,
    touched: BTreeSet<Uid>,
}

impl<'a> Applier<'a> {
    pub(crate) fn new(
        committed: &'a Nodes,
        staged: &'a mut Nodes,
        bases: &'a mut Nodes,
        next_uid: &'a AtomicU64,
    ) -> Self {
        Self {
            committed,
            staged,
            bases,
            next_uid,
            blanks: Assigned::new(),
            touched: BTreeSet::new(),
        }
    }

    /// Applies the payload; returns the blank-node assignments and the
    /// uids whose predicates were written.
    pub(crate) fn apply(mut self, payload: &Value) -> GraphResult<(Assigned, BTreeSet<Uid>)> {
        match payload {
            Value::Array(items) => {
                for item in items {
                    self.node(item)?;
                }
            }
            Value::Object(_) => {
                self.node(payload)?;
            }
            _ => {
                return Err(GraphError::malformed(
                    "set payload must be an object or an array of objects",
                ))
            }
        }
        Ok((self.blanks, self.touched))
    }

    fn node(&mut self, value: &Value) -> GraphResult<Uid> {
        let Value::Object(map) = value else {
            return Err(GraphError::malformed(format!("expected an object, got {value}")));
        };

        let uid = match map.get("uid") {
            None => self.allocate(),
            Some(Value::String(reference)) => self.resolve(reference)?,
            Some(other) => {
                return Err(GraphError::malformed(format!("uid must be a string, got {other}")))
            }
        };

        for (predicate, value) in map {
            if predicate == "uid" {
                continue;
            }
            match value {
                Value::Null => {}
                Value::Object(_) => {
                    let target = self.node(value)?;
                    self.node_mut(uid)
                        .edges
                        .insert(predicate.clone(), Edge::One(target));
                }
                Value::Array(items) => {
                    let mut targets = Vec::with_capacity(items.len());
                    for item in items {
                        if !item.is_object() {
                            return Err(GraphError::malformed(format!(
                                "list predicate {predicate} must hold objects"
                            )));
                        }
                        let target = self.node(item)?;
                        if !targets.contains(&target) {
                            targets.push(target);
                        }
                    }
                    let node = self.node_mut(uid);
                    match node.edges.entry(predicate.clone()) {
                        Entry::Occupied(mut entry) => {
                            let edge = entry.get_mut();
                            if let Edge::Many(existing) = edge {
                                for target in targets {
                                    if !existing.contains(&target) {
                                        existing.push(target);
                                    }
                                }
                            } else {
                                *edge = Edge::Many(targets);
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(Edge::Many(targets));
                        }
                    }
                }
                scalar => {
                    self.node_mut(uid)
                        .scalars
                        .insert(predicate.clone(), scalar.clone());
                }
            }
        }

        Ok(uid)
    }

    fn resolve(&mut self, reference: &str) -> GraphResult<Uid> {
        if let Some(name) = reference.strip_prefix("_:") {
            if name.is_empty() {
                return Err(GraphError::malformed("blank node name is empty"));
            }
            if let Some(uid) = self.blanks.get(name) {
                return Ok(*uid);
            }
            let uid = self.allocate();
            self.blanks.insert(name.to_owned(), uid);
            return Ok(uid);
        }

        let uid: Uid = reference.parse()?;
        if self.staged.contains_key(&uid) || self.committed.contains_key(&uid) {
            Ok(uid)
        } else {
            Err(GraphError::UnknownUid(uid))
        }
    }

    fn allocate(&mut self) -> Uid {
        let uid = Uid::new(self.next_uid.fetch_add(1, Ordering::SeqCst));
        self.staged.insert(uid, Node::default());
        self.touched.insert(uid);
        uid
    }

    fn node_mut(&mut self, uid: Uid) -> &mut Node {
        self.touched.insert(uid);
        match self.staged.entry(uid) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let base = self.committed.get(&uid).cloned();
                if let Some(base) = &base {
                    self.bases.insert(uid, base.clone());
                }
                entry.insert(base.unwrap_or_default())
            }
        }
    }
}

/// Turns a transaction's staged nodes into the nodes to write at commit.
///
/// Nodes created by the transaction are written as staged. A staged copy
/// of a committed node is replayed onto the node as committed now: scalars
/// and single edges the transaction changed are set, list-edge targets it
/// added are appended. Writes committed by other transactions since the
/// copy was taken are kept; for the same scalar the later commit wins.
pub(crate) fn rebase(committed: &Nodes, staged: Nodes, bases: &Nodes) -> Nodes {
    staged
        .into_iter()
        .map(|(uid, node)| match (bases.get(&uid), committed.get(&uid)) {
            (Some(base), Some(current)) => {
                let mut merged = current.clone();
                replay(&mut merged, base, &node);
                (uid, merged)
            }
            _ => (uid, node),
        })
        .collect()
}

fn replay(current: &mut Node, base: &Node, staged: &Node) {
    for (predicate, value) in &staged.scalars {
        if base.scalars.get(predicate) != Some(value) {
            current.scalars.insert(predicate.clone(), value.clone());
        }
    }

    for (predicate, edge) in &staged.edges {
        match edge {
            Edge::One(_) => {
                if base.edges.get(predicate) != Some(edge) {
                    current.edges.insert(predicate.clone(), edge.clone());
                }
            }
            Edge::Many(targets) => {
                let before: &[Uid] = match base.edges.get(predicate) {
                    Some(Edge::Many(before)) => before.as_slice(),
                    _ => &[],
                };
                let added = targets.iter().filter(|t| !before.contains(*t));
                match current.edges.get_mut(predicate) {
                    Some(Edge::Many(existing)) => {
                        for &target in added {
                            if !existing.contains(&target) {
                                existing.push(target);
                            }
                        }
                    }
                    _ => {
                        current.edges.insert(predicate.clone(), edge.clone());
                    }
                }
            }
        }
    }
}

/// Finds the first unique predicate that `candidates` share with another node.
pub(crate) fn unique_violation(
    view: &View<'_>,
    unique: &[String],
    candidates: impl IntoIterator<Item = Uid>,
) -> Option<GraphError> {
    let all = view.uids();
    for uid in candidates {
        let Some(node) = view.node(uid) else { continue };
        for predicate in unique {
            let Some(value) = node.scalars.get(predicate) else {
                continue;
            };
            let duplicate = all.iter().any(|&other| {
                other != uid
                    && view
                        .node(other)
                        .and_then(|n| n.scalars.get(predicate))
                        .is_some_and(|v| v == value)
            });
            if duplicate {
                return Some(GraphError::UniqueViolation {
                    predicate: predicate.clone(),
                    value: match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                });
            }
        }
    }
    None
}
