//! Query evaluation over a transaction view.

use super::parser::{Field, Func, Operand, Query};
use crate::backend::Vars;
use crate::error::{GraphError, GraphResult};
use crate::memory::graph::{scalar_matches, Edge, Node, View, TYPE_PREDICATE};
use crate::uid::Uid;
use serde_json::{Map, Value};

/// Evaluates a parsed query and returns `{ "<block>": [ ... ] }`.
pub(crate) fn evaluate(query: &Query, view: &View<'_>, vars: &Vars) -> GraphResult<Value> {
    for name in query.used_vars() {
        let declared = query
            .declared
            .as_ref()
            .is_some_and(|declared| declared.iter().any(|d| d == name));
        if !declared || !vars.contains_key(&format!("${name}")) {
            return Err(GraphError::UnknownVariable {
                name: name.to_owned(),
            });
        }
    }

    let mut out = Map::new();
    for block in &query.blocks {
        let items = roots(&block.func, view, vars)?
            .into_iter()
            .filter_map(|uid| view.node(uid).map(|node| project(view, uid, node, &block.fields)))
            .collect();
        out.insert(block.name.clone(), Value::Array(items));
    }
    Ok(Value::Object(out))
}

fn operand<'v>(operand: &'v Operand, vars: &'v Vars) -> GraphResult<&'v str> {
    match operand {
        Operand::Literal(value) => Ok(value.as_str()),
        Operand::Var(name) => vars
            .get(&format!("${name}"))
            .map(String::as_str)
            .ok_or_else(|| GraphError::UnknownVariable { name: name.clone() }),
    }
}

fn roots(func: &Func, view: &View<'_>, vars: &Vars) -> GraphResult<Vec<Uid>> {
    Ok(match func {
        Func::Eq { predicate, value } => {
            let value = operand(value, vars)?;
            select(view, |node| {
                node.scalars
                    .get(predicate)
                    .is_some_and(|v| scalar_matches(v, value))
            })
        }
        Func::Uid(value) => {
            let uid: Uid = operand(value, vars)?.parse()?;
            view.node(uid).map(|_| vec![uid]).unwrap_or_default()
        }
        Func::Has(predicate) => select(view, |node| node.has(predicate)),
        Func::Type(name) => select(view, |node| {
            node.scalars
                .get(TYPE_PREDICATE)
                .is_some_and(|v| scalar_matches(v, name))
        }),
    })
}

fn select(view: &View<'_>, keep: impl Fn(&Node) -> bool) -> Vec<Uid> {
    view.uids()
        .into_iter()
        .filter(|&uid| view.node(uid).is_some_and(&keep))
        .collect()
}

fn project(view: &View<'_>, uid: Uid, node: &Node, fields: &[Field]) -> Value {
    let mut out = Map::new();
    for field in fields {
        let predicate = field.predicate.as_str();
        if predicate == "uid" {
            out.insert("uid".into(), Value::String(uid.to_string()));
        } else if let Some(value) = node.scalars.get(predicate) {
            out.insert(predicate.into(), value.clone());
        } else if let Some(edge) = node.edges.get(predicate) {
            let render = |target: Uid| -> Option<Value> {
                let target_node = view.node(target)?;
                Some(match &field.fields {
                    Some(nested) => project(view, target, target_node, nested),
                    None => serde_json::json!({ "uid": target.to_string() }),
                })
            };
            match edge {
                Edge::One(target) => {
                    if let Some(value) = render(*target) {
                        out.insert(predicate.into(), value);
                    }
                }
                Edge::Many(targets) => {
                    let items: Vec<Value> = targets.iter().filter_map(|&t| render(t)).collect();
                    if !items.is_empty() {
                        out.insert(predicate.into(), Value::Array(items));
                    }
                }
            }
        }
    }
    Value::Object(out)
}
