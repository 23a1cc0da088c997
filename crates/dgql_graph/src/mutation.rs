//! Mutation payloads.

use serde::Serialize;
use serde_json::Value;

/// One mutation unit submitted to a transaction.
///
/// The payload is a JSON object or an array of objects:
///
/// - `"uid": "_:name"` creates a blank node, reported back under `name`
/// - `"uid": "0x1a"` addresses an existing node
/// - no `uid` creates an anonymous node
/// - scalar values set predicates, a nested object sets a single edge, an
///   array of objects appends to a list edge, `null` is ignored
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    set: Value,
}

impl Mutation {
    /// Creates a set-mutation from a JSON value.
    #[must_use]
    pub fn set(set: Value) -> Self {
        Self { set }
    }

    /// Creates a set-mutation by serializing `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn set_json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            set: serde_json::to_value(value)?,
        })
    }

    /// Returns the set payload.
    #[must_use]
    pub fn set_payload(&self) -> &Value {
        &self.set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Person {
        uid: &'static str,
        #[serde(rename = "Person.name")]
        name: &'static str,
    }

    #[test]
    fn set_json_serializes() {
        let m = Mutation::set_json(&Person {
            uid: "_:p",
            name: "ada",
        })
        .unwrap();
        assert_eq!(m.set_payload(), &json!({"uid": "_:p", "Person.name": "ada"}));
    }
}
