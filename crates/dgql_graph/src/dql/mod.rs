//! DQL subset understood by the in-process graph.
//!
//! ```text
//! query   := [ "query" [NAME] "(" { VAR ":" TYPE [","] } ")" ] "{" block+ "}"
//! block   := NAME "(" "func" ":" func ")" "{" field* "}"
//! func    := "eq" "(" PRED "," value ")" | "uid" "(" value ")"
//!          | "has" "(" PRED ")" | "type" "(" NAME ")"
//! value   := VAR | STRING | UIDLIT
//! field   := PRED [ "{" field* "}" ]
//! ```

mod eval;
mod lexer;
mod parser;

pub(crate) use eval::evaluate;
pub(crate) use parser::parse;
