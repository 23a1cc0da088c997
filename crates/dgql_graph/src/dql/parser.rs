//! Recursive-descent parser for the DQL subset.

use super::lexer::{tokenize, Token, TokenKind};
use crate::error::{GraphError, GraphResult};

/// A parsed query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Query {
    /// Variables declared in the `query name(...)` header, if there is one.
    pub declared: Option<Vec<String>>,
    /// Result blocks, in source order.
    pub blocks: Vec<Block>,
}

/// One named result block.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Block {
    pub name: String,
    pub func: Func,
    pub fields: Vec<Field>,
}

/// Root function selecting the nodes of a block.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Func {
    Eq { predicate: String, value: Operand },
    Uid(Operand),
    Has(String),
    Type(String),
}

/// A literal or a `$variable`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Var(String),
    Literal(String),
}

/// A selected predicate, with a nested selection for edges.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub predicate: String,
    pub fields: Option<Vec<Field>>,
}

impl Query {
    /// Returns every variable referenced by a root function.
    pub(crate) fn used_vars(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match &block.func {
            Func::Eq {
                value: Operand::Var(name),
                ..
            }
            | Func::Uid(Operand::Var(name)) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Parses query text.
pub(crate) fn parse(src: &str) -> GraphResult<Query> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.query()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn unexpected<T>(&self, expected: &str) -> GraphResult<T> {
        let token = self.peek();
        Err(GraphError::syntax(
            token.offset,
            format!("expected {expected}, found {}", token.kind.describe()),
        ))
    }

    fn expect(&mut self, kind: TokenKind) -> GraphResult<()> {
        if self.peek().kind == kind {
            self.advance();
            Ok(())
        } else {
            self.unexpected(&kind.describe())
        }
    }

    fn name(&mut self) -> GraphResult<String> {
        match &self.peek().kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => self.unexpected("a name"),
        }
    }

    fn keyword(&mut self, keyword: &str) -> GraphResult<()> {
        match &self.peek().kind {
            TokenKind::Name(name) if name == keyword => {
                self.advance();
                Ok(())
            }
            _ => self.unexpected(&format!("'{keyword}'")),
        }
    }

    fn query(&mut self) -> GraphResult<Query> {
        let declared = match &self.peek().kind {
            TokenKind::Name(name) if name == "query" => {
                self.advance();
                Some(self.header()?)
            }
            _ => None,
        };

        self.expect(TokenKind::LBrace)?;
        let mut blocks = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            blocks.push(self.block()?);
        }
        if blocks.is_empty() {
            return self.unexpected("a query block");
        }
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Eof)?;

        Ok(Query { declared, blocks })
    }

    fn header(&mut self) -> GraphResult<Vec<String>> {
        // The operation name is optional.
        if matches!(self.peek().kind, TokenKind::Name(_)) {
            self.advance();
        }
        self.expect(TokenKind::LParen)?;
        let mut vars = Vec::new();
        loop {
            match &self.peek().kind {
                TokenKind::RParen => {
                    self.advance();
                    return Ok(vars);
                }
                TokenKind::Var(name) => {
                    vars.push(name.clone());
                    self.advance();
                    self.expect(TokenKind::Colon)?;
                    self.name()?;
                    if self.peek().kind == TokenKind::Comma {
                        self.advance();
                    }
                }
                _ => return self.unexpected("a variable declaration or ')'"),
            }
        }
    }

    fn block(&mut self) -> GraphResult<Block> {
        let name = self.name()?;
        self.expect(TokenKind::LParen)?;
        self.keyword("func")?;
        self.expect(TokenKind::Colon)?;
        let func = self.func()?;
        self.expect(TokenKind::RParen)?;
        let fields = self.selection()?;
        Ok(Block { name, func, fields })
    }

    fn func(&mut self) -> GraphResult<Func> {
        let offset = self.peek().offset;
        let name = self.name()?;
        self.expect(TokenKind::LParen)?;
        let func = match name.as_str() {
            "eq" => {
                let predicate = self.name()?;
                self.expect(TokenKind::Comma)?;
                let value = self.operand()?;
                Func::Eq { predicate, value }
            }
            "uid" => Func::Uid(self.operand()?),
            "has" => Func::Has(self.name()?),
            "type" => Func::Type(self.name()?),
            other => {
                return Err(GraphError::syntax(
                    offset,
                    format!("unknown function {other:?}"),
                ))
            }
        };
        self.expect(TokenKind::RParen)?;
        Ok(func)
    }

    fn operand(&mut self) -> GraphResult<Operand> {
        let operand = match &self.peek().kind {
            TokenKind::Var(name) => Operand::Var(name.clone()),
            TokenKind::Str(value) | TokenKind::Name(value) => Operand::Literal(value.clone()),
            _ => return self.unexpected("a value"),
        };
        self.advance();
        Ok(operand)
    }

    fn selection(&mut self) -> GraphResult<Vec<Field>> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            let predicate = self.name()?;
            let nested = if self.peek().kind == TokenKind::LBrace {
                Some(self.selection()?)
            } else {
                None
            };
            fields.push(Field {
                predicate,
                fields: nested,
            });
        }
        self.expect(TokenKind::RBrace)?;
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_nested_selection() {
        let query = parse(
            "query reactions($id: string) {
                post(func: eq(Post.id, $id)) {
                    uid
                    Post.reactions { uid Reaction.message }
                }
            }",
        )
        .unwrap();

        assert_eq!(query.declared, Some(vec!["id".to_string()]));
        assert_eq!(query.blocks.len(), 1);
        let block = &query.blocks[0];
        assert_eq!(block.name, "post");
        assert_eq!(
            block.func,
            Func::Eq {
                predicate: "Post.id".into(),
                value: Operand::Var("id".into()),
            }
        );
        assert_eq!(block.fields.len(), 2);
        assert_eq!(block.fields[1].fields.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn parses_multiple_blocks_without_header() {
        let query = parse(r#"{ a(func: uid(0x1)) { uid } b(func: type(User)) { User.id } }"#).unwrap();
        assert_eq!(query.declared, None);
        assert_eq!(query.blocks[0].func, Func::Uid(Operand::Literal("0x1".into())));
        assert_eq!(query.blocks[1].func, Func::Type("User".into()));
    }

    #[test]
    fn header_without_name() {
        let query = parse("query ($a: string, $b: string) { x(func: has(p)) { uid } }").unwrap();
        assert_eq!(query.declared, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn used_vars_lists_root_variables() {
        let query = parse("{ a(func: eq(p, $x)) { uid } b(func: uid($y)) { uid } }").unwrap();
        let vars: Vec<_> = query.used_vars().collect();
        assert_eq!(vars, vec!["x", "y"]);
    }

    #[test]
    fn rejects_unknown_function() {
        let err = parse("{ a(func: near(p, 1)) { uid } }").unwrap_err();
        assert!(err.to_string().contains("unknown function"));
    }

    #[test]
    fn rejects_empty_query_and_trailing_tokens() {
        assert!(parse("{ }").is_err());
        assert!(parse("{ a(func: has(p)) { uid } } extra").is_err());
        assert!(parse("{ a(func: has(p)) { uid }").is_err());
    }
}
