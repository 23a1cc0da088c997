//! Tokenizer for DQL query text.

use crate::error::{GraphError, GraphResult};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// Names, predicates and bare literals (`Reaction.id`, `0x1a`).
    Name(String),
    /// `$name`, stored without the sigil.
    Var(String),
    /// Double-quoted string literal, unescaped.
    Str(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Colon => "':'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Name(name) => format!("name {name:?}"),
            TokenKind::Var(name) => format!("variable ${name}"),
            TokenKind::Str(s) => format!("string {s:?}"),
            TokenKind::Eof => "end of query".into(),
        }
    }
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Splits query text into tokens. `#` starts a comment running to end of line.
pub(crate) fn tokenize(src: &str) -> GraphResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let single = match c {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            chars.next();
            tokens.push(Token { kind, offset });
            continue;
        }

        if c.is_whitespace() {
            chars.next();
        } else if c == '#' {
            while chars.next_if(|&(_, c)| c != '\n').is_some() {}
        } else if c == '"' {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some((_, '"')) => break,
                    Some((_, '\\')) => match chars.next() {
                        Some((_, '"')) => value.push('"'),
                        Some((_, '\\')) => value.push('\\'),
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((at, other)) => {
                            return Err(GraphError::syntax(at, format!("unknown escape \\{other}")))
                        }
                        None => return Err(GraphError::syntax(offset, "unterminated string")),
                    },
                    Some((_, other)) => value.push(other),
                    None => return Err(GraphError::syntax(offset, "unterminated string")),
                }
            }
            tokens.push(Token {
                kind: TokenKind::Str(value),
                offset,
            });
        } else if c == '$' {
            chars.next();
            let name = take_name(&mut chars);
            if name.is_empty() {
                return Err(GraphError::syntax(offset, "expected variable name after '$'"));
            }
            tokens.push(Token {
                kind: TokenKind::Var(name),
                offset,
            });
        } else if is_name_char(c) {
            let name = take_name(&mut chars);
            tokens.push(Token {
                kind: TokenKind::Name(name),
                offset,
            });
        } else {
            return Err(GraphError::syntax(offset, format!("unexpected character {c:?}")));
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: src.len(),
    });
    Ok(tokens)
}

fn take_name(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut name = String::new();
    while let Some((_, c)) = chars.next_if(|&(_, c)| is_name_char(c)) {
        name.push(c);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn punctuation_and_names() {
        assert_eq!(
            kinds("{ q(func: eq(Post.id, $id)) { uid } }"),
            vec![
                TokenKind::LBrace,
                TokenKind::Name("q".into()),
                TokenKind::LParen,
                TokenKind::Name("func".into()),
                TokenKind::Colon,
                TokenKind::Name("eq".into()),
                TokenKind::LParen,
                TokenKind::Name("Post.id".into()),
                TokenKind::Comma,
                TokenKind::Var("id".into()),
                TokenKind::RParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Name("uid".into()),
                TokenKind::RBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c""#),
            vec![TokenKind::Str("a\"b\\c".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("# leading\nuid # trailing"),
            vec![TokenKind::Name("uid".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn offsets_are_recorded() {
        let tokens = tokenize("  {").unwrap();
        assert_eq!(tokens[0].offset, 2);
    }

    #[test]
    fn unterminated_string_fails() {
        assert!(matches!(
            tokenize("\"open"),
            Err(GraphError::Syntax { offset: 0, .. })
        ));
    }

    #[test]
    fn stray_character_fails() {
        assert!(tokenize("{ @ }").is_err());
        assert!(tokenize("$").is_err());
    }
}
