//! Lexer for the script language.

use treelint_core::{ParseError, TextRange};

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    // Keywords
    Let,
    Const,
    Var,
    Function,
    If,
    Else,
    While,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Finally,
    Debugger,
    True,
    False,
    Null,

    // Names and literals
    Identifier,
    Number,
    Str,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,

    // Operators
    Assign,
    PlusAssign,
    MinusAssign,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    PlusPlus,
    MinusMinus,

    Eof,
}

/// A lexed token with its byte range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "var" => TokenKind::Var,
        "function" => TokenKind::Function,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "throw" => TokenKind::Throw,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "debugger" => TokenKind::Debugger,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => return None,
    })
}

/// Tokenizes `text`, skipping whitespace and `//` line comments.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];

        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Line comment
        if b == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        let start = pos;

        if b.is_ascii_alphabetic() || b == b'_' {
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            let word = &text[start..pos];
            let kind = keyword(word).unwrap_or(TokenKind::Identifier);
            tokens.push(Token {
                kind,
                range: TextRange::new(start, pos),
            });
            continue;
        }

        if b.is_ascii_digit() {
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos < bytes.len()
                && bytes[pos] == b'.'
                && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
            {
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                range: TextRange::new(start, pos),
            });
            continue;
        }

        if b == b'"' || b == b'\'' {
            let quote = b;
            pos += 1;
            loop {
                match bytes.get(pos) {
                    None | Some(b'\n') => {
                        return Err(ParseError::new(
                            "unterminated string literal",
                            TextRange::empty(start),
                        ));
                    }
                    Some(b'\\') => pos += 2,
                    Some(&c) if c == quote => {
                        pos += 1;
                        break;
                    }
                    Some(_) => pos += 1,
                }
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                range: TextRange::new(start, pos.min(bytes.len())),
            });
            continue;
        }

        // Operators and punctuation, longest match first.
        let rest = &text[pos..];
        let (kind, len) = if rest.starts_with("===") {
            (TokenKind::EqEqEq, 3)
        } else if rest.starts_with("!==") {
            (TokenKind::NotEqEq, 3)
        } else if rest.starts_with("==") {
            (TokenKind::EqEq, 2)
        } else if rest.starts_with("!=") {
            (TokenKind::NotEq, 2)
        } else if rest.starts_with("<=") {
            (TokenKind::LtEq, 2)
        } else if rest.starts_with(">=") {
            (TokenKind::GtEq, 2)
        } else if rest.starts_with("++") {
            (TokenKind::PlusPlus, 2)
        } else if rest.starts_with("--") {
            (TokenKind::MinusMinus, 2)
        } else if rest.starts_with("+=") {
            (TokenKind::PlusAssign, 2)
        } else if rest.starts_with("-=") {
            (TokenKind::MinusAssign, 2)
        } else {
            let kind = match b {
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b',' => TokenKind::Comma,
                b';' => TokenKind::Semi,
                b'=' => TokenKind::Assign,
                b'<' => TokenKind::Lt,
                b'>' => TokenKind::Gt,
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b'/' => TokenKind::Slash,
                b'!' => TokenKind::Bang,
                other => {
                    return Err(ParseError::new(
                        format!("unexpected character '{}'", other as char),
                        TextRange::new(pos, pos + 1),
                    ));
                }
            };
            (kind, 1)
        };

        tokens.push(Token {
            kind,
            range: TextRange::new(pos, pos + len),
        });
        pos += len;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        range: TextRange::empty(text.len()),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            kinds("let x = 1;"),
            [
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("a === b == c = d"),
            [
                TokenKind::Identifier,
                TokenKind::EqEqEq,
                TokenKind::Identifier,
                TokenKind::EqEq,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("x++ + ++y"),
            [
                TokenKind::Identifier,
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::PlusPlus,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(
            kinds("x; // treelint-disable-line\ny;"),
            [
                TokenKind::Identifier,
                TokenKind::Semi,
                TokenKind::Identifier,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literals_with_escapes() {
        let tokens = tokenize(r#"let s = "a\"b";"#).unwrap();
        let s = tokens.iter().find(|t| t.kind == TokenKind::Str).unwrap();
        assert_eq!(s.range, TextRange::new(8, 14));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(tokenize("let s = \"oops;").is_err());
        assert!(tokenize("let s = \"oops\nnext;").is_err());
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let err = tokenize("let x = @;").unwrap_err();
        assert!(err.message.contains('@'));
        assert_eq!(err.range.start(), 8);
    }

    #[test]
    fn number_with_fraction() {
        let tokens = tokenize("1.25").unwrap();
        assert_eq!(tokens[0].range, TextRange::new(0, 4));
    }

    #[test]
    fn ranges_cover_source_exactly() {
        let text = "while (x <= 10) { x += 1; }";
        for token in tokenize(text).unwrap() {
            if token.kind != TokenKind::Eof {
                let slice = &text[token.range.start()..token.range.end()];
                assert!(!slice.is_empty());
                assert!(!slice.contains(' '));
            }
        }
    }
}
