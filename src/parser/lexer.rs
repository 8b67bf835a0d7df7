//! Lexer for number lists (`viewBox`) using logos

use logos::Logos;

use crate::error::{Span, SyntaxError};

/// Human-readable token names for diagnostics
pub trait Describe {
    fn describe(&self) -> String;
}

/// Tokens of a comma/whitespace separated number list
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum ListToken {
    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[token(",")]
    Comma,
}

impl Describe for ListToken {
    fn describe(&self) -> String {
        match self {
            ListToken::Number(n) => format!("number {}", n),
            ListToken::Comma => "','".to_string(),
        }
    }
}

/// Lex a number list into tokens with spans
pub fn lex_list(input: &str) -> Result<Vec<(ListToken, Span)>, SyntaxError> {
    ListToken::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => {
                let text = input.get(span.clone()).unwrap_or_default();
                Err(SyntaxError::new(span, format!("Unexpected character '{}'", text)))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<ListToken> {
        lex_list(input)
            .expect("Should lex")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_numbers_and_commas() {
        assert_eq!(
            tokens("0,0 100, .5"),
            vec![
                ListToken::Number(0.0),
                ListToken::Comma,
                ListToken::Number(0.0),
                ListToken::Number(100.0),
                ListToken::Comma,
                ListToken::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_adjacent_signed_numbers() {
        assert_eq!(
            tokens("1-2+3"),
            vec![
                ListToken::Number(1.0),
                ListToken::Number(-2.0),
                ListToken::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_exponent_numbers() {
        assert_eq!(
            tokens("1e2 2.5E-1"),
            vec![ListToken::Number(100.0), ListToken::Number(0.25)]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex_list("0 0 $ 10").expect_err("Should fail");
        assert_eq!(err.span, 4..5);
        assert!(err.message.contains("'$'"));
    }
}
