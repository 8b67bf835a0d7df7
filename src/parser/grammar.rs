//! Number list grammar using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::SyntaxError;
use crate::parser::lexer::{self, Describe, ListToken};

/// Parse a comma/whitespace separated list of numbers
pub fn parse_number_list(input: &str) -> Result<Vec<f64>, SyntaxError> {
    let len = input.len();
    let token_iter = lexer::lex_list(input)?
        .into_iter()
        .map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    number_list_parser()
        .parse(token_stream)
        .into_result()
        .map_err(first_error)
}

fn first_error<T: Describe>(errors: Vec<Rich<'_, T>>) -> SyntaxError {
    errors
        .into_iter()
        .next()
        .map(SyntaxError::from)
        .unwrap_or_else(|| SyntaxError::new(0..0, "Invalid syntax"))
}

fn number_list_parser<'a, I>() -> impl Parser<'a, I, Vec<f64>, extra::Err<Rich<'a, ListToken>>> + Clone
where
    I: ValueInput<'a, Token = ListToken, Span = SimpleSpan>,
{
    select! { ListToken::Number(n) => n }
        .then_ignore(just(ListToken::Comma).or_not())
        .repeated()
        .collect::<Vec<f64>>()
        .then_ignore(end())
}
