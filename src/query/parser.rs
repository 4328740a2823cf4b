use nom::branch::alt;
use nom::bytes::complete::{escaped_transform, is_not, tag, take_while1};
use nom::character::complete::{char, multispace0, multispace1, none_of};
use nom::combinator::{map, opt, value};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, preceded};
use nom::IResult;

use crate::core::error::{Error, Result};
use crate::query::ast::BoolExpr;

fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn term(input: &str) -> IResult<&str, BoolExpr> {
    map(take_while1(is_term_char), |s: &str| BoolExpr::Term(s.to_lowercase()))(input)
}

fn phrase(input: &str) -> IResult<&str, BoolExpr> {
    let unescape = map(escaped_transform(none_of("\"\\"), '\\', alt((value('"', char('"')), value('\\', char('\\'))))), |s: String| s);
    let body = alt((unescape, map(is_not("\""), |s: &str| s.to_string())));
    map(delimited(char('"'), opt(body), char('"')), |content: Option<String>| {
        let words = content
            .unwrap_or_default()
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        BoolExpr::Phrase(words)
    })(input)
}

fn parenthesized(input: &str) -> IResult<&str, BoolExpr> {
    delimited(
        char('('),
        delimited(multispace0, or_expr, multispace0),
        char(')'),
    )(input)
}

fn primary(input: &str) -> IResult<&str, BoolExpr> {
    alt((parenthesized, phrase, term))(input)
}

fn unary(input: &str) -> IResult<&str, BoolExpr> {
    alt((
        map(preceded(tag("NOT"), preceded(multispace1, unary)), |e| BoolExpr::Not(Box::new(e))),
        primary,
    ))(input)
}

/// True if `input` starts with keyword `kw` followed by a word boundary
/// (so `"ORlando"` is not mistaken for the `OR` keyword).
fn starts_with_keyword(input: &str, kw: &str) -> bool {
    input
        .strip_prefix(kw)
        .map(|rest| rest.chars().next().map(|c| !is_term_char(c)).unwrap_or(true))
        .unwrap_or(false)
}

/// Separator between two `and_expr` operands: consumes an explicit `AND`
/// when present, otherwise treats adjacency as AND — but refuses to
/// consume when the next keyword is `OR`, leaving that to `or_expr`.
fn and_sep(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace1(input)?;
    if starts_with_keyword(rest, "OR") {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
    }
    if starts_with_keyword(rest, "AND") {
        let (rest, _) = tag("AND")(rest)?;
        let (rest, _) = multispace1(rest)?;
        return Ok((rest, ()));
    }
    Ok((rest, ()))
}

fn and_expr(input: &str) -> IResult<&str, BoolExpr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(and_sep, unary))(input)?;
    Ok((input, rest.into_iter().fold(first, |acc, next| BoolExpr::And(Box::new(acc), Box::new(next)))))
}

fn or_expr(input: &str) -> IResult<&str, BoolExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(delimited(multispace1, tag("OR"), multispace1), and_expr))(input)?;
    Ok((input, rest.into_iter().fold(first, |acc, next| BoolExpr::Or(Box::new(acc), Box::new(next)))))
}

/// Top-level entry point: parses the whole (trimmed) input as one
/// boolean expression. Returns a `Parse` error on trailing garbage or an
/// empty/unparseable query.
pub fn parse_boolean(input: &str) -> Result<BoolExpr> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::parse("empty boolean query"));
    }
    match delimited(multispace0, or_expr, multispace0)(trimmed) {
        Ok((remaining, expr)) if remaining.is_empty() => Ok(expr),
        Ok((remaining, _)) => Err(Error::parse(format!("unexpected trailing input: {remaining:?}"))),
        Err(e) => Err(Error::parse(format!("failed to parse boolean query: {e}"))),
    }
}

/// Returns true if the raw query string looks like it uses the boolean
/// grammar at all (used by the analyzer to pick a classification).
pub fn looks_boolean(input: &str) -> bool {
    let upper = input.to_uppercase();
    input.contains('"')
        || input.contains('(')
        || upper.split_whitespace().any(|w| w == "AND" || w == "OR" || w == "NOT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_term() {
        assert_eq!(parse_boolean("Rust").unwrap(), BoolExpr::Term("rust".to_string()));
    }

    #[test]
    fn parses_and_or_not_precedence() {
        let expr = parse_boolean("rust AND NOT python OR go").unwrap();
        // (rust AND (NOT python)) OR go
        match expr {
            BoolExpr::Or(l, r) => {
                assert_eq!(*r, BoolExpr::Term("go".to_string()));
                match *l {
                    BoolExpr::And(ll, rr) => {
                        assert_eq!(*ll, BoolExpr::Term("rust".to_string()));
                        assert_eq!(*rr, BoolExpr::Not(Box::new(BoolExpr::Term("python".to_string()))));
                    }
                    _ => panic!("expected AND on left of OR"),
                }
            }
            _ => panic!("expected top-level OR"),
        }
    }

    #[test]
    fn parses_quoted_phrase() {
        let expr = parse_boolean("\"rust programming\"").unwrap();
        assert_eq!(expr, BoolExpr::Phrase(vec!["rust".to_string(), "programming".to_string()]));
    }

    #[test]
    fn parses_parenthesized_grouping() {
        let expr = parse_boolean("(rust OR go) AND backend").unwrap();
        match expr {
            BoolExpr::And(l, r) => {
                assert_eq!(*r, BoolExpr::Term("backend".to_string()));
                assert!(matches!(*l, BoolExpr::Or(_, _)));
            }
            _ => panic!("expected top-level AND"),
        }
    }

    #[test]
    fn implicit_adjacency_is_and() {
        let expr = parse_boolean("rust programming").unwrap();
        assert_eq!(
            expr,
            BoolExpr::And(
                Box::new(BoolExpr::Term("rust".to_string())),
                Box::new(BoolExpr::Term("programming".to_string()))
            )
        );
    }

    #[test]
    fn empty_query_is_a_parse_error() {
        assert!(parse_boolean("   ").is_err());
    }

    #[test]
    fn looks_boolean_detects_operators_and_phrases() {
        assert!(looks_boolean("rust AND go"));
        assert!(looks_boolean("\"exact phrase\""));
        assert!(!looks_boolean("just some keywords"));
    }
}
