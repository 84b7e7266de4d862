//! Text parsing for logic programs and the simplified string interface.
//!
//! The grammar is deliberately tiny: an atom is a lowercase-led identifier,
//! a variable is an uppercase-led identifier, and a compound term is
//! `functor(term, ...)`. A program is a sequence of `fact(...)`,
//! `rule(conclusion, body)` and `query(...)` terms. All characters outside
//! the grammar alphabet (whitespace, digits, punctuation) are stripped
//! before parsing, so `fact( natural( zero ) )` and `fact(natural(zero))`
//! are the same program.
//!
//! The engine itself never parses text; this module is the only place the
//! textual `?name` convention and the term representation meet.

use crate::engine::{qeval, Assertion, Database, Rule};
use crate::stream::Stream;
use crate::term::{extract_variables, Frame, Term};
use crate::unify::instantiate;
use nom::branch::alt;
use nom::bytes::complete::take_while;
use nom::character::complete::{char, satisfy};
use nom::combinator::{all_consuming, map, recognize};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair};
use nom::IResult;
use std::fmt::Write as _;
use std::rc::Rc;
use thiserror::Error;

/// Parse failures for program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not form a valid sequence of terms.
    #[error("invalid program syntax")]
    InvalidProgram,
}

fn ident_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn atom_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_lowercase()),
        take_while(ident_char),
    ))(input)
}

fn variable_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_uppercase()),
        take_while(ident_char),
    ))(input)
}

fn atom(input: &str) -> IResult<&str, Term> {
    map(atom_name, |name: &str| Term::Atom(name.to_string()))(input)
}

fn variable(input: &str) -> IResult<&str, Term> {
    map(variable_name, |name: &str| Term::Var(name.to_string()))(input)
}

fn compound(input: &str) -> IResult<&str, Term> {
    map(
        pair(
            atom_name,
            delimited(char('('), separated_list1(char(','), term), char(')')),
        ),
        |(head, args)| {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(Term::Atom(head.to_string()));
            items.extend(args);
            Term::Compound(items)
        },
    )(input)
}

fn term(input: &str) -> IResult<&str, Term> {
    alt((compound, atom, variable))(input)
}

/// Parses a whole program into its sequence of terms.
///
/// # Errors
///
/// Returns [`ParseError::InvalidProgram`] when the sanitized input is not a
/// valid sequence of terms.
pub fn parse_program(input: &str) -> Result<Vec<Term>, ParseError> {
    let sanitized: String = input
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '(' | ')' | ','))
        .collect();
    match all_consuming(many0(term))(sanitized.as_str()) {
        Ok((_, terms)) => Ok(terms),
        Err(_) => Err(ParseError::InvalidProgram),
    }
}

/// Parses exactly one term.
///
/// # Errors
///
/// Returns [`ParseError::InvalidProgram`] when the input is not exactly one
/// valid term.
pub fn parse_term(input: &str) -> Result<Term, ParseError> {
    let mut terms = parse_program(input)?;
    if terms.len() == 1 {
        Ok(terms.remove(0))
    } else {
        Err(ParseError::InvalidProgram)
    }
}

/// Runs a whole textual program and renders its query answers.
///
/// Facts and rules are loaded into a fresh database in program order; each
/// `query(...)` reports whether it has a solution and then the bindings of
/// its variables for up to `max_solutions` answers. Terms that are not
/// `fact`/`rule`/`query` commands are ignored, matching the interactive
/// interpreter's behavior.
///
/// # Errors
///
/// Returns [`ParseError::InvalidProgram`] when the program text cannot be
/// parsed.
pub fn solve(program: &str, max_solutions: usize) -> Result<String, ParseError> {
    let terms = parse_program(program)?;
    let db = Rc::new(Database::new());
    let mut output = String::new();

    for term in &terms {
        let Term::Compound(items) = term else { continue };
        let Some(Term::Atom(head)) = items.first() else {
            continue;
        };
        match (head.as_str(), &items[1..]) {
            ("fact", [fact]) => db.add_assertion(Assertion::new(fact.clone())),
            ("rule", [conclusion, body]) => {
                db.add_rule(Rule::new(conclusion.clone(), body.clone()));
            }
            ("query", [goal]) => {
                if !output.is_empty() {
                    output.push_str("\n############################\n\n");
                }
                let results = qeval(&db, goal, Stream::singleton(Frame::empty()));
                if results.is_empty() {
                    output.push_str("No Solution\n");
                } else {
                    output.push_str("Has a solution\n");
                }
                let variables = extract_variables(goal);
                results.take(max_solutions).for_each(|frame| {
                    output.push_str("Variables:\n");
                    for name in &variables {
                        let value = instantiate(&Term::var(name.as_str()), frame);
                        let _ = writeln!(output, "{name} = {}", value.functor_form());
                    }
                });
            }
            _ => {}
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_atom() {
        assert_eq!(parse_term("zero"), Ok(Term::atom("zero")));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_term("X"), Ok(Term::var("X")));
        assert_eq!(parse_term("Xy_z"), Ok(Term::var("Xy_z")));
    }

    #[test]
    fn test_parse_compound() {
        assert_eq!(
            parse_term("plus(zero,X)"),
            Ok(Term::functor("plus", vec![Term::atom("zero"), Term::var("X")]))
        );
    }

    #[test]
    fn test_parse_nested_compound() {
        assert_eq!(
            parse_term("natural(s(s(zero)))"),
            Ok(Term::functor(
                "natural",
                vec![Term::functor("s", vec![Term::functor("s", vec![Term::atom("zero")])])]
            ))
        );
    }

    #[test]
    fn test_parse_program_sequences_terms() {
        let terms = parse_program("fact(natural(zero)) query(natural(X))")
            .expect("program should parse");
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn test_non_grammar_characters_are_stripped() {
        assert_eq!(
            parse_term("  natural42( zero )!  "),
            Ok(Term::functor("natural", vec![Term::atom("zero")]))
        );
    }

    #[test]
    fn test_parse_empty_program() {
        assert_eq!(parse_program(""), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_rejects_unbalanced_parens() {
        assert_eq!(parse_program("fact(natural(zero)"), Err(ParseError::InvalidProgram));
    }

    #[test]
    fn test_parse_rejects_leading_delimiter() {
        assert_eq!(parse_program("(zero)"), Err(ParseError::InvalidProgram));
    }

    #[test]
    fn test_parse_rejects_empty_argument_list() {
        assert_eq!(parse_program("foo(,)"), Err(ParseError::InvalidProgram));
    }

    #[test]
    fn test_solve_enumerates_naturals() {
        let program = "fact(natural(zero)) rule(natural(s(X)), natural(X)) query(natural(X))";
        let output = solve(program, 3).expect("program should run");
        assert_eq!(
            output,
            "Has a solution\n\
             Variables:\nX = zero\n\
             Variables:\nX = s(zero)\n\
             Variables:\nX = s(s(zero))\n"
        );
    }

    #[test]
    fn test_solve_reports_no_solution() {
        let output = solve("query(natural(foo))", 5).expect("program should run");
        assert_eq!(output, "No Solution\n");
    }

    #[test]
    fn test_solve_separates_multiple_queries() {
        let program = "fact(likes(alice,pizza)) query(likes(alice,X)) query(likes(bob,X))";
        let output = solve(program, 5).expect("program should run");
        assert!(output.contains("############################"));
        assert!(output.contains("X = pizza"));
        assert!(output.contains("No Solution"));
    }

    #[test]
    fn test_solve_propagates_parse_errors() {
        assert_eq!(solve("fact((", 5), Err(ParseError::InvalidProgram));
    }
}
