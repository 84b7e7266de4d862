//! # Streamlog
//!
//! A minimal stream-driven Prolog-like inference engine in Rust.
//!
//! ## Features
//!
//! - Facts and rules over symbolic term trees, queried through unification
//!   and backtracking search
//! - Answers delivered as a lazy, possibly-infinite, memoizing stream of
//!   variable bindings, with fair interleaving of disjunctive branches
//! - Optional text parser and a simple interactive interpreter (feature
//!   `parsing`)
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use streamlog::{qeval, Assertion, Database, Frame, Rule, Stream, Term};
//!
//! let db = Rc::new(Database::new());
//! db.add_assertion(Assertion::new(Term::functor("natural", vec![Term::atom("zero")])));
//! db.add_rule(Rule::new(
//!     Term::functor("natural", vec![Term::functor("s", vec![Term::var("x")])]),
//!     Term::functor("natural", vec![Term::var("x")]),
//! ));
//!
//! // Enumerate the first three naturals: zero, s(zero), s(s(zero)).
//! let goal = Term::functor("natural", vec![Term::var("n")]);
//! let answers = qeval(&db, &goal, Stream::singleton(Frame::empty()));
//! assert_eq!(answers.take(3).to_vec().len(), 3);
//! ```

/// Database storage and the query evaluator.
pub mod engine;
/// Lazy, memoizing sequences.
pub mod stream;
/// Terms and substitution frames.
pub mod term;
/// Pattern matching and unification.
pub mod unify;

/// Program text parsing and the simplified string interface.
#[cfg(feature = "parsing")]
pub mod parser;

pub use engine::{qeval, Assertion, Database, Rule};
pub use stream::Stream;
pub use term::{extract_variables, Frame, Term};
pub use unify::{instantiate, pattern_match, unify_match};
