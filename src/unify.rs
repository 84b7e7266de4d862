//! Pattern matching and unification over term trees.
//!
//! Both operations try to find variable bindings that equate two terms and
//! report failure as `None`, never as a panic or an error type; a failed
//! match simply means the current derivation branch contributes no results.
//! [`pattern_match`] is the one-directional form where only the pattern side
//! may contain variables, used for checking goals against stored facts.
//! [`unify_match`] is the symmetric form where both sides may contain
//! variables, used for matching goals against rule conclusions.

use crate::term::{Frame, Term};

/// Matches `pattern` against ground `data`, extending `frame` with the
/// bindings needed to equate them.
///
/// Only `pattern` may contain variables; `data` is treated as opaque ground
/// structure (a variable occurring in `data` is never matched as a
/// variable, so a non-identical atom against it simply fails).
#[must_use]
pub fn pattern_match(pattern: &Term, data: &Term, frame: &Frame) -> Option<Frame> {
    if pattern == data {
        return Some(frame.clone());
    }
    match (pattern, data) {
        (Term::Var(name), _) => extend_if_consistent(name, data, frame),
        (Term::Compound(pattern_items), Term::Compound(data_items))
            if pattern_items.len() == data_items.len() =>
        {
            let mut frame = frame.clone();
            for (pattern_item, data_item) in pattern_items.iter().zip(data_items) {
                frame = pattern_match(pattern_item, data_item, &frame)?;
            }
            Some(frame)
        }
        _ => None,
    }
}

/// Binds `name` to `data`, or checks consistency against its existing
/// binding by matching the bound value against `data`.
fn extend_if_consistent(name: &str, data: &Term, frame: &Frame) -> Option<Frame> {
    match frame.lookup(name) {
        Some(value) => pattern_match(&value.clone(), data, frame),
        None => Some(frame.extend(name, data.clone())),
    }
}

/// Unifies two terms, either of which may contain variables, extending
/// `frame` with the most general bindings that equate them.
///
/// Binding a variable to a term that contains that variable (directly or
/// through existing bindings) fails the occurs-check rather than creating a
/// circular term.
#[must_use]
pub fn unify_match(pattern1: &Term, pattern2: &Term, frame: &Frame) -> Option<Frame> {
    if pattern1 == pattern2 {
        return Some(frame.clone());
    }
    match (pattern1, pattern2) {
        (Term::Var(name), _) => extend_if_possible(name, pattern2, frame),
        (_, Term::Var(name)) => extend_if_possible(name, pattern1, frame),
        (Term::Compound(items1), Term::Compound(items2)) if items1.len() == items2.len() => {
            let mut frame = frame.clone();
            for (item1, item2) in items1.iter().zip(items2) {
                frame = unify_match(item1, item2, &frame)?;
            }
            Some(frame)
        }
        _ => None,
    }
}

/// Binds `name` to `value` unless doing so would be inconsistent with the
/// frame or would create a circular term.
fn extend_if_possible(name: &str, value: &Term, frame: &Frame) -> Option<Frame> {
    if let Some(bound) = frame.lookup(name) {
        let bound = bound.clone();
        return unify_match(&bound, value, frame);
    }
    if let Term::Var(other) = value {
        if let Some(bound) = frame.lookup(other) {
            let bound = bound.clone();
            return unify_match(&Term::Var(name.to_string()), &bound, frame);
        }
        return Some(frame.extend(name, value.clone()));
    }
    if depends_on(value, name, frame) {
        return None;
    }
    Some(frame.extend(name, value.clone()))
}

/// The occurs-check: whether `term` contains the variable `name`, directly
/// or transitively through the frame's bindings.
fn depends_on(term: &Term, name: &str, frame: &Frame) -> bool {
    match term {
        Term::Var(other) => {
            if other == name {
                return true;
            }
            match frame.lookup(other) {
                Some(value) => depends_on(value, name, frame),
                None => false,
            }
        }
        Term::Compound(items) => items.iter().any(|item| depends_on(item, name, frame)),
        Term::Atom(_) => false,
    }
}

/// Replaces every variable in `term` with its binding resolved through the
/// frame; unbound variables are left as-is.
///
/// Terminates because the occurs-check guarantees no bound value contains
/// its own binding variable.
#[must_use]
pub fn instantiate(term: &Term, frame: &Frame) -> Term {
    match term {
        Term::Var(name) => match frame.lookup(name) {
            Some(value) => instantiate(value, frame),
            None => term.clone(),
        },
        Term::Compound(items) => {
            Term::Compound(items.iter().map(|item| instantiate(item, frame)).collect())
        }
        Term::Atom(_) => term.clone(),
    }
}
