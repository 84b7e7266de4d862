//! Fact and rule storage plus the resolution-based query evaluator.
//!
//! [`qeval`] turns a goal term and a stream of candidate frames into a lazy
//! stream of satisfying frames. Conjunctions thread the frame stream through
//! each sub-goal left to right, disjunctions fairly interleave their
//! branches, negation filters frames by closed-world failure, and every
//! other goal is resolved against the database: matching facts first, rule
//! applications lazily appended after them.

use crate::stream::Stream;
use crate::term::{extract_variables, rename_variables, Frame, Term};
use crate::unify::{instantiate, pattern_match, unify_match};
use log::{debug, log_enabled, trace, Level};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A fact stored in the database.
#[derive(Debug, Clone)]
pub struct Assertion {
    fact: Term,
}

impl Assertion {
    /// Wraps a term as a storable fact.
    #[must_use]
    pub fn new(fact: Term) -> Self {
        Self { fact }
    }

    /// The wrapped fact term.
    #[must_use]
    pub fn fact(&self) -> &Term {
        &self.fact
    }

    /// Matches `pattern` against this fact, yielding the extended frame as a
    /// one-element stream on success and the empty stream on failure.
    fn check(&self, pattern: &Term, frame: &Frame) -> Stream<Frame> {
        match pattern_match(pattern, &self.fact, frame) {
            Some(extended) => Stream::singleton(extended),
            None => Stream::empty(),
        }
    }
}

/// An inference rule: the conclusion holds whenever the body can be proven.
#[derive(Debug, Clone)]
pub struct Rule {
    conclusion: Term,
    body: Term,
}

impl Rule {
    /// Builds a rule from a conclusion and a body goal.
    #[must_use]
    pub fn new(conclusion: Term, body: Term) -> Self {
        Self { conclusion, body }
    }

    /// The rule's conclusion term.
    #[must_use]
    pub fn conclusion(&self) -> &Term {
        &self.conclusion
    }

    /// The rule's body goal.
    #[must_use]
    pub fn body(&self) -> &Term {
        &self.body
    }

    /// Returns a copy of the rule with every variable renamed using the
    /// given fresh suffix id.
    fn rename(&self, id: u64) -> Rule {
        Rule {
            conclusion: rename_variables(&self.conclusion, id),
            body: rename_variables(&self.body, id),
        }
    }

    /// Applies the rule to a goal: renames the rule fresh, unifies its
    /// conclusion with the goal, and on success resolves the renamed body.
    fn apply(&self, db: &Rc<Database>, goal: &Term, frame: &Frame) -> Stream<Frame> {
        let fresh = self.rename(db.next_fresh_id());
        match unify_match(goal, &fresh.conclusion, frame) {
            Some(unified) => {
                trace!("applying rule {} to goal {}", fresh.conclusion, goal);
                qeval(db, &fresh.body, Stream::singleton(unified))
            }
            None => Stream::empty(),
        }
    }
}

/// An append-only store of assertions and rules.
///
/// Both collections keep insertion order, and resolution always scans them
/// linearly in that order, so the order in which facts and rules are added
/// determines the order in which answers are produced. Mutation goes
/// through `&self` so a database shared with in-flight lazy queries can
/// still grow; each scan snapshots the collection at the moment it is
/// forced.
///
/// ## Example
///
/// ```rust
/// use std::rc::Rc;
/// use streamlog::{qeval, Assertion, Database, Frame, Rule, Stream, Term};
///
/// let db = Rc::new(Database::new());
/// db.add_assertion(Assertion::new(Term::functor("natural", vec![Term::atom("zero")])));
/// db.add_rule(Rule::new(
///     Term::functor("natural", vec![Term::functor("s", vec![Term::var("x")])]),
///     Term::functor("natural", vec![Term::var("x")]),
/// ));
///
/// let goal = Term::functor("natural", vec![Term::var("n")]);
/// let answers = qeval(&db, &goal, Stream::singleton(Frame::empty()));
/// assert_eq!(answers.take(3).to_vec().len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct Database {
    assertions: RefCell<Vec<Assertion>>,
    rules: RefCell<Vec<Rule>>,
    fresh_id: Cell<u64>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact. Facts are never removed or reordered.
    pub fn add_assertion(&self, assertion: Assertion) {
        debug!("assertion added: {}", assertion.fact);
        self.assertions.borrow_mut().push(assertion);
    }

    /// Appends a rule. Rules are never removed or reordered.
    pub fn add_rule(&self, rule: Rule) {
        debug!("rule added: {} <- {}", rule.conclusion, rule.body);
        self.rules.borrow_mut().push(rule);
    }

    /// Next value of the monotonic fresh-variable counter. Ids are never
    /// reused within one database's lifetime.
    fn next_fresh_id(&self) -> u64 {
        let id = self.fresh_id.get() + 1;
        self.fresh_id.set(id);
        id
    }

    /// Matches a goal against every stored fact in insertion order,
    /// producing the stream of successfully extended frames.
    #[must_use]
    pub fn find_assertions(&self, pattern: &Term, frame: &Frame) -> Stream<Frame> {
        let snapshot = self.assertions.borrow().clone();
        let pattern = pattern.clone();
        let frame = frame.clone();
        Stream::from_iter(snapshot)
            .flatmap_delayed(move |assertion| assertion.check(&pattern, &frame))
    }

    /// Applies every stored rule to a goal in insertion order, producing
    /// the fairly interleaved stream of frames from all rule bodies.
    #[must_use]
    pub fn apply_rules(self: &Rc<Self>, pattern: &Term, frame: &Frame) -> Stream<Frame> {
        let snapshot = self.rules.borrow().clone();
        let db = Rc::clone(self);
        let pattern = pattern.clone();
        let frame = frame.clone();
        Stream::from_iter(snapshot).flatmap_delayed(move |rule| rule.apply(&db, &pattern, &frame))
    }
}

/// The goal categories the evaluator dispatches on. Any head symbol other
/// than the three connectives leaves the goal a plain relational one.
enum GoalKind<'a> {
    And(&'a [Term]),
    Or(&'a [Term]),
    Not(&'a Term),
    Simple,
}

impl<'a> GoalKind<'a> {
    fn classify(goal: &'a Term) -> Self {
        let Term::Compound(items) = goal else {
            return GoalKind::Simple;
        };
        let Some(Term::Atom(head)) = items.first() else {
            return GoalKind::Simple;
        };
        match head.as_str() {
            "and" => GoalKind::And(&items[1..]),
            "or" => GoalKind::Or(&items[1..]),
            "not" if items.len() == 2 => GoalKind::Not(&items[1]),
            _ => GoalKind::Simple,
        }
    }
}

/// Resolves a goal against the database, mapping a stream of candidate
/// frames to the lazy stream of frames satisfying the goal.
///
/// Answers appear in a deterministic order fixed by database insertion
/// order, left-to-right conjunction order, and round-robin interleaving of
/// disjuncts. The result may be infinite; consumers bound their exploration
/// with [`Stream::take`].
#[must_use]
pub fn qeval(db: &Rc<Database>, goal: &Term, frames: Stream<Frame>) -> Stream<Frame> {
    trace!("qeval goal: {goal}");
    match GoalKind::classify(goal) {
        GoalKind::And(goals) => and_query(db, goals, frames),
        GoalKind::Or(goals) => or_query(db, goals, frames),
        GoalKind::Not(subgoal) => not_query(db, subgoal, frames),
        GoalKind::Simple => simple_query(db, goal, frames),
    }
}

/// A plain relational goal: for each incoming frame, matching facts come
/// first and rule applications are appended lazily after them, so infinite
/// rule recursion cannot block fact-based answers.
fn simple_query(db: &Rc<Database>, goal: &Term, frames: Stream<Frame>) -> Stream<Frame> {
    let db = Rc::clone(db);
    let goal = goal.clone();
    frames.flatmap_delayed(move |frame| {
        let matched = db.find_assertions(&goal, &frame);
        let db = Rc::clone(&db);
        let goal = goal.clone();
        matched.append_delayed(move || db.apply_rules(&goal, &frame))
    })
}

/// Conjunction: pipe the frame stream through each sub-goal left to right.
fn and_query(db: &Rc<Database>, goals: &[Term], frames: Stream<Frame>) -> Stream<Frame> {
    goals
        .iter()
        .fold(frames, |frames, goal| qeval(db, goal, frames))
}

/// Disjunction: evaluate every sub-goal against the original frame stream
/// and fairly interleave the results, so one infinite branch cannot starve
/// answers from the others.
fn or_query(db: &Rc<Database>, goals: &[Term], frames: Stream<Frame>) -> Stream<Frame> {
    let mut result = Stream::empty();
    for goal in goals {
        let db = Rc::clone(db);
        let goal = goal.clone();
        let frames = frames.clone();
        result = result.interleave_delayed(move || qeval(&db, &goal, frames));
    }
    result
}

/// Closed-world negation: a frame passes through unchanged when the
/// sub-goal has no solution from it, and is dropped otherwise. Binds no
/// variables; only sound when the sub-goal is ground at evaluation time.
fn not_query(db: &Rc<Database>, subgoal: &Term, frames: Stream<Frame>) -> Stream<Frame> {
    let db = Rc::clone(db);
    let subgoal = subgoal.clone();
    frames.flatmap_delayed(move |frame| {
        if log_enabled!(Level::Debug) {
            let grounded = instantiate(&subgoal, &frame);
            if !extract_variables(&grounded).is_empty() {
                debug!(
                    "negated goal {grounded} still has unbound variables; \
                     closed-world answer may be unsound"
                );
            }
        }
        let result = qeval(&db, &subgoal, Stream::singleton(frame.clone()));
        if result.is_empty() {
            Stream::singleton(frame)
        } else {
            Stream::empty()
        }
    })
}
