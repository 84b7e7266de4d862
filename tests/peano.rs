//! End-to-end inference over the Peano arithmetic rule set: naturals,
//! addition, multiplication, comparison, modulo, gcd and factorial, all
//! encoded as facts and rules and solved through the query evaluator.

use std::rc::Rc;
use streamlog::{instantiate, qeval, Assertion, Database, Frame, Rule, Stream, Term};

fn peano(n: u64) -> Term {
    let mut term = Term::atom("zero");
    for _ in 0..n {
        term = Term::functor("s", vec![term]);
    }
    term
}

fn succ(term: Term) -> Term {
    Term::functor("s", vec![term])
}

/// The arithmetic knowledge base from the classic worked example.
fn arithmetic_db() -> Rc<Database> {
    let db = Rc::new(Database::new());

    db.add_assertion(Assertion::new(Term::functor(
        "natural",
        vec![Term::atom("zero")],
    )));
    db.add_assertion(Assertion::new(Term::functor(
        "factorial",
        vec![Term::atom("zero"), peano(1)],
    )));

    // natural(s(x)) <- natural(x)
    db.add_rule(Rule::new(
        Term::functor("natural", vec![succ(Term::var("x"))]),
        Term::functor("natural", vec![Term::var("x")]),
    ));

    // plus(zero, x, x) <- natural(x)
    db.add_rule(Rule::new(
        Term::functor(
            "plus",
            vec![Term::atom("zero"), Term::var("x"), Term::var("x")],
        ),
        Term::functor("natural", vec![Term::var("x")]),
    ));
    // plus(s(x), y, s(z)) <- plus(x, y, z)
    db.add_rule(Rule::new(
        Term::functor(
            "plus",
            vec![succ(Term::var("x")), Term::var("y"), succ(Term::var("z"))],
        ),
        Term::functor("plus", vec![Term::var("x"), Term::var("y"), Term::var("z")]),
    ));

    // times(zero, x, zero) <- natural(x)
    db.add_rule(Rule::new(
        Term::functor(
            "times",
            vec![Term::atom("zero"), Term::var("x"), Term::atom("zero")],
        ),
        Term::functor("natural", vec![Term::var("x")]),
    ));
    // times(s(x), y, z) <- and(times(x, y, xy), plus(y, xy, z))
    db.add_rule(Rule::new(
        Term::functor(
            "times",
            vec![succ(Term::var("x")), Term::var("y"), Term::var("z")],
        ),
        Term::functor(
            "and",
            vec![
                Term::functor(
                    "times",
                    vec![Term::var("x"), Term::var("y"), Term::var("xy")],
                ),
                Term::functor(
                    "plus",
                    vec![Term::var("y"), Term::var("xy"), Term::var("z")],
                ),
            ],
        ),
    ));

    // less(zero, s(x)) <- natural(x)
    db.add_rule(Rule::new(
        Term::functor("less", vec![Term::atom("zero"), succ(Term::var("x"))]),
        Term::functor("natural", vec![Term::var("x")]),
    ));
    // less(s(x), s(y)) <- less(x, y)
    db.add_rule(Rule::new(
        Term::functor("less", vec![succ(Term::var("x")), succ(Term::var("y"))]),
        Term::functor("less", vec![Term::var("x"), Term::var("y")]),
    ));

    // mod(x, y, x) <- less(x, y)
    db.add_rule(Rule::new(
        Term::functor("mod", vec![Term::var("x"), Term::var("y"), Term::var("x")]),
        Term::functor("less", vec![Term::var("x"), Term::var("y")]),
    ));
    // mod(x, y, z) <- and(plus(x1, y, x), mod(x1, y, z))
    db.add_rule(Rule::new(
        Term::functor("mod", vec![Term::var("x"), Term::var("y"), Term::var("z")]),
        Term::functor(
            "and",
            vec![
                Term::functor(
                    "plus",
                    vec![Term::var("x1"), Term::var("y"), Term::var("x")],
                ),
                Term::functor("mod", vec![Term::var("x1"), Term::var("y"), Term::var("z")]),
            ],
        ),
    ));

    // gcd(x, zero, x) <- less(zero, x)
    db.add_rule(Rule::new(
        Term::functor("gcd", vec![Term::var("x"), Term::atom("zero"), Term::var("x")]),
        Term::functor("less", vec![Term::atom("zero"), Term::var("x")]),
    ));
    // gcd(x, y, g) <- and(mod(x, y, z), gcd(y, z, g))
    db.add_rule(Rule::new(
        Term::functor("gcd", vec![Term::var("x"), Term::var("y"), Term::var("g")]),
        Term::functor(
            "and",
            vec![
                Term::functor("mod", vec![Term::var("x"), Term::var("y"), Term::var("z")]),
                Term::functor("gcd", vec![Term::var("y"), Term::var("z"), Term::var("g")]),
            ],
        ),
    ));

    // factorial(s(n), x) <- and(factorial(n, y), times(s(n), y, x))
    db.add_rule(Rule::new(
        Term::functor("factorial", vec![succ(Term::var("n")), Term::var("x")]),
        Term::functor(
            "and",
            vec![
                Term::functor("factorial", vec![Term::var("n"), Term::var("y")]),
                Term::functor(
                    "times",
                    vec![succ(Term::var("n")), Term::var("y"), Term::var("x")],
                ),
            ],
        ),
    ));

    db
}

fn first_answers(db: &Rc<Database>, goal: &Term, limit: usize) -> Vec<Term> {
    qeval(db, goal, Stream::singleton(Frame::empty()))
        .take(limit)
        .to_vec()
        .iter()
        .map(|frame| instantiate(goal, frame))
        .collect()
}

#[test]
fn test_naturals_are_enumerated_in_order() {
    let db = arithmetic_db();
    let goal = Term::functor("natural", vec![Term::var("n")]);

    let expected: Vec<Term> = (0..3)
        .map(|n| Term::functor("natural", vec![peano(n)]))
        .collect();
    assert_eq!(first_answers(&db, &goal, 3), expected);
}

#[test]
fn test_addition_of_peano_numbers() {
    let db = arithmetic_db();
    let goal = Term::functor("plus", vec![peano(2), peano(3), Term::var("z")]);

    let expected = Term::functor("plus", vec![peano(2), peano(3), peano(5)]);
    assert_eq!(first_answers(&db, &goal, 1), vec![expected]);
}

#[test]
fn test_factorial_of_four_is_twenty_four() {
    let db = arithmetic_db();
    let goal = Term::functor("factorial", vec![peano(4), Term::var("x")]);

    let frames = qeval(&db, &goal, Stream::singleton(Frame::empty()))
        .take(1)
        .to_vec();
    assert_eq!(frames.len(), 1);
    assert_eq!(instantiate(&Term::var("x"), &frames[0]), peano(24));
}

#[test]
fn test_inverse_factorial_query() {
    let db = arithmetic_db();

    // Which n satisfies n! = 6?
    let goal = Term::functor("factorial", vec![Term::var("x"), peano(6)]);

    let frames = qeval(&db, &goal, Stream::singleton(Frame::empty()))
        .take(1)
        .to_vec();
    assert_eq!(frames.len(), 1);
    assert_eq!(instantiate(&Term::var("x"), &frames[0]), peano(3));
}

#[test]
fn test_gcd_of_three_and_two() {
    let db = arithmetic_db();
    let goal = Term::functor("gcd", vec![peano(3), peano(2), Term::var("x")]);

    let frames = qeval(&db, &goal, Stream::singleton(Frame::empty()))
        .take(1)
        .to_vec();
    assert_eq!(frames.len(), 1);
    assert_eq!(instantiate(&Term::var("x"), &frames[0]), peano(1));
}

#[test]
fn test_modulo_of_four_by_two() {
    let db = arithmetic_db();
    let goal = Term::functor("mod", vec![peano(4), peano(2), Term::var("z")]);

    let frames = qeval(&db, &goal, Stream::singleton(Frame::empty()))
        .take(1)
        .to_vec();
    assert_eq!(frames.len(), 1);
    assert_eq!(instantiate(&Term::var("z"), &frames[0]), peano(0));
}

#[test]
fn test_closed_world_negation_over_comparison() {
    let db = arithmetic_db();

    // less(2, 1) is unprovable, so the negation passes the frame through.
    let goal = Term::functor("not", vec![Term::functor("less", vec![peano(2), peano(1)])]);
    let frames = qeval(&db, &goal, Stream::singleton(Frame::empty())).to_vec();
    assert_eq!(frames.len(), 1);

    // less(1, 2) is provable, so the negation yields nothing.
    let goal = Term::functor("not", vec![Term::functor("less", vec![peano(1), peano(2)])]);
    assert!(qeval(&db, &goal, Stream::singleton(Frame::empty())).is_empty());
}
