//! Interactive command line interpreter for the streamlog engine.
//!
//! Accepts three kinds of commands, one per line:
//!
//! ```text
//! >> fact(natural(zero))
//! >> rule(natural(s(X)), natural(X))
//! >> query(natural(X))
//! ```
//!
//! Queries print up to ten answers. Enter `quit` to leave.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use streamlog::parser::parse_program;
use streamlog::{extract_variables, instantiate, qeval, Assertion, Database, Frame, Rule, Stream, Term};

/// At most this many answers are computed per query.
const MAX_ANSWERS: usize = 10;

fn print_intro() {
    println!("This is the streamlog command line interpreter!");
    println!();
    println!("You can enter 3 types of commands:");
    println!("  1) facts: fact(natural(zero))");
    println!("  2) rules: rule(natural(s(X)), natural(X))");
    println!("  3) queries: query(natural(X))");
    println!();
    println!("To quit the interpreter enter the 'quit' command");
    println!();
}

fn run_query(db: &Rc<Database>, goal: &Term) {
    let variables = extract_variables(goal);
    qeval(db, goal, Stream::singleton(Frame::empty()))
        .take(MAX_ANSWERS)
        .for_each(|frame| {
            println!("Result:");
            for name in &variables {
                let value = instantiate(&Term::var(name.as_str()), frame);
                println!("{name} = {}", value.functor_form());
            }
        });
}

fn run_command(db: &Rc<Database>, line: &str) {
    let Ok(terms) = parse_program(line) else {
        println!("Invalid command!");
        return;
    };
    let Some(Term::Compound(items)) = terms.first() else {
        println!("Invalid command!");
        return;
    };
    let Some(Term::Atom(head)) = items.first() else {
        println!("Invalid command!");
        return;
    };
    match (head.as_str(), &items[1..]) {
        ("fact", [fact]) => {
            db.add_assertion(Assertion::new(fact.clone()));
            println!("Fact added to database.");
        }
        ("rule", [conclusion, body]) => {
            db.add_rule(Rule::new(conclusion.clone(), body.clone()));
            println!("Rule added to database.");
        }
        ("query", [goal]) => run_query(db, goal),
        _ => println!("Invalid command!"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    print_intro();

    let db = Rc::new(Database::new());
    let stdin = io::stdin();
    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        run_command(&db, line);
    }
    Ok(())
}
