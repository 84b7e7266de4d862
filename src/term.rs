use indexmap::IndexSet;
use std::fmt;
use std::rc::Rc;

/// A symbolic term tree.
///
/// Terms are immutable values compared structurally. A variable is
/// distinguished by its tag, not by any marker character in its name; the
/// textual `?name` convention exists only at the parser and display
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// An opaque symbolic constant (e.g. `zero`, `alice`).
    Atom(String),
    /// A placeholder scoped to one query or rule instance until renamed.
    Var(String),
    /// An ordered sequence of terms; the first element conventionally names
    /// the relation, so `plus(x, y, z)` is `[plus, x, y, z]`.
    Compound(Vec<Term>),
}

impl Term {
    /// Builds an atom.
    #[must_use]
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    /// Builds a variable. The name carries no sigil.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// Builds a compound term from an explicit element list.
    #[must_use]
    pub fn compound(items: Vec<Term>) -> Self {
        Term::Compound(items)
    }

    /// Builds a compound term headed by a relation name, e.g.
    /// `Term::functor("plus", vec![x, y, z])` for `plus(x, y, z)`.
    #[must_use]
    pub fn functor(name: impl Into<String>, args: Vec<Term>) -> Self {
        let mut items = Vec::with_capacity(args.len() + 1);
        items.push(Term::Atom(name.into()));
        items.extend(args);
        Term::Compound(items)
    }

    /// Renders the term in `name(arg1,arg2)` form instead of the bracketed
    /// list form used by [`fmt::Display`].
    #[must_use]
    pub fn functor_form(&self) -> FunctorForm<'_> {
        FunctorForm(self)
    }
}

/// Bracketed list rendering: `[plus, ?x, [s, zero]]`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{name}"),
            Term::Var(name) => write!(f, "?{name}"),
            Term::Compound(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Functor-style rendering of a [`Term`]: `plus(?x, s(zero))`.
#[derive(Debug, Clone, Copy)]
pub struct FunctorForm<'a>(&'a Term);

impl fmt::Display for FunctorForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Term::Atom(name) => write!(f, "{name}"),
            Term::Var(name) => write!(f, "?{name}"),
            Term::Compound(items) => match items.split_first() {
                None => write!(f, "()"),
                Some((head, args)) => {
                    write!(f, "{}(", head.functor_form())?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg.functor_form())?;
                    }
                    write!(f, ")")
                }
            },
        }
    }
}

/// Returns a copy of `term` with `-<id>` appended to every variable name.
///
/// Rule application renames with a fresh id on every use so that two uses
/// of the same rule, including recursive ones, can never alias each other's
/// variables.
#[must_use]
pub fn rename_variables(term: &Term, id: u64) -> Term {
    match term {
        Term::Var(name) => Term::Var(format!("{name}-{id}")),
        Term::Compound(items) => {
            Term::Compound(items.iter().map(|item| rename_variables(item, id)).collect())
        }
        Term::Atom(_) => term.clone(),
    }
}

/// Collects the distinct variable names of a term in first-appearance order.
///
/// Consumers use this to know which variables of a query to report.
#[must_use]
pub fn extract_variables(term: &Term) -> Vec<String> {
    fn collect(term: &Term, seen: &mut IndexSet<String>) {
        match term {
            Term::Var(name) => {
                seen.insert(name.clone());
            }
            Term::Compound(items) => {
                for item in items {
                    collect(item, seen);
                }
            }
            Term::Atom(_) => {}
        }
    }

    let mut seen = IndexSet::new();
    collect(term, &mut seen);
    seen.into_iter().collect()
}

/// An immutable substitution environment.
///
/// A frame is a singly-linked chain of `(variable, term)` bindings sharing a
/// parent; extending a frame allocates one new node and leaves the parent
/// untouched, so concurrent resolution branches can extend a common ancestor
/// without interfering. Lookup walks newest to oldest, so a newer binding
/// shadows an older one of the same name (in practice each variable is bound
/// at most once per derivation).
#[derive(Debug, Clone, Default)]
pub struct Frame(Option<Rc<Binding>>);

#[derive(Debug)]
struct Binding {
    name: String,
    value: Term,
    parent: Frame,
}

impl Frame {
    /// The frame with no bindings.
    #[must_use]
    pub fn empty() -> Self {
        Frame(None)
    }

    /// Returns whether the frame has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns a new frame holding `(name, value)` on top of this one.
    #[must_use]
    pub fn extend(&self, name: impl Into<String>, value: Term) -> Frame {
        Frame(Some(Rc::new(Binding {
            name: name.into(),
            value,
            parent: self.clone(),
        })))
    }

    /// Looks up the newest binding for `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Term> {
        let mut current = self;
        while let Some(binding) = &current.0 {
            if binding.name == name {
                return Some(&binding.value);
            }
            current = &binding.parent;
        }
        None
    }
}

/// Renders the bindings newest-first, e.g. `?x: zero; ?y: [s, zero];`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current = self;
        while let Some(binding) = &current.0 {
            write!(f, "?{}: {}; ", binding.name, binding.value)?;
            current = &binding.parent;
        }
        Ok(())
    }
}
