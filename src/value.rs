use core::fmt;

use itertools::Itertools;

use crate::{builtin::Builtin, environment::Environment, error::LispError};

/// Whether a list is reduced by the evaluator or protected from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// An S-expression, `( ... )`.
    Plain,
    /// A Q-expression, `{ ... }`.
    Quoted,
}

/// An ordered sequence of values that exclusively owns its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    kind: ListKind,
    cells: Vec<Value>,
}

impl List {
    pub fn new(kind: ListKind, cells: Vec<Value>) -> Self {
        Self { kind, cells }
    }

    pub fn plain() -> Self {
        Self::new(ListKind::Plain, Vec::new())
    }

    pub fn quoted() -> Self {
        Self::new(ListKind::Quoted, Vec::new())
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn is_quoted(&self) -> bool {
        self.kind == ListKind::Quoted
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Value> {
        self.cells
    }

    pub fn into_plain(self) -> Self {
        Self::new(ListKind::Plain, self.cells)
    }

    pub fn into_quoted(self) -> Self {
        Self::new(ListKind::Quoted, self.cells)
    }

    pub fn append(&mut self, value: Value) {
        self.cells.push(value);
    }

    /// Removes and returns the cell at `index`, keeping the order of the rest.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn pop(&mut self, index: usize) -> Value {
        self.cells.remove(index)
    }

    /// Like [`List::pop`], but the remainder of the list is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn take(mut self, index: usize) -> Value {
        self.pop(index)
    }

    /// Moves every cell of `other` onto the end of `self`.
    pub fn join(mut self, other: List) -> Self {
        self.cells.extend(other.cells);
        self
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

/// A user defined function.
///
/// The closure owns its environment outright. Cloning it clones that
/// environment as well, so partially applied copies never share bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub(crate) formals: Vec<String>,
    pub(crate) body: Vec<Value>,
    pub(crate) env: Environment,
}

impl Closure {
    pub fn new(formals: Vec<String>, body: Vec<Value>) -> Self {
        Self {
            formals,
            body,
            env: Environment::new(),
        }
    }

    pub fn formals(&self) -> &[String] {
        &self.formals
    }

    pub fn body(&self) -> &[Value] {
        &self.body
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Builtin(Builtin),
    Closure(Closure),
}

/// Every expression, result and binding is one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Error(String),
    Number(f64),
    Symbol(String),
    List(List),
    Function(Function),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn plain(cells: Vec<Value>) -> Self {
        Self::List(List::new(ListKind::Plain, cells))
    }

    pub fn quoted(cells: Vec<Value>) -> Self {
        Self::List(List::new(ListKind::Quoted, cells))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Name of the variant, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Error(_) => "Error",
            Self::Number(_) => "Number",
            Self::Symbol(_) => "Symbol",
            Self::Function(_) => "Function",
            Self::List(list) => match list.kind() {
                ListKind::Plain => "S-Expression",
                ListKind::Quoted => "Q-Expression",
            },
        }
    }
}

impl From<LispError> for Value {
    fn from(error: LispError) -> Self {
        Self::Error(error.to_string())
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

// Integral values drop the fraction, everything else keeps a single digit
fn fmt_number(number: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if number == 0.0 {
        write!(f, "0")
    } else if number == number.trunc() {
        write!(f, "{:.0}", number)
    } else {
        write!(f, "{:.1}", number)
    }
}

fn fmt_cells(cells: &[Value], open: char, close: char, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", open, cells.iter().join(" "), close)
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ListKind::Plain => fmt_cells(&self.cells, '(', ')', f),
            ListKind::Quoted => fmt_cells(&self.cells, '{', '}', f),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(_) => write!(f, "<builtin>"),
            Self::Closure(closure) => {
                write!(f, "(\\ {{{}}} ", closure.formals.iter().join(" "))?;
                fmt_cells(&closure.body, '{', '}', f)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(message) => write!(f, "Error: {}", message),
            Self::Number(number) => fmt_number(*number, f),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::List(list) => list.fmt(f),
            Self::Function(function) => function.fmt(f),
        }
    }
}
