#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Builtins and loads from variables
#[derive(Arbitrary, Debug)]
enum LispAtom {
    Add, Sub, Mul, Div, Rem, Pow, Min, Max,

    List, Head, Tail, Eval, Join,
    Len, Cons, Def, Put, Lambda,
    Rest,

    Identifier(u8),
    Number(f64),
}

impl fmt::Display for LispAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            LispAtom::Add => "+",
            LispAtom::Sub => "-",
            LispAtom::Mul => "*",
            LispAtom::Div => "/",
            LispAtom::Rem => "%",
            LispAtom::Pow => "^",
            LispAtom::Min => "min",
            LispAtom::Max => "max",
            LispAtom::List => "list",
            LispAtom::Head => "head",
            LispAtom::Tail => "tail",
            LispAtom::Eval => "eval",
            LispAtom::Join => "join",
            LispAtom::Len => "len",
            LispAtom::Cons => "cons",
            LispAtom::Def => "def",
            LispAtom::Put => "=",
            LispAtom::Lambda => "\\",
            LispAtom::Rest => "&",
            // A small pool of names so definitions get looked up again
            LispAtom::Identifier(index) => return write!(f, "v{}", index % 8),
            LispAtom::Number(value) if value.is_finite() => return write!(f, "{}", value),
            LispAtom::Number(_) => "0",
        })
    }
}

#[derive(Arbitrary, Debug)]
enum LispExpression {
    Sexpr(Vec<LispExpression>),
    Qexpr(Vec<LispExpression>),
    Atom(LispAtom),
}

impl fmt::Display for LispExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LispExpression::Sexpr(children) => write!(f, "({})", children.iter().join(" ")),
            LispExpression::Qexpr(children) => write!(f, "{{{}}}", children.iter().join(" ")),
            LispExpression::Atom(atom) => atom.fmt(f),
        }
    }
}

fuzz_target!(|lines: Vec<LispExpression>| {
    let mut context = qlisp::EvaluationContext::new();

    for line in lines {
        let _ = context.evaluate_str(&line.to_string());
    }
});
