use core::str::FromStr;
use std::io::{self, Write};

use crate::{
    environment::Environment,
    error::LispError,
    interpreter::evaluate,
    value::{Closure, Function, List, Value},
};

type BuiltinResult = Result<Value, LispError>;

/// A numeric reduction shared by the arithmetic builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Min,
    Max,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Pow => "^",
            Self::Min => "<",
            Self::Max => ">",
        }
    }

    fn apply(self, x: f64, y: f64) -> Result<f64, LispError> {
        Ok(match self {
            Self::Add => x + y,
            Self::Sub => x - y,
            Self::Mul => x * y,
            Self::Div if y == 0.0 => return Err(LispError::DivisionByZero),
            Self::Div => x / y,
            Self::Rem => {
                let divisor = y as i64;
                if divisor == 0 {
                    return Err(LispError::DivisionByZero);
                }
                (x as i64).wrapping_rem(divisor) as f64
            }
            Self::Pow => x.powf(y),
            Self::Min => if x <= y { x } else { y },
            Self::Max => if x >= y { x } else { y },
        })
    }
}

impl FromStr for Operator {
    type Err = LispError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" | "add" => Self::Add,
            "-" | "sub" => Self::Sub,
            "*" | "mul" => Self::Mul,
            "/" | "div" => Self::Div,
            "%" | "res" => Self::Rem,
            "^" | "pow" => Self::Pow,
            "<" | "min" => Self::Min,
            ">" | "max" => Self::Max,
            other => return Err(LispError::BadOperator(other.to_owned())),
        })
    }
}

/// Native operations, stored in the environment as `Function::Builtin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    List,
    Head,
    Tail,
    Eval,
    Join,
    Len,
    Cons,
    Env,
    Def,
    Put,
    Lambda,
    Arithmetic(Operator),
}

/// Every name the root environment starts out with, in registration order.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("def", Builtin::Def),
    ("\\", Builtin::Lambda),
    ("=", Builtin::Put),
    ("put", Builtin::Put),
    ("list", Builtin::List),
    ("head", Builtin::Head),
    ("tail", Builtin::Tail),
    ("eval", Builtin::Eval),
    ("join", Builtin::Join),
    ("len", Builtin::Len),
    ("cons", Builtin::Cons),
    ("env", Builtin::Env),
    ("+", Builtin::Arithmetic(Operator::Add)),
    ("add", Builtin::Arithmetic(Operator::Add)),
    ("-", Builtin::Arithmetic(Operator::Sub)),
    ("sub", Builtin::Arithmetic(Operator::Sub)),
    ("*", Builtin::Arithmetic(Operator::Mul)),
    ("mul", Builtin::Arithmetic(Operator::Mul)),
    ("/", Builtin::Arithmetic(Operator::Div)),
    ("div", Builtin::Arithmetic(Operator::Div)),
    ("%", Builtin::Arithmetic(Operator::Rem)),
    ("res", Builtin::Arithmetic(Operator::Rem)),
    ("^", Builtin::Arithmetic(Operator::Pow)),
    ("pow", Builtin::Arithmetic(Operator::Pow)),
    ("<", Builtin::Arithmetic(Operator::Min)),
    ("min", Builtin::Arithmetic(Operator::Min)),
    (">", Builtin::Arithmetic(Operator::Max)),
    ("max", Builtin::Arithmetic(Operator::Max)),
];

impl FromStr for Builtin {
    type Err = LispError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BUILTINS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, builtin)| *builtin)
            .ok_or_else(|| LispError::UnknownFunction(s.to_owned()))
    }
}

#[derive(Clone, Copy)]
enum Scope {
    Global,
    Local,
}

impl Builtin {
    /// The name used when reporting errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Head => "head",
            Self::Tail => "tail",
            Self::Eval => "eval",
            Self::Join => "join",
            Self::Len => "len",
            Self::Cons => "cons",
            Self::Env => "env",
            Self::Def => "def",
            // `put` is registered as an alias and reports under `=`
            Self::Put => "=",
            Self::Lambda => "\\",
            Self::Arithmetic(operator) => operator.symbol(),
        }
    }

    /// Runs the builtin, consuming its arguments. Failures come back as
    /// `Value::Error`.
    pub fn call(self, env: &Environment, args: List) -> Value {
        log::trace!("builtin {} with {} argument(s)", self.name(), args.len());
        self.invoke(env, args).unwrap_or_else(Value::from)
    }

    fn invoke(self, env: &Environment, args: List) -> BuiltinResult {
        match self {
            Self::List => Ok(args.into_quoted().into()),
            Self::Head => builtin_head(args),
            Self::Tail => builtin_tail(args),
            Self::Eval => builtin_eval(env, args),
            Self::Join => builtin_join(args),
            Self::Len => builtin_len(args),
            Self::Cons => builtin_cons(args),
            Self::Env => builtin_env(env, args),
            Self::Def => builtin_var(env, args, self.name(), Scope::Global),
            Self::Put => builtin_var(env, args, self.name(), Scope::Local),
            Self::Lambda => builtin_lambda(args),
            Self::Arithmetic(operator) => builtin_op(operator, args),
        }
    }
}

/// Looks a builtin up by name and calls it.
pub fn call_builtin(env: &Environment, name: &str, args: List) -> Value {
    match name.parse::<Builtin>() {
        Ok(builtin) => builtin.call(env, args),
        Err(err) => err.into(),
    }
}

/// Reduces `args` with the arithmetic operator spelled `symbol`, either as a
/// symbol (`+`) or as its word alias (`add`).
pub fn call_operator(symbol: &str, args: List) -> Value {
    symbol
        .parse::<Operator>()
        .and_then(|operator| builtin_op(operator, args))
        .unwrap_or_else(Value::from)
}

/// A root environment holding every builtin.
pub(crate) fn builtin_environment() -> Environment {
    let env = Environment::new();
    for (name, builtin) in BUILTINS {
        env.put(name, Value::Function(Function::Builtin(*builtin)));
    }
    env
}

fn expect_count(function: &'static str, args: &List, expected: usize) -> Result<(), LispError> {
    if args.len() != expected {
        return Err(LispError::BadArity { function, given: args.len(), expected });
    }
    Ok(())
}

fn quoted(function: &'static str, value: Value, index: usize) -> Result<List, LispError> {
    match value {
        Value::List(list) if list.is_quoted() => Ok(list),
        other => Err(LispError::BadType {
            function,
            index,
            given: other.type_name(),
            expected: "Q-Expression",
        }),
    }
}

fn non_empty(function: &'static str, list: List, index: usize) -> Result<List, LispError> {
    if list.is_empty() {
        return Err(LispError::EmptyArgument { function, index });
    }
    Ok(list)
}

fn symbols(function: &'static str, list: List) -> Result<Vec<String>, LispError> {
    list.into_iter()
        .map(|value| match value {
            Value::Symbol(name) => Ok(name),
            other => Err(LispError::NonSymbol { function, given: other.type_name() }),
        })
        .collect()
}

fn builtin_head(args: List) -> BuiltinResult {
    expect_count("head", &args, 1)?;
    let mut list = non_empty("head", quoted("head", args.take(0), 0)?, 0)?;

    let mut head = List::quoted();
    head.append(list.pop(0));
    Ok(head.into())
}

fn builtin_tail(args: List) -> BuiltinResult {
    expect_count("tail", &args, 1)?;
    let mut list = non_empty("tail", quoted("tail", args.take(0), 0)?, 0)?;

    list.pop(0);
    Ok(list.into())
}

fn builtin_eval(env: &Environment, args: List) -> BuiltinResult {
    expect_count("eval", &args, 1)?;
    let list = quoted("eval", args.take(0), 0)?;
    Ok(evaluate(env, list.into_plain().into()))
}

fn builtin_join(args: List) -> BuiltinResult {
    args.into_iter()
        .enumerate()
        .try_fold(List::quoted(), |joined, (index, value)| {
            Ok(joined.join(quoted("join", value, index)?))
        })
        .map(Value::from)
}

fn builtin_len(args: List) -> BuiltinResult {
    expect_count("len", &args, 1)?;
    let list = quoted("len", args.take(0), 0)?;
    Ok(Value::Number(list.len() as f64))
}

fn builtin_cons(mut args: List) -> BuiltinResult {
    expect_count("cons", &args, 2)?;
    let tail = quoted("cons", args.pop(1), 1)?;

    let mut list = List::quoted();
    list.append(args.take(0));
    Ok(list.join(tail).into())
}

fn builtin_env(env: &Environment, args: List) -> BuiltinResult {
    if let Err(err) = write_names(env, &mut io::stdout().lock()) {
        log::warn!("env: could not list bindings: {}", err);
    }
    Ok(args.into())
}

/// Writes the names bound directly in `env`, one per line, sorted.
pub fn write_names(env: &Environment, out: &mut impl Write) -> io::Result<()> {
    for name in env.names() {
        writeln!(out, "{}", name)?;
    }
    out.flush()
}

fn builtin_var(env: &Environment, mut args: List, function: &'static str, scope: Scope) -> BuiltinResult {
    if args.is_empty() {
        return Err(LispError::BadArity { function, given: 0, expected: 1 });
    }
    let names = symbols(function, quoted(function, args.pop(0), 0)?)?;

    if names.len() != args.len() {
        return Err(LispError::SymbolCountMismatch {
            function,
            symbols: names.len(),
            values: args.len(),
        });
    }

    for (name, value) in names.iter().zip(args) {
        log::debug!("{} {} = {}", function, name, value);
        match scope {
            Scope::Global => env.def(name, value),
            Scope::Local => env.put(name, value),
        }
    }

    Ok(List::plain().into())
}

fn builtin_lambda(mut args: List) -> BuiltinResult {
    expect_count("\\", &args, 2)?;
    let body = args.pop(1);
    let formals = symbols("\\", quoted("\\", args.take(0), 0)?)?;
    let body = quoted("\\", body, 1)?;

    Ok(Value::Function(Function::Closure(Closure::new(formals, body.into_cells()))))
}

fn builtin_op(operator: Operator, args: List) -> BuiltinResult {
    let numbers = args
        .into_iter()
        .map(|value| match value {
            Value::Number(number) => Ok(number),
            _ => Err(LispError::NonNumber),
        })
        .collect::<Result<Vec<f64>, LispError>>()?;

    let (first, rest) = numbers.split_first().ok_or(LispError::BadArity {
        function: operator.symbol(),
        given: 0,
        expected: 1,
    })?;

    if operator == Operator::Sub && rest.is_empty() {
        return Ok(Value::Number(-first));
    }

    rest.iter()
        .try_fold(*first, |x, &y| operator.apply(x, y))
        .map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> List {
        List::new(crate::value::ListKind::Plain, values.iter().copied().map(Value::Number).collect())
    }

    fn call(name: &str, args: Vec<Value>) -> Value {
        let env = builtin_environment();
        call_builtin(&env, name, List::new(crate::value::ListKind::Plain, args))
    }

    #[test]
    fn arithmetic_reduces_left_to_right() {
        let env = Environment::new();
        let sub = Builtin::Arithmetic(Operator::Sub);
        assert_eq!(sub.call(&env, numbers(&[10.0, 1.0, 2.0])), Value::Number(7.0));
        assert_eq!(sub.call(&env, numbers(&[10.0])), Value::Number(-10.0));
        assert_eq!(
            Builtin::Arithmetic(Operator::Div).call(&env, numbers(&[4.0, 0.0])),
            Value::Error("Division by Zero!".into())
        );
        assert_eq!(Builtin::Arithmetic(Operator::Rem).call(&env, numbers(&[7.0, 3.0])), Value::Number(1.0));
        assert_eq!(Builtin::Arithmetic(Operator::Min).call(&env, numbers(&[5.0, 2.0, 8.0])), Value::Number(2.0));
        assert_eq!(Builtin::Arithmetic(Operator::Max).call(&env, numbers(&[5.0, 2.0, 8.0])), Value::Number(8.0));
        assert_eq!(Builtin::Arithmetic(Operator::Pow).call(&env, numbers(&[2.0, 10.0])), Value::Number(1024.0));
    }

    #[test]
    fn word_aliases_match_symbols() {
        for (word, symbol) in [("add", "+"), ("sub", "-"), ("mul", "*"), ("div", "/"), ("res", "%"), ("pow", "^"), ("min", "<"), ("max", ">")] {
            assert_eq!(word.parse::<Builtin>(), symbol.parse::<Builtin>());
        }
        assert_eq!("min".parse::<Operator>(), Ok(Operator::Min));
    }

    #[test]
    fn remainder_truncates_divisor() {
        let env = Environment::new();
        assert_eq!(
            Builtin::Arithmetic(Operator::Rem).call(&env, numbers(&[7.0, 0.5])),
            Value::Error("Division by Zero!".into())
        );
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(call("frobnicate", vec![]), Value::Error("Unknown Function!".into()));
        assert_eq!("??".parse::<Operator>(), Err(LispError::BadOperator("??".into())));
    }

    #[test]
    fn non_numbers_are_rejected() {
        assert_eq!(
            call("+", vec![Value::Number(1.0), Value::quoted(vec![])]),
            Value::Error("Cannot operate on non-number!".into())
        );
    }

    #[test]
    fn head_checks_its_contract() {
        assert_eq!(
            call("head", vec![Value::quoted(vec![])]),
            Value::Error("Function 'head' passed {} for argument 0.".into())
        );
        assert_eq!(
            call("head", vec![Value::Number(1.0)]),
            Value::Error("Function 'head' passed Number for argument 0, Expected Q-Expression.".into())
        );
        assert_eq!(
            call("head", vec![Value::quoted(vec![]), Value::quoted(vec![])]),
            Value::Error("Function 'head' passed 2 arguments, Expected 1.".into())
        );
    }

    #[test]
    fn cons_prepends() {
        let result = call("cons", vec![Value::Number(0.0), Value::quoted(vec![Value::Number(1.0)])]);
        assert_eq!(result.to_string(), "{0 1}");
    }

    #[test]
    fn def_and_put_pick_their_scope() {
        let root = builtin_environment();
        let local = Environment::new();
        local.set_parent(&root);

        let args = |name: &str| {
            List::new(
                crate::value::ListKind::Plain,
                vec![Value::quoted(vec![Value::symbol(name)]), Value::Number(1.0)],
            )
        };

        assert_eq!(Builtin::Def.call(&local, args("g")), Value::plain(vec![]));
        assert_eq!(Builtin::Put.call(&local, args("l")), Value::plain(vec![]));
        assert!(root.contains("g"));
        assert!(!root.contains("l"));
        assert!(local.contains("l"));
    }

    #[test]
    fn lambda_requires_symbols() {
        let result = call("\\", vec![Value::quoted(vec![Value::Number(1.0)]), Value::quoted(vec![])]);
        assert_eq!(
            result,
            Value::Error("Function '\\' cannot define non-symbol. Got Number, Expected Symbol.".into())
        );
    }

    #[test]
    fn env_lists_only_the_current_scope() -> anyhow::Result<()> {
        let root = builtin_environment();
        let local = Environment::new();
        local.set_parent(&root);
        local.put("zeta", Value::Number(1.0));
        local.put("alpha", Value::Number(2.0));

        let mut out = Vec::new();
        write_names(&local, &mut out)?;
        assert_eq!(String::from_utf8(out)?, "alpha\nzeta\n");

        let args = List::new(crate::value::ListKind::Plain, vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(Builtin::Env.call(&local, args).to_string(), "(1 2)");
        Ok(())
    }

    #[test]
    fn put_reports_under_its_symbol() {
        assert_eq!(
            call("put", vec![Value::Number(1.0)]),
            Value::Error("Function '=' passed Number for argument 0, Expected Q-Expression.".into())
        );
    }

    #[test]
    fn operators_dispatch_by_spelling() {
        let args = || numbers(&[9.0, 4.0]);
        assert_eq!(call_operator("res", args()), Value::Number(1.0));
        assert_eq!(call_operator("-", args()), Value::Number(5.0));
        assert_eq!(call_operator("list", args()), Value::Error("Bad Operator!".into()));
    }

    #[test]
    fn registration_is_complete() {
        let env = builtin_environment();
        for (name, _) in BUILTINS {
            assert!(env.contains(name), "{} missing", name);
        }
    }
}
