use crate::{
    environment::Environment,
    error::LispError,
    value::{Closure, Function, List, ListKind, Value},
};

/// Formal that collects every remaining argument into the formal after it.
pub const REST_MARKER: &str = "&";

/// Evaluates `value` in `env`.
///
/// Symbols are looked up, S-expressions are reduced, and everything else
/// evaluates to itself.
pub fn evaluate(env: &Environment, value: Value) -> Value {
    log::trace!("eval {}", value);
    match value {
        Value::Symbol(name) => env.get(&name).unwrap_or_else(Value::from),
        Value::List(list) if list.kind() == ListKind::Plain => evaluate_sexpr(env, list),
        other => other,
    }
}

fn evaluate_sexpr(env: &Environment, list: List) -> Value {
    // Every cell is evaluated before errors are checked, so definitions made by
    // earlier or later cells still take effect
    let mut list = List::new(
        ListKind::Plain,
        list.into_iter().map(|cell| evaluate(env, cell)).collect(),
    );

    let error = list.iter().position(Value::is_error);
    if let Some(index) = error {
        return list.take(index);
    }

    match list.len() {
        0 => list.into(),
        1 => list.take(0),
        _ => match list.pop(0) {
            Value::Function(function) => apply(env, function, list),
            _ => LispError::NotAFunction.into(),
        },
    }
}

/// Calls `function` with `args`, from the environment `env`.
pub fn apply(env: &Environment, function: Function, args: List) -> Value {
    match function {
        Function::Builtin(builtin) => builtin.call(env, args),
        Function::Closure(closure) => closure.call(env, args),
    }
}

impl Closure {
    /// Binds `args` to the formals in order.
    ///
    /// Once every formal is bound the body runs, with the closure's environment
    /// parented to `env`. Otherwise the partially applied closure is returned.
    pub(crate) fn call(mut self, env: &Environment, mut args: List) -> Value {
        let given = args.len();
        let expected = self.formals.len();

        while !args.is_empty() {
            if self.formals.is_empty() {
                return LispError::TooManyArguments { given, expected }.into();
            }

            let formal = self.formals.remove(0);
            if formal == REST_MARKER {
                if let Err(err) = self.bind_rest(args) {
                    return err.into();
                }
                break;
            }

            self.env.put(&formal, args.pop(0));
        }

        // Nothing left for the rest formal to collect
        if self.formals.first().map(String::as_str) == Some(REST_MARKER) {
            self.formals.remove(0);
            if let Err(err) = self.bind_rest(List::quoted()) {
                return err.into();
            }
        }

        if !self.formals.is_empty() {
            log::debug!("partially applied, {} formal(s) left", self.formals.len());
            return Value::Function(Function::Closure(self));
        }

        log::debug!("applying closure with {} argument(s)", given);
        self.env.set_parent(env);
        let body = List::new(ListKind::Plain, std::mem::take(&mut self.body));
        evaluate(&self.env, body.into())
    }

    // The rest marker has already been removed from the formals
    fn bind_rest(&mut self, rest: List) -> Result<(), LispError> {
        if self.formals.len() != 1 {
            return Err(LispError::MalformedLambdaRestArg);
        }
        let name = self.formals.remove(0);
        self.env.put(&name, List::quoted().join(rest).into());
        Ok(())
    }
}
