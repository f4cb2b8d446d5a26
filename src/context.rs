use crate::{
    builtin::{builtin_environment, call_builtin, call_operator},
    environment::Environment,
    error::LispError,
    interpreter::evaluate,
    parser::parse,
    reader::{read, SyntaxNode},
    value::{List, ListKind, Value},
};


/// An evaluation context that takes source lines or parse trees and
/// evaluates them to give values.
///
/// The context owns the root environment, so definitions made by one call are
/// visible to every later call on the same context.
pub struct EvaluationContext {
    environment: Environment,
}

impl EvaluationContext {
    pub fn new() -> Self {
        let environment = builtin_environment();
        log::debug!("root environment ready with {} builtins", environment.len());

        Self { environment }
    }

    /// Parses, reads and evaluates one line of source.
    ///
    /// Only a syntax error is returned as `Err`; failures during evaluation
    /// come back as `Ok(Value::Error(_))`.
    pub fn evaluate_str(&mut self, input: &str) -> Result<Value, LispError> {
        let node = parse(input)?;
        Ok(self.evaluate_node(&node))
    }

    pub fn evaluate_node<N: SyntaxNode>(&mut self, node: &N) -> Value {
        self.evaluate(read(node))
    }

    pub fn evaluate(&mut self, value: Value) -> Value {
        evaluate(&self.environment, value)
    }

    /// Calls the builtin registered under `name` directly.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Value {
        call_builtin(&self.environment, name, List::new(ListKind::Plain, args))
    }

    /// Reduces `args` with an arithmetic operator, by symbol or word alias.
    pub fn reduce(&mut self, operator: &str, args: Vec<Value>) -> Value {
        call_operator(operator, List::new(ListKind::Plain, args))
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use crate::test_utils::{all_testcases, load_test_pair, ExpectedOutcome};

    use super::*;

    fn assert_run(testcase: &str, entries: &[(String, ExpectedOutcome)]) -> anyhow::Result<()> {
        let mut evaluation_context = EvaluationContext::new();
        for (lineno, (source, expected)) in entries.iter().enumerate() {
            let result = evaluation_context.evaluate_str(source);

            println!("{}:\n{:?}", source, result);
            match (&result, expected) {
                (Ok(value), ExpectedOutcome::Output(expected)) => assert_eq!(
                    &value.to_string(), expected,
                    "Testcase({}, {}): Got {}, expected {}", testcase, lineno, value, expected
                ),
                (Err(LispError::Syntax { .. }), ExpectedOutcome::SyntaxError) => {}
                _ => bail!("Testcase({}, {}): Got {:?}, expected {:?}", testcase, lineno, result, expected),
            }
        }

        Ok(())
    }

    #[test]
    fn evaluate_testcases() -> anyhow::Result<()> {
        for testcase in all_testcases() {
            println!("Running testcase {}", testcase);
            let entries = load_test_pair(testcase)?;
            assert_run(testcase, &entries)?;
        }

        Ok(())
    }

    #[test]
    fn definitions_persist_across_lines() -> anyhow::Result<()> {
        let mut context = EvaluationContext::new();
        context.evaluate_str("def {x} 5")?;
        assert_eq!(context.evaluate_str("(+ x 1)")?, Value::Number(6.0));
        assert!(context.environment().contains("x"));
        Ok(())
    }

    #[test]
    fn call_dispatches_by_name() {
        let mut context = EvaluationContext::new();
        let list = Value::quoted(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(context.call("len", vec![list]), Value::Number(2.0));
        assert_eq!(context.call("nope", vec![]), Value::Error("Unknown Function!".into()));
    }

    #[test]
    fn reduce_dispatches_by_operator() {
        let mut context = EvaluationContext::new();
        let args = || vec![Value::Number(8.0), Value::Number(2.0)];
        assert_eq!(context.reduce("/", args()), Value::Number(4.0));
        assert_eq!(context.reduce("max", args()), Value::Number(8.0));
        assert_eq!(context.reduce("head", args()), Value::Error("Bad Operator!".into()));
    }

    #[test]
    fn syntax_errors_are_not_values() {
        let mut context = EvaluationContext::new();
        assert!(matches!(context.evaluate_str("(+ 1"), Err(LispError::Syntax { .. })));
    }
}
