use thiserror::Error;

/// Everything that can go wrong while reading or evaluating qlisp.
///
/// Evaluation never hands these back through `Result`; they are turned into
/// [`crate::Value::Error`] carrying the `Display` text. Only [`LispError::Syntax`]
/// surfaces as an `Err`, from [`crate::EvaluationContext::evaluate_str`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LispError {
    #[error("Unbound symbol '{0}'!")]
    UnboundSymbol(String),

    #[error("Function '{function}' passed {given} arguments, Expected {expected}.")]
    BadArity {
        function: &'static str,
        given: usize,
        expected: usize,
    },

    #[error("Function '{function}' passed {given} for argument {index}, Expected {expected}.")]
    BadType {
        function: &'static str,
        index: usize,
        given: &'static str,
        expected: &'static str,
    },

    #[error("Function '{function}' passed {{}} for argument {index}.")]
    EmptyArgument { function: &'static str, index: usize },

    #[error("Division by Zero!")]
    DivisionByZero,

    #[error("Bad Operator!")]
    BadOperator(String),

    #[error("Cannot operate on non-number!")]
    NonNumber,

    #[error("first element is not a function")]
    NotAFunction,

    #[error("Invalid Number")]
    InvalidNumberLiteral,

    #[error("Unknown Function!")]
    UnknownFunction(String),

    #[error("Function format invalid. Symbol '&' not followed by single symbol.")]
    MalformedLambdaRestArg,

    #[error("too many arguments: got {given}, expected {expected}")]
    TooManyArguments { given: usize, expected: usize },

    #[error("Function '{function}' cannot define non-symbol. Got {given}, Expected Symbol.")]
    NonSymbol {
        function: &'static str,
        given: &'static str,
    },

    #[error("Function '{function}' passed too many arguments for symbols. Got {symbols}, Expected {values}.")]
    SymbolCountMismatch {
        function: &'static str,
        symbols: usize,
        values: usize,
    },

    #[error("Cannot read node tagged '{0}'")]
    UnknownTag(String),

    #[error("<stdin>:1:{column}: error: {message}")]
    Syntax { column: usize, message: String },
}
