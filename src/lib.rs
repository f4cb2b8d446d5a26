mod builtin;
mod config;
mod context;
mod environment;
mod error;
mod interpreter;
mod parser;
mod reader;
mod value;

#[cfg(test)]
mod test_utils;

pub use builtin::{call_builtin, call_operator, write_names, Builtin, Operator, BUILTINS};
pub use config::ReplConfig;
pub use context::EvaluationContext;
pub use environment::Environment;
pub use error::LispError;
pub use interpreter::{apply, evaluate, REST_MARKER};
pub use parser::{parse, Node};
pub use reader::{read, SyntaxNode, ROOT_TAG};
pub use value::{Closure, Function, List, ListKind, Value};
