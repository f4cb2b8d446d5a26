use crate::{
    error::LispError,
    value::{List, Value},
};

/// Tag of the node wrapping a whole line of input.
pub const ROOT_TAG: &str = ">";

/// A node of an external parse tree.
///
/// Tags are matched by substring, so a tag like `expr|number|regex` reads as a
/// number. Delimiter children (`(`, `)`, `{`, `}`) and children tagged `regex`
/// are skipped.
pub trait SyntaxNode: Sized {
    fn tag(&self) -> &str;
    fn contents(&self) -> &str;
    fn children(&self) -> &[Self];
}

fn read_number(contents: &str) -> Value {
    match contents.parse::<f64>() {
        Ok(number) if number.is_finite() => Value::Number(number),
        _ => LispError::InvalidNumberLiteral.into(),
    }
}

fn is_punctuation<N: SyntaxNode>(node: &N) -> bool {
    matches!(node.contents(), "(" | ")" | "{" | "}") || node.tag() == "regex"
}

/// Converts a parse tree into a value tree.
pub fn read<N: SyntaxNode>(node: &N) -> Value {
    let tag = node.tag();
    if tag.contains("number") {
        return read_number(node.contents());
    }
    if tag.contains("symbol") {
        return Value::symbol(node.contents());
    }

    let mut list = if tag == ROOT_TAG || tag.contains("sexpr") {
        List::plain()
    } else if tag.contains("qexpr") {
        List::quoted()
    } else {
        return LispError::UnknownTag(tag.to_owned()).into();
    };

    for child in node.children().iter().filter(|child| !is_punctuation(*child)) {
        list.append(read(child));
    }
    list.into()
}
