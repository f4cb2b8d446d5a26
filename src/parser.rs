use logos::Logos;

use crate::{error::LispError, reader::{SyntaxNode, ROOT_TAG}};


#[derive(Debug, Clone, Copy, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token<'a> {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[regex(r"[-+]?(([0-9]+(\.[0-9]*)?)|(\.[0-9]+))", |lex| lex.slice(), priority = 3)]
    Number(&'a str),

    #[regex(r"[a-zA-Z0-9_+\-*^%/\\=<>!&]+", |lex| lex.slice())]
    Symbol(&'a str),
}

impl<'a> Token<'a> {
    fn text(&self) -> &'a str {
        match *self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Number(text) | Self::Symbol(text) => text,
        }
    }
}

#[derive(Debug)]
struct Spanned<'a> {
    token: Token<'a>,
    offset: usize,
}

/// A node of the parse tree, tagged the way [`crate::read`] expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub tag: &'static str,
    pub contents: &'a str,
    pub children: Vec<Node<'a>>,
}

impl<'a> Node<'a> {
    fn leaf(tag: &'static str, contents: &'a str) -> Self {
        Self { tag, contents, children: Vec::new() }
    }
}

impl SyntaxNode for Node<'_> {
    fn tag(&self) -> &str {
        self.tag
    }

    fn contents(&self) -> &str {
        self.contents
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

// What was expected, and the byte offset where it was not found (None at end of input)
#[derive(Debug)]
struct Unexpected {
    offset: Option<usize>,
    expected: &'static str,
}

type ParseResult<O> = Result<O, Unexpected>;
type Tokens<'a, 'b> = &'a [Spanned<'b>];

fn unexpected(tokens: Tokens, expected: &'static str) -> Unexpected {
    Unexpected { offset: tokens.first().map(|spanned| spanned.offset), expected }
}

fn syntax_error(input: &str, failure: Unexpected) -> LispError {
    let offset = failure.offset.unwrap_or(input.len());
    let found = match input[offset..].chars().next() {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_owned(),
    };
    LispError::Syntax {
        column: input[..offset].chars().count() + 1,
        message: format!("expected {}, found {}", failure.expected, found),
    }
}

fn lexer(input: &str) -> Result<Vec<Spanned<'_>>, LispError> {
    let mut tokens = vec![];
    let mut tokenizer = Token::lexer(input);

    while let Some(result) = tokenizer.next() {
        let offset = tokenizer.span().start;
        match result {
            Ok(Token::Symbol(text)) => push_symbol_run(&mut tokens, text, offset),
            Ok(token) => tokens.push(Spanned { token, offset }),
            Err(_) => return Err(syntax_error(input, Unexpected { offset: Some(offset), expected: "expression" })),
        }
    }

    Ok(tokens)
}

// Numbers are tried before symbols at every position, so a run like `1+2a`
// reads as `1`, `+2`, `a`
fn push_symbol_run<'a>(tokens: &mut Vec<Spanned<'a>>, mut text: &'a str, mut offset: usize) {
    while !text.is_empty() {
        let length = number_prefix(text);
        if length == 0 {
            tokens.push(Spanned { token: Token::Symbol(text), offset });
            return;
        }
        tokens.push(Spanned { token: Token::Number(&text[..length]), offset });
        text = &text[length..];
        offset += length;
    }
}

// Symbol characters never include '.', so only the integer form can occur here
fn number_prefix(text: &str) -> usize {
    let sign = usize::from(text.starts_with(['-', '+']));
    let digits = text[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 { 0 } else { sign + digits }
}

fn parse_token<'a, 'b: 'a>(
    token_recognizer: impl Fn(&Token<'b>) -> bool,
    expected: &'static str,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, &'a Token<'b>)> {
    move |tokens| match tokens.first() {
        Some(spanned) if token_recognizer(&spanned.token) => Ok((&tokens[1..], &spanned.token)),
        _ => Err(unexpected(tokens, expected)),
    }
}

fn parse_list<'a, 'b: 'a, O>(
    parser: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, O)>
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Vec<O>)> {
    move |mut tokens| {
        let mut result = vec![];

        while let Ok((new_tokens, value)) = parser(tokens) {
            result.push(value);
            tokens = new_tokens
        }

        Ok((tokens, result))
    }
}

fn parse_either<'a, 'b: 'a, O>(
    a: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, O)>,
    b: impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, O)>,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, O)> {
    move |tokens| match a(tokens) {
        Ok(a) => Ok(a),
        Err(a_failure) => b(tokens).map_err(|b_failure| furthest(a_failure, b_failure)),
    }
}

// Prefer the alternative that got further before failing; ties go to the first
fn furthest(a: Unexpected, b: Unexpected) -> Unexpected {
    match (a.offset, b.offset) {
        (None, _) => a,
        (Some(_), None) => b,
        (Some(x), Some(y)) if y > x => b,
        _ => a,
    }
}

fn parse_atom<'a, 'b: 'a>(tokens: Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node<'b>)> {
    let (tokens, token) = parse_token(|token| matches!(token, Token::Number(_) | Token::Symbol(_)), "expression")(tokens)?;
    let node = match *token {
        Token::Number(text) => Node::leaf("expr|number|regex", text),
        other => Node::leaf("expr|symbol|regex", other.text()),
    };
    Ok((tokens, node))
}

// A delimited group keeps its delimiters as `char` children, like any other grammar node
fn parse_group<'a, 'b: 'a>(
    tag: &'static str,
    open: impl Fn(&Token<'b>) -> bool,
    close: impl Fn(&Token<'b>) -> bool,
    expected_close: &'static str,
) -> impl Fn(Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node<'b>)> {
    let start_parser = parse_token(open, "expression");
    let end_parser = parse_token(close, expected_close);

    move |tokens| {
        let (tokens, start) = start_parser(tokens)?;
        let (tokens, internal) = parse_list(parse_expression)(tokens)?;
        let (tokens, end) = end_parser(tokens)?;

        let mut children = Vec::with_capacity(internal.len() + 2);
        children.push(Node::leaf("char", start.text()));
        children.extend(internal);
        children.push(Node::leaf("char", end.text()));
        Ok((tokens, Node { tag, contents: "", children }))
    }
}

fn parse_sexpr<'a, 'b: 'a>(tokens: Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node<'b>)> {
    parse_group(
        "expr|sexpr|>",
        |token| matches!(token, Token::LeftParen),
        |token| matches!(token, Token::RightParen),
        "')'",
    )(tokens)
}

fn parse_qexpr<'a, 'b: 'a>(tokens: Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node<'b>)> {
    parse_group(
        "expr|qexpr|>",
        |token| matches!(token, Token::LeftBrace),
        |token| matches!(token, Token::RightBrace),
        "'}'",
    )(tokens)
}

fn parse_expression<'a, 'b: 'a>(tokens: Tokens<'a, 'b>) -> ParseResult<(Tokens<'a, 'b>, Node<'b>)> {
    parse_either(
        parse_atom,
        parse_either(parse_sexpr, parse_qexpr),
    )(tokens)
}

/// Parses one line of source into a tree rooted at a [`ROOT_TAG`] node.
///
/// The line must hold at least one expression. A group that fails to close is
/// reported at the token where the closing delimiter was expected.
pub fn parse(input: &str) -> Result<Node<'_>, LispError> {
    let tokens = lexer(input)?;

    let (rest, expressions) = parse_list(parse_expression)(tokens.as_slice())
        .map_err(|failure| syntax_error(input, failure))?;

    if !rest.is_empty() {
        // Re-parse the offending expression to find out what went wrong inside it
        let failure = parse_expression(rest)
            .err()
            .unwrap_or_else(|| unexpected(rest, "expression"));
        return Err(syntax_error(input, failure));
    }
    if expressions.is_empty() {
        return Err(syntax_error(input, unexpected(rest, "expression")));
    }

    let mut children = Vec::with_capacity(expressions.len() + 2);
    children.push(Node::leaf("regex", ""));
    children.extend(expressions);
    children.push(Node::leaf("regex", ""));
    Ok(Node { tag: ROOT_TAG, contents: "", children })
}
