use std::{io::BufRead, path::{Path, PathBuf}};

use anyhow::bail;
use itertools::Itertools;
use serde::{de::{Error, Visitor}, Deserialize};

/// What a single fixture line should produce: the printed value, or a parse
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedOutcome {
    Output(String),
    SyntaxError,
}

struct ExpectedOutcomeVisitor {}

impl<'de> Deserialize<'de> for ExpectedOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de> {

        deserializer.deserialize_map(ExpectedOutcomeVisitor {})
    }
}

impl<'de> Visitor<'de> for ExpectedOutcomeVisitor {
    type Value = ExpectedOutcome;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'type'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>, {

        if map.next_key::<String>()? != Some("ok".to_owned()) {
            return Err(A::Error::custom("First key should be 'ok'"))
        }

        let ok: bool = map.next_value()?;
        let result = if ok {
            if map.next_key::<String>()?.as_ref()
                .ok_or(A::Error::custom("Must have two keys"))? != "output"
            {
                return Err(A::Error::custom("Second ok key should be 'output'"))
            }

            ExpectedOutcome::Output(map.next_value()?)
        } else {
            if map.next_key::<String>()?.as_ref()
                .ok_or(A::Error::custom("Must have two keys"))? != "type"
            {
                return Err(A::Error::custom("Second key should be 'type'"))
            }

            match map.next_value::<String>()?.as_ref() {
                "SyntaxError" => ExpectedOutcome::SyntaxError,
                other => return Err(A::Error::custom(format!("Unrecognized error type: {}", other)))
            }
        };

        if map.next_key::<String>()?.is_some() {
            return Err(A::Error::custom("Only two keys should be present"));
        }

        Ok(result)
    }
}

fn load_input_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let source = std::fs::read(path)?;
    Ok(source.lines().collect::<Result<Vec<String>, _>>()?)
}

fn load_output_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ExpectedOutcome>> {
    let source = std::fs::read(path)?;
    let result: Vec<ExpectedOutcome> = serde_json::from_slice(&source)?;
    Ok(result)
}

pub fn load_test_pair(testcase: &str) -> anyhow::Result<Vec<(String, ExpectedOutcome)>> {
    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let input = load_input_file(base_path.join("test_inputs").join(format!("{}.lisp", testcase)))?;
    let output = load_output_file(base_path.join("test_outputs").join(format!("{}.json", testcase)))?;

    if input.len() != output.len() { bail!("Input and output of testcase {} do not match", testcase); }
    Ok(input.into_iter().zip(output).collect_vec())
}

pub fn all_testcases() -> impl Iterator<Item = &'static str> {
    ["arithmetic", "lists", "scoping", "closures", "variadic", "syntax"].into_iter()
}
