// src/exec/env.rs

use std::collections::BTreeMap;

use crate::errors::{RebakeError, Result};

/// Variables from a `bitbake -e` dump.
///
/// The dump is read line by line:
/// - lines starting with `#` are comments,
/// - trailing whitespace is dropped,
/// - a line splits into name and value at its first `=`; lines without one
///   are skipped,
/// - the value loses exactly one leading and one trailing character (the
///   quotes). No other unescaping happens.
///
/// A later assignment to the same name replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: BTreeMap<String, String>,
}

impl BuildEnv {
    pub fn parse(dump: &str) -> Self {
        let mut vars = BTreeMap::new();

        for line in dump.lines() {
            if line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = line.trim_end().split_once('=') else {
                continue;
            };
            vars.insert(name.to_string(), unquote(value).to_string());
        }

        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Like [`BuildEnv::get`], but a missing variable is an error.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| RebakeError::MissingVariable(name.to_string()))
    }

    /// Whitespace-separated words of a required variable.
    pub fn words(&self, name: &str) -> Result<Vec<&str>> {
        Ok(self.require(name)?.split_whitespace().collect())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    let mut chars = value.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
