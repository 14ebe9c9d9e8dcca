//! The pipeline orchestrator.

use conch_types::Result;

use crate::alias;
use crate::registry::{Environment, ParsedInvocation};
use crate::subst;
use crate::tokenize::tokenize;

/// Composes the pipeline stages into one parse step.
///
/// The stage order is fixed and load-bearing: substitution expansion runs
/// first (top level only), then variable expansion, then tokenization, then
/// alias resolution. A fresh `Parser` is created for every nesting level of
/// substitution, and the nested entry point skips substitution expansion
/// entirely; that explicit split replaces an ambient re-entrancy flag and
/// keeps pathological self-referential input from recursing unboundedly.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    /// Create a pipeline instance.
    pub fn new() -> Self {
        Self
    }

    /// Parse one statement at the top level.
    ///
    /// Returns `None` for empty or all-whitespace input, and for input that
    /// expands and tokenizes to nothing.
    pub fn parse(&self, raw: &str, env: &mut Environment<'_>) -> Result<Option<ParsedInvocation>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let expanded = subst::expand(raw, env)?;
        self.finish(&expanded, env)
    }

    /// Parse a substitution's content: same pipeline minus the substitution
    /// stage, which the engine has already collapsed innermost-first.
    pub(crate) fn parse_nested(
        &self,
        raw: &str,
        env: &mut Environment<'_>,
    ) -> Result<Option<ParsedInvocation>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        self.finish(raw, env)
    }

    /// Variable expansion, tokenization, and alias resolution.
    fn finish(&self, input: &str, env: &mut Environment<'_>) -> Result<Option<ParsedInvocation>> {
        let expanded = env.vars.expand(input);
        let mut tokens = tokenize(&expanded).into_iter();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<String> = tokens.collect();
        alias::resolve(env.store, &name, args).map(Some)
    }
}
