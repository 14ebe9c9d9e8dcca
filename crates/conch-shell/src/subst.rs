//! Command substitution: `$(command)` expansion.
//!
//! Substitutions collapse innermost-first: each round finds the first
//! `$(...)` span containing no nested substitution, runs its content through
//! a fresh pipeline instance bound to the same registry, and splices the
//! captured output back into the buffer. Rescanning from the start after
//! every replacement resolves arbitrary nesting depth and evaluates sibling
//! substitutions left to right.

use conch_types::{ConchError, Result};

use crate::parser::Parser;
use crate::registry::Environment;

/// Upper bound on replacement rounds for one input line. A well-behaved
/// line settles in as many rounds as it has `$(...)` spans; a command whose
/// output keeps re-introducing `$(` would otherwise never converge.
pub(crate) const MAX_SUBST_ROUNDS: usize = 64;

/// Find the innermost ready substitution: the first `$(` whose matching `)`
/// closes without any other `$(` opening strictly inside it. Returns byte
/// offsets of the `$` and the `)`. An unbalanced `$(` never matches.
fn find_innermost(input: &str) -> Option<(usize, usize)> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'$' && bytes[i + 1] == b'(' {
            let mut open = 1usize;
            let mut has_nested = false;
            let mut j = i + 2;
            while j < bytes.len() {
                if bytes[j] == b'$' && j + 1 < bytes.len() && bytes[j + 1] == b'(' {
                    open += 1;
                    has_nested = true;
                } else if bytes[j] == b')' {
                    open -= 1;
                    if open == 0 {
                        if !has_nested {
                            return Some((i, j));
                        }
                        // This span holds a nested substitution; the scan
                        // will reach it directly as `i` advances.
                        break;
                    }
                }
                j += 1;
            }
        }
        i += 1;
    }
    None
}

/// Expand every `$(command)` substitution in `input`.
///
/// Each substitution's content is parsed and executed through a fresh
/// [`Parser`] so parsing state never leaks between nesting levels. An error
/// result becomes visible `ERROR: <output>` text in the buffer instead of
/// aborting the line; empty content becomes an empty string.
pub(crate) fn expand(input: &str, env: &mut Environment<'_>) -> Result<String> {
    if input.is_empty() || !input.contains("$(") {
        return Ok(input.to_string());
    }

    let mut buffer = input.to_string();
    let mut rounds = 0usize;
    while let Some((start, end)) = find_innermost(&buffer) {
        if rounds >= MAX_SUBST_ROUNDS {
            return Err(ConchError::MaxDepth(format!(
                "command substitution did not settle after {MAX_SUBST_ROUNDS} rounds"
            )));
        }
        rounds += 1;

        let content = buffer[start + 2..end].to_string();
        let replacement = evaluate(&content, env)?;
        buffer.replace_range(start..=end, &replacement);
    }

    Ok(buffer)
}

/// Parse and execute one substitution's content, capturing its output.
fn evaluate(content: &str, env: &mut Environment<'_>) -> Result<String> {
    let parser = Parser::new();
    let Some(invocation) = parser.parse_nested(content, env)? else {
        return Ok(String::new());
    };

    log::debug!("substitution dispatch: {invocation}");
    let registry = env.registry;
    let result = registry.dispatch(&invocation, env);
    if result.is_error() {
        Ok(format!("ERROR: {}", result.output()))
    } else {
        Ok(result.output().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_span() {
        assert_eq!(find_innermost("a $(print hi) b"), Some((2, 12)));
    }

    #[test]
    fn finds_innermost_of_nested() {
        let input = "$(print $(print x))";
        let (start, end) = find_innermost(input).unwrap();
        assert_eq!(&input[start..=end], "$(print x)");
    }

    #[test]
    fn first_innermost_wins_among_siblings() {
        let input = "$(a) $(b)";
        let (start, end) = find_innermost(input).unwrap();
        assert_eq!(&input[start..=end], "$(a)");
    }

    #[test]
    fn unbalanced_open_is_not_a_substitution() {
        assert_eq!(find_innermost("print $(oops"), None);
        assert_eq!(find_innermost("$("), None);
    }

    #[test]
    fn nested_unbalanced_outer_still_finds_inner() {
        let input = "$(outer $(inner))";
        let (start, end) = find_innermost(input).unwrap();
        assert_eq!(&input[start..=end], "$(inner)");
    }

    #[test]
    fn no_dollar_paren_means_none() {
        assert_eq!(find_innermost("plain (parens) $var"), None);
        assert_eq!(find_innermost(""), None);
    }
}
