//! Shell variable table and `$VAR` / `${VAR}` expansion.

use std::collections::{BTreeMap, HashMap};

use conch_types::{ConchError, Result};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Mutable mapping of variable names to string values.
///
/// The table is plain owned state; the host injects it into the pipeline
/// through [`Environment`](crate::Environment) rather than going through a
/// process-wide singleton, so tests get isolated instances.
#[derive(Debug, Default)]
pub struct VarTable {
    vars: HashMap<String, String>,
}

impl VarTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable. The name must not be empty or all-whitespace.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConchError::Command(
                "variable name cannot be empty".to_string(),
            ));
        }
        self.vars.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Look up a variable value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Remove a variable. Returns `true` if it was set.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    /// Snapshot of all variables, sorted by name.
    pub fn all(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove every variable, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.vars.len();
        self.vars.clear();
        count
    }

    /// Number of defined variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are defined.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace `$NAME` and `${NAME}` occurrences with their values.
    ///
    /// Single pass, left to right. Names are word characters (alphanumeric
    /// or `_`). An undefined name leaves the matched text verbatim,
    /// including the `$` and braces. Replacement text is inserted literally
    /// and never re-scanned, so a value containing `$X` stays as-is.
    pub fn expand(&self, input: &str) -> String {
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len());
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '$' && i + 1 < chars.len() {
                if chars[i + 1] == '{' {
                    let start = i + 2;
                    let mut end = start;
                    while end < chars.len() && is_word_char(chars[end]) {
                        end += 1;
                    }
                    // Only `${word}` is a match; anything else is literal.
                    if end > start && end < chars.len() && chars[end] == '}' {
                        let name: String = chars[start..end].iter().collect();
                        match self.vars.get(&name) {
                            Some(value) => out.push_str(value),
                            None => {
                                out.push_str("${");
                                out.push_str(&name);
                                out.push('}');
                            },
                        }
                        i = end + 1;
                        continue;
                    }
                } else {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && is_word_char(chars[end]) {
                        end += 1;
                    }
                    if end > start {
                        let name: String = chars[start..end].iter().collect();
                        match self.vars.get(&name) {
                            Some(value) => out.push_str(value),
                            None => {
                                out.push('$');
                                out.push_str(&name);
                            },
                        }
                        i = end;
                        continue;
                    }
                }
            }
            out.push(chars[i]);
            i += 1;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> VarTable {
        let mut vars = VarTable::new();
        for (name, value) in entries {
            vars.set(name, value).unwrap();
        }
        vars
    }

    #[test]
    fn set_get_unset() {
        let mut vars = VarTable::new();
        vars.set("X", "5").unwrap();
        assert_eq!(vars.get("X"), Some("5"));
        assert!(vars.unset("X"));
        assert!(!vars.unset("X"));
        assert_eq!(vars.get("X"), None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut vars = VarTable::new();
        assert!(vars.set("", "v").is_err());
        assert!(vars.set("  ", "v").is_err());
    }

    #[test]
    fn expands_bare_and_braced_forms() {
        let vars = table(&[("X", "5")]);
        assert_eq!(vars.expand("$X+${X}"), "5+5");
    }

    #[test]
    fn undefined_names_stay_verbatim() {
        let vars = VarTable::new();
        assert_eq!(vars.expand("$UNSET"), "$UNSET");
        assert_eq!(vars.expand("${UNSET}"), "${UNSET}");
    }

    #[test]
    fn word_boundary_ends_bare_name() {
        let vars = table(&[("HOME", "/home/me")]);
        assert_eq!(vars.expand("$HOME/docs"), "/home/me/docs");
        assert_eq!(vars.expand("x$HOME.y"), "x/home/me.y");
    }

    #[test]
    fn braces_allow_adjacent_word_chars() {
        let vars = table(&[("A", "1")]);
        assert_eq!(vars.expand("${A}bc"), "1bc");
        // Bare form swallows the following word chars as part of the name.
        assert_eq!(vars.expand("$Abc"), "$Abc");
    }

    #[test]
    fn malformed_braces_are_literal() {
        let vars = table(&[("A", "1")]);
        assert_eq!(vars.expand("${}"), "${}");
        assert_eq!(vars.expand("${A-b}"), "${A-b}");
        assert_eq!(vars.expand("${A"), "${A");
    }

    #[test]
    fn lone_dollar_is_literal() {
        let vars = VarTable::new();
        assert_eq!(vars.expand("a $ b"), "a $ b");
        assert_eq!(vars.expand("100$"), "100$");
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let vars = table(&[("A", "$B"), ("B", "deep")]);
        assert_eq!(vars.expand("$A"), "$B");
    }

    #[test]
    fn underscore_and_digits_in_names() {
        let vars = table(&[("MY_VAR2", "ok")]);
        assert_eq!(vars.expand("$MY_VAR2"), "ok");
        assert_eq!(vars.expand("${MY_VAR2}"), "ok");
    }

    #[test]
    fn all_is_sorted() {
        let vars = table(&[("b", "2"), ("a", "1")]);
        let names: Vec<String> = vars.all().into_keys().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn clear_reports_count() {
        let mut vars = table(&[("a", "1"), ("b", "2")]);
        assert_eq!(vars.clear(), 2);
        assert!(vars.is_empty());
    }
}
