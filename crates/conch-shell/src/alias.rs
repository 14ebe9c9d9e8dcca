//! User-defined aliases: store layout, management, and resolution.
//!
//! Aliases live in the host's key/value store under a reserved key prefix,
//! so they share persistence with everything else the store holds. An alias
//! maps a name to raw command text; resolution tokenizes that text, splices
//! the user's extra arguments after the alias-defined ones, and follows
//! chains of aliases up to a fixed depth.

use std::collections::BTreeMap;

use conch_store::KvStore;
use conch_types::{ConchError, Result};

use crate::registry::ParsedInvocation;
use crate::tokenize::tokenize;

/// Store key prefix reserving the alias namespace.
pub const ALIAS_PREFIX: &str = "alias_";

/// Maximum number of alias links followed during resolution.
pub const MAX_ALIAS_DEPTH: usize = 16;

/// Built-in command names (and their static aliases) that can never be
/// shadowed by a user alias.
pub const RESERVED_NAMES: &[&str] = &[
    "alias", "cache", "calc", "cd", "clear", "cls", "del", "delete", "dir", "echo", "env", "exit",
    "help", "ls", "mkdir", "open", "print", "pwd", "read", "rm", "remove", "script", "touch",
    "var", "write",
];

fn key_for(name: &str) -> String {
    format!("{ALIAS_PREFIX}{name}")
}

/// Whether a name belongs to the closed set of built-in command names.
pub fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_NAMES.contains(&lower.as_str())
}

/// Define (or overwrite) an alias. Rejects empty and reserved names;
/// shadowing another alias is legal.
pub fn define(store: &mut dyn KvStore, name: &str, command: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ConchError::Command("alias name cannot be empty".to_string()));
    }
    if is_reserved(name) {
        return Err(ConchError::Command(format!(
            "cannot create an alias with a built-in command name: {name}"
        )));
    }
    store.put(&key_for(name), command);
    Ok(())
}

/// The raw command text stored for an alias, if defined.
pub fn lookup(store: &dyn KvStore, name: &str) -> Option<String> {
    store.get(&key_for(name))
}

/// Whether a name is a defined alias.
pub fn is_alias(store: &dyn KvStore, name: &str) -> bool {
    store.contains(&key_for(name))
}

/// Remove an alias. Returns `true` if it existed.
pub fn remove(store: &mut dyn KvStore, name: &str) -> bool {
    store.remove(&key_for(name))
}

/// All defined aliases (name -> command text), sorted by name.
pub fn all(store: &dyn KvStore) -> BTreeMap<String, String> {
    store
        .list()
        .into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ALIAS_PREFIX)
                .map(|name| (name.to_string(), value))
        })
        .collect()
}

/// Remove every alias, returning how many were removed.
pub fn clear_all(store: &mut dyn KvStore) -> usize {
    let names: Vec<String> = all(store).into_keys().collect();
    for name in &names {
        store.remove(&key_for(name));
    }
    names.len()
}

/// Resolve a command name through the alias store.
///
/// A non-alias name passes through unchanged, as does an alias whose stored
/// text tokenizes to nothing (fail closed). Otherwise the alias text's first
/// token becomes the candidate name and its remaining tokens are prepended
/// to the caller-supplied arguments. A candidate that is a *different* alias
/// is resolved recursively; a direct self-alias stops immediately, so
/// `foo -> foo bar` terminates. Chains longer than [`MAX_ALIAS_DEPTH`]
/// (e.g. mutual aliases) fail with [`ConchError::MaxDepth`].
pub fn resolve(store: &dyn KvStore, name: &str, args: Vec<String>) -> Result<ParsedInvocation> {
    resolve_at(store, name, args, 0)
}

fn resolve_at(
    store: &dyn KvStore,
    name: &str,
    args: Vec<String>,
    depth: usize,
) -> Result<ParsedInvocation> {
    if depth >= MAX_ALIAS_DEPTH {
        return Err(ConchError::MaxDepth(format!(
            "alias chain through '{name}' exceeds {MAX_ALIAS_DEPTH} links"
        )));
    }

    let Some(text) = lookup(store, name) else {
        return Ok(ParsedInvocation::new(name, args));
    };

    let mut alias_tokens = tokenize(&text).into_iter();
    let Some(candidate) = alias_tokens.next() else {
        // Empty alias text: fall back to the literal name.
        log::debug!("alias '{name}' has empty expansion, using name literally");
        return Ok(ParsedInvocation::new(name, args));
    };

    // Alias-defined arguments come first, then the caller's.
    let mut combined: Vec<String> = alias_tokens.collect();
    combined.extend(args);

    if candidate != name && is_alias(store, &candidate) {
        return resolve_at(store, &candidate, combined, depth + 1);
    }

    Ok(ParsedInvocation::new(candidate, combined))
}
