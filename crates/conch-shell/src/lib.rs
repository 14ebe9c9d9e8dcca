//! Core interpreter pipeline for conch.
//!
//! The interpreter is a registry-based dispatch system. Commands implement
//! the [`Command`] trait and are registered by name. For each input line the
//! pipeline runs in a fixed order: command substitution (`$(...)`), variable
//! expansion (`$VAR` / `${VAR}`), tokenization with quoting and escapes, and
//! alias resolution. The resulting [`ParsedInvocation`] is dispatched through
//! the [`CommandRegistry`] and yields a uniform [`CommandResult`].
//!
//! The order is a contract, not an accident: variables are expanded before
//! tokenization so a value containing a quoted span becomes a single
//! argument, and substitutions run before variable expansion so a variable
//! can appear elsewhere on a line that also runs a sub-command.

pub mod alias;
mod parser;
mod registry;
mod shell;
mod subst;
mod tokenize;
mod vars;

/// A single executable command.
pub use registry::Command;
/// Registry of available commands with case-insensitive dispatch.
pub use registry::CommandRegistry;
/// Uniform success/error result produced by every dispatch.
pub use registry::CommandResult;
/// Shared mutable interpreter state passed to every command.
pub use registry::Environment;
/// A resolved command name plus its argument list, ready for dispatch.
pub use registry::ParsedInvocation;

/// The pipeline orchestrator.
pub use parser::Parser;
/// Host-facing facade owning registry, variables, store, and cwd.
pub use shell::Shell;
/// Split a raw string into tokens, honoring quotes and backslash escapes.
pub use tokenize::tokenize;
/// Mutable variable table with `$VAR` / `${VAR}` expansion.
pub use vars::VarTable;
