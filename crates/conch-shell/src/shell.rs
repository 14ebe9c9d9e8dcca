//! Host-facing shell facade.

use std::path::{Path, PathBuf};

use conch_store::KvStore;

use crate::parser::Parser;
use crate::registry::{CommandRegistry, CommandResult, Environment};
use crate::vars::VarTable;

/// Owns the interpreter state and runs input lines end to end.
///
/// A line may contain multiple `;`-separated statements; each is parsed and
/// dispatched independently, left to right, and empty statements (a trailing
/// `;`, or `a;;c`) are silently skipped. Everything is synchronous: one
/// statement runs to completion on the caller's thread before the next
/// starts.
pub struct Shell {
    registry: CommandRegistry,
    vars: VarTable,
    store: Box<dyn KvStore>,
    cwd: PathBuf,
    exit_requested: bool,
}

impl Shell {
    /// Create a shell over the given store, starting in the process cwd.
    pub fn new(store: Box<dyn KvStore>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self {
            registry: CommandRegistry::new(),
            vars: VarTable::new(),
            store,
            cwd,
            exit_requested: false,
        }
    }

    /// The command registry, for registration and hook installation.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// The command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The shell's current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The variable table.
    pub fn vars(&self) -> &VarTable {
        &self.vars
    }

    /// Whether a dispatched `exit` asked the host to terminate.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Run one input line: split into statements, parse, dispatch.
    ///
    /// One result per non-empty statement. A statement that fails to parse
    /// (e.g. a mutual-alias loop) produces an error result in its slot and
    /// does not stop later statements.
    pub fn run_line(&mut self, line: &str) -> Vec<CommandResult> {
        let mut results = Vec::new();
        for statement in split_statements(line) {
            if let Some(result) = self.run_statement(&statement) {
                results.push(result);
            }
        }
        results
    }

    fn run_statement(&mut self, statement: &str) -> Option<CommandResult> {
        let mut env = Environment {
            registry: &self.registry,
            cwd: &mut self.cwd,
            vars: &mut self.vars,
            store: self.store.as_mut(),
        };

        let invocation = match Parser::new().parse(statement, &mut env) {
            Ok(Some(invocation)) => invocation,
            Ok(None) => return None,
            Err(e) => return Some(CommandResult::error(e.to_string())),
        };

        log::debug!("dispatching: {invocation}");
        let result = self.registry.dispatch(&invocation, &mut env);

        if invocation.name().eq_ignore_ascii_case("exit") && !result.is_error() {
            self.exit_requested = true;
        }
        Some(result)
    }
}

/// Split a line on unquoted `;`, dropping empty statements.
fn split_statements(line: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                current.push(ch);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            },
            '\'' | '"' => {
                match quote {
                    Some(open) if open == ch => quote = None,
                    Some(_) => {},
                    None => quote = Some(ch),
                }
                current.push(ch);
            },
            ';' if quote.is_none() => {
                let statement = current.trim();
                if !statement.is_empty() {
                    statements.push(statement.to_string());
                }
                current.clear();
            },
            _ => current.push(ch),
        }
    }

    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Command;
    use conch_store::MemoryStore;
    use conch_types::Result;

    struct PrintCmd;
    impl Command for PrintCmd {
        fn name(&self) -> &str {
            "print"
        }
        fn aliases(&self) -> &[&str] {
            &["echo"]
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "print [text...]"
        }
        fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
            Ok(CommandResult::success(args.join(" ")))
        }
    }

    struct ExitCmd;
    impl Command for ExitCmd {
        fn name(&self) -> &str {
            "exit"
        }
        fn description(&self) -> &str {
            "Exit"
        }
        fn usage(&self) -> &str {
            "exit"
        }
        fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
            Ok(CommandResult::success("Exiting..."))
        }
    }

    fn shell() -> Shell {
        let mut shell = Shell::new(Box::new(MemoryStore::new()));
        shell.registry_mut().register(Box::new(PrintCmd));
        shell.registry_mut().register(Box::new(ExitCmd));
        shell
    }

    #[test]
    fn split_statements_basic() {
        assert_eq!(split_statements("a;b;c"), ["a", "b", "c"]);
    }

    #[test]
    fn split_statements_skips_empties() {
        assert_eq!(split_statements("a;;c"), ["a", "c"]);
        assert_eq!(split_statements("a;b;"), ["a", "b"]);
        assert_eq!(split_statements(";;"), Vec::<String>::new());
    }

    #[test]
    fn split_statements_respects_quotes() {
        assert_eq!(split_statements("print \"a;b\";print c"), [
            "print \"a;b\"",
            "print c"
        ]);
        assert_eq!(split_statements("print 'x;y'"), ["print 'x;y'"]);
    }

    #[test]
    fn run_line_dispatches_each_statement() {
        let mut sh = shell();
        let results = sh.run_line("print one; print two");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].output(), "one");
        assert_eq!(results[1].output(), "two");
    }

    #[test]
    fn run_line_skips_empty_statements() {
        let mut sh = shell();
        let results = sh.run_line("print a;;print c");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].output(), "a");
        assert_eq!(results[1].output(), "c");
    }

    #[test]
    fn run_line_empty_input_yields_nothing() {
        let mut sh = shell();
        assert!(sh.run_line("").is_empty());
        assert!(sh.run_line("   ").is_empty());
        assert!(sh.run_line(" ; ; ").is_empty());
    }

    #[test]
    fn unknown_command_surfaces_as_error_result() {
        let mut sh = shell();
        let results = sh.run_line("zzz");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_error());
        assert!(results[0].output().contains("Unknown command: zzz"));
    }

    #[test]
    fn parse_failure_does_not_stop_later_statements() {
        let mut sh = shell();
        sh.run_line("print ok"); // warm-up, no aliases yet
        // Build a mutual alias loop directly in the store.
        let results = {
            sh.store.put("alias_a", "b");
            sh.store.put("alias_b", "a");
            sh.run_line("a; print after")
        };
        assert_eq!(results.len(), 2);
        assert!(results[0].is_error());
        assert_eq!(results[1].output(), "after");
    }

    #[test]
    fn exit_sets_flag() {
        let mut sh = shell();
        assert!(!sh.exit_requested());
        let results = sh.run_line("print hi; exit");
        assert_eq!(results.len(), 2);
        assert!(sh.exit_requested());
    }

    #[test]
    fn substitution_works_through_run_line() {
        let mut sh = shell();
        let results = sh.run_line("print $(print hi)");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].output(), "hi");
    }
}
