//! Command trait, registry, and dispatch.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use conch_store::KvStore;
use conch_types::Result;

use crate::vars::VarTable;

/// A resolved command name plus its argument list, ready for dispatch.
///
/// The name is never an unresolved alias; alias resolution is total before
/// an invocation is built (or fails closed to the literal name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    name: String,
    args: Vec<String>,
}

impl ParsedInvocation {
    /// Build an invocation.
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument list, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ParsedInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of one command execution: an error flag plus output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    error: bool,
    output: String,
}

impl CommandResult {
    /// A successful result with output text.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            error: false,
            output: output.into(),
        }
    }

    /// An error result with a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            output: message.into(),
        }
    }

    /// Whether this result indicates an error.
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// The output text (error message for error results).
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Whether the output is worth showing (non-empty, not all whitespace).
    pub fn has_output(&self) -> bool {
        !self.output.trim().is_empty()
    }
}

/// Shared mutable interpreter state passed to every command.
///
/// All state is borrowed from the host (the [`Shell`](crate::Shell) or a
/// test harness); nothing here is global. The registry reference lets
/// handlers that orchestrate other commands (`help`, `script`) re-enter the
/// pipeline without a side channel.
pub struct Environment<'a> {
    /// The registry this invocation is dispatched through.
    pub registry: &'a CommandRegistry,
    /// Current working directory for file commands.
    pub cwd: &'a mut PathBuf,
    /// Shell variable table.
    pub vars: &'a mut VarTable,
    /// Durable key/value store (user aliases, cached values).
    pub store: &'a mut dyn KvStore,
}

/// A single executable command.
pub trait Command {
    /// The canonical command name (what the user types).
    fn name(&self) -> &str;

    /// Static, compiled-in alias names for this command. Distinct from
    /// user-defined aliases, which live in the key/value store.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "read <file> [-n]").
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult>;
}

/// Registry of available commands with case-insensitive dispatch.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<String, usize>,
    clear_hook: Option<Box<dyn Fn()>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            clear_hook: None,
        }
    }

    /// Register a command under its canonical name and every static alias,
    /// case-insensitively. Re-registering a canonical name replaces the old
    /// handler entirely: its remaining names are evicted so it neither
    /// lingers in listings nor stays reachable through a stale alias.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let idx = self.commands.len();
        let canonical = cmd.name().to_ascii_lowercase();
        if let Some(shadowed) = self.index.get(&canonical).copied() {
            self.index.retain(|_, i| *i != shadowed);
        }
        self.index.insert(canonical, idx);
        for alias in cmd.aliases() {
            self.index.insert(alias.to_ascii_lowercase(), idx);
        }
        self.commands.push(cmd);
    }

    /// Install the presentation side-channel fired when `clear` dispatches.
    ///
    /// The clear handler itself has no access to presentation state, so the
    /// dispatcher signals the host instead.
    pub fn set_clear_hook(&mut self, hook: Box<dyn Fn()>) {
        self.clear_hook = Some(hook);
    }

    /// Look up a command by name or static alias (case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| self.commands[idx].as_ref())
    }

    /// Iterate over live commands, one entry per handler (aliases are not
    /// repeated, replaced handlers are skipped), in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(idx, cmd)| self.index.get(&cmd.name().to_ascii_lowercase()) == Some(idx))
            .map(|(_, cmd)| cmd.as_ref())
    }

    /// Sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> =
            self.iter().map(|c| (c.name(), c.description())).collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Execute a fully resolved invocation.
    ///
    /// An unknown name yields an error result rather than a hard failure; a
    /// handler `Err` is folded into an error result the same way, so every
    /// dispatch produces exactly one uniform [`CommandResult`]. There are no
    /// retries.
    pub fn dispatch(
        &self,
        invocation: &ParsedInvocation,
        env: &mut Environment<'_>,
    ) -> CommandResult {
        let Some(cmd) = self.lookup(invocation.name()) else {
            return CommandResult::error(format!("Unknown command: {}", invocation.name()));
        };

        // Clearing the display needs presentation access the handler does
        // not have; signal the host from dispatch instead.
        if cmd.name() == "clear"
            && let Some(hook) = &self.clear_hook
        {
            hook();
        }

        match cmd.execute(invocation.args(), env) {
            Ok(result) => result,
            Err(e) => CommandResult::error(e.to_string()),
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conch_store::MemoryStore;
    use std::cell::Cell;
    use std::rc::Rc;

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

    struct ClearCmd;
    impl Command for ClearCmd {
        fn name(&self) -> &str {
            "clear"
        }
        fn aliases(&self) -> &[&str] {
            &["cls"]
        }
        fn description(&self) -> &str {
            "Clear the output"
        }
        fn usage(&self) -> &str {
            "clear"
        }
        fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
            Ok(CommandResult::success(""))
        }
    }

    struct Harness {
        cwd: PathBuf,
        vars: VarTable,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                cwd: PathBuf::from("/"),
                vars: VarTable::new(),
                store: MemoryStore::new(),
            }
        }

        fn env<'a>(&'a mut self, registry: &'a CommandRegistry) -> Environment<'a> {
            Environment {
                registry,
                cwd: &mut self.cwd,
                vars: &mut self.vars,
                store: &mut self.store,
            }
        }
    }

    #[test]
    fn dispatch_runs_handler() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(PrintCmd));
        let mut harness = Harness::new();
        let inv = ParsedInvocation::new("print", vec!["hi".into(), "there".into()]);
        let result = registry.dispatch(&inv, &mut harness.env(&registry));
        assert!(!result.is_error());
        assert_eq!(result.output(), "hi there");
    }

    #[test]
    fn unknown_command_is_error_result() {
        let registry = CommandRegistry::new();
        let mut harness = Harness::new();
        let inv = ParsedInvocation::new("zzz", vec![]);
        let result = registry.dispatch(&inv, &mut harness.env(&registry));
        assert!(result.is_error());
        assert!(result.output().contains("Unknown command: zzz"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(PrintCmd));
        assert!(registry.lookup("PRINT").is_some());
        assert!(registry.lookup("Echo").is_some());
    }

    #[test]
    fn static_alias_dispatches_same_handler() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(PrintCmd));
        let mut harness = Harness::new();
        let inv = ParsedInvocation::new("echo", vec!["x".into()]);
        let result = registry.dispatch(&inv, &mut harness.env(&registry));
        assert_eq!(result.output(), "x");
    }

    #[test]
    fn clear_fires_hook_even_via_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(ClearCmd));
        let fired = Rc::new(Cell::new(0u32));
        let probe = Rc::clone(&fired);
        registry.set_clear_hook(Box::new(move || probe.set(probe.get() + 1)));

        let mut harness = Harness::new();
        let inv = ParsedInvocation::new("clear", vec![]);
        registry.dispatch(&inv, &mut harness.env(&registry));
        let inv = ParsedInvocation::new("cls", vec![]);
        registry.dispatch(&inv, &mut harness.env(&registry));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn hook_does_not_fire_for_other_commands() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(PrintCmd));
        registry.register(Box::new(ClearCmd));
        let fired = Rc::new(Cell::new(false));
        let probe = Rc::clone(&fired);
        registry.set_clear_hook(Box::new(move || probe.set(true)));

        let mut harness = Harness::new();
        let inv = ParsedInvocation::new("print", vec![]);
        registry.dispatch(&inv, &mut harness.env(&registry));
        assert!(!fired.get());
    }

    struct LoudPrintCmd;
    impl Command for LoudPrintCmd {
        fn name(&self) -> &str {
            "print"
        }
        fn description(&self) -> &str {
            "Print arguments, loudly"
        }
        fn usage(&self) -> &str {
            "print [text...]"
        }
        fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
            Ok(CommandResult::success(args.join(" ").to_ascii_uppercase()))
        }
    }

    #[test]
    fn reregistering_a_name_replaces_the_old_handler() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(PrintCmd));
        registry.register(Box::new(LoudPrintCmd));

        let mut harness = Harness::new();
        let inv = ParsedInvocation::new("print", vec!["hi".into()]);
        let result = registry.dispatch(&inv, &mut harness.env(&registry));
        assert_eq!(result.output(), "HI");

        // The replaced handler's alias goes with it, and listings show the
        // survivor exactly once.
        assert!(registry.lookup("echo").is_none());
        assert_eq!(registry.iter().count(), 1);
        let names: Vec<&str> = registry.list_commands().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["print"]);
    }

    #[test]
    fn list_commands_is_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(PrintCmd));
        registry.register(Box::new(ClearCmd));
        let names: Vec<&str> = registry.list_commands().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["clear", "print"]);
    }

    #[test]
    fn has_output_ignores_whitespace() {
        assert!(!CommandResult::success("").has_output());
        assert!(!CommandResult::success("  \n\t").has_output());
        assert!(CommandResult::success("x").has_output());
        assert!(CommandResult::error("boom").has_output());
    }

    #[test]
    fn invocation_display_joins_args() {
        let inv = ParsedInvocation::new("ls", vec!["-la".into(), "/tmp".into()]);
        assert_eq!(inv.to_string(), "ls -la /tmp");
    }
}
