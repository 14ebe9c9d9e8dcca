//! Session commands: help, script, clear, exit.

use std::fs;

use conch_shell::{Command, CommandResult, Environment, Parser};
use conch_types::{ConchError, Result};

use crate::file_commands::resolve_path;

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "List commands or show details for one"
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let registry = env.registry;
        match args.first() {
            None => {
                let width = registry
                    .list_commands()
                    .iter()
                    .map(|(name, _)| name.len())
                    .max()
                    .unwrap_or(0);
                let lines: Vec<String> = registry
                    .list_commands()
                    .iter()
                    .map(|(name, desc)| format!("{name:<width$}  {desc}"))
                    .collect();
                Ok(CommandResult::success(lines.join("\n")))
            },
            Some(name) => {
                let Some(cmd) = registry.lookup(name) else {
                    return Ok(CommandResult::error(format!("Unknown command: {name}")));
                };
                let mut out = format!("{}\n{}\nUsage: {}", cmd.name(), cmd.description(), cmd.usage());
                if !cmd.aliases().is_empty() {
                    out.push_str(&format!("\nAliases: {}", cmd.aliases().join(", ")));
                }
                Ok(CommandResult::success(out))
            },
        }
    }
}

// ---------------------------------------------------------------------------
// script
// ---------------------------------------------------------------------------

struct ScriptCmd;
impl Command for ScriptCmd {
    fn name(&self) -> &str {
        "script"
    }
    fn description(&self) -> &str {
        "Run commands from a file, one per line"
    }
    fn usage(&self) -> &str {
        "script <file>"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Err(ConchError::Command("usage: script <file>".to_string()));
        };

        let path = resolve_path(env.cwd, arg);
        let Ok(text) = fs::read_to_string(&path) else {
            return Ok(CommandResult::error(format!(
                "Script file not found: {}",
                path.display()
            )));
        };

        // Lines run through the full pipeline, so scripts may use variables,
        // aliases, and substitutions; `#` starts a comment line.
        let registry = env.registry;
        let mut outputs: Vec<String> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let invocation = match Parser::new().parse(line, env) {
                Ok(Some(invocation)) => invocation,
                Ok(None) => continue,
                Err(e) => {
                    outputs.push(format!("ERROR: {e}"));
                    continue;
                },
            };
            let result = registry.dispatch(&invocation, env);
            if result.is_error() {
                outputs.push(format!("ERROR: {}", result.output()));
            } else if result.has_output() {
                outputs.push(result.output().to_string());
            }
        }

        if outputs.is_empty() {
            Ok(CommandResult::success(
                "Script executed successfully with no output.",
            ))
        } else {
            Ok(CommandResult::success(outputs.join("\n")))
        }
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn aliases(&self) -> &[&str] {
        &["cls"]
    }
    fn description(&self) -> &str {
        "Clear the display"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
        // The display belongs to the host; the dispatcher fires the clear
        // hook, and this handler only has to succeed quietly.
        Ok(CommandResult::success(""))
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Exit the shell"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::success("Exiting application..."))
    }
}

pub fn register_system_commands(reg: &mut conch_shell::CommandRegistry) {
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(ScriptCmd));
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(ExitCmd));
}
