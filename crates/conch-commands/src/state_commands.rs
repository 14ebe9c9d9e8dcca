//! State management commands: var, env, cache, alias.

use conch_shell::{Command, CommandResult, Environment, alias};
use conch_types::{ConchError, Result};

// ---------------------------------------------------------------------------
// var
// ---------------------------------------------------------------------------

struct VarCmd;
impl Command for VarCmd {
    fn name(&self) -> &str {
        "var"
    }
    fn description(&self) -> &str {
        "Manage shell variables"
    }
    fn usage(&self) -> &str {
        "var set <name> <value...> | var get <name> | var remove <name> | var list | var clear"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        match args.first().map(String::as_str) {
            Some("set") => {
                let (Some(name), Some(rest)) = (args.get(1), args.get(2..)) else {
                    return Err(ConchError::Command(
                        "usage: var set <name> <value...>".to_string(),
                    ));
                };
                if rest.is_empty() {
                    return Err(ConchError::Command(
                        "usage: var set <name> <value...>".to_string(),
                    ));
                }
                // Values may reference existing variables; expand at set time.
                let value = env.vars.expand(&rest.join(" "));
                env.vars.set(name, &value)?;
                Ok(CommandResult::success(format!("{name} = {value}")))
            },
            Some("get") => {
                let Some(name) = args.get(1) else {
                    return Err(ConchError::Command("usage: var get <name>".to_string()));
                };
                match env.vars.get(name) {
                    Some(value) => Ok(CommandResult::success(value)),
                    None => Ok(CommandResult::error(format!("Variable not found: {name}"))),
                }
            },
            Some("remove") => {
                let Some(name) = args.get(1) else {
                    return Err(ConchError::Command("usage: var remove <name>".to_string()));
                };
                if env.vars.unset(name) {
                    Ok(CommandResult::success(format!("Removed variable: {name}")))
                } else {
                    Ok(CommandResult::error(format!("Variable not found: {name}")))
                }
            },
            Some("list") | None => {
                let all = env.vars.all();
                if all.is_empty() {
                    return Ok(CommandResult::success("No variables defined."));
                }
                let lines: Vec<String> = all
                    .iter()
                    .map(|(name, value)| format!("{name} = {value}"))
                    .collect();
                Ok(CommandResult::success(lines.join("\n")))
            },
            Some("clear") => {
                let removed = env.vars.clear();
                Ok(CommandResult::success(format!(
                    "Cleared {removed} variable(s)."
                )))
            },
            Some(other) => Err(ConchError::Command(format!(
                "unknown var subcommand: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// env
// ---------------------------------------------------------------------------

struct EnvCmd;
impl Command for EnvCmd {
    fn name(&self) -> &str {
        "env"
    }
    fn description(&self) -> &str {
        "Show process environment variables"
    }
    fn usage(&self) -> &str {
        "env [name]"
    }
    fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
        match args.first().map(String::as_str) {
            None | Some("list") => {
                let mut entries: Vec<String> = std::env::vars()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                entries.sort();
                Ok(CommandResult::success(entries.join("\n")))
            },
            Some("set") => Ok(CommandResult::error(
                "env is read-only; use 'var set' for shell variables".to_string(),
            )),
            Some(name) => match std::env::var(name) {
                Ok(value) => Ok(CommandResult::success(value)),
                Err(_) => Ok(CommandResult::error(format!(
                    "Environment variable not found: {name}"
                ))),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// cache
// ---------------------------------------------------------------------------

struct CacheCmd;
impl Command for CacheCmd {
    fn name(&self) -> &str {
        "cache"
    }
    fn description(&self) -> &str {
        "Inspect and edit the key/value store"
    }
    fn usage(&self) -> &str {
        "cache set <key> <value...> | cache get <key> | cache remove <key> | cache list | cache clear"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        match args.first().map(String::as_str) {
            Some("set") => {
                let (Some(key), Some(rest)) = (args.get(1), args.get(2..)) else {
                    return Err(ConchError::Command(
                        "usage: cache set <key> <value...>".to_string(),
                    ));
                };
                if rest.is_empty() {
                    return Err(ConchError::Command(
                        "usage: cache set <key> <value...>".to_string(),
                    ));
                }
                env.store.put(key, &rest.join(" "));
                Ok(CommandResult::success(format!("Cached: {key}")))
            },
            Some("get") => {
                let Some(key) = args.get(1) else {
                    return Err(ConchError::Command("usage: cache get <key>".to_string()));
                };
                match env.store.get(key) {
                    Some(value) => Ok(CommandResult::success(value)),
                    None => Ok(CommandResult::error(format!("Key not found: {key}"))),
                }
            },
            Some("remove") => {
                let Some(key) = args.get(1) else {
                    return Err(ConchError::Command("usage: cache remove <key>".to_string()));
                };
                if env.store.remove(key) {
                    Ok(CommandResult::success(format!("Removed key: {key}")))
                } else {
                    Ok(CommandResult::error(format!("Key not found: {key}")))
                }
            },
            Some("list") | None => {
                let entries = env.store.list();
                if entries.is_empty() {
                    return Ok(CommandResult::success("Cache is empty."));
                }
                let lines: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key} = {value}"))
                    .collect();
                Ok(CommandResult::success(lines.join("\n")))
            },
            Some("clear") => {
                env.store.clear();
                Ok(CommandResult::success("Cache cleared."))
            },
            Some(other) => Err(ConchError::Command(format!(
                "unknown cache subcommand: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// alias
// ---------------------------------------------------------------------------

struct AliasCmd;
impl Command for AliasCmd {
    fn name(&self) -> &str {
        "alias"
    }
    fn description(&self) -> &str {
        "Manage user-defined command aliases"
    }
    fn usage(&self) -> &str {
        "alias <name> <command...> | alias remove <name> | alias clear | alias [list]"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        match args.first().map(String::as_str) {
            None | Some("list") => {
                let all = alias::all(env.store);
                if all.is_empty() {
                    return Ok(CommandResult::success("No aliases defined."));
                }
                let lines: Vec<String> = all
                    .iter()
                    .map(|(name, command)| format!("{name} = {command}"))
                    .collect();
                Ok(CommandResult::success(lines.join("\n")))
            },
            // "remove" and "clear" are reserved command names, so they can
            // never collide with an alias being defined here.
            Some("remove") => {
                let Some(name) = args.get(1) else {
                    return Err(ConchError::Command("usage: alias remove <name>".to_string()));
                };
                if alias::remove(env.store, name) {
                    Ok(CommandResult::success(format!("Removed alias: {name}")))
                } else {
                    Ok(CommandResult::error(format!("Alias not found: {name}")))
                }
            },
            Some("clear") => {
                let removed = alias::clear_all(env.store);
                Ok(CommandResult::success(format!("Cleared {removed} alias(es).")))
            },
            Some(name) => {
                let command = args[1..].join(" ");
                if command.trim().is_empty() {
                    return Err(ConchError::Command(
                        "usage: alias <name> <command...>".to_string(),
                    ));
                }
                alias::define(env.store, name, &command)?;
                Ok(CommandResult::success(format!("{name} = {command}")))
            },
        }
    }
}

pub fn register_state_commands(reg: &mut conch_shell::CommandRegistry) {
    reg.register(Box::new(VarCmd));
    reg.register(Box::new(EnvCmd));
    reg.register(Box::new(CacheCmd));
    reg.register(Box::new(AliasCmd));
}
