//! Filesystem commands: read, write, ls, mkdir, touch, rm, cd, pwd, open.

use std::fs;
use std::path::{Component, Path, PathBuf};

use conch_shell::{Command, CommandResult, Environment};
use conch_types::{ConchError, Result};

/// Resolve user input against the shell cwd: `~` expands to the home
/// directory, absolute paths pass through, everything else is joined to the
/// cwd. The result is normalized lexically (no filesystem access), so `..`
/// never escapes through a symlink surprise at resolution time.
pub(crate) fn resolve_path(cwd: &Path, input: &str) -> PathBuf {
    let expanded = if let Some(rest) = input.strip_prefix("~") {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/".to_string());
        format!("{home}{rest}")
    } else {
        input.to_string()
    };

    let candidate = PathBuf::from(&expanded);
    let joined = if candidate.is_absolute() {
        candidate
    } else {
        cwd.join(candidate)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

// ---------------------------------------------------------------------------
// read
// ---------------------------------------------------------------------------

struct ReadCmd;
impl Command for ReadCmd {
    fn name(&self) -> &str {
        "read"
    }
    fn description(&self) -> &str {
        "Show the contents of a file"
    }
    fn usage(&self) -> &str {
        "read <file> [-n]"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let mut number_lines = false;
        let mut file = None;
        for arg in args {
            match arg.as_str() {
                "-n" => number_lines = true,
                _ => file = Some(arg.as_str()),
            }
        }
        let Some(file) = file else {
            return Err(ConchError::Command("usage: read <file> [-n]".to_string()));
        };

        let path = resolve_path(env.cwd, file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                return Ok(CommandResult::error(format!(
                    "Cannot read file {}: {e}",
                    path.display()
                )));
            },
        };

        if number_lines {
            let numbered: Vec<String> = text
                .lines()
                .enumerate()
                .map(|(i, line)| format!("{:4} | {line}", i + 1))
                .collect();
            Ok(CommandResult::success(numbered.join("\n")))
        } else {
            Ok(CommandResult::success(text))
        }
    }
}

// ---------------------------------------------------------------------------
// write
// ---------------------------------------------------------------------------

struct WriteCmd;
impl Command for WriteCmd {
    fn name(&self) -> &str {
        "write"
    }
    fn description(&self) -> &str {
        "Write text to a file"
    }
    fn usage(&self) -> &str {
        "write [-a] <file> <text...>"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let mut append = false;
        let mut rest: Vec<&str> = Vec::new();
        for arg in args {
            match arg.as_str() {
                "-a" => append = true,
                other => rest.push(other),
            }
        }
        let &[file, ref text @ ..] = rest.as_slice() else {
            return Err(ConchError::Command(
                "usage: write [-a] <file> <text...>".to_string(),
            ));
        };
        if text.is_empty() {
            return Err(ConchError::Command(
                "usage: write [-a] <file> <text...>".to_string(),
            ));
        }

        let path = resolve_path(env.cwd, file);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // A literal \n token in the input becomes a real line break.
        let content = text.join(" ").replace("\\n", "\n");
        if append {
            let mut existing = fs::read_to_string(&path).unwrap_or_default();
            if !existing.is_empty() && !existing.ends_with('\n') {
                existing.push('\n');
            }
            existing.push_str(&content);
            fs::write(&path, existing)?;
            Ok(CommandResult::success(format!(
                "Content appended to file: {}",
                path.display()
            )))
        } else {
            fs::write(&path, content)?;
            Ok(CommandResult::success(format!(
                "Content written to file: {}",
                path.display()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn aliases(&self) -> &[&str] {
        &["dir"]
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let path = match args.first() {
            Some(arg) => resolve_path(env.cwd, arg),
            None => env.cwd.clone(),
        };

        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                return Ok(CommandResult::error(format!(
                    "Cannot list {}: {e}",
                    path.display()
                )));
            },
        };

        let mut names: Vec<String> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                name.push('/');
            }
            names.push(name);
        }
        names.sort();

        let mut out = format!("Directory: {}", path.display());
        if names.is_empty() {
            out.push_str("\nDirectory is empty.");
        } else {
            for name in names {
                out.push('\n');
                out.push_str(&name);
            }
        }
        Ok(CommandResult::success(out))
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn usage(&self) -> &str {
        "mkdir <path>"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Err(ConchError::Command("usage: mkdir <path>".to_string()));
        };
        let path = resolve_path(env.cwd, arg);
        if path.exists() {
            return Ok(CommandResult::error(format!(
                "Path already exists: {}",
                path.display()
            )));
        }
        fs::create_dir_all(&path)?;
        Ok(CommandResult::success(format!(
            "Directory created: {}",
            path.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn description(&self) -> &str {
        "Create an empty file"
    }
    fn usage(&self) -> &str {
        "touch <file>"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Err(ConchError::Command("usage: touch <file>".to_string()));
        };
        let path = resolve_path(env.cwd, arg);
        if path.exists() {
            return Ok(CommandResult::error(format!(
                "Path already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(&path)?;
        Ok(CommandResult::success(format!(
            "File created: {}",
            path.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn aliases(&self) -> &[&str] {
        &["remove", "delete", "del"]
    }
    fn description(&self) -> &str {
        "Delete files or directories"
    }
    fn usage(&self) -> &str {
        "rm <path...>"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        if args.is_empty() {
            return Err(ConchError::Command("usage: rm <path...>".to_string()));
        }

        let mut failures: Vec<String> = Vec::new();
        for arg in args {
            let path = resolve_path(env.cwd, arg);
            let outcome = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = outcome {
                failures.push(format!("{}: {e}", path.display()));
            }
        }

        if failures.is_empty() {
            Ok(CommandResult::success("Deletion completed successfully."))
        } else {
            Ok(CommandResult::error(format!(
                "Failed to delete:\n{}",
                failures.join("\n")
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change the working directory"
    }
    fn usage(&self) -> &str {
        "cd [path]"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Ok(CommandResult::success(env.cwd.display().to_string()));
        };
        let path = resolve_path(env.cwd, arg);
        if !path.is_dir() {
            return Ok(CommandResult::error(format!(
                "Not a directory: {}",
                path.display()
            )));
        }
        *env.cwd = path;
        Ok(CommandResult::success(""))
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print the working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, _args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::success(env.cwd.display().to_string()))
    }
}

// ---------------------------------------------------------------------------
// open
// ---------------------------------------------------------------------------

struct OpenCmd;
impl Command for OpenCmd {
    fn name(&self) -> &str {
        "open"
    }
    fn description(&self) -> &str {
        "Open a file or URL with the system handler"
    }
    fn usage(&self) -> &str {
        "open <path|url>"
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Err(ConchError::Command("usage: open <path|url>".to_string()));
        };

        let target = if arg.contains("://") {
            arg.clone()
        } else {
            resolve_path(env.cwd, arg).display().to_string()
        };

        #[cfg(target_os = "macos")]
        let launcher = "open";
        #[cfg(target_os = "windows")]
        let launcher = "explorer";
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let launcher = "xdg-open";

        match std::process::Command::new(launcher).arg(&target).spawn() {
            Ok(_) => Ok(CommandResult::success(format!("Opening: {target}"))),
            Err(e) => Ok(CommandResult::error(format!("Cannot open {target}: {e}"))),
        }
    }
}

pub fn register_file_commands(reg: &mut conch_shell::CommandRegistry) {
    reg.register(Box::new(ReadCmd));
    reg.register(Box::new(WriteCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(TouchCmd));
    reg.register(Box::new(RmCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(OpenCmd));
}
