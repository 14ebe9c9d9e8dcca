//! Interactive conch shell entry point.
//!
//! Reads lines from stdin, runs them through the interpreter, and prints
//! each statement's output. State (aliases, cached values) persists across
//! sessions through a JSON-backed store.

mod config;

use std::io::{BufRead, Write};
use std::path::Path;

use conch_commands::register_builtins;
use conch_shell::Shell;
use conch_store::JsonStore;
use conch_types::Result;

use config::AppConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load(Path::new("conch.toml"))?;
    log::info!("using store file {}", config.cache_file.display());

    let store = JsonStore::open(&config.cache_file);
    let mut shell = Shell::new(Box::new(store));
    register_builtins(shell.registry_mut());
    shell.registry_mut().set_clear_hook(Box::new(|| {
        // ANSI: erase display, home the cursor.
        print!("\x1b[2J\x1b[H");
        let _ = std::io::stdout().flush();
    }));

    if config.show_welcome {
        println!("conch {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}{}", shell.cwd().display(), config.prompt);
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        for result in shell.run_line(&line) {
            if result.is_error() {
                eprintln!("ERROR: {}", result.output());
            } else if result.has_output() {
                println!("{}", result.output());
            }
        }

        if shell.exit_requested() {
            break;
        }
    }

    Ok(())
}
