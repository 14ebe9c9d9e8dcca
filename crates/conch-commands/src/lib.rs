//! Built-in command handlers for the conch shell.
//!
//! Commands are grouped by concern; each module exposes a `register_*`
//! function, and [`register_builtins`] wires the full set into a registry.

mod file_commands;
mod state_commands;
mod system_commands;
mod text_commands;

pub use file_commands::register_file_commands;
pub use state_commands::register_state_commands;
pub use system_commands::register_system_commands;
pub use text_commands::register_text_commands;

use conch_shell::CommandRegistry;

/// Register every built-in command (text, state, filesystem, session).
pub fn register_builtins(reg: &mut CommandRegistry) {
    register_text_commands(reg);
    register_state_commands(reg);
    register_file_commands(reg);
    register_system_commands(reg);
    log::debug!("registered {} built-in commands", reg.list_commands().len());
}
