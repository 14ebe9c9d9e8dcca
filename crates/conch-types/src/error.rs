//! Error types for conch.

use std::io;

/// Errors produced by the conch interpreter and its stores.
#[derive(Debug, thiserror::Error)]
pub enum ConchError {
    #[error("command error: {0}")]
    Command(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    /// Recursive alias resolution or substitution expansion exceeded its
    /// depth limit (e.g. mutual aliases, or a command whose output keeps
    /// re-introducing `$(...)`).
    #[error("maximum recursion depth exceeded: {0}")]
    MaxDepth(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_display() {
        let e = ConchError::Command("unknown cmd".into());
        assert_eq!(format!("{e}"), "command error: unknown cmd");
    }

    #[test]
    fn parse_error_display() {
        let e = ConchError::Parse("bad token".into());
        assert_eq!(format!("{e}"), "parse error: bad token");
    }

    #[test]
    fn store_error_display() {
        let e = ConchError::Store("flush failed".into());
        assert_eq!(format!("{e}"), "store error: flush failed");
    }

    #[test]
    fn config_error_display() {
        let e = ConchError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn max_depth_display() {
        let e = ConchError::MaxDepth("alias chain".into());
        assert_eq!(
            format!("{e}"),
            "maximum recursion depth exceeded: alias chain"
        );
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: ConchError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: ConchError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: ConchError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn result_alias_roundtrip() {
        let ok: Result<i32> = Ok(42);
        assert_eq!(ok.unwrap(), 42);
        let err: Result<i32> = Err(ConchError::Store("oops".into()));
        assert!(err.is_err());
    }
}
