//! Foundation types shared by every conch crate.

pub mod error;

pub use error::{ConchError, Result};
