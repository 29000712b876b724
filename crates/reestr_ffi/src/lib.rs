//! C ABI boundary for the reestr directory core.
//!
//! Built as a `cdylib`/`staticlib` so a desktop shell can consume the core
//! over P/Invoke. All exported functions live in [`api`].

pub mod api;
