//! Secret name parsing and config tree assembly
//!
//! Secrets in a remote store are flat, delimited names like
//! `acme/prod/db/password`. This crate turns collections of those names and
//! their values back into one nested configuration object:
//!
//! - [`KeyScheme`]: strips namespace/environment prefixes from names on the
//!   read path and composes them back on the write path
//! - [`ConfigTree`]: folds `(path, value)` pairs into a nested JSON mapping,
//!   decoding JSON-encoded secret values along the way
//!
//! Everything here is pure logic with no I/O; the store-facing half lives in
//! `secretfold-store`.

mod key;
mod tree;

pub use key::{EnvScope, KeyScheme};
pub use tree::ConfigTree;
