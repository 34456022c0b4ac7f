//! Runtime model for compiled programs
//!
//! Values, binding scopes, the root context and the built-in keywords.

pub mod builtins;
pub mod context;
pub mod env;
pub mod value;

pub use context::{Args, Context, HostError, Keyword, KeywordFn, Keywords};
pub use env::Scope;
pub use value::{Function, HostObject, Value};
