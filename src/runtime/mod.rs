// src/runtime/mod.rs
//! Runtime components for executing statements

pub mod context;
pub mod interpreter;
pub mod shared;
pub mod transcript;
pub mod validator;
pub mod value;

pub use context::{RunOutput, Session};
pub use interpreter::Interpreter;
pub use shared::SharedSession;
pub use transcript::Transcript;
pub use value::Value;
