//! Application services — the pipeline components.
//!
//! Each service accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod debounce;
pub mod dispatcher;
pub mod interpreter;
pub mod pipeline;
pub mod presenter;
pub mod validator;
