//! # arthur-adapter-virtual
//!
//! Simulated collaborators for running arthur without network access.
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualStateStore`] | `DeviceStateStore` | In-memory map; failures and latency can be injected per node |
//! | [`ScriptedLanguageModel`] | `LanguageModel` | Keyword-driven canned replies in the hybrid "fenced JSON + summary" format |
//!
//! ## Dependency rule
//!
//! Depends on `arthur-app` (port traits) and `arthur-domain` only.

mod model;
mod state_store;

pub use model::ScriptedLanguageModel;
pub use state_store::{VirtualStateStore, VirtualStoreError};
