//! # arthur-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `LanguageModel` — turns an utterance plus system instruction into hybrid text
//!   - `DeviceStateStore` — writes one integer state code at a store path
//!   - `EventPublisher` — broadcasts actuation events
//!   - `Clock` — current time for cool-down bookkeeping
//! - Implement the pipeline components as services:
//!   - `CommandInterpreter` — model call + structural extraction
//!   - `ActionValidator` — capability-table check
//!   - `DebounceGuard` — per-(user, device) cool-down windows
//!   - `DeviceDispatcher` — one state write per command, independent outcomes
//!   - `ResponsePresenter` — UI-facing result
//!   - `CommandPipeline` — the `submit_command` entry point wiring them together
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `arthur-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
