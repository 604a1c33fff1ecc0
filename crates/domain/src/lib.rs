//! # arthur-domain
//!
//! Pure domain model for the arthur command pipeline.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (`blinds`, `switch`, `lock`) and their **Actions**
//! - Define the fixed **capability table** (allowed actions, state codes, cool-downs)
//! - Define **Commands** as extracted from model output and their validated form
//! - Parse the hybrid (fenced JSON + summary) model output into an
//!   [`InterpretationResult`](interpretation::InterpretationResult)
//! - Define dispatch outcomes, debounce entries, and the UI-facing
//!   [`PipelineResult`](result::PipelineResult)
//! - Define **Events** (actuation records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod capability;
pub mod command;
pub mod debounce;
pub mod device;
pub mod dispatch;
pub mod event;
pub mod interpretation;
pub mod result;
pub mod state;
pub mod user;
