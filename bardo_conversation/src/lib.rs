#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Conversation state and navigation over alternative answers.
//!
//! Each turn against the backend yields up to three alternative answers.
//! A [`Conversation`] owns a fixed three-slot ring of those alternatives,
//! a cursor selecting the current one, and the session reference needed to
//! continue whichever branch the cursor points at. The [`SessionStore`]
//! maps generated ids to conversation handles and serializes access per
//! handle; it is meant to be owned by whatever front end drives the chat,
//! not held in a process-wide global.

mod conversation;
mod store;

pub use conversation::{AnswerVariant, Conversation};
pub use store::SessionStore;
