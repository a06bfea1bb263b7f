//! # studyverse-runtime
//!
//! [`StudySession`] is the single owner of per-user study state: the
//! generation gateway, the history lists, the active quiz attempt, the open
//! tutor conversation, the focus timer and the signed-in profile.
//!
//! Hosts (the CLI, tests) hold one session and drive it through `&mut self`
//! methods, so there is no shared mutable state and no internal locking.

#![deny(unsafe_code)]

pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::{Dashboard, StudySession};
