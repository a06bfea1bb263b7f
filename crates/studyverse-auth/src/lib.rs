//! # studyverse-auth
//!
//! Identity and profile boundary.
//!
//! The study features only need to know who is signed in and which academic
//! defaults (class, board) their profile carries. Both concerns sit behind
//! traits so a hosted identity service or document store can be plugged in;
//! the in-memory implementations here back the CLI and the tests.

#![deny(unsafe_code)]

pub mod errors;
pub mod identity;
pub mod profile;

pub use errors::{AuthError, AuthResult};
pub use identity::{FederatedProvider, Identity, IdentityProvider, InMemoryIdentityProvider};
pub use profile::{InMemoryProfileStore, ProfileStore, UserProfile};
