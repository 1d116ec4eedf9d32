//! The boundary between the chat assistant and an LLM service.
//!
//! This crate describes what the assistant sends to a model (the full
//! transcript plus the tools it may call) and what comes back (an ordered
//! list of output entries). Providers for concrete services implement
//! [`ModelProvider`] in their own crates.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod opaque;
mod provider;
mod request;
mod response;

pub use error::*;
pub use opaque::*;
pub use provider::*;
pub use request::*;
pub use response::*;
