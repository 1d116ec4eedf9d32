//! An out-of-the-box chat assistant that assembles tools and model providers.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to run the assistant behind your own front end.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`chat_assistant_core`] crate.
pub mod core {
    pub use chat_assistant_core::*;
}
