//! Core building blocks shared by ergo crates.
//!
//! - [`Error`] / [`Result`]
//! - the [`Distribution`] capability implemented by every distribution family
//! - the destructure/structure codec ([`Structured`], [`Destructured`])

pub mod error;
pub mod structure;
pub mod traits;

pub use error::{Error, Result};
pub use structure::{ClassNode, Destructured, NumericNode, Structured};
pub use traits::Distribution;
