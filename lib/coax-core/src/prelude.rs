//! Prelude module for convenient imports.
//!
//! ```ignore
//! use coax_core::prelude::*;
//! ```

pub use crate::transform::{Coerce, FromConfig, Transform, field};
pub use crate::{
    Decoder, Effect, Envelope, Error, Model, ModelShape, Outcome, Result, Shaped, UrlConfig,
    classify, serde_model,
};
