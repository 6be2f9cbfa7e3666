//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and macros
//! for easy glob importing:
//!
//! ```ignore
//! use coax::prelude::*;
//! ```

pub use crate::transform::{Base64Image, Image, PictureList, PictureUrl, Transform, field};
pub use crate::url::Url;
pub use crate::{
    Call, Decoder, Effect, Error, Model, Outcome, Result, Session, SessionConfig, UrlConfig,
    serde_model,
};
pub use serde::{Deserialize, Serialize};
