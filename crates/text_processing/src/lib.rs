//! Text processing for the concierge
//!
//! This crate provides:
//! - **Normalization**: lower-case and trim an utterance before matching
//! - **Intent Matching**: ordered keyword rules resolving to an FAQ topic
//! - **Validation**: loose checks for names, email-like tokens and phone-like
//!   digit runs used by lead capture
//!
//! # Example
//!
//! ```
//! use concierge_core::ResponseKey;
//! use concierge_text_processing::IntentMatcher;
//!
//! let matcher = IntentMatcher::new();
//! assert_eq!(matcher.classify("How much does a logo COST?"), ResponseKey::Pricing);
//! ```

pub mod intent;
pub mod normalize;
pub mod validation;

mod error;

pub use error::{Result, TextProcessingError};
pub use intent::{IntentMatch, IntentMatcher, IntentRule};
pub use normalize::{is_blank, normalize};
pub use validation::{FieldValidator, Validation};
