//! Core error type

use thiserror::Error;

use crate::lead::{CaptureState, LeadField};

/// Errors raised by core type operations
///
/// None of these reach a visitor: the conversational path re-prompts
/// instead of failing. They guard programmer mistakes such as filling a
/// lead field out of order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Field {field} cannot be filled while capture is {state}")]
    OutOfOrder { field: LeadField, state: CaptureState },

    #[error("Lead record is incomplete: missing {0}")]
    IncompleteLead(LeadField),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: LeadField, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
