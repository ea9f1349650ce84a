//! Aggregates: reducers that own one slice of operational state.
//!
//! Each aggregate follows the same shape: commands are validated against
//! current state, valid commands become events, and events are the only
//! thing that mutates state. Validation failures become a
//! `ValidationFailed` event recorded in `last_error` rather than a hard
//! error.

pub mod rules;
pub mod summary;
pub mod ticket;
