//! JSON exchanged with the content service.

mod envelope;
mod wire;

pub use envelope::{decode_ack, decode_envelope};
pub use wire::{RawQuestion, RawScoreRecord, into_questions};
