//! Tessel Render Protocol
//!
//! The per-tick command buffer sent to an external renderer, and the
//! backend contract that receives it.

mod backend;
mod codec;
mod command;

pub use backend::{MirrorBackend, MirrorNode, RenderBackend};
pub use codec::{DecodeError, decode, encode, try_decode};
pub use command::{Command, FieldMask, Op};
