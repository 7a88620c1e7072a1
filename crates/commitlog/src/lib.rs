//! A chunk-partitioned, delta-encoded, in-memory commit log.
//!
//! A [`Buffer`] accumulates [`Value`](rowstore_value::Value)-typed writes
//! targeted at row handles; a [`Reader`] replays them back in order. Rows
//! are partitioned into [`CHUNK_SIZE`]-row chunks, and within a chunk every
//! entry after the first is delta-encoded against the previous one, so that
//! the common case of densely increasing handles costs one or two bytes of
//! offset per entry. See [`buffer`] for the wire format in full.

mod buffer;
mod reader;
mod types;
mod varint;

pub mod error;

pub use buffer::{chunk_of, Buffer, CHUNK_SIZE};
pub use error::{Error, Result};
pub use reader::{Number, Reader};
pub use types::Type;
