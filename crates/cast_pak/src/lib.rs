//! Compiled resources and the `.pak` files that hold them.
//!
//! [`codec`] turns source files into [`ResourcePayload`]s, and a [`Pak`] stores
//! the payloads of one content group and reads/writes them to disk.

pub mod codec;
mod error;
mod pak;
mod payload;

pub use error::{CodecError, PakError};
pub use pak::*;
pub use payload::*;
