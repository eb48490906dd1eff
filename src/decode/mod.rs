//! Decoding of content API payloads
//!
//! Two layers:
//! - [`decode_entry`] turns one raw record into an [`EntryOutcome`]
//! - [`decode_page`] walks a paginated envelope, keeping what decodes and reporting
//!   the rest in a [`DecodeReport`]
//!
//! [`encode_entry`] writes an entry back in the same wire shape.

mod entry;
mod page;
mod raw;

pub use entry::{EntryOutcome, decode_entry, encode_entry};
pub use page::{DecodeReport, DecodedPage, decode_page};
