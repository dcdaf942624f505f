//! Shared domain types for Callshelf.
//!
//! This crate holds the types passed between the HTTP layer and the
//! Shopify-backed list synchronizer, plus the canonical encoding of a
//! call-ID list into a metafield value. It performs no I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod types;

pub use codec::{DecodeError, decode_call_ids, encode_call_ids};
pub use types::{CallId, CallList, CustomerId, InvalidCustomerId};
