//! Cursor module
//!
//! Encodes a traversal position into an opaque, URL-safe token and back.
//!
//! # Overview
//!
//! A [`Position`] is a resumption link plus the number of items to skip in
//! the page at that link. [`Position::encode`] turns it into a token that can
//! be handed to callers verbatim; [`Position::decode`] restores it. The empty
//! token is the canonical form of the empty position (before the first item
//! or after the last one).

mod position;

pub use position::Position;
