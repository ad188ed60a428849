//! Pipeline stages for XML corpus normalization.
//!
//! Each submodule implements exactly one transformation step; all of them are
//! pure functions over strings, so they are tested in isolation and the file
//! I/O lives elsewhere ([`crate::preprocess`]).
//!
//! ## Data Flow
//!
//! ```text
//! file name ──▶ encoding ──▶ declaration ──▶ entities
//!  (detect)     (decode)     (legacy only)   (standard, then Greek)
//! ```
//!
//! 1. [`encoding`]: pick ISO-8859-1 or UTF-8 from the file number and
//!    decode the raw bytes
//! 2. [`declaration`]: replace `encoding="ISO-8859-1"` with
//!    `encoding="UTF-8"` in legacy files
//! 3. [`entities`]: decode standard and custom Greek references
//! 4. [`normalize`]: steps 2 and 3 as one call

pub mod declaration;
pub mod encoding;
pub mod entities;
pub mod normalize;
