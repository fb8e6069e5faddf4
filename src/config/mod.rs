//! # pxread Configuration
//!
//! Re-exports the on-disk format constants. Import from this module rather
//! than defining values locally:
//!
//! ```ignore
//! use pxread::config::{BLOCK_ALIGN, LOB_POINTER_SIZE};
//! ```

mod constants;

pub use constants::*;
