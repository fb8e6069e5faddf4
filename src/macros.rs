//! # Internal Macros
//!
//! This module provides internal macros for reducing boilerplate in pxread.
//!
//! ## zerocopy_getters!
//!
//! Generates getter methods for zerocopy struct fields that use
//! little-endian wrapper types (U16, U32, U64). The on-disk structures this
//! crate reads are never written back, so only getters are generated.
//!
//! ### Usage
//!
//! ```ignore
//! use zerocopy::little_endian::U16;
//!
//! #[repr(C)]
//! struct BlockHeader {
//!     reserved: U16,
//! }
//!
//! impl BlockHeader {
//!     zerocopy_getters! {
//!         reserved: u16,
//!     }
//! }
//!
//! // Generates:
//! // pub fn reserved(&self) -> u16 { self.reserved.get() }
//! ```

/// Generates getter methods for zerocopy little-endian fields (read-only).
#[macro_export]
macro_rules! zerocopy_getters {
    ($($field:ident : $native_ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $field(&self) -> $native_ty {
                self.$field.get()
            }
        )*
    };
}
