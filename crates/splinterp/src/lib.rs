#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use splinterp_buffer as buffer;

#[doc(inline)]
pub use splinterp_interp as interp;
