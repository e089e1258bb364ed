#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use sdfgen_field as field;

#[doc(inline)]
pub use sdfgen_image as image;

#[doc(inline)]
pub use sdfgen_io as io;
