#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use pixmorph_image as image;

#[doc(inline)]
pub use pixmorph_imgproc as imgproc;

#[doc(inline)]
pub use pixmorph_io as io;
