//! Raster helpers on top of the `image` crate.
//!
//! The pipeline only ever handles owned 8-bit buffers (`RgbImage` for the
//! photographed page, `GrayImage` for everything derived from it), so these
//! helpers work on the concrete `image` types directly.
pub mod io;
pub mod ops;
pub mod rect;

pub use self::ops::{
    column_ink_profile, crop, downscale_half, gamma_correct, ink_count, ink_density, resize_to,
    threshold_inv, to_gray,
};
pub use self::rect::Rect;
