//! Foundational primitives for CPU mip-chain generation.
//!
//! ## Pixels
//! [`Rgba8`] is the only pixel format handled by the pyramid builder. Its
//! memory order is `r, g, b, a`, so a `&[Rgba8]` has the same layout as a
//! tightly packed `R8G8B8A8_UNORM` texture row.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! This allows borrowed views over padded buffers and subviews.

mod error;
mod image;
mod pixel;

pub use error::{Error, mip_level_index};
pub use image::{Image, ImageView};
pub use pixel::Rgba8;
