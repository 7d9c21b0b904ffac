//! CPU mip-chain generation for RGBA8 textures.
//!
//! `texmip-pyr` uses a fixed 2x2 mean downsample (box filter) with
//! truncating integer division, so results are bit-reproducible.
//!
//! Drop-odd policy:
//! - Output size is `(src.width() / 2, src.height() / 2)`.
//! - If source width or height is odd, the last column/row is dropped.
//!
//! Representational meaning:
//! - Each destination channel is `(a + b + c + d) / 4` over one 2x2 source
//!   block, alpha included. No gamma or premultiplication is applied.
//! - Level `L+1` therefore summarizes non-overlapping 2x2 neighborhoods from
//!   level `L`.
//!
//! With the `rayon` feature, destination rows are computed in parallel.
//! Output is identical either way.

mod downsample;
mod pyramid;
mod upload;

pub use downsample::downsample2x2_mean_rgba8;
pub use pyramid::{MipLevel, MipPyramid, full_chain_len};
pub use upload::{
    SubresourceFootprint, TEXTURE_DATA_PITCH_ALIGNMENT, TEXTURE_DATA_PLACEMENT_ALIGNMENT,
    UploadLayout,
};
