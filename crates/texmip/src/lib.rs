//! Umbrella crate for the `texmip` workspace.
//!
//! Re-exports the image primitives and the mip pyramid builder.

pub use texmip_core::*;
pub use texmip_pyr::*;
