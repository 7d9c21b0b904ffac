use texmip_core::{Error, Rgba8};

use crate::MipLevel;

/// Row pitch alignment for buffer-to-texture copies (`D3D12_TEXTURE_DATA_PITCH_ALIGNMENT`).
pub const TEXTURE_DATA_PITCH_ALIGNMENT: usize = 256;
/// Subresource offset alignment in an upload buffer (`D3D12_TEXTURE_DATA_PLACEMENT_ALIGNMENT`).
pub const TEXTURE_DATA_PLACEMENT_ALIGNMENT: usize = 512;

/// Where one mip level lives inside a pitched upload buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceFootprint {
    pub level: usize,
    pub width: usize,
    pub height: usize,
    /// Bytes between row starts.
    pub row_pitch: usize,
    /// `row_pitch * height`.
    pub slice_pitch: usize,
    /// Byte offset of the first row.
    pub offset: usize,
}

/// Byte layout of a mip chain in a single upload buffer.
///
/// Rows are padded to `row_pitch_alignment` and every level starts at a
/// multiple of `placement_alignment`. Padding bytes are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLayout {
    row_pitch_alignment: usize,
    placement_alignment: usize,
}

impl Default for UploadLayout {
    fn default() -> Self {
        Self {
            row_pitch_alignment: TEXTURE_DATA_PITCH_ALIGNMENT,
            placement_alignment: TEXTURE_DATA_PLACEMENT_ALIGNMENT,
        }
    }
}

impl UploadLayout {
    pub fn new(row_pitch_alignment: usize, placement_alignment: usize) -> Result<Self, Error> {
        if !row_pitch_alignment.is_power_of_two() {
            return Err(Error::InvalidArgument {
                reason: "row pitch alignment must be a non-zero power of two",
            });
        }
        if !placement_alignment.is_power_of_two() {
            return Err(Error::InvalidArgument {
                reason: "placement alignment must be a non-zero power of two",
            });
        }

        Ok(Self {
            row_pitch_alignment,
            placement_alignment,
        })
    }

    /// No row padding and no placement gaps between levels.
    pub const fn tight() -> Self {
        Self {
            row_pitch_alignment: 1,
            placement_alignment: 1,
        }
    }

    pub fn row_pitch_alignment(&self) -> usize {
        self.row_pitch_alignment
    }

    pub fn placement_alignment(&self) -> usize {
        self.placement_alignment
    }

    pub fn footprints(&self, levels: &[MipLevel]) -> Vec<SubresourceFootprint> {
        let mut out = Vec::with_capacity(levels.len());
        let mut offset = 0usize;
        for level in levels {
            offset = align_up(offset, self.placement_alignment);
            let row_pitch = align_up(level.width() * Rgba8::BYTES, self.row_pitch_alignment);
            let slice_pitch = row_pitch * level.height();
            out.push(SubresourceFootprint {
                level: level.level(),
                width: level.width(),
                height: level.height(),
                row_pitch,
                slice_pitch,
                offset,
            });
            offset += slice_pitch;
        }
        out
    }

    pub fn total_size(&self, levels: &[MipLevel]) -> usize {
        self.footprints(levels)
            .last()
            .map_or(0, |fp| fp.offset + fp.slice_pitch)
    }

    /// Writes every level into `out` at its footprint and returns the
    /// footprints. `out` is cleared and resized to the total size first.
    pub fn write(&self, levels: &[MipLevel], out: &mut Vec<u8>) -> Vec<SubresourceFootprint> {
        let footprints = self.footprints(levels);
        let total = footprints
            .last()
            .map_or(0, |fp| fp.offset + fp.slice_pitch);

        out.clear();
        out.resize(total, 0);

        for (level, fp) in levels.iter().zip(&footprints) {
            let view = level.as_view();
            for y in 0..fp.height {
                let row_start = fp.offset + y * fp.row_pitch;
                let dst = &mut out[row_start..row_start + fp.width * Rgba8::BYTES];
                for (dst_px, src_px) in dst.chunks_exact_mut(Rgba8::BYTES).zip(view.row(y)) {
                    dst_px.copy_from_slice(&src_px.to_array());
                }
            }
        }

        footprints
    }
}

#[inline]
fn align_up(value: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}
