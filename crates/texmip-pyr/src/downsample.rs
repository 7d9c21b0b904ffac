use texmip_core::{Image, ImageView, Rgba8};

#[inline]
fn dst_dims(src_w: usize, src_h: usize) -> (usize, usize) {
    (src_w / 2, src_h / 2)
}

/// 2x2 box-filter downsample of an RGBA8 view.
///
/// Output pixel `(x, y)` is the per-channel mean of source pixels
/// `(2x, 2y)`, `(2x+1, 2y)`, `(2x, 2y+1)` and `(2x+1, 2y+1)`, computed as
/// `(a + b + c + d) / 4` with truncating division. Alpha is averaged like
/// any other channel.
///
/// Output size is `(src.width() / 2, src.height() / 2)`; an odd last
/// row/column is dropped. Sources narrower or shorter than 2 produce an
/// empty image.
pub fn downsample2x2_mean_rgba8(src: &ImageView<'_, Rgba8>) -> Image<Rgba8> {
    let (dst_w, dst_h) = dst_dims(src.width(), src.height());
    let mut dst = Image::new_fill(dst_w, dst_h, Rgba8::default());
    downsample2x2_mean_rgba8_into(src, &mut dst);
    dst
}

pub(crate) fn downsample2x2_mean_rgba8_into(src: &ImageView<'_, Rgba8>, dst: &mut Image<Rgba8>) {
    let (dst_w, dst_h) = dst_dims(src.width(), src.height());
    debug_assert_eq!(dst.width(), dst_w);
    debug_assert_eq!(dst.height(), dst_h);

    if dst_w == 0 || dst_h == 0 {
        return;
    }

    downsample_rows(src, dst.data_mut(), dst_w);
}

#[cfg(not(feature = "rayon"))]
fn downsample_rows(src: &ImageView<'_, Rgba8>, dst: &mut [Rgba8], dst_w: usize) {
    for (y, dst_row) in dst.chunks_exact_mut(dst_w).enumerate() {
        mean_row_pair(src.row(2 * y), src.row(2 * y + 1), dst_row);
    }
}

#[cfg(feature = "rayon")]
fn downsample_rows(src: &ImageView<'_, Rgba8>, dst: &mut [Rgba8], dst_w: usize) {
    use rayon::prelude::*;

    dst.par_chunks_exact_mut(dst_w)
        .enumerate()
        .for_each(|(y, dst_row)| {
            mean_row_pair(src.row(2 * y), src.row(2 * y + 1), dst_row);
        });
}

#[inline]
fn mean_row_pair(src_row0: &[Rgba8], src_row1: &[Rgba8], dst_row: &mut [Rgba8]) {
    // chunks_exact skips the trailing odd column.
    let pairs = src_row0.chunks_exact(2).zip(src_row1.chunks_exact(2));
    for (out, (top, bottom)) in dst_row.iter_mut().zip(pairs) {
        *out = Rgba8::mean4_trunc(top[0], top[1], bottom[0], bottom[1]);
    }
}
