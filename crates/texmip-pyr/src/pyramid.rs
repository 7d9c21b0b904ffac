use texmip_core::{Error, Image, ImageView, Rgba8};
use tracing::{debug, trace};

use crate::downsample::downsample2x2_mean_rgba8;

/// One materialized level of a [`MipPyramid`].
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    level: usize,
    image: Image<Rgba8>,
}

impl MipLevel {
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn image(&self) -> &Image<Rgba8> {
        &self.image
    }

    pub fn pixels(&self) -> &[Rgba8] {
        self.image.data()
    }

    pub fn as_view(&self) -> ImageView<'_, Rgba8> {
        self.image.as_view()
    }

    /// Tightly packed RGBA8 bytes of this level.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        self.image.to_rgba8_bytes()
    }

    pub fn into_image(self) -> Image<Rgba8> {
        self.image
    }
}

/// Lazily built RGBA8 mip chain.
///
/// Level 0 is the base image. Level `k + 1` is the 2x2 truncating mean
/// downsample of level `k`. Levels are computed on first request and cached;
/// a cached level is never recomputed or modified.
///
/// Levels `0..num_levels()` are always materialized, so the highest cached
/// level is `num_levels() - 1`.
#[derive(Debug, Clone)]
pub struct MipPyramid {
    levels: Vec<MipLevel>,
    downsample_count: usize,
}

impl MipPyramid {
    pub fn new(base: Image<Rgba8>) -> Self {
        Self {
            levels: vec![MipLevel {
                level: 0,
                image: base,
            }],
            downsample_count: 0,
        }
    }

    /// Builds a pyramid from tightly packed, row-major RGBA8 bytes.
    pub fn from_rgba8_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, Error> {
        Image::from_rgba8_bytes(width, height, bytes).map(Self::new)
    }

    pub fn base(&self) -> &MipLevel {
        &self.levels[0]
    }

    /// Returns mip level `level`, deriving it and any missing ancestors.
    ///
    /// Fails with [`Error::InvalidDimension`] if some level on the way has a
    /// source smaller than 2x2. The chain is validated before anything is
    /// computed, so a failed call leaves the cache untouched.
    pub fn get_level(&mut self, level: usize) -> Result<&MipLevel, Error> {
        if level < self.levels.len() {
            trace!(level, "mip level cache hit");
            return Ok(&self.levels[level]);
        }

        if let Err(err) = self.check_derivable(level) {
            debug!(requested = level, %err, "mip level request failed");
            return Err(err);
        }

        while self.levels.len() <= level {
            self.push_next();
        }
        Ok(&self.levels[level])
    }

    /// Returns a cached level without building anything.
    pub fn level(&self, level: usize) -> Option<&MipLevel> {
        self.levels.get(level)
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Materialized levels in increasing level order.
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    pub fn into_levels(self) -> Vec<MipLevel> {
        self.levels
    }

    /// Number of downsample passes this pyramid has run.
    pub fn downsample_count(&self) -> usize {
        self.downsample_count
    }

    /// Materializes levels until `max_levels` exist or the chain bottoms out
    /// at a level with a dimension of 1. Returns the number of cached levels.
    pub fn build_chain(&mut self, max_levels: usize) -> usize {
        let base = self.base();
        let target = full_chain_len(base.width(), base.height()).min(max_levels);
        while self.levels.len() < target {
            self.push_next();
        }
        self.levels.len()
    }

    fn check_derivable(&self, level: usize) -> Result<(), Error> {
        let top = &self.levels[self.levels.len() - 1];
        let mut w = top.width();
        let mut h = top.height();
        for next in self.levels.len()..=level {
            if w < 2 || h < 2 {
                return Err(Error::InvalidDimension {
                    level: next,
                    width: w,
                    height: h,
                });
            }
            w /= 2;
            h /= 2;
        }
        Ok(())
    }

    fn push_next(&mut self) {
        let prev = &self.levels[self.levels.len() - 1];
        let image = downsample2x2_mean_rgba8(&prev.as_view());
        self.downsample_count += 1;

        let level = self.levels.len();
        debug!(
            level,
            width = image.width(),
            height = image.height(),
            "materialized mip level"
        );
        self.levels.push(MipLevel { level, image });
    }
}

/// Number of levels in a full chain for a `base_w x base_h` base, counting
/// the base itself. Halving stops once either dimension drops below 2.
pub fn full_chain_len(base_w: usize, base_h: usize) -> usize {
    if base_w == 0 || base_h == 0 {
        return 0;
    }

    let mut levels = 1usize;
    let mut w = base_w;
    let mut h = base_h;
    while w >= 2 && h >= 2 {
        w /= 2;
        h /= 2;
        levels += 1;
    }
    levels
}

#[cfg(test)]
mod tests {
    use texmip_core::{Error, Image, Rgba8};

    use crate::{MipPyramid, full_chain_len};

    fn ramp(width: usize, height: usize) -> Image<Rgba8> {
        let data = (0..width * height)
            .map(|i| {
                let v = (i % 251) as u8;
                Rgba8::new(v, v.wrapping_mul(3), 255 - v, (i % 7) as u8 * 36)
            })
            .collect();
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn even_base_halves_at_every_level() {
        let mut pyr = MipPyramid::new(ramp(64, 32));
        for k in 0..6 {
            let level = pyr.get_level(k).expect("level should build");
            assert_eq!(level.level(), k);
            assert_eq!(level.width(), 64 >> k);
            assert_eq!(level.height(), 32 >> k);
            assert_eq!(level.pixels().len(), level.width() * level.height());
        }
    }

    #[test]
    fn level_zero_is_the_base() {
        let base = ramp(3, 2);
        let mut pyr = MipPyramid::new(base.clone());
        assert_eq!(pyr.get_level(0).expect("base").image(), &base);
        assert_eq!(pyr.downsample_count(), 0);
    }

    #[test]
    fn repeated_requests_do_not_recompute() {
        let mut pyr = MipPyramid::new(ramp(16, 16));
        let first = pyr.get_level(2).expect("level 2").clone();
        assert_eq!(pyr.downsample_count(), 2);

        let second = pyr.get_level(2).expect("level 2").clone();
        assert_eq!(first, second);
        assert_eq!(pyr.downsample_count(), 2);

        pyr.get_level(1).expect("level 1");
        assert_eq!(pyr.downsample_count(), 2);
    }

    #[test]
    fn direct_request_matches_stepwise_requests() {
        let mut direct = MipPyramid::new(ramp(24, 40));
        let level3 = direct.get_level(3).expect("level 3").clone();
        assert_eq!(direct.num_levels(), 4);

        let mut stepwise = MipPyramid::new(ramp(24, 40));
        for k in 1..=3 {
            stepwise.get_level(k).expect("level");
        }

        assert_eq!(level3, *stepwise.level(3).expect("level 3"));
        assert_eq!(direct.levels(), stepwise.levels());
    }

    #[test]
    fn too_small_source_is_invalid_dimension() {
        let mut pyr = MipPyramid::new(Image::new_fill(1, 1, Rgba8::default()));
        assert_eq!(
            pyr.get_level(1).unwrap_err(),
            Error::InvalidDimension {
                level: 1,
                width: 1,
                height: 1
            }
        );

        let mut empty = MipPyramid::new(Image::new_fill(0, 1, Rgba8::default()));
        assert!(matches!(
            empty.get_level(1),
            Err(Error::InvalidDimension { level: 1, .. })
        ));
    }

    #[test]
    fn failed_request_leaves_cache_unchanged() {
        let mut pyr = MipPyramid::new(ramp(8, 2));
        pyr.get_level(0).expect("base");

        // 8x2 -> 4x1, then 4x1 cannot be halved.
        assert_eq!(
            pyr.get_level(3).unwrap_err(),
            Error::InvalidDimension {
                level: 2,
                width: 4,
                height: 1
            }
        );
        assert_eq!(pyr.num_levels(), 1);
        assert_eq!(pyr.downsample_count(), 0);

        let level1 = pyr.get_level(1).expect("level 1");
        assert_eq!((level1.width(), level1.height()), (4, 1));
    }

    #[test]
    fn uniform_base_stays_uniform() {
        let red = Rgba8::new(255, 0, 0, 255);
        let mut pyr = MipPyramid::new(Image::new_fill(4, 4, red));

        let level1 = pyr.get_level(1).expect("level 1");
        assert_eq!((level1.width(), level1.height()), (2, 2));
        assert!(level1.pixels().iter().all(|&px| px == red));
    }

    #[test]
    fn odd_base_drops_last_row_and_column() {
        let mut pyr = MipPyramid::new(ramp(5, 5));
        let level1 = pyr.get_level(1).expect("level 1");
        assert_eq!((level1.width(), level1.height()), (2, 2));
        let level2 = pyr.get_level(2).expect("level 2");
        assert_eq!((level2.width(), level2.height()), (1, 1));
    }

    #[test]
    fn build_chain_stops_at_1x1() {
        let mut pyr = MipPyramid::new(ramp(16, 16));
        assert_eq!(pyr.build_chain(usize::MAX), 5);

        let dims: Vec<(usize, usize)> = pyr
            .levels()
            .iter()
            .map(|level| (level.width(), level.height()))
            .collect();
        assert_eq!(dims, vec![(16, 16), (8, 8), (4, 4), (2, 2), (1, 1)]);
    }

    #[test]
    fn build_chain_respects_max_levels_and_cache() {
        let mut pyr = MipPyramid::new(ramp(32, 8));
        pyr.get_level(2).expect("level 2");
        assert_eq!(pyr.build_chain(2), 3);
        assert_eq!(pyr.build_chain(10), 4);
        assert_eq!(pyr.downsample_count(), 3);
    }

    #[test]
    fn from_bytes_checks_length() {
        assert_eq!(
            MipPyramid::from_rgba8_bytes(2, 2, &[0u8; 12]).unwrap_err(),
            Error::SizeMismatch {
                expected: 16,
                actual: 12
            }
        );

        let pyr = MipPyramid::from_rgba8_bytes(1, 1, &[1, 2, 3, 4]).expect("valid bytes");
        assert_eq!(pyr.base().to_rgba8_bytes(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn chain_length_counts_base() {
        assert_eq!(full_chain_len(0, 4), 0);
        assert_eq!(full_chain_len(1, 1), 1);
        assert_eq!(full_chain_len(5, 3), 2);
        assert_eq!(full_chain_len(256, 64), 7);
    }
}
