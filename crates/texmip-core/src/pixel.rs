/// One RGBA8 pixel, laid out as `R8G8B8A8_UNORM`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BYTES: usize = 4;

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_array(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Per-channel mean of four pixels with truncating division.
    ///
    /// `(a + b + c + d) / 4` is computed in `u16`, so the result is never
    /// rounded up.
    #[inline]
    pub fn mean4_trunc(p00: Self, p10: Self, p01: Self, p11: Self) -> Self {
        #[inline]
        fn ch(a: u8, b: u8, c: u8, d: u8) -> u8 {
            ((a as u16 + b as u16 + c as u16 + d as u16) / 4) as u8
        }

        Self {
            r: ch(p00.r, p10.r, p01.r, p11.r),
            g: ch(p00.g, p10.g, p01.g, p11.g),
            b: ch(p00.b, p10.b, p01.b, p11.b),
            a: ch(p00.a, p10.a, p01.a, p11.a),
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(px: [u8; 4]) -> Self {
        Self::from_array(px)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(px: Rgba8) -> Self {
        px.to_array()
    }
}
