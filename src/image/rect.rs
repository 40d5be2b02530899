use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle `(x, y, w, h)` with non-negative extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from signed arithmetic results. Returns `None` for a negative
    /// origin or an empty extent.
    pub fn from_signed(x: i64, y: i64, w: i64, h: i64) -> Option<Self> {
        if x < 0 || y < 0 || w <= 0 || h <= 0 {
            return None;
        }
        let cast = |v: i64| u32::try_from(v).ok();
        Some(Self::new(cast(x)?, cast(y)?, cast(w)?, cast(h)?))
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// True when the rectangle is non-empty and lies inside a `width × height`
    /// image.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.w > 0 && self.h > 0 && self.right() <= width && self.bottom() <= height
    }

    /// Clip to a `width × height` image; `None` when nothing remains.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        if self.x >= right || self.y >= bottom {
            return None;
        }
        Some(Self::new(self.x, self.y, right - self.x, bottom - self.y))
    }

    /// Shift by an offset, e.g. to map a sub-image rectangle into its parent.
    pub fn translate(&self, dx: u32, dy: u32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_signed_rejects_negative_or_empty() {
        assert!(Rect::from_signed(-1, 0, 5, 5).is_none());
        assert!(Rect::from_signed(0, 0, 0, 5).is_none());
        assert!(Rect::from_signed(0, 0, 5, -2).is_none());
        assert_eq!(Rect::from_signed(2, 3, 4, 5), Some(Rect::new(2, 3, 4, 5)));
    }

    #[test]
    fn fits_checks_both_edges() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.fits(30, 30));
        assert!(!r.fits(29, 30));
        assert!(!r.fits(30, 29));
    }

    #[test]
    fn clamp_trims_overhang() {
        let r = Rect::new(10, 10, 50, 50);
        assert_eq!(r.clamp_to(40, 100), Some(Rect::new(10, 10, 30, 50)));
        assert_eq!(Rect::new(50, 0, 5, 5).clamp_to(40, 40), None);
    }
}
