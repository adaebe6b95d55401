use serde::{Deserialize, Serialize};

/// 2D affine matrix in PDF order `[a, b, c, d, e, f]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform(pub [f64; 6]);

impl Transform {
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Flips the y axis so text baselines point down the screen.
    pub const VERTICAL_FLIP: Transform = Transform([1.0, 0.0, 0.0, -1.0, 0.0, 0.0]);

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self([a, b, c, d, e, f])
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// Returns `self × other`, matching pdf.js `Util.transform(self, other)`.
    pub fn compose(&self, other: &Transform) -> Transform {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Transform([
            a1 * a2 + c1 * b2,
            b1 * a2 + d1 * b2,
            a1 * c2 + c1 * d2,
            b1 * c2 + d1 * d2,
            a1 * e2 + c1 * f2 + e1,
            b1 * e2 + d1 * f2 + f1,
        ])
    }

    #[cfg(test)]
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Vertical scale factor, used as the on-screen font size of a run.
    pub fn vertical_scale(&self) -> f64 {
        self.0[2].hypot(self.0[3])
    }

    /// Rotation of the x axis in radians.
    pub fn angle(&self) -> f64 {
        self.0[1].atan2(self.0[0])
    }

    pub fn translation(&self) -> (f64, f64) {
        (self.0[4], self.0[5])
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Page geometry at a given zoom, as reported by the PDF library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub transform: Transform,
}

impl Viewport {
    /// Unrotated viewport for a page of `width` x `height` points with its
    /// origin at the bottom-left corner.
    pub fn for_page(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width: width * scale,
            height: height * scale,
            scale,
            transform: Transform([scale, 0.0, 0.0, -scale, 0.0, height * scale]),
        }
    }
}
