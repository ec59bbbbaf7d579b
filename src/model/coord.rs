use serde::{Deserialize, Serialize};

/// Position in projected map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    pub fn distance(self, other: Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Closest point to `self` on the segment `a..b`.
    pub fn closest_on_segment(self, a: Self, b: Self) -> Self {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx.mul_add(dx, dy * dy);
        if len_sq <= f64::EPSILON {
            return a;
        }
        let t = ((self.x - a.x).mul_add(dx, (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        Self::new(dx.mul_add(t, a.x), dy.mul_add(t, a.y))
    }
}

impl From<Coord> for [f64; 2] {
    fn from(value: Coord) -> Self {
        [value.x, value.y]
    }
}

impl From<[f64; 2]> for Coord {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl TryFrom<Vec<f64>> for Coord {
    type Error = String;

    // GeoJSON positions may carry z/m ordinates; only x and y are kept.
    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        match value.as_slice() {
            [x, y, ..] => Ok(Self::new(*x, *y)),
            _ => Err(format!(
                "position needs at least 2 ordinates, got {}",
                value.len()
            )),
        }
    }
}
