use serde::{Deserialize, Serialize};

use crate::CHUNK_WIDTH;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk column containing the world position (wx, wz).
    #[inline]
    pub fn containing(wx: i32, wz: i32) -> Self {
        let w = CHUNK_WIDTH as i32;
        Self {
            cx: wx.div_euclid(w),
            cz: wz.div_euclid(w),
        }
    }

    /// World X of this column's west edge.
    #[inline]
    pub fn base_x(self) -> i32 {
        self.cx * CHUNK_WIDTH as i32
    }

    /// World Z of this column's north edge.
    #[inline]
    pub fn base_z(self) -> i32 {
        self.cz * CHUNK_WIDTH as i32
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_uses_floored_division() {
        assert_eq!(ChunkCoord::containing(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(16, 31), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::containing(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::containing(-17, -33), ChunkCoord::new(-2, -3));
    }

    #[test]
    fn base_matches_containing() {
        for coord in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(3, 7),
            ChunkCoord::new(-4, -1),
        ] {
            assert_eq!(ChunkCoord::containing(coord.base_x(), coord.base_z()), coord);
            assert_eq!(
                ChunkCoord::containing(coord.base_x() + 15, coord.base_z() + 15),
                coord
            );
        }
    }
}
