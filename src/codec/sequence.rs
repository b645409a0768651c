//! Deterministic selection of interior carrier pixels.
//!
//! # Sequence v1
//!
//! The interior of a `width × height` image holds
//! `n = (width - 2) * (height - 2)` pixels, indexed row-major:
//! index `i` is the pixel at `(row, col) = (1 + i / (width - 2), 1 + i % (width - 2))`.
//!
//! A [`ChaCha20Rng`] is keyed with the 32 seed bytes (`SeedableRng::from_seed`).
//! Step `i` of a forward Fisher-Yates shuffle then draws
//! `j = rng.gen_range(i..n)` as a `u64`, swaps slots `i` and `j`, and yields
//! slot `i`. Only displaced slots are stored, so generating `k` coordinates
//! costs `O(k)` no matter how large the image is, and a prefix never changes
//! when the sequence is extended.
//!
//! Draws use `u64` rather than `usize` so that 32-bit and 64-bit targets
//! consume identical PRNG output.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::border::{check_geometry, Seed};
use super::error::{Result, WatermarkError};
use super::grid::Coordinate;

/// Version of the coordinate sequence algorithm described above.
pub const SEQUENCE_VERSION: u32 = 1;

/// Number of interior pixels of a `width × height` image.
///
/// Zero when the image has no interior.
pub fn interior_size(width: u32, height: u32) -> u64 {
    if width < 3 || height < 3 {
        return 0;
    }
    u64::from(width - 2) * u64::from(height - 2)
}

/// Lazy, duplicate-free sequence of interior coordinates.
///
/// Two sequencers built from the same seed and dimensions produce the same
/// coordinates in the same order.
pub struct PixelSequencer {
    rng: ChaCha20Rng,
    interior_width: u64,
    len: u64,
    cursor: u64,
    displaced: HashMap<u64, u64>,
}

impl PixelSequencer {
    /// Creates a sequencer positioned at the start of the sequence.
    ///
    /// Fails with [`WatermarkError::InvalidGeometry`] for images smaller
    /// than 3×3.
    pub fn new(seed: &Seed, width: u32, height: u32) -> Result<Self> {
        check_geometry(width, height)?;

        Ok(Self {
            rng: ChaCha20Rng::from_seed(*seed.as_bytes()),
            interior_width: u64::from(width - 2),
            len: interior_size(width, height),
            cursor: 0,
            displaced: HashMap::new(),
        })
    }

    /// Total number of interior pixels.
    pub fn interior_size(&self) -> u64 {
        self.len
    }

    /// Coordinates not yet produced.
    pub fn remaining(&self) -> u64 {
        self.len - self.cursor
    }

    /// Produces the next `count` coordinates.
    ///
    /// Fails with [`WatermarkError::InsufficientCapacity`] if fewer than
    /// `count` remain, in which case nothing is consumed. Unlike
    /// [`Iterator::take`], this borrows the sequencer, so the sequence can be
    /// continued afterwards.
    pub fn take_coords(&mut self, count: u64) -> Result<Vec<Coordinate>> {
        let available = self.remaining();
        if count > available {
            return Err(WatermarkError::InsufficientCapacity {
                needed: count,
                available,
            });
        }

        let mut coords = Vec::with_capacity(count as usize);
        for _ in 0..count {
            if let Some(at) = self.next() {
                coords.push(at);
            }
        }
        Ok(coords)
    }

    fn slot(&self, index: u64) -> u64 {
        self.displaced.get(&index).copied().unwrap_or(index)
    }

    fn to_coordinate(&self, index: u64) -> Coordinate {
        // Both parts fit in u32: they are bounded by width - 2 and height - 2.
        let row = 1 + (index / self.interior_width) as u32;
        let col = 1 + (index % self.interior_width) as u32;
        Coordinate::new(row, col)
    }
}

impl Iterator for PixelSequencer {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.cursor >= self.len {
            return None;
        }

        let i = self.cursor;
        let j = self.rng.gen_range(i..self.len);

        let picked = self.slot(j);
        if j != i {
            let current = self.slot(i);
            self.displaced.insert(j, current);
        }
        self.displaced.remove(&i);
        self.cursor += 1;

        Some(self.to_coordinate(picked))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seed(byte: u8) -> Seed {
        Seed::from_bytes([byte; 32])
    }

    #[test]
    fn test_interior_size() {
        assert_eq!(interior_size(10, 10), 64);
        assert_eq!(interior_size(3, 3), 1);
        assert_eq!(interior_size(3, 100), 98);
        assert_eq!(interior_size(2, 100), 0);
    }

    #[test]
    fn test_deterministic() {
        let a: Vec<_> = PixelSequencer::new(&seed(42), 20, 15).unwrap().collect();
        let b: Vec<_> = PixelSequencer::new(&seed(42), 20, 15).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a: Vec<_> = PixelSequencer::new(&seed(1), 20, 20).unwrap().collect();
        let b: Vec<_> = PixelSequencer::new(&seed(2), 20, 20).unwrap().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_covers_interior_exactly_once() {
        let (w, h) = (9, 7);
        let coords: Vec<_> = PixelSequencer::new(&seed(3), w, h).unwrap().collect();
        assert_eq!(coords.len() as u64, interior_size(w, h));

        let unique: HashSet<_> = coords.iter().collect();
        assert_eq!(unique.len(), coords.len());

        for at in &coords {
            assert!((1..h - 1).contains(&at.row), "row {} on border", at.row);
            assert!((1..w - 1).contains(&at.col), "col {} on border", at.col);
        }
    }

    #[test]
    fn test_prefix_stable_when_extended() {
        let all: Vec<_> = PixelSequencer::new(&seed(9), 30, 30).unwrap().take_coords(100).unwrap();

        let mut seq = PixelSequencer::new(&seed(9), 30, 30).unwrap();
        let mut split = seq.take_coords(16).unwrap();
        split.extend(seq.take_coords(84).unwrap());

        assert_eq!(all, split);
    }

    #[test]
    fn test_take_coords_then_iterate_continues() {
        let all: Vec<_> = PixelSequencer::new(&seed(6), 14, 11).unwrap().collect();

        let mut seq = PixelSequencer::new(&seed(6), 14, 11).unwrap();
        let head = seq.take_coords(5).unwrap();
        let tail: Vec<_> = seq.collect();

        assert_eq!(head, all[..5]);
        assert_eq!(tail, all[5..]);
    }

    #[test]
    fn test_not_identity_order() {
        let coords: Vec<_> = PixelSequencer::new(&seed(5), 12, 12).unwrap().collect();
        let mut sorted = coords.clone();
        sorted.sort();
        assert_ne!(coords, sorted);
    }

    #[test]
    fn test_take_beyond_capacity_fails_without_consuming() {
        let mut seq = PixelSequencer::new(&seed(0), 5, 5).unwrap();
        assert_eq!(seq.remaining(), 9);

        let err = seq.take_coords(10).unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::InsufficientCapacity { needed: 10, available: 9 }
        ));
        assert_eq!(seq.remaining(), 9);

        assert_eq!(seq.take_coords(9).unwrap().len(), 9);
        assert_eq!(seq.remaining(), 0);
        assert!(seq.next().is_none());
    }

    #[test]
    fn test_single_interior_pixel() {
        let coords: Vec<_> = PixelSequencer::new(&seed(8), 3, 3).unwrap().collect();
        assert_eq!(coords, vec![Coordinate::new(1, 1)]);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(matches!(
            PixelSequencer::new(&seed(0), 2, 50),
            Err(WatermarkError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_large_image_is_lazy() {
        let mut seq = PixelSequencer::new(&seed(4), 60_000, 60_000).unwrap();
        let coords = seq.take_coords(64).unwrap();
        assert_eq!(coords.len(), 64);
        assert!(seq.displaced.len() <= 64);
    }
}
