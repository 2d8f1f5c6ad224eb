//! Pairwise coordinate index
//!
//! Maps 1-based positions between two already-aligned sequences.
//!
//! The index keeps a sparse breakpoint table: the coordinates of the first
//! pair of aligned real bases, the last pair, and every pair that
//! immediately follows a gap. Between two anchors there are no gaps, so any
//! position is recovered by an offset from the enclosing anchor.
//!
//! Space is two `u64` per indel; a query is one binary search.

use crate::core::error::ValidationError;
use crate::core::mapper::Genome;

/// Default gap symbol in aligned sequences
pub const DEFAULT_GAP: u8 = b'-';

/// Mapping direction between the two aligned sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// First sequence to second
    AToB,
    /// Second sequence to first
    BToA,
}

impl Direction {
    /// Get the opposite direction
    ///
    /// # Examples
    /// ```
    /// use genome_coordmap::core::Direction;
    /// assert_eq!(Direction::AToB.reverse(), Direction::BToA);
    /// assert_eq!(Direction::BToA.reverse(), Direction::AToB);
    /// ```
    pub fn reverse(&self) -> Self {
        match self {
            Direction::AToB => Direction::BToA,
            Direction::BToA => Direction::AToB,
        }
    }

    /// Direction that maps away from `genome`
    pub fn from_genome(genome: Genome) -> Self {
        match genome {
            Genome::A => Direction::AToB,
            Genome::B => Direction::BToA,
        }
    }
}

/// Which end of an interval result to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Side {
    /// Left-most position
    Left,
    /// Keep intervals as they are
    #[default]
    Both,
    /// Right-most position
    Right,
}

impl Side {
    /// Sign convention: negative is left, zero keeps the interval, positive is right
    ///
    /// # Examples
    /// ```
    /// use genome_coordmap::core::Side;
    /// assert_eq!(Side::from_sign(-1), Side::Left);
    /// assert_eq!(Side::from_sign(0), Side::Both);
    /// assert_eq!(Side::from_sign(5), Side::Right);
    /// ```
    pub fn from_sign(side: i64) -> Self {
        match side {
            s if s < 0 => Side::Left,
            0 => Side::Both,
            _ => Side::Right,
        }
    }

    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Side::Left),
            "both" | "b" | "range" => Some(Side::Both),
            "right" | "r" => Some(Side::Right),
            _ => None,
        }
    }
}

/// Result of mapping a single position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedPos {
    /// Position lies outside the aligned span
    Unmapped,
    /// A single position on the other sequence
    Single(u64),
    /// The base is followed by a gap in its own sequence and covers
    /// `left..=right` on the other one
    Interval { left: u64, right: u64 },
}

impl MappedPos {
    pub fn is_mapped(&self) -> bool {
        !matches!(self, MappedPos::Unmapped)
    }

    pub fn is_interval(&self) -> bool {
        matches!(self, MappedPos::Interval { .. })
    }

    /// Left-most mapped position
    pub fn left(&self) -> Option<u64> {
        match *self {
            MappedPos::Unmapped => None,
            MappedPos::Single(pos) => Some(pos),
            MappedPos::Interval { left, .. } => Some(left),
        }
    }

    /// Right-most mapped position
    pub fn right(&self) -> Option<u64> {
        match *self {
            MappedPos::Unmapped => None,
            MappedPos::Single(pos) => Some(pos),
            MappedPos::Interval { right, .. } => Some(right),
        }
    }

    /// Collapse an interval to one of its ends
    ///
    /// # Examples
    /// ```
    /// use genome_coordmap::core::{MappedPos, Side};
    /// let pos = MappedPos::Interval { left: 2, right: 3 };
    /// assert_eq!(pos.resolve(Side::Left), MappedPos::Single(2));
    /// assert_eq!(pos.resolve(Side::Right), MappedPos::Single(3));
    /// assert_eq!(pos.resolve(Side::Both), pos);
    /// ```
    pub fn resolve(self, side: Side) -> Self {
        match (self, side) {
            (MappedPos::Interval { left, .. }, Side::Left) => MappedPos::Single(left),
            (MappedPos::Interval { right, .. }, Side::Right) => MappedPos::Single(right),
            (pos, _) => pos,
        }
    }
}

impl std::fmt::Display for MappedPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappedPos::Unmapped => write!(f, "NA"),
            MappedPos::Single(pos) => write!(f, "{}", pos),
            MappedPos::Interval { left, right } => write!(f, "{}-{}", left, right),
        }
    }
}

/// Sparse breakpoint index over one aligned sequence pair
///
/// Immutable once built; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseCoordinateIndex {
    coords_a: Vec<u64>,
    coords_b: Vec<u64>,
}

impl PairwiseCoordinateIndex {
    /// Build from two aligned sequences using the default gap symbol
    ///
    /// # Example
    /// ```
    /// use genome_coordmap::core::{Direction, MappedPos, PairwiseCoordinateIndex};
    ///
    /// let index = PairwiseCoordinateIndex::new(b"AC-GT", b"ACTGT").unwrap();
    /// assert_eq!(index.map(2, Direction::AToB), MappedPos::Interval { left: 2, right: 3 });
    /// ```
    pub fn new(seq_a: &[u8], seq_b: &[u8]) -> Result<Self, ValidationError> {
        Self::with_gap(seq_a, seq_b, DEFAULT_GAP)
    }

    /// Build from two aligned sequences with a custom gap symbol
    pub fn with_gap(seq_a: &[u8], seq_b: &[u8], gap: u8) -> Result<Self, ValidationError> {
        if seq_a.len() != seq_b.len() {
            return Err(ValidationError::LengthMismatch {
                len_a: seq_a.len(),
                len_b: seq_b.len(),
            });
        }

        let mut coords_a = Vec::new();
        let mut coords_b = Vec::new();

        // Real bases seen so far; these are the 1-based coordinates
        let mut count_a = 0u64;
        let mut count_b = 0u64;
        let mut gap_since_last = false;
        let mut last_pair: Option<(u64, u64)> = None;
        let mut prev_real_a = true;
        let mut prev_real_b = true;

        for (column, (&base_a, &base_b)) in seq_a.iter().zip(seq_b.iter()).enumerate() {
            let real_a = base_a != gap;
            let real_b = base_b != gap;

            if !real_a && !real_b {
                return Err(ValidationError::GapAlignedToGap { column });
            }
            if (!real_a && !prev_real_b) || (!real_b && !prev_real_a) {
                return Err(ValidationError::AdjacentGaps { column });
            }
            prev_real_a = real_a;
            prev_real_b = real_b;

            count_a += real_a as u64;
            count_b += real_b as u64;

            if real_a && real_b {
                if last_pair.is_none() || gap_since_last {
                    coords_a.push(count_a);
                    coords_b.push(count_b);
                    gap_since_last = false;
                }
                last_pair = Some((count_a, count_b));
            } else {
                gap_since_last = true;
            }
        }

        if count_a == 0 {
            return Err(ValidationError::NoRealBases { genome: Genome::A });
        }
        if count_b == 0 {
            return Err(ValidationError::NoRealBases { genome: Genome::B });
        }

        let (final_a, final_b) = last_pair.ok_or(ValidationError::NoAlignedBases)?;
        if coords_a.last() != Some(&final_a) {
            coords_a.push(final_a);
            coords_b.push(final_b);
        }

        coords_a.shrink_to_fit();
        coords_b.shrink_to_fit();

        Ok(Self { coords_a, coords_b })
    }

    /// Number of anchors in the breakpoint table
    pub fn len(&self) -> usize {
        self.coords_a.len()
    }

    /// Always false for a constructed index
    pub fn is_empty(&self) -> bool {
        self.coords_a.is_empty()
    }

    /// Anchor coordinates on the source side of `direction`, paired with the target side
    pub fn anchors(&self, direction: Direction) -> (&[u64], &[u64]) {
        match direction {
            Direction::AToB => (&self.coords_a, &self.coords_b),
            Direction::BToA => (&self.coords_b, &self.coords_a),
        }
    }

    /// First aligned pair as `(a, b)`
    pub fn first_anchor(&self) -> (u64, u64) {
        (self.coords_a[0], self.coords_b[0])
    }

    /// Last aligned pair as `(a, b)`
    pub fn last_anchor(&self) -> (u64, u64) {
        let last = self.coords_a.len() - 1;
        (self.coords_a[last], self.coords_b[last])
    }

    /// Map a 1-based position in the given direction
    ///
    /// # Algorithm
    /// 1. Outside `[first anchor, last anchor]` is unmapped
    /// 2. The last anchor maps to its partner exactly
    /// 3. Otherwise find the enclosing anchors by binary search and offset from
    ///    the previous one. A base directly before the next anchor whose offset
    ///    falls short of the next partner spans an interval; anything else is
    ///    clamped to the base before the next partner.
    pub fn map(&self, from_pos: u64, direction: Direction) -> MappedPos {
        let (from, to) = self.anchors(direction);
        let last = from.len() - 1;

        if from_pos < from[0] || from_pos > from[last] {
            return MappedPos::Unmapped;
        }
        if from_pos == from[last] {
            return MappedPos::Single(to[last]);
        }

        // Rightmost insertion point; from[0] <= from_pos < from[last] keeps it in 1..=last
        let insert = from.partition_point(|&anchor| anchor <= from_pos);
        let (prev_from, next_from) = (from[insert - 1], from[insert]);
        let (prev_to, next_to) = (to[insert - 1], to[insert]);
        debug_assert!(prev_from <= from_pos && from_pos < next_from);

        let candidate = prev_to + (from_pos - prev_from);
        let before_next = next_to - 1;

        if from_pos + 1 == next_from && candidate < before_next {
            MappedPos::Interval {
                left: candidate,
                right: before_next,
            }
        } else {
            MappedPos::Single(candidate.min(before_next))
        }
    }

    /// Map and collapse interval results according to `side`
    pub fn map_with_side(&self, from_pos: u64, direction: Direction, side: Side) -> MappedPos {
        self.map(from_pos, direction).resolve(side)
    }
}
