//! Recycled ring of track segments
//!
//! The ring covers a fixed stretch of track ahead of (and just behind) the
//! player. Segments scroll toward the player each tick; once one has passed
//! it is moved to the back of the ring and refilled, so memory stays bounded
//! no matter how long a run lasts.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::{Item, generate_items};
use crate::tuning::Tuning;

/// Thematic zone of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Mountain,
    Forest,
    Candy,
    IcyPeaks,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Mountain, Biome::Forest, Biome::Candy, Biome::IcyPeaks];

    /// Biome for a segment index, changing every `span` segments
    pub fn for_index(index: u64, span: u64) -> Self {
        let zone = index / span.max(1);
        Self::ALL[(zone % Self::ALL.len() as u64) as usize]
    }
}

/// One recyclable slice of track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Monotonic segment index; `index % ring size` is the ring slot
    pub index: u64,
    /// Centre position along the travel axis relative to the player (positive = behind)
    pub offset: f32,
    pub biome: Biome,
    pub items: Vec<Item>,
}

/// The segment ring plus the RNG that fills it
#[derive(Debug, Clone)]
pub struct Track {
    segments: Vec<Segment>,
    rng: Pcg32,
    tuning: Tuning,
    /// Segments recycled this run
    recycled: u64,
}

impl Track {
    /// Build a fresh ring for a run
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut track = Self {
            segments: Vec::with_capacity(tuning.segment_count),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            recycled: 0,
        };
        track.reset(seed);
        track
    }

    /// Per-run seed so each run differs but stays reproducible
    pub fn run_seed(seed: u64, run_id: u64) -> u64 {
        seed ^ run_id.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Rebuild the ring from scratch: segment `i` sits `i` lengths ahead and
    /// the first few stay empty to give the player a run-in.
    pub fn reset(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        self.recycled = 0;
        self.segments.clear();

        let length = self.tuning.segment_length;
        for i in 0..self.tuning.segment_count {
            let index = i as u64;
            let items = if i < self.tuning.empty_lead_segments {
                Vec::new()
            } else {
                generate_items(&mut self.rng, length, &self.tuning)
            };
            self.segments.push(Segment {
                index,
                offset: -(i as f32) * length,
                biome: Biome::for_index(index, self.tuning.biome_span),
                items,
            });
        }
    }

    /// Scroll every segment by `distance` and recycle the ones that passed.
    /// Returns how many segments were recycled.
    pub fn advance(&mut self, distance: f32) -> usize {
        let length = self.tuning.segment_length;
        let ring_length = self.tuning.ring_length();
        let count = self.segments.len() as u64;
        let mut recycled = 0;

        for segment in &mut self.segments {
            segment.offset += distance;

            while segment.offset > length {
                segment.offset -= ring_length;
                segment.index += count;
                segment.biome = Biome::for_index(segment.index, self.tuning.biome_span);
                segment.items = generate_items(&mut self.rng, length, &self.tuning);
                recycled += 1;
                log::debug!(
                    "Recycled segment {} ({:?}, {} items)",
                    segment.index,
                    segment.biome,
                    segment.items.len()
                );
            }
        }

        self.recycled += recycled as u64;
        recycled
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    /// Biome of the segment the player is standing on
    pub fn current_biome(&self) -> Biome {
        let half = self.tuning.segment_length / 2.0;
        self.segments
            .iter()
            .find(|s| s.offset.abs() <= half)
            .map(|s| s.biome)
            .unwrap_or(Biome::Mountain)
    }
}
