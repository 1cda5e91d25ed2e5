//! Seeded per-agent randomness.
//!
//! Every consumer that rolls dice for an agent (its task manager, its
//! activity driver) owns a separate [`AgentRng`] derived from
//! `(run seed, agent id, stream)`.  Nothing is shared between agents, so a
//! run replays identically whatever thread ticks whom.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// Stream of the agent's task manager.
pub const SCHEDULER_STREAM: u64 = 0;

/// Stream of the agent's activity driver.
pub const ACTIVITY_STREAM: u64 = 1;

/// SplitMix64 finalizer; turns structured input into a well-spread seed.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// One agent's private random stream.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// The scheduler stream for `agent` in a run seeded with `seed`.
    pub fn new(seed: u64, agent: AgentId) -> Self {
        Self::stream(seed, agent, SCHEDULER_STREAM)
    }

    /// An independent stream for `agent`; different `stream` values never
    /// replay each other's rolls.
    pub fn stream(seed: u64, agent: AgentId, stream: u64) -> Self {
        let s = mix(mix(seed ^ mix(agent.0 as u64)) ^ stream);
        AgentRng(SmallRng::seed_from_u64(s))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Uniform in `[min, max]`, or `min` if the range is empty.
    #[inline]
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max > min { self.0.gen_range(min..=max) } else { min }
    }

    /// `true` with probability `p`.  Out-of-range `p` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}
