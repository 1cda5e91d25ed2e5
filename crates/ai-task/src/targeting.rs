//! Reusable target acquisition for tasks that chase, flee or watch something.

use ai_core::{GameTime, Vec3};

use crate::{EntityFilter, Sighting, TaskContext};

/// Throttled nearest-entity search with a cached result.
///
/// World searches are the most expensive thing a precondition does, so
/// [`acquire`](Self::acquire) only queries the host once per
/// `search_interval` seconds and otherwise answers from the cache.
#[derive(Debug, Clone)]
pub struct Targeting {
    pub filter: EntityFilter,
    /// Search radius in world units.
    pub seek_range: f32,
    /// Minimum seconds between two host searches.
    pub search_interval: f32,
    target: Option<Sighting>,
    last_search: Option<GameTime>,
}

impl Targeting {
    pub fn new(filter: EntityFilter, seek_range: f32, search_interval: f32) -> Self {
        Self {
            filter,
            seek_range,
            search_interval: search_interval.max(0.0),
            target: None,
            last_search: None,
        }
    }

    /// The cached target, if any.
    #[inline]
    pub fn target(&self) -> Option<&Sighting> {
        self.target.as_ref()
    }

    /// Search for a target unless the last search was too recent.
    pub fn acquire(&mut self, ctx: &mut TaskContext<'_>) -> Option<&Sighting> {
        let due = match self.last_search {
            None       => true,
            Some(last) => ctx.now.secs_since(last) >= self.search_interval as f64,
        };
        if due {
            self.last_search = Some(ctx.now);
            self.target = ctx.host.nearest_entity(&self.filter, self.seek_range);
        }
        self.target.as_ref()
    }

    /// Re-read the target's position from the host.
    ///
    /// Returns the fresh position, or `None` (and drops the target) if it
    /// no longer exists.
    pub fn refresh(&mut self, ctx: &TaskContext<'_>) -> Option<Vec3> {
        let id = self.target.as_ref()?.id;
        match ctx.host.entity_position(id) {
            Some(pos) => {
                let me = ctx.host.position();
                if let Some(t) = self.target.as_mut() {
                    t.position = pos;
                    t.distance = me.distance(pos);
                }
                Some(pos)
            }
            None => {
                self.target = None;
                None
            }
        }
    }

    /// Distance to the cached target, or `None` without one.
    pub fn distance(&self) -> Option<f32> {
        self.target.as_ref().map(|t| t.distance)
    }

    /// Pin a target found by other means (e.g. the attacker from `on_hurt`).
    pub fn set(&mut self, sighting: Sighting) {
        self.target = Some(sighting);
    }

    /// Forget the target and force the next `acquire` to search.
    pub fn clear(&mut self) {
        self.target = None;
        self.last_search = None;
    }
}
