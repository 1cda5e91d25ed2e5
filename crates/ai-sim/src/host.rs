//! `AgentView`: one agent's [`AgentHost`] onto the world.
//!
//! Reads see the position snapshot taken at the start of the tick, so every
//! agent observes the same world no matter the order (or thread) it is
//! ticked on.  Writes only touch the agent's own motion and presentation
//! state.

use ai_core::{AgentId, GameTime, Vec3};
use ai_task::{AgentHost, EntityFilter, MoveRequest, MoveStatus, MoveTicket, Sighting, SoundRequest};

use crate::motion::MotionState;

/// What an agent is showing: looping animations and the sounds it emitted
/// since the world last drained them.
#[derive(Clone, Debug, Default)]
pub struct Presentation {
    pub animations: Vec<(String, f32)>,
    pub sounds:     Vec<SoundRequest>,
}

impl Presentation {
    pub fn is_playing(&self, code: &str) -> bool {
        self.animations.iter().any(|(a, _)| a == code)
    }
}

/// Positions (`None` once despawned) and kinds, indexed by `AgentId`.
pub(crate) struct Snapshot<'a> {
    pub positions: &'a [Option<Vec3>],
    pub kinds:     &'a [String],
}

pub struct AgentView<'a> {
    pub(crate) me:      AgentId,
    pub(crate) now:     GameTime,
    pub(crate) bounds:  Option<f32>,
    pub(crate) world:   Snapshot<'a>,
    pub(crate) motion:  &'a mut MotionState,
    pub(crate) present: &'a mut Presentation,
}

impl AgentHost for AgentView<'_> {
    fn now(&self) -> GameTime {
        self.now
    }

    fn position(&self) -> Vec3 {
        self.motion.position
    }

    fn request_move(&mut self, request: MoveRequest) -> MoveTicket {
        self.motion.begin(request, self.bounds)
    }

    fn move_status(&self, ticket: MoveTicket) -> MoveStatus {
        self.motion.status(ticket)
    }

    fn stop_move(&mut self) {
        self.motion.stop();
    }

    fn request_animation(&mut self, code: &str, speed: f32) {
        match self.present.animations.iter_mut().find(|(a, _)| a == code) {
            Some(entry) => entry.1 = speed,
            None => self.present.animations.push((code.to_owned(), speed)),
        }
    }

    fn stop_animation(&mut self, code: &str) {
        self.present.animations.retain(|(a, _)| a != code);
    }

    fn request_sound(&mut self, sound: &SoundRequest) {
        self.present.sounds.push(sound.clone());
    }

    fn nearest_entity(&self, filter: &EntityFilter, range: f32) -> Option<Sighting> {
        let here = self.motion.position;
        self.world
            .positions
            .iter()
            .zip(self.world.kinds)
            .enumerate()
            .filter(|&(i, _)| i != self.me.index())
            .filter_map(|(i, (pos, kind))| {
                let pos = (*pos)?;
                let distance = here.distance(pos);
                (distance <= range && filter.accepts(kind)).then_some((i, kind, pos, distance))
            })
            .min_by(|a, b| a.3.total_cmp(&b.3))
            .map(|(i, kind, position, distance)| Sighting {
                id: AgentId(i as u32),
                kind: kind.clone(),
                position,
                distance,
            })
    }

    fn entity_position(&self, id: AgentId) -> Option<Vec3> {
        if id == self.me {
            return Some(self.motion.position);
        }
        self.world.positions.get(id.index()).copied().flatten()
    }
}
