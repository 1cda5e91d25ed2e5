//! Straight-line movement: the sandbox's stand-in for a path traverser.
//!
//! Each entity has one [`MotionState`].  A move request walks the entity
//! towards its target at the requested speed, one step per tick, and
//! reports `Arrived` once within tolerance.  Targets outside the world
//! bounds (or requests with no positive speed) report `Stuck` at once, the
//! way a real traverser reports a target it cannot find a path to.

use ai_core::Vec3;
use ai_task::{MoveRequest, MoveStatus, MoveTicket};

#[derive(Clone, Debug)]
pub struct MotionState {
    pub position: Vec3,
    current:      Option<MoveRequest>,
    last_ticket:  u64,
    last_status:  MoveStatus,
}

impl MotionState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            current:     None,
            last_ticket: 0,
            last_status: MoveStatus::Stopped,
        }
    }

    /// Accept a new request, superseding any earlier one.
    ///
    /// `bounds` is the horizontal half-extent of the walkable area, if any.
    pub fn begin(&mut self, request: MoveRequest, bounds: Option<f32>) -> MoveTicket {
        self.last_ticket += 1;
        let reachable = bounds.is_none_or(|half| {
            request.target.x.abs() <= half && request.target.z.abs() <= half
        });

        if !reachable || request.speed <= 0.0 {
            self.current = None;
            self.last_status = MoveStatus::Stuck;
        } else if self.position.distance(request.target) <= request.arrival_tolerance {
            self.current = None;
            self.last_status = MoveStatus::Arrived;
        } else {
            self.current = Some(request);
            self.last_status = MoveStatus::Active;
        }
        MoveTicket(self.last_ticket)
    }

    /// Status of `ticket`.  Superseded tickets report `Stopped`.
    pub fn status(&self, ticket: MoveTicket) -> MoveStatus {
        if ticket.0 == self.last_ticket { self.last_status } else { MoveStatus::Stopped }
    }

    pub fn stop(&mut self) {
        if self.current.take().is_some() {
            self.last_status = MoveStatus::Stopped;
        }
    }

    pub fn is_moving(&self) -> bool {
        self.current.is_some()
    }

    /// Where the entity is heading.
    pub fn destination(&self) -> Option<Vec3> {
        self.current.map(|r| r.target)
    }

    /// Teleport.  Cancels any move in progress.
    pub fn place(&mut self, position: Vec3) {
        self.stop();
        self.position = position;
    }

    /// Walk one step of `dt` seconds.  Returns `true` if the move arrived.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(request) = self.current else { return false };
        self.position = self.position.move_towards(request.target, request.speed * dt);
        if self.position.distance(request.target) <= request.arrival_tolerance {
            self.current = None;
            self.last_status = MoveStatus::Arrived;
            return true;
        }
        false
    }
}
