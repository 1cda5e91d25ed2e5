//! Unit tests for ai-task.

use ai_core::{AgentId, AgentRng, GameTime, Vec3};

use crate::{
    AgentHost, EntityFilter, MoveRequest, MoveStatus, MoveTicket, NullHost, Sighting, SoundRequest,
    TaskContext,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Host with a fixed set of other entities and a sound log.
#[derive(Default)]
struct FakeHost {
    now:    GameTime,
    others: Vec<(AgentId, &'static str, Vec3)>,
    sounds: Vec<String>,
}

impl AgentHost for FakeHost {
    fn now(&self) -> GameTime { self.now }
    fn position(&self) -> Vec3 { Vec3::ZERO }
    fn request_move(&mut self, _r: MoveRequest) -> MoveTicket { MoveTicket(1) }
    fn move_status(&self, _t: MoveTicket) -> MoveStatus { MoveStatus::Active }
    fn stop_move(&mut self) {}
    fn request_animation(&mut self, _c: &str, _s: f32) {}
    fn stop_animation(&mut self, _c: &str) {}
    fn request_sound(&mut self, sound: &SoundRequest) {
        self.sounds.push(sound.location.clone());
    }

    fn nearest_entity(&self, filter: &EntityFilter, range: f32) -> Option<Sighting> {
        self.others
            .iter()
            .filter(|(_, kind, pos)| filter.accepts(kind) && pos.length() <= range)
            .min_by(|a, b| a.2.length().total_cmp(&b.2.length()))
            .map(|&(id, kind, pos)| Sighting {
                id,
                kind: kind.to_owned(),
                position: pos,
                distance: pos.length(),
            })
    }

    fn entity_position(&self, id: AgentId) -> Option<Vec3> {
        self.others.iter().find(|(o, _, _)| *o == id).map(|o| o.2)
    }
}

fn sound(location: &str) -> SoundRequest {
    SoundRequest {
        location:        location.to_owned(),
        range:           16.0,
        volume:          1.0,
        randomize_pitch: true,
    }
}

// ── TaskMeta ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod meta_tests {
    use crate::TaskMeta;

    #[test]
    fn cancel_priority_defaults_to_priority() {
        let meta = TaskMeta::new("wander", 0, 1.5);
        assert_eq!(meta.priority_for_cancel, 1.5);
    }

    #[test]
    fn outranks_is_strict() {
        let running = TaskMeta::new("idle", 0, 1.0);
        assert!(!TaskMeta::new("a", 0, 1.0).outranks(&running));
        assert!(TaskMeta::new("b", 0, 1.1).outranks(&running));

        let sticky = TaskMeta::new("eat", 0, 1.0).with_priority_for_cancel(5.0);
        assert!(!TaskMeta::new("c", 0, 4.0).outranks(&sticky));
    }
}

// ── Cooldown ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cooldown_tests {
    use super::*;
    use crate::Cooldown;

    #[test]
    fn ready_until_triggered() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut cd = Cooldown::new(2.0, 2.0);
        assert!(cd.is_ready(GameTime(0.0)));
        cd.trigger(GameTime(10.0), &mut rng);
        assert!(!cd.is_ready(GameTime(11.9)));
        assert!(cd.is_ready(GameTime(12.0)));
    }

    #[test]
    fn random_length_within_bounds() {
        let mut rng = AgentRng::new(3, AgentId(1));
        let mut cd = Cooldown::new(1.0, 4.0);
        for _ in 0..50 {
            cd.trigger(GameTime(0.0), &mut rng);
            assert!(cd.until().0 >= 1.0 && cd.until().0 <= 4.0);
        }
    }

    #[test]
    fn cancel_skips_cooldown_by_default() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut cd = Cooldown::new(5.0, 5.0);
        cd.on_finish(true, GameTime(1.0), &mut rng);
        assert!(cd.is_ready(GameTime(1.0)));
        cd.on_finish(false, GameTime(1.0), &mut rng);
        assert!(!cd.is_ready(GameTime(5.9)));
    }

    #[test]
    fn also_on_cancel_applies_cooldown() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut cd = Cooldown::new(5.0, 5.0).also_on_cancel();
        cd.on_finish(true, GameTime(1.0), &mut rng);
        assert!(!cd.is_ready(GameTime(2.0)));
        cd.clear();
        assert!(cd.is_ready(GameTime(2.0)));
    }
}

// ── SoundGate ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sound_tests {
    use super::*;
    use crate::{SoundGate, StartSound};

    #[test]
    fn evaluation_raises_chance_up_to_cap() {
        let mut gate = SoundGate::with_chance(0.5);
        gate.on_evaluate();
        assert!((gate.chance() - 0.502).abs() < 1e-6);
        for _ in 0..1_000 {
            gate.on_evaluate();
        }
        assert!((gate.chance() - 1.01).abs() < 1e-6);
    }

    #[test]
    fn playing_drops_chance_to_floor() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut gate = SoundGate::default();
        // Chance above 1.0 always plays.
        assert!(gate.roll(&mut rng));
        assert!((gate.chance() - 0.81).abs() < 1e-6);

        // Five successful plays bottom out at the floor.
        for _ in 0..5 {
            while !gate.roll(&mut rng) {}
        }
        assert!((gate.chance() - 0.025).abs() < 1e-6);
    }

    #[test]
    fn start_sound_plays_through_host() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut host = FakeHost::default();
        let mut start = StartSound::new(sound("creature/sheep/baa"));
        assert!(start.try_play(&mut rng, &mut host));
        assert_eq!(host.sounds, vec!["creature/sheep/baa".to_owned()]);
    }

    #[test]
    fn start_sound_deserialises_flat() {
        let start: StartSound =
            serde_json::from_str(r#"{ "location": "creature/wolf/howl", "range": 48 }"#).unwrap();
        assert_eq!(start.request.location, "creature/wolf/howl");
        assert_eq!(start.request.range, 48.0);
        assert_eq!(start.request.volume, 1.0);
        assert!(start.request.randomize_pitch);
        assert_eq!(start.gate, SoundGate::default());
    }
}

// ── Targeting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod targeting_tests {
    use super::*;
    use crate::Targeting;

    fn host_with_player() -> FakeHost {
        FakeHost {
            others: vec![
                (AgentId(1), "chicken", Vec3::new(2.0, 0.0, 0.0)),
                (AgentId(2), "player",  Vec3::new(6.0, 0.0, 0.0)),
            ],
            ..FakeHost::default()
        }
    }

    #[test]
    fn filter_selects_kind() {
        let mut host = host_with_player();
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut ctx = TaskContext::new(AgentId(0), GameTime(0.0), &mut rng, &mut host);

        let mut t = Targeting::new(EntityFilter::kinds(["player"]), 10.0, 1.0);
        let found = t.acquire(&mut ctx).cloned().unwrap();
        assert_eq!(found.id, AgentId(2));
        assert!((found.distance - 6.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_finds_nothing() {
        let mut host = host_with_player();
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut ctx = TaskContext::new(AgentId(0), GameTime(0.0), &mut rng, &mut host);

        let mut t = Targeting::new(EntityFilter::kinds(["player"]), 5.0, 1.0);
        assert!(t.acquire(&mut ctx).is_none());
    }

    #[test]
    fn search_is_throttled() {
        let mut host = host_with_player();
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut t = Targeting::new(EntityFilter::kinds(["player"]), 10.0, 2.0);

        {
            let mut ctx = TaskContext::new(AgentId(0), GameTime(0.0), &mut rng, &mut host);
            assert!(t.acquire(&mut ctx).is_some());
        }
        // The player leaves, but the cached result stands until the interval passes.
        host.others.retain(|o| o.1 != "player");
        {
            let mut ctx = TaskContext::new(AgentId(0), GameTime(1.0), &mut rng, &mut host);
            assert!(t.acquire(&mut ctx).is_some());
        }
        {
            let mut ctx = TaskContext::new(AgentId(0), GameTime(2.0), &mut rng, &mut host);
            assert!(t.acquire(&mut ctx).is_none());
        }
    }

    #[test]
    fn refresh_tracks_and_drops() {
        let mut host = host_with_player();
        let mut rng = AgentRng::new(0, AgentId(0));
        let mut t = Targeting::new(EntityFilter::kinds(["player"]), 10.0, 0.0);
        {
            let mut ctx = TaskContext::new(AgentId(0), GameTime(0.0), &mut rng, &mut host);
            t.acquire(&mut ctx);
        }

        host.others[1].2 = Vec3::new(0.0, 0.0, 3.0);
        {
            let ctx = TaskContext::new(AgentId(0), GameTime(0.1), &mut rng, &mut host);
            assert_eq!(t.refresh(&ctx), Some(Vec3::new(0.0, 0.0, 3.0)));
        }
        assert!((t.distance().unwrap() - 3.0).abs() < 1e-5);

        host.others.truncate(1);
        {
            let ctx = TaskContext::new(AgentId(0), GameTime(0.2), &mut rng, &mut host);
            assert_eq!(t.refresh(&ctx), None);
        }
        assert!(t.target().is_none());
    }
}

// ── NullHost / filters ────────────────────────────────────────────────────────

#[cfg(test)]
mod host_tests {
    use super::*;

    #[test]
    fn empty_filter_accepts_any_kind() {
        assert!(EntityFilter::default().accepts("anything"));
        let f = EntityFilter::kinds(["wolf", "bear"]);
        assert!(f.accepts("bear"));
        assert!(!f.accepts("sheep"));
    }

    #[test]
    fn null_host_moves_stop_immediately() {
        let mut host = NullHost::at(GameTime(4.0));
        let ticket = host.request_move(MoveRequest {
            target:            Vec3::new(1.0, 0.0, 0.0),
            speed:             1.0,
            arrival_tolerance: 0.1,
        });
        assert_eq!(host.move_status(ticket), MoveStatus::Stopped);
        assert!(host.move_status(ticket).is_done());
        assert_eq!(host.now(), GameTime(4.0));
        assert!(host.nearest_entity(&EntityFilter::default(), 100.0).is_none());
    }
}
