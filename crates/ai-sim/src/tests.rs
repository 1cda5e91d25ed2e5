//! Unit and integration tests for ai-sim.

use ai_core::{AgentId, GameTime, SimClock, SimConfig, Vec3};
use ai_registry::{TaskRegistry, TaskSpec, parse_task_specs};
use ai_sched::{LifecycleEvent, SchedulerConfig, Severity};
use ai_task::{MoveRequest, MoveStatus, SoundRequest};

use crate::{
    AgentSetup, AgentSnapshot, NoopObserver, SimError, TickSummary, WorldBuilder, WorldObserver,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(total_ticks: u64) -> SimConfig {
    SimConfig {
        dt_secs:               0.1,
        total_ticks,
        seed:                  7,
        num_threads:           Some(1),
        output_interval_ticks: 0,
    }
}

fn registry() -> TaskRegistry {
    let mut reg = TaskRegistry::new();
    ai_tasks::register_defaults(&mut reg);
    reg
}

fn specs(json: &str) -> Vec<TaskSpec> {
    parse_task_specs(json).unwrap()
}

const WANDERER: &str = r#"[
  { "code": "wander", "slot": 0, "priority": 1,
    "config": { "range": 6, "moveSpeed": 2 } }
]"#;

const SHEEP: &str = r#"[
  { "code": "fleeentity", "slot": 0, "priority": 3,
    "config": { "entityKinds": ["wolf"], "seekingRange": 8, "searchInterval": 0 } },
  { "code": "idle", "slot": 0, "priority": 1,
    "config": { "minDuration": 60, "maxDuration": 60 } }
]"#;

fn preempting() -> SchedulerConfig {
    SchedulerConfig { preemption: true, ..SchedulerConfig::default() }
}

/// Records every callback.
#[derive(Default)]
struct Recorder {
    starts:    u64,
    events:    Vec<(AgentId, LifecycleEvent)>,
    sounds:    Vec<(AgentId, String)>,
    summaries: Vec<TickSummary>,
    snapshots: Vec<(u64, Vec<AgentSnapshot>)>,
    ended_at:  Option<u64>,
}

impl WorldObserver for Recorder {
    fn on_tick_start(&mut self, _clock: &SimClock) {
        self.starts += 1;
    }

    fn on_event(&mut self, agent: AgentId, event: &LifecycleEvent) {
        self.events.push((agent, event.clone()));
    }

    fn on_sound(&mut self, agent: AgentId, _at: GameTime, sound: &SoundRequest) {
        self.sounds.push((agent, sound.location.clone()));
    }

    fn on_tick_end(&mut self, _clock: &SimClock, summary: &TickSummary) {
        self.summaries.push(summary.clone());
    }

    fn on_snapshot(&mut self, clock: &SimClock, agents: &[AgentSnapshot]) {
        self.snapshots.push((clock.tick, agents.to_vec()));
    }

    fn on_end(&mut self, clock: &SimClock) {
        self.ended_at = Some(clock.tick);
    }
}

impl Recorder {
    fn started(&self, code: &str) -> usize {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, LifecycleEvent::Started { code: c, .. } if c == code))
            .count()
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion_tests {
    use super::*;
    use crate::MotionState;

    fn walk(target: Vec3) -> MoveRequest {
        MoveRequest { target, speed: 1.0, arrival_tolerance: 0.1 }
    }

    #[test]
    fn walks_then_arrives() {
        let mut m = MotionState::at(Vec3::ZERO);
        let ticket = m.begin(walk(Vec3::new(3.0, 0.0, 0.0)), None);
        assert_eq!(m.status(ticket), MoveStatus::Active);

        assert!(!m.advance(1.0));
        assert!(!m.advance(1.0));
        assert_eq!(m.position, Vec3::new(2.0, 0.0, 0.0));
        assert!(m.advance(1.0));
        assert_eq!(m.status(ticket), MoveStatus::Arrived);
        assert!(!m.is_moving());
    }

    #[test]
    fn out_of_bounds_is_stuck() {
        let mut m = MotionState::at(Vec3::ZERO);
        let ticket = m.begin(walk(Vec3::new(20.0, 0.0, 0.0)), Some(10.0));
        assert_eq!(m.status(ticket), MoveStatus::Stuck);
        assert!(!m.is_moving());
    }

    #[test]
    fn zero_speed_is_stuck() {
        let mut m = MotionState::at(Vec3::ZERO);
        let req = MoveRequest { speed: 0.0, ..walk(Vec3::new(1.0, 0.0, 0.0)) };
        let ticket = m.begin(req, None);
        assert_eq!(m.status(ticket), MoveStatus::Stuck);
    }

    #[test]
    fn already_there_arrives_at_once() {
        let mut m = MotionState::at(Vec3::ZERO);
        let ticket = m.begin(walk(Vec3::new(0.05, 0.0, 0.0)), None);
        assert_eq!(m.status(ticket), MoveStatus::Arrived);
    }

    #[test]
    fn newer_request_supersedes() {
        let mut m = MotionState::at(Vec3::ZERO);
        let first = m.begin(walk(Vec3::new(5.0, 0.0, 0.0)), None);
        let second = m.begin(walk(Vec3::new(-5.0, 0.0, 0.0)), None);
        assert_eq!(m.status(first), MoveStatus::Stopped);
        assert_eq!(m.status(second), MoveStatus::Active);
        assert_eq!(m.destination(), Some(Vec3::new(-5.0, 0.0, 0.0)));
    }

    #[test]
    fn stop_only_affects_active_moves() {
        let mut m = MotionState::at(Vec3::ZERO);
        let ticket = m.begin(walk(Vec3::new(5.0, 0.0, 0.0)), None);
        m.stop();
        assert_eq!(m.status(ticket), MoveStatus::Stopped);

        let near = m.begin(walk(Vec3::ZERO), None);
        m.stop();
        assert_eq!(m.status(near), MoveStatus::Arrived);
    }
}

// ── Host view ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod host_tests {
    use super::*;
    use crate::host::{AgentView, Presentation, Snapshot};
    use crate::MotionState;
    use ai_task::{AgentHost, EntityFilter};

    #[test]
    fn nearest_entity_skips_self_and_despawned() {
        let positions = [
            Some(Vec3::ZERO),
            None,
            Some(Vec3::new(3.0, 0.0, 0.0)),
            Some(Vec3::new(6.0, 0.0, 0.0)),
        ];
        let kinds: Vec<String> =
            ["sheep", "wolf", "sheep", "wolf"].iter().map(|s| s.to_string()).collect();
        let mut motion = MotionState::at(Vec3::ZERO);
        let mut present = Presentation::default();
        let view = AgentView {
            me:      AgentId(0),
            now:     GameTime::ZERO,
            bounds:  None,
            world:   Snapshot { positions: &positions, kinds: &kinds },
            motion:  &mut motion,
            present: &mut present,
        };

        let any = view.nearest_entity(&EntityFilter::default(), 10.0).unwrap();
        assert_eq!(any.id, AgentId(2));
        assert_eq!(any.distance, 3.0);

        let wolf = view.nearest_entity(&EntityFilter::kinds(["wolf"]), 10.0).unwrap();
        assert_eq!(wolf.id, AgentId(3));
        assert!(view.nearest_entity(&EntityFilter::kinds(["wolf"]), 5.0).is_none());

        assert_eq!(view.entity_position(AgentId(1)), None);
        assert_eq!(view.entity_position(AgentId(9)), None);
    }

    #[test]
    fn animations_restart_replaces_speed() {
        let positions = [Some(Vec3::ZERO)];
        let kinds = vec!["sheep".to_owned()];
        let mut motion = MotionState::at(Vec3::ZERO);
        let mut present = Presentation::default();
        let mut view = AgentView {
            me:      AgentId(0),
            now:     GameTime::ZERO,
            bounds:  None,
            world:   Snapshot { positions: &positions, kinds: &kinds },
            motion:  &mut motion,
            present: &mut present,
        };
        view.request_animation("walk", 1.0);
        view.request_animation("walk", 2.0);
        view.request_animation("graze", 1.0);
        view.stop_animation("graze");
        assert_eq!(present.animations, vec![("walk".to_owned(), 2.0)]);
        assert!(present.is_playing("walk"));
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let world = WorldBuilder::new(config(10))
            .prop("wolf", Vec3::new(4.0, 0.0, 0.0))
            .agent(AgentSetup::new("sheep", Vec3::ZERO))
            .build()
            .unwrap();
        assert_eq!(world.len(), 2);
        assert_eq!(world.kind(AgentId(0)), Some("wolf"));
        assert_eq!(world.kind(AgentId(1)), Some("sheep"));
        assert!(world.manager(AgentId(0)).is_none());
        assert!(world.manager(AgentId(1)).is_some());
        assert_eq!(world.position(AgentId(0)), Some(Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn rejects_non_positive_dt() {
        let cfg = SimConfig { dt_secs: 0.0, ..config(10) };
        assert!(matches!(WorldBuilder::new(cfg).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn rejects_bad_bounds() {
        let result = WorldBuilder::new(config(10)).bounds(-1.0).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn specs_go_through_registry() {
        let world = WorldBuilder::new(config(10))
            .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs(SHEEP)))
            .build_with(&registry())
            .unwrap();
        assert_eq!(world.manager(AgentId(0)).map(|m| m.len()), Some(2));
    }

    #[test]
    fn unknown_codes_are_skipped() {
        let world = WorldBuilder::new(config(10))
            .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs(SHEEP)))
            .build()
            .unwrap();
        assert_eq!(world.manager(AgentId(0)).map(|m| m.len()), Some(0));
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_tests {
    use super::*;
    use ai_task::{DamageSource, NotifyData};

    #[test]
    fn run_reaches_total_ticks() {
        let mut world = WorldBuilder::new(SimConfig { output_interval_ticks: 5, ..config(20) })
            .agent(AgentSetup::new("rabbit", Vec3::ZERO).specs(specs(WANDERER)))
            .build_with(&registry())
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        assert_eq!(world.clock.tick, 20);
        assert!((world.now().0 - 2.0).abs() < 1e-4);
        assert_eq!(rec.starts, 20);
        assert_eq!(rec.summaries.len(), 20);
        assert_eq!(rec.ended_at, Some(20));
        assert_eq!(
            rec.snapshots.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
            vec![5, 10, 15, 20]
        );
        assert!(rec.summaries.iter().all(|s| s.agents == 1));
    }

    #[test]
    fn run_ticks_ignores_total() {
        let mut world = WorldBuilder::new(config(5)).build().unwrap();
        world.run_ticks(12, &mut NoopObserver).unwrap();
        assert_eq!(world.clock.tick, 12);
    }

    #[test]
    fn wanderer_moves() {
        let mut world = WorldBuilder::new(config(50))
            .agent(AgentSetup::new("rabbit", Vec3::ZERO).specs(specs(WANDERER)))
            .build_with(&registry())
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        let rabbit = AgentId(0);
        assert!(rec.started("wander") >= 1);
        assert!(rec.summaries.iter().any(|s| s.moving == 1));
        assert_ne!(world.position(rabbit), Some(Vec3::ZERO));
        assert!(rec.events.iter().all(|(id, _)| *id == rabbit));
    }

    #[test]
    fn sheep_runs_from_wolf() {
        let mut world = WorldBuilder::new(config(30))
            .prop("wolf", Vec3::new(4.0, 0.0, 0.0))
            .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs(SHEEP)).scheduler(preempting()))
            .build_with(&registry())
            .unwrap();
        world.run(&mut NoopObserver).unwrap();

        let sheep = AgentId(1);
        assert!(world.manager(sheep).unwrap().is_task_active("fleeentity"));
        assert!(world.position(sheep).unwrap().x < -3.0);
        assert!(world.presentation(sheep).unwrap().is_playing("run"));
    }

    #[test]
    fn hurt_makes_sheep_flee_attacker() {
        let mut world = WorldBuilder::new(config(100))
            .prop("player", Vec3::new(0.0, 0.0, 2.0))
            .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs(SHEEP)).scheduler(preempting()))
            .build_with(&registry())
            .unwrap();
        let (player, sheep) = (AgentId(0), AgentId(1));

        world.run_ticks(3, &mut NoopObserver).unwrap();
        assert!(world.manager(sheep).unwrap().is_task_active("idle"));

        world
            .hurt(sheep, &DamageSource::attack(player, Vec3::new(0.0, 0.0, 2.0)), 1.0)
            .unwrap();
        world.run_ticks(3, &mut NoopObserver).unwrap();
        assert!(world.manager(sheep).unwrap().is_task_active("fleeentity"));
        assert!(world.position(sheep).unwrap().z < 0.0);
    }

    #[test]
    fn same_seed_same_run() {
        let build = || {
            let mut b = WorldBuilder::new(config(80));
            for i in 0..4 {
                b = b.agent(
                    AgentSetup::new("rabbit", Vec3::new(i as f32 * 3.0, 0.0, 0.0))
                        .specs(specs(WANDERER)),
                );
            }
            b.build_with(&registry()).unwrap()
        };
        let (mut a, mut b) = (build(), build());
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        for i in 0..4 {
            assert_eq!(a.position(AgentId(i)), b.position(AgentId(i)));
        }
    }

    #[test]
    fn despawn_removes_entity() {
        let mut world = WorldBuilder::new(config(10))
            .prop("wolf", Vec3::new(4.0, 0.0, 0.0))
            .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs(SHEEP)).scheduler(preempting()))
            .build_with(&registry())
            .unwrap();
        let (wolf, sheep) = (AgentId(0), AgentId(1));

        world.run_ticks(2, &mut NoopObserver).unwrap();
        world.despawn(sheep).unwrap();
        assert!(!world.is_alive(sheep));
        assert_eq!(world.position(sheep), None);
        assert!(world.manager(sheep).is_none());
        assert!(matches!(world.despawn(sheep), Err(SimError::Despawned(_))));

        let snap = world.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, wolf);

        world.run_ticks(2, &mut NoopObserver).unwrap();
    }

    #[test]
    fn host_events_report_bad_targets() {
        let mut world = WorldBuilder::new(config(10))
            .prop("rock", Vec3::ZERO)
            .build()
            .unwrap();
        let data = NotifyData::default();
        assert!(matches!(
            world.notify(AgentId(0), "bell", &data),
            Err(SimError::NoBrain(_))
        ));
        assert!(matches!(
            world.notify(AgentId(5), "bell", &data),
            Err(SimError::UnknownAgent(_))
        ));
    }

    #[test]
    fn props_spawned_mid_run_are_seen() {
        let mut world = WorldBuilder::new(config(40))
            .agent(AgentSetup::new("sheep", Vec3::ZERO).specs(specs(SHEEP)).scheduler(preempting()))
            .build_with(&registry())
            .unwrap();
        let sheep = AgentId(0);
        world.run_ticks(3, &mut NoopObserver).unwrap();
        assert!(!world.manager(sheep).unwrap().is_task_active("fleeentity"));

        let wolf = world.spawn_prop("wolf", Vec3::new(-3.0, 0.0, 0.0)).unwrap();
        assert_eq!(wolf, AgentId(1));
        world.run_ticks(5, &mut NoopObserver).unwrap();
        assert!(world.manager(sheep).unwrap().is_task_active("fleeentity"));
        assert!(world.position(sheep).unwrap().x > 0.0);
    }
}

// ── Activities in the world ───────────────────────────────────────────────────

#[cfg(test)]
mod activity_tests {
    use super::*;
    use ai_activity::{ActivityOutcome, parse_activities};

    const GO_HOME: &str = r#"[
      { "code": "go-home", "severity": "hard",
        "conditions": [{ "type": "flag", "name": "dusk" }],
        "actions": [
          { "type": "goTo", "target": { "x": -5, "y": 0, "z": 0 }, "speed": 3 },
          { "type": "playSound", "location": "sheep/baa" }
        ] }
    ]"#;

    #[test]
    fn activity_takes_over_and_hands_back() {
        let mut world = WorldBuilder::new(config(400))
            .agent(
                AgentSetup::new("rabbit", Vec3::ZERO)
                    .specs(specs(WANDERER))
                    .activities(parse_activities(GO_HOME).unwrap()),
            )
            .build_with(&registry())
            .unwrap();
        let rabbit = AgentId(0);
        let mut rec = Recorder::default();

        world.run_ticks(5, &mut rec).unwrap();
        assert!(world.manager(rabbit).unwrap().is_task_active("wander"));

        world.activities_mut(rabbit).unwrap().set_flag("dusk", true);
        world.run_ticks(2, &mut rec).unwrap();
        let manager = world.manager(rabbit).unwrap();
        assert_eq!(manager.severity(), Severity::Hard);
        assert!(!manager.is_task_active("wander"));
        assert_eq!(world.destination(rabbit), Some(Vec3::new(-5.0, 0.0, 0.0)));

        let snap = world.snapshot();
        assert_eq!(snap[0].activity.as_deref(), Some("go-home"));
        assert!(snap[0].running.is_empty());

        world.activities_mut(rabbit).unwrap().set_flag("dusk", false);
        world.run_ticks(200, &mut rec).unwrap();
        let activities = world.activities(rabbit).unwrap();
        assert_eq!(activities.last_outcome(), Some(("go-home", ActivityOutcome::Completed)));
        assert!(!world.manager(rabbit).unwrap().is_paused());
        assert_eq!(rec.sounds, vec![(rabbit, "sheep/baa".to_owned())]);
        assert!(rec.events.iter().any(|(_, e)| matches!(e, LifecycleEvent::Resumed { .. })));
        assert!(rec.started("wander") >= 2);
    }

    #[test]
    fn forced_hard_activity_survives_the_flush() {
        let mut world = WorldBuilder::new(config(400))
            .agent(
                AgentSetup::new("rabbit", Vec3::ZERO)
                    .specs(specs(WANDERER))
                    .activities(parse_activities(GO_HOME).unwrap()),
            )
            .build_with(&registry())
            .unwrap();
        let rabbit = AgentId(0);
        let mut rec = Recorder::default();

        world.run_ticks(5, &mut rec).unwrap();
        assert!(world.manager(rabbit).unwrap().is_task_active("wander"));

        world.force_activity(rabbit, "go-home").unwrap();
        world.run_ticks(3, &mut rec).unwrap();

        let activities = world.activities(rabbit).unwrap();
        assert!(activities.is_active(), "last outcome: {:?}", activities.last_outcome());
        assert!(!world.manager(rabbit).unwrap().is_task_active("wander"));
        assert_eq!(world.destination(rabbit), Some(Vec3::new(-5.0, 0.0, 0.0)));

        assert!(matches!(
            world.force_activity(rabbit, "nap"),
            Err(SimError::Activity(_))
        ));
    }
}
