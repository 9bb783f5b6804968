//! High-level runtime orchestrator.
//!
//! [`Runtime`] owns the herd state, the world oracles, the leader brain, and
//! the event bus. Hosts feed it wall-clock frame times through
//! [`Runtime::advance`]; it slices them into fixed simulation steps and
//! carries any remainder into the next frame. Player input arrives through
//! the `player_*` methods between frames.

use herd_core::{
    BroadcastReport, CoordinatorError, EffectSink, Env, FlatGround, FollowerId, GroundOracle,
    HerdConfig, HerdCoordinator, HerdEnv, HerdState, HitOutcome, ImpactOutcome, LeaderId,
    LeaderKind, ManeuverKind, PcgRng, RngOracle, Standings, TickReport, Vec3,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::effects::BusEffectSink;
use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, HerdEvent, SessionEvent, Topic};
use crate::providers::leader_ai::LeaderBrain;
use crate::session::{Session, SessionOutcome};

/// Result of one [`Runtime::advance`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed steps run this frame.
    pub steps: u32,
    /// Time thrown away because the step cap was hit.
    pub discarded_secs: f32,
    pub joins: Vec<(FollowerId, LeaderId)>,
    /// Set on the frame the session ended.
    pub session_ended: Option<SessionOutcome>,
}

fn coordinator<'a>(
    state: &'a mut HerdState,
    config: &'a HerdConfig,
    ground: &'a dyn GroundOracle,
    rng: &'a PcgRng,
    effects: &'a BusEffectSink,
) -> HerdCoordinator<'a> {
    let env: HerdEnv<'a> = Env::new(
        Some(ground),
        Some(rng as &dyn RngOracle),
        Some(effects as &dyn EffectSink),
    );
    HerdCoordinator::new(state, config, env)
}

/// Main runtime that drives the herd simulation.
pub struct Runtime {
    config: RuntimeConfig,
    state: HerdState,
    ground: Box<dyn GroundOracle>,
    rng: PcgRng,
    effects: BusEffectSink,
    bus: EventBus,
    brain: LeaderBrain,
    session: Session,
    accumulator: f32,
    player: Option<LeaderId>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> &HerdState {
        &self.state
    }

    pub fn now(&self) -> f32 {
        self.state.now()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Cloneable handle to the event bus.
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn player(&self) -> Option<LeaderId> {
        self.player
    }

    fn require_player(&self) -> Result<LeaderId> {
        self.player.ok_or(RuntimeError::NoPlayer)
    }

    fn coordinator(&mut self) -> HerdCoordinator<'_> {
        coordinator(
            &mut self.state,
            &self.config.herd,
            self.ground.as_ref(),
            &self.rng,
            &self.effects,
        )
    }

    pub fn standings(&mut self) -> Standings {
        let size = self.config.session.standings_size;
        self.coordinator().standings(size)
    }

    // ===== spawning =====

    pub fn spawn_player(&mut self, position: Vec3, heading: f32) -> Result<LeaderId> {
        if let Some(existing) = self.player {
            return Err(RuntimeError::PlayerExists(existing));
        }
        let id = self
            .coordinator()
            .add_leader(LeaderKind::Player, position, heading)?;
        self.player = Some(id);
        Ok(id)
    }

    /// Spawns an autonomous leader wandering around `anchor`.
    pub fn spawn_rival(&mut self, anchor: Vec3, heading: f32) -> Result<LeaderId> {
        let id = self
            .coordinator()
            .add_leader(LeaderKind::autonomous_at(anchor), anchor, heading)?;
        Ok(id)
    }

    pub fn spawn_follower(&mut self, position: Vec3, heading: f32) -> Result<FollowerId> {
        Ok(self.coordinator().add_follower(position, heading)?)
    }

    /// Removes a leader; its members go back to roaming.
    pub fn remove_leader(&mut self, leader: LeaderId) -> Result<Vec<FollowerId>> {
        let released = self.coordinator().remove_leader(leader)?;
        if self.player == Some(leader) {
            self.player = None;
        }
        Ok(released)
    }

    pub fn remove_follower(&mut self, follower: FollowerId) -> Result<()> {
        self.coordinator().remove_follower(follower)?;
        Ok(())
    }

    // ===== player input =====

    /// Moves the player leader. Returns false, leaving the pose untouched,
    /// while the player is incapacitated.
    pub fn move_player(&mut self, position: Vec3, heading: f32, velocity: Vec3) -> Result<bool> {
        let player = self.require_player()?;
        let mut coordinator = self.coordinator();
        let now = coordinator.now();
        let leader = coordinator.leader(player)?;
        if leader.is_incapacitated(now) {
            let (held, facing) = (leader.position, leader.heading);
            debug!(%player, "move refused: player incapacitated");
            coordinator.set_leader_pose(player, held, facing, Vec3::ZERO)?;
            return Ok(false);
        }
        coordinator.set_leader_pose(player, position, heading, velocity)?;
        Ok(true)
    }

    /// The player jumped; members will copy it with a staggered delay.
    pub fn player_jump(&mut self) -> Result<bool> {
        let player = self.require_player()?;
        Ok(self.coordinator().signal(player)?)
    }

    /// Dash along `direction`, or the player's facing when it is zero.
    pub fn player_dash(&mut self, direction: Vec3) -> Result<BroadcastReport> {
        let player = self.require_player()?;
        let report = self.coordinator().broadcast_dash(player, direction)?;
        self.publish_broadcast(player, ManeuverKind::Dash, report);
        Ok(report)
    }

    /// Swing the herd around the player to the side it is facing.
    ///
    /// `clockwise` is ignored while clockwise turns are forced by config.
    pub fn player_quick_turn(&mut self, clockwise: bool) -> Result<BroadcastReport> {
        let player = self.require_player()?;
        let clockwise = clockwise || self.config.herd.maneuvers.force_clockwise_turn;
        let mut coordinator = self.coordinator();
        let leader = coordinator.leader(player)?;
        let (pivot, forward) = (leader.position, leader.forward());
        let report = coordinator.broadcast_quick_turn(player, pivot, forward, clockwise)?;
        self.publish_broadcast(player, ManeuverKind::QuickTurn, report);
        Ok(report)
    }

    /// Raises the shield around the player, or moves a raised one along.
    pub fn player_shield(&mut self) -> Result<BroadcastReport> {
        let player = self.require_player()?;
        let mut coordinator = self.coordinator();
        let leader = coordinator.leader(player)?;
        let (pivot, forward, holding) =
            (leader.position, leader.forward(), leader.shield.is_some());
        let report = if holding {
            coordinator.update_shield(player, pivot, forward)?
        } else {
            let report = coordinator.start_shield(player, pivot, forward)?;
            self.publish_broadcast(player, ManeuverKind::Shield, report);
            report
        };
        Ok(report)
    }

    pub fn player_dismiss_shield(&mut self) -> Result<usize> {
        let player = self.require_player()?;
        Ok(self.coordinator().dismiss_shield(player)?)
    }

    // ===== combat =====

    /// Environmental impact on `leader` (no attacker to take the drops).
    pub fn impact(&mut self, leader: LeaderId, force: f32) -> Result<ImpactOutcome> {
        let outcome = self.coordinator().disruption().apply_impact(leader, force)?;
        self.publish_impact(leader, &outcome);
        Ok(outcome)
    }

    /// `attacker` hits `victim`; the attacker takes over part of the drops.
    pub fn hit(&mut self, attacker: LeaderId, victim: LeaderId, force: f32) -> Result<HitOutcome> {
        let outcome = self
            .coordinator()
            .disruption()
            .resolve_hit(attacker, victim, force)?;
        self.publish_impact(victim, &outcome.impact);
        if !outcome.impact.dropped().is_empty() {
            self.bus.publish(Event::Herd(HerdEvent::DropsResolved {
                attacker,
                stolen: outcome.steal.stolen.clone(),
                despawned: outcome.steal.despawned.clone(),
            }));
        }
        Ok(outcome)
    }

    fn publish_impact(&self, leader: LeaderId, outcome: &ImpactOutcome) {
        if let ImpactOutcome::Disrupted {
            dropped,
            incapacitated_until,
        } = outcome
        {
            self.bus.publish(Event::Herd(HerdEvent::LeaderDisrupted {
                leader,
                dropped: dropped.clone(),
                incapacitated_until: *incapacitated_until,
            }));
        }
    }

    fn publish_broadcast(&self, leader: LeaderId, kind: ManeuverKind, report: BroadcastReport) {
        self.bus.publish(Event::Herd(HerdEvent::Broadcast {
            leader,
            kind,
            addressed: report.addressed,
            accepted: report.accepted,
        }));
    }

    // ===== stepping =====

    /// Feeds `frame_secs` of host time into the fixed-step accumulator.
    ///
    /// # Errors
    ///
    /// Fails on a negative or non-finite frame time, after the session has
    /// ended, or when a step fails.
    pub fn advance(&mut self, frame_secs: f32) -> Result<FrameReport> {
        if !(frame_secs.is_finite() && frame_secs >= 0.0) {
            return Err(CoordinatorError::InvalidStep(frame_secs).into());
        }
        if self.session.is_over() {
            return Err(RuntimeError::SessionEnded);
        }

        let step = self.config.simulation.fixed_step;
        let max_steps = self.config.simulation.max_steps_per_frame;
        self.accumulator += frame_secs;

        let mut report = FrameReport::default();
        while self.accumulator >= step && report.steps < max_steps {
            let tick = self.step()?;
            self.accumulator -= step;
            report.steps += 1;
            report.joins.extend(tick.joins);
            if let Some(outcome) = self.session_check() {
                report.session_ended = Some(outcome);
                self.accumulator = 0.0;
                return Ok(report);
            }
        }

        if self.accumulator >= step {
            let remainder = self.accumulator % step;
            report.discarded_secs = self.accumulator - remainder;
            self.accumulator = remainder;
            warn!(
                discarded = report.discarded_secs,
                max_steps, "frame exceeded max steps; dropping time"
            );
        }
        Ok(report)
    }

    /// Runs exactly one fixed step: leader brains, then the core tick.
    pub fn step(&mut self) -> Result<TickReport> {
        let step = self.config.simulation.fixed_step;
        let Self {
            config,
            state,
            ground,
            rng,
            effects,
            bus,
            brain,
            ..
        } = self;

        effects.set_frame(state.clock.frame + 1);
        let mut coordinator = coordinator(state, &config.herd, ground.as_ref(), rng, effects);

        for decision in brain.think_all(&mut coordinator, ground.as_ref(), step)? {
            if !decision.recruited.is_empty() {
                bus.publish(Event::Herd(HerdEvent::Recruited {
                    leader: decision.leader,
                    followers: decision.recruited,
                }));
            }
        }

        let report = coordinator.tick(step)?;
        for &(follower, kind) in &report.completed_maneuvers {
            bus.publish(Event::Herd(HerdEvent::ManeuverCompleted { follower, kind }));
        }
        for &leader in &report.recovered {
            bus.publish(Event::Herd(HerdEvent::LeaderRecovered { leader }));
        }
        Ok(report)
    }

    fn session_check(&mut self) -> Option<SessionOutcome> {
        let Self {
            config,
            state,
            ground,
            rng,
            effects,
            bus,
            session,
            ..
        } = self;
        let coordinator = coordinator(state, &config.herd, ground.as_ref(), rng, effects);
        let outcome = session.check(&coordinator)?;
        bus.publish(Event::Session(SessionEvent::Ended {
            now: outcome.ended_at,
            standings: outcome.standings.clone(),
        }));
        Some(outcome)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    ground: Option<Box<dyn GroundOracle>>,
    bus: Option<EventBus>,
    brain: Option<LeaderBrain>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            ground: None,
            bus: None,
            brain: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Terrain oracle. Defaults to a flat plane at height zero.
    pub fn ground(mut self, ground: impl GroundOracle + 'static) -> Self {
        self.ground = Some(Box::new(ground));
        self
    }

    /// Publish onto an existing bus, e.g. one a presentation layer already
    /// subscribed to.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn leader_brain(mut self, brain: LeaderBrain) -> Self {
        self.brain = Some(brain);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.events.capacity));
        let seed = self.config.simulation.seed;
        let session = Session::new(self.config.session.clone());

        bus.publish(Event::Session(SessionEvent::Started {
            seed,
            time_limit_secs: self.config.session.time_limit_secs,
        }));
        info!(
            seed,
            step = self.config.simulation.fixed_step,
            time_limit = self.config.session.time_limit_secs,
            "runtime started"
        );
        debug!(config = ?self.config.herd, "herd tunables");

        Ok(Runtime {
            state: HerdState::with_seed(seed),
            ground: self
                .ground
                .unwrap_or_else(|| Box::new(FlatGround::default())),
            rng: PcgRng,
            effects: BusEffectSink::new(bus.clone()),
            bus,
            brain: self.brain.unwrap_or_default(),
            session,
            accumulator: 0.0,
            player: None,
            config: self.config,
        })
    }
}
