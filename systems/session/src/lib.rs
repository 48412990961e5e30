#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Encounter orchestration.
//!
//! A [`Session`] owns the world together with the turn scheduler and the
//! movement system, and routes notifications between them: defeats retract
//! units from the queue and the grid, the end of every action advances the
//! turn, and the encounter ends once either side is wiped out.

mod config;

use hex_tactics_core::{
    Command, EntityId, Event, HexCell, HexLayout, MoveError, Outcome, SpawnError,
};
use hex_tactics_system_combat::{self as combat, CombatError};
use hex_tactics_system_enemy_ai::{self as enemy_ai, Decision};
use hex_tactics_system_movement::{Animator, Movement, PendingMove};
use hex_tactics_system_spawning::{Config as SpawnConfig, Spawning};
use hex_tactics_system_turns::TurnScheduler;
use hex_tactics_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, info};

pub use config::SessionConfig;

/// Reasons a session refuses an action.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The encounter already ended.
    #[error("the session has ended")]
    Finished,
    /// No player unit exists.
    #[error("no player unit is alive")]
    NoPlayer,
    /// The player cannot spawn on the configured start cell.
    #[error("player could not be placed: {0}")]
    PlayerSpawn(SpawnError),
    /// The action belongs to the player but another unit is active.
    #[error("it is not the player's turn")]
    NotPlayersTurn,
    /// The action belongs to an enemy but none is active.
    #[error("it is not an enemy's turn")]
    NotEnemyTurn,
    /// Movement failed or is still in progress.
    #[error(transparent)]
    Move(#[from] MoveError),
    /// An attack referenced a unit without combat attributes.
    #[error(transparent)]
    Combat(#[from] CombatError),
}

#[derive(Debug)]
struct InFlight {
    pending: PendingMove,
    engaged: Vec<EntityId>,
}

/// One encounter between the player and a group of enemies.
#[derive(Debug)]
pub struct Session {
    world: World,
    turns: TurnScheduler,
    movement: Movement,
    in_flight: Option<InFlight>,
    outcome: Option<Outcome>,
}

impl Session {
    /// Generates the grid, places every unit and starts combat.
    pub fn start(config: &SessionConfig, out_events: &mut Vec<Event>) -> Result<Self, SessionError> {
        let mut world = World::with_layout(HexLayout::new(config.hex_size));
        world::apply(
            &mut world,
            Command::GenerateGrid {
                radius: config.radius,
                blocked_tiles: config.blocked_tiles,
                reserved: config.player_start,
                seed: config.seed,
            },
            out_events,
        );

        let mut spawning = Spawning::new(
            SpawnConfig::new(config.enemy_count, config.min_enemy_distance, config.seed)
                .with_enemy_stats(config.grunt),
        );
        let mut commands = Vec::new();
        spawning.spawn_player(config.player_start, config.player, &mut commands);
        let mut placed = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut placed);
        }
        if let Some(reason) = placed.iter().find_map(|event| match event {
            Event::SpawnRejected { reason, .. } => Some(*reason),
            _ => None,
        }) {
            return Err(SessionError::PlayerSpawn(reason));
        }
        out_events.append(&mut placed);

        spawning.spawn_enemies(config.player_start, &query::free_cells(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, out_events);
        }

        Ok(Self::from_world(world, out_events))
    }

    /// Starts combat on a world whose units are already placed.
    pub fn from_world(world: World, out_events: &mut Vec<Event>) -> Self {
        let mut session = Self {
            world,
            turns: TurnScheduler::new(),
            movement: Movement::new(),
            in_flight: None,
            outcome: None,
        };
        session.turns.start_combat(query::store(&session.world), out_events);
        session.check_outcome(out_events);
        session
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the turn queue.
    #[must_use]
    pub fn turns(&self) -> &TurnScheduler {
        &self.turns
    }

    /// Unit whose turn it is.
    #[must_use]
    pub fn current(&self) -> Option<EntityId> {
        self.turns.current()
    }

    /// How the encounter ended, once it has.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Reports whether a traversal is waiting for [`Session::complete_move`].
    #[must_use]
    pub fn is_awaiting_move(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Reports whether the active unit is the player.
    #[must_use]
    pub fn is_player_turn(&self) -> bool {
        query::player(&self.world).is_some_and(|player| self.turns.is_turn_of(player))
    }

    /// Forwards a pointer hover to presentation collaborators.
    pub fn hover_tile(&mut self, cell: HexCell, out_events: &mut Vec<Event>) {
        world::apply(&mut self.world, Command::HoverTile { cell }, out_events);
    }

    /// Forwards the pointer leaving a tile.
    pub fn unhover_tile(&mut self, cell: HexCell, out_events: &mut Vec<Event>) {
        world::apply(&mut self.world, Command::UnhoverTile { cell }, out_events);
    }

    /// Orders the player to move to `cell`.
    ///
    /// Enemies in attack range before the move are remembered; those still in
    /// range once [`Session::complete_move`] runs are attacked. Selecting the
    /// player's own cell attacks without moving.
    pub fn select_tile<A>(
        &mut self,
        cell: HexCell,
        animator: &mut A,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError>
    where
        A: Animator + ?Sized,
    {
        self.ensure_running()?;
        let player = query::player(&self.world).ok_or(SessionError::NoPlayer)?;
        if !self.turns.is_turn_of(player) {
            return Err(SessionError::NotPlayersTurn);
        }
        world::apply(&mut self.world, Command::SelectTile { cell }, out_events);

        let store = query::store(&self.world);
        let engaged: Vec<EntityId> = query::enemies(&self.world)
            .into_iter()
            .filter(|enemy| {
                query::unit_cell(&self.world, *enemy)
                    .is_some_and(|at| combat::is_in_range(store, player, at))
            })
            .collect();

        let path = self.movement.plan(&self.world, player, cell)?;
        let pending = self.movement.begin(&self.world, player, path, animator)?;
        self.in_flight = Some(InFlight { pending, engaged });
        Ok(())
    }

    /// Lets the active enemy act.
    ///
    /// Attacks resolve immediately and end the turn. Moves are handed to the
    /// animator and end the turn once [`Session::complete_move`] runs.
    pub fn run_enemy_turn<A>(
        &mut self,
        animator: &mut A,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError>
    where
        A: Animator + ?Sized,
    {
        self.ensure_running()?;
        let enemy = self
            .turns
            .current()
            .filter(|unit| query::unit_kind(&self.world, *unit).is_some_and(|kind| kind.is_enemy()))
            .ok_or(SessionError::NotEnemyTurn)?;

        match enemy_ai::decide(&self.world, enemy) {
            Decision::Attack { target } => {
                self.strike(enemy, target, out_events)?;
                self.end_turn(out_events);
            }
            Decision::Move { path } => {
                let pending = self.movement.begin(&self.world, enemy, path, animator)?;
                self.in_flight = Some(InFlight {
                    pending,
                    engaged: Vec::new(),
                });
            }
            Decision::Wait => {
                debug!(enemy = enemy.get(), "enemy waits");
                self.end_turn(out_events);
            }
        }
        Ok(())
    }

    /// Completion signal for the traversal handed to the animator.
    ///
    /// Commits the move, resolves any follow-up attacks and ends the turn.
    /// Does nothing when no traversal is pending.
    pub fn complete_move(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        let Some(InFlight { pending, engaged }) = self.in_flight.take() else {
            return Ok(());
        };
        let mover = pending.unit();
        self.movement.finish(&mut self.world, pending, out_events);

        for enemy in engaged {
            if self.outcome.is_some() {
                break;
            }
            let Some(at) = query::unit_cell(&self.world, enemy) else {
                continue;
            };
            if combat::is_in_range(query::store(&self.world), mover, at) {
                self.strike(mover, enemy, out_events)?;
            }
        }

        self.end_turn(out_events);
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.outcome.is_some() {
            return Err(SessionError::Finished);
        }
        if self.in_flight.is_some() {
            return Err(SessionError::Move(MoveError::AlreadyInMotion));
        }
        Ok(())
    }

    fn strike(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let mut resolved = Vec::new();
        combat::attack(self.world.store_mut(), attacker, target, &mut resolved)?;
        for event in resolved {
            let defeated = match event {
                Event::UnitDefeated { unit } => Some(unit),
                _ => None,
            };
            out_events.push(event);
            if let Some(unit) = defeated {
                self.retire(unit, out_events);
            }
        }
        Ok(())
    }

    fn retire(&mut self, unit: EntityId, out_events: &mut Vec<Event>) {
        let was_current = self.turns.is_turn_of(unit);
        self.turns.remove_participant(unit);
        world::apply(&mut self.world, Command::RemoveUnit { unit }, out_events);
        if was_current {
            self.turns.announce(out_events);
        }
        self.check_outcome(out_events);
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        self.turns.end_turn(query::store(&self.world), out_events);
    }

    fn check_outcome(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        let outcome = if query::player(&self.world).is_none() {
            Outcome::Defeat
        } else if query::enemies(&self.world).is_empty() {
            Outcome::Victory
        } else {
            return;
        };
        info!(?outcome, "session ended");
        self.outcome = Some(outcome);
        self.in_flight = None;
        self.movement.reset();
        out_events.push(Event::SessionEnded { outcome });
    }
}
