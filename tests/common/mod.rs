//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use service_station::config::StationConfig;
use service_station::core::{
    Collaborators, DelayRange, InMemoryNotifier, MinDelay, SchedulerError, ServiceScheduler,
    SpawnError, TokioClock, UnitFactory, UnitHandle,
};
use service_station::runtime::TokioSpawner;
use service_station::util::{Orientation, Pose, Position};

pub const START: Position = Position::new(0.0, 0.0, -20.0);
pub const EXIT: Position = Position::new(0.0, 0.0, 20.0);
pub const FRAME_MS: u64 = 16;

/// Command issued to a unit handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveTowards(Position),
    Teleport(Position),
    SetActive(bool),
}

/// How many polls a leg takes before the unit reports arrival.
#[derive(Debug, Clone, Copy)]
pub enum Travel {
    /// Arrives on the first poll.
    Instant,
    /// Arrives on poll `n + 1`.
    Frames(u32),
    /// Never arrives.
    Stuck,
}

pub type CommandLog = Arc<Mutex<Vec<Command>>>;

pub struct ScriptedUnit {
    position: Position,
    target: Option<Position>,
    remaining: u32,
    travel: Travel,
    log: CommandLog,
}

impl UnitHandle for ScriptedUnit {
    fn move_towards(&mut self, target: Position) -> bool {
        self.log.lock().push(Command::MoveTowards(target));
        if self.target != Some(target) {
            self.target = Some(target);
            self.remaining = match self.travel {
                Travel::Instant => 0,
                Travel::Frames(n) => n,
                Travel::Stuck => u32::MAX,
            };
        }
        if matches!(self.travel, Travel::Stuck) {
            return false;
        }
        if self.remaining == 0 {
            self.position = target;
            return true;
        }
        self.remaining -= 1;
        false
    }

    fn teleport_to(&mut self, position: Position) {
        self.log.lock().push(Command::Teleport(position));
        self.position = position;
        self.target = None;
    }

    fn set_active(&mut self, active: bool) {
        self.log.lock().push(Command::SetActive(active));
    }

    fn position(&self) -> Position {
        self.position
    }
}

/// Factory producing [`ScriptedUnit`]s and keeping their command logs.
pub struct ScriptedFactory {
    travel: Travel,
    fail_at: Option<usize>,
    spawned: AtomicUsize,
    logs: Mutex<Vec<CommandLog>>,
}

impl ScriptedFactory {
    pub fn new(travel: Travel) -> Self {
        Self {
            travel,
            fail_at: None,
            spawned: AtomicUsize::new(0),
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(travel: Travel, index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new(travel)
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    pub fn log(&self, unit: usize) -> Vec<Command> {
        self.logs.lock()[unit].lock().clone()
    }
}

#[async_trait]
impl UnitFactory for ScriptedFactory {
    async fn spawn(
        &self,
        position: Position,
        _orientation: Orientation,
    ) -> Result<Box<dyn UnitHandle>, SpawnError> {
        let index = self.spawned.load(Ordering::SeqCst);
        if self.fail_at == Some(index) {
            return Err(SpawnError(format!("prefab {index} unavailable")));
        }
        self.spawned.fetch_add(1, Ordering::SeqCst);
        let log = CommandLog::default();
        self.logs.lock().push(Arc::clone(&log));
        Ok(Box::new(ScriptedUnit {
            position,
            target: None,
            remaining: 0,
            travel: self.travel,
            log,
        }))
    }
}

pub fn slot_position(index: usize) -> Position {
    Position::new(index as f32 * 4.0, 0.0, 0.0)
}

pub fn station_config(capacity: usize, slots: usize, activation: f64, service: f64) -> StationConfig {
    StationConfig {
        capacity,
        activation_delay: DelayRange::fixed(activation),
        service_delay: DelayRange::fixed(service),
        start: Pose::at(START),
        exit: EXIT,
        slots: (0..slots).map(slot_position).collect(),
        frame_interval_ms: FRAME_MS,
        seed: Some(7),
    }
}

pub struct Harness {
    pub scheduler: ServiceScheduler<TokioSpawner>,
    pub factory: Arc<ScriptedFactory>,
    pub notifier: Arc<InMemoryNotifier>,
}

/// Build a scheduler on the current runtime with fixed delays.
pub async fn harness(config: &StationConfig, travel: Travel) -> Result<Harness, SchedulerError> {
    let factory = Arc::new(ScriptedFactory::new(travel));
    let notifier = Arc::new(InMemoryNotifier::new(64));
    let collaborators = Collaborators {
        clock: Arc::new(TokioClock),
        delays: Box::new(MinDelay),
        notifier: notifier.clone(),
    };
    let scheduler =
        ServiceScheduler::start(config, factory.as_ref(), collaborators, TokioSpawner::current())
            .await?;
    Ok(Harness {
        scheduler,
        factory,
        notifier,
    })
}

/// Let spawned tasks run, advancing virtual time by `ms`.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
