//! Activation loop and per-unit service cycles.
//!
//! A [`ServiceScheduler`] owns one long-running activation loop plus one task
//! per in-flight service cycle. Each cycle walks its unit through
//!
//! ```text
//! Idle -> Activating -> EnRouteToSlot -> InService -> EnRouteToExit -> Idle
//! ```
//!
//! Registry and slot pool are each behind a `parking_lot::Mutex` that is only
//! held for instantaneous steps, never across a suspension point. A unit is
//! moved out of `Idle` under the registry lock, so a unit can never be in two
//! cycles at once.
//!
//! Every suspension point (activation delay, travel polling, service hold)
//! races against the scheduler's [`CancellationToken`]. A cancelled cycle stops
//! where it is: the slot stays occupied and no further movement is issued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::StationConfig;
use crate::core::notifier::{Notifier, ServiceCompletedEvent};
use crate::core::registry::UnitRegistry;
use crate::core::slot_pool::{ResourceSlot, ResourceSlotPool};
use crate::core::stats::{StationCounters, StationStats};
use crate::core::timing::{Clock, DelayRange, DelaySource};
use crate::core::unit::{UnitFactory, UnitState};
use crate::core::SchedulerError;
use crate::util::types::{CycleId, Position, SlotId, UnitId};

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Injected timing and observer collaborators.
pub struct Collaborators {
    /// Suspension provider.
    pub clock: Arc<dyn Clock>,
    /// Source of activation and service delays.
    pub delays: Box<dyn DelaySource>,
    /// Receives service-completion events.
    pub notifier: Arc<dyn Notifier>,
}

/// State shared between the activation loop and every cycle task.
struct Station {
    registry: Mutex<UnitRegistry>,
    slots: Mutex<ResourceSlotPool>,
    delays: Mutex<Box<dyn DelaySource>>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    counters: StationCounters,
    cancel: CancellationToken,
    activation_delay: DelayRange,
    service_delay: DelayRange,
    frame_interval: Duration,
    start: Position,
    exit: Position,
}

/// Drives pooled units through the station.
pub struct ServiceScheduler<S> {
    station: Arc<Station>,
    spawner: S,
}

impl<S: Clone> Clone for ServiceScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            station: Arc::clone(&self.station),
            spawner: self.spawner.clone(),
        }
    }
}

impl<S> ServiceScheduler<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Validate `config`, spawn the unit pool and build the slot pool.
    ///
    /// Nothing runs until [`run`](Self::run) or [`spawn_run`](Self::spawn_run)
    /// is called.
    pub async fn start(
        config: &StationConfig,
        factory: &dyn UnitFactory,
        collaborators: Collaborators,
        spawner: S,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        let registry = UnitRegistry::initialize(config.capacity, factory, config.start).await?;
        let slots = ResourceSlotPool::new(config.slots.iter().copied());
        info!(
            capacity = registry.len(),
            slots = slots.capacity(),
            "service station ready"
        );

        let station = Station {
            registry: Mutex::new(registry),
            slots: Mutex::new(slots),
            delays: Mutex::new(collaborators.delays),
            clock: collaborators.clock,
            notifier: collaborators.notifier,
            counters: StationCounters::default(),
            cancel: CancellationToken::new(),
            activation_delay: config.activation_delay,
            service_delay: config.service_delay,
            frame_interval: config.frame_interval(),
            start: config.start.position,
            exit: config.exit,
        };
        Ok(Self {
            station: Arc::new(station),
            spawner,
        })
    }

    /// Run the activation loop until [`shutdown`](Self::shutdown).
    ///
    /// Each iteration fires one [`tick`](Self::tick) and then waits a freshly
    /// drawn activation delay, so the first activation happens immediately.
    pub async fn run(&self) {
        info!("activation loop started");
        while !self.station.cancel.is_cancelled() {
            self.tick();
            let delay = self.station.next_delay(&self.station.activation_delay);
            if self.station.suspend(delay).await.is_err() {
                break;
            }
        }
        info!("activation loop stopped");
    }

    /// Run the activation loop on the spawner.
    pub fn spawn_run(&self) {
        let scheduler = self.clone();
        self.spawner.spawn(async move { scheduler.run().await });
    }

    /// Fire one activation tick.
    ///
    /// Picks the first idle unit, marks it `Activating` and spawns its service
    /// cycle. Returns `None` when no unit is idle, which is an ordinary
    /// steady-state condition.
    pub fn tick(&self) -> Option<UnitId> {
        let station = &self.station;
        StationCounters::bump(&station.counters.ticks);
        if station.cancel.is_cancelled() {
            return None;
        }

        let unit = {
            let mut registry = station.registry.lock();
            let Some(unit) = registry.find_idle() else {
                debug!("tick: no idle unit");
                return None;
            };
            registry.get_mut(unit).ok()?.set_state(UnitState::Activating);
            unit
        };
        StationCounters::bump(&station.counters.activations);

        let cycle = CycleId::new_v4();
        debug!(%cycle, %unit, "tick: activating unit");
        let station = Arc::clone(station);
        self.spawner.spawn(async move {
            match station.service_cycle(cycle, unit).await {
                Ok(()) => StationCounters::bump(&station.counters.completed_cycles),
                Err(SchedulerError::Cancelled) => {
                    debug!(%cycle, %unit, "cycle abandoned on shutdown");
                    StationCounters::bump(&station.counters.cancelled_cycles);
                }
                Err(e) => {
                    warn!(%cycle, %unit, error = %e, "cycle aborted");
                    StationCounters::bump(&station.counters.aborted_cycles);
                }
            }
        });
        Some(unit)
    }

    /// Fire the cancellation context. The loop and every in-flight cycle stop
    /// at their next suspension point.
    pub fn shutdown(&self) {
        if !self.station.cancel.is_cancelled() {
            info!("service station shutting down");
        }
        self.station.cancel.cancel();
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.station.cancel.is_cancelled()
    }

    /// Child token cancelled together with the scheduler.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.station.cancel.child_token()
    }

    /// Current counters and occupancy.
    pub fn stats(&self) -> StationStats {
        let (capacity, idle) = {
            let registry = self.station.registry.lock();
            (registry.len(), registry.idle_count())
        };
        let (slot_count, occupied) = {
            let slots = self.station.slots.lock();
            (slots.capacity(), slots.occupied_count())
        };
        self.station
            .counters
            .snapshot(capacity, slot_count, idle, occupied)
    }

    /// State of one unit.
    pub fn unit_state(&self, unit: UnitId) -> Result<UnitState, SchedulerError> {
        self.station.registry.lock().state(unit)
    }

    /// States of every unit in registry order.
    pub fn unit_states(&self) -> Vec<UnitState> {
        self.station.registry.lock().states()
    }

    /// Current coordinate of one unit.
    pub fn unit_position(&self, unit: UnitId) -> Result<Position, SchedulerError> {
        self.station.registry.lock().get(unit).map(|u| u.position())
    }

    /// Whether one unit is visible/processing.
    pub fn unit_active(&self, unit: UnitId) -> Result<bool, SchedulerError> {
        self.station.registry.lock().get(unit).map(|u| u.is_active())
    }

    /// Unit bound to `slot`, if any.
    pub fn slot_occupant(&self, slot: SlotId) -> Option<UnitId> {
        self.station.slots.lock().occupant(slot)
    }

    /// Number of occupied slots.
    pub fn occupied_slots(&self) -> usize {
        self.station.slots.lock().occupied_count()
    }
}

impl Station {
    fn next_delay(&self, range: &DelayRange) -> Duration {
        self.delays.lock().next_delay(range)
    }

    /// Sleep on the clock unless cancelled first.
    async fn suspend(&self, duration: Duration) -> Result<(), SchedulerError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SchedulerError::Cancelled),
            () = self.clock.sleep(duration) => Ok(()),
        }
    }

    /// Poll the unit toward `target` once per frame until it arrives.
    async fn travel(&self, unit: UnitId, target: Position) -> Result<(), SchedulerError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(SchedulerError::Cancelled);
            }
            let arrived = self.registry.lock().get_mut(unit)?.move_towards(target);
            if arrived {
                return Ok(());
            }
            self.suspend(self.frame_interval).await?;
        }
    }

    fn set_state(&self, unit: UnitId, state: UnitState) -> Result<(), SchedulerError> {
        self.registry.lock().get_mut(unit)?.set_state(state);
        Ok(())
    }

    /// Return `unit` to Idle at the start point, inactive and slot-less.
    fn reset(&self, unit: UnitId) -> Result<(), SchedulerError> {
        self.registry.lock().get_mut(unit)?.reset(self.start);
        Ok(())
    }

    /// Activate `unit` and bind it to a free slot. On failure the unit is
    /// reset to Idle before the error is returned.
    fn activate(&self, unit: UnitId) -> Result<ResourceSlot, SchedulerError> {
        let mut registry = self.registry.lock();
        let record = registry.get_mut(unit)?;
        record.set_active(true);

        let acquired = self.slots.lock().acquire_free_slot(unit);
        match acquired {
            Ok(slot) => {
                record.bind_slot(Some(slot.id));
                record.set_state(UnitState::EnRouteToSlot);
                Ok(slot)
            }
            Err(e) => {
                record.reset(self.start);
                Err(e)
            }
        }
    }

    /// Free the unit's slot. On failure the unit is reset to Idle before the
    /// error is returned. A slot bound to another unit is left untouched.
    fn release(&self, unit: UnitId, slot: SlotId) -> Result<(), SchedulerError> {
        let released = {
            let mut slots = self.slots.lock();
            match slots.occupant(slot) {
                Some(holder) if holder != unit => {
                    error!(%slot, %unit, %holder, "slot is held by another unit");
                    Err(SchedulerError::SlotNotOccupied(slot))
                }
                _ => slots.release_slot(slot).map(|_| ()),
            }
        };
        match released {
            Ok(()) => {
                let mut registry = self.registry.lock();
                let record = registry.get_mut(unit)?;
                record.bind_slot(None);
                record.set_state(UnitState::EnRouteToExit);
                Ok(())
            }
            Err(e) => {
                error!(%slot, %unit, error = %e, "slot release failed");
                self.reset(unit)?;
                Err(e)
            }
        }
    }

    async fn service_cycle(&self, cycle: CycleId, unit: UnitId) -> Result<(), SchedulerError> {
        let slot = self.activate(unit)?;
        info!(%cycle, %unit, slot = %slot.id, "service cycle started");

        self.travel(unit, slot.position).await?;
        self.set_state(unit, UnitState::InService)?;
        debug!(%cycle, %unit, slot = %slot.id, "arrived at slot");

        let service_time = self.next_delay(&self.service_delay);
        self.suspend(service_time).await?;

        self.release(unit, slot.id)?;
        self.notifier
            .emit(ServiceCompletedEvent::new(cycle, unit, slot.id, service_time));
        debug!(%cycle, %unit, ?service_time, "service finished, leaving");

        self.travel(unit, self.exit).await?;
        self.reset(unit)?;
        info!(%cycle, %unit, "service cycle completed");
        Ok(())
    }
}
