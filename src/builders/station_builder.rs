//! Builder assembling a [`ServiceScheduler`] from a [`StationConfig`].

use std::sync::Arc;

use crate::config::StationConfig;
use crate::core::{
    Clock, Collaborators, DelaySource, NoopNotifier, Notifier, RandomDelay, SchedulerError,
    ServiceScheduler, Spawn, TokioClock, UnitFactory,
};

/// Assembles a scheduler with default collaborators that can be overridden.
///
/// Defaults: [`TokioClock`], a [`RandomDelay`] seeded from
/// [`StationConfig::seed`] (or OS entropy) and a [`NoopNotifier`].
pub struct StationBuilder {
    config: StationConfig,
    clock: Option<Arc<dyn Clock>>,
    delays: Option<Box<dyn DelaySource>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl StationBuilder {
    /// Start from `config`.
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            clock: None,
            delays: None,
            notifier: None,
        }
    }

    /// Configuration the scheduler will be built from.
    pub const fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Override the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Override the delay source.
    #[must_use]
    pub fn with_delays(mut self, delays: Box<dyn DelaySource>) -> Self {
        self.delays = Some(delays);
        self
    }

    /// Override the completion notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Delay source used when none is supplied.
    pub fn default_delays(config: &StationConfig) -> Box<dyn DelaySource> {
        match config.seed {
            Some(seed) => Box::new(RandomDelay::seeded(seed)),
            None => Box::new(RandomDelay::from_entropy()),
        }
    }

    /// Validate the config, spawn the unit pool and return an idle scheduler.
    pub async fn build<S>(
        self,
        factory: &dyn UnitFactory,
        spawner: S,
    ) -> Result<ServiceScheduler<S>, SchedulerError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        let delays = self
            .delays
            .unwrap_or_else(|| Self::default_delays(&self.config));
        let collaborators = Collaborators {
            clock: self.clock.unwrap_or_else(|| Arc::new(TokioClock)),
            delays,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(NoopNotifier)),
        };
        ServiceScheduler::start(&self.config, factory, collaborators, spawner).await
    }
}
