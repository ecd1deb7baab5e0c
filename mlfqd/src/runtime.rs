//! # Host Runtime
//!
//! Loads the configuration, drives the simulation and collects its output.

use core_types::Tick;
use event_logger::{EventLogger, LogEntry, LogLevel};
use sim_scheduler::{
    BoostOrder, ConfigError, EventTrace, SchedulerError, Simulation, SimulationConfig,
    SimulationSummary,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Failed to encode events: {0}")]
    Encode(String),
}

/// Boost override from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostSetting {
    Every(Tick),
    Off,
}

/// What the host prints while running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Rendered log lines followed by the summary
    Log,
    /// One JSON object per event
    Json,
    /// Summary only
    Quiet,
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// JSON configuration file; the reference workload when absent
    pub config_path: Option<PathBuf>,
    pub horizon: Option<Tick>,
    pub boost_period: Option<BoostSetting>,
    pub boost_order: Option<BoostOrder>,
    /// Stop as soon as every process has completed
    pub stop_when_finished: bool,
    /// Lowest level of log entries kept
    pub log_level: LogLevel,
    pub output: OutputMode,
    /// Print the trace digest after the run
    pub print_digest: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            horizon: None,
            boost_period: None,
            boost_order: None,
            stop_when_finished: false,
            log_level: LogLevel::Info,
            output: OutputMode::Log,
            print_digest: false,
        }
    }
}

impl HostConfig {
    /// Reads the base configuration and applies the overrides
    pub fn simulation_config(&self) -> Result<SimulationConfig, HostRuntimeError> {
        let mut config = match &self.config_path {
            Some(path) => {
                let bytes = fs::read(path).map_err(|source| HostRuntimeError::ConfigRead {
                    path: path.clone(),
                    source,
                })?;
                SimulationConfig::from_json_slice(&bytes)?
            }
            None => SimulationConfig::reference_workload(),
        };

        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        match self.boost_period {
            Some(BoostSetting::Every(period)) => config.boost_period = Some(period),
            Some(BoostSetting::Off) => config.boost_period = None,
            None => {}
        }
        if let Some(order) = self.boost_order {
            config.boost_order = order;
        }
        if self.stop_when_finished {
            config.stop_when_finished = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub trace: EventTrace,
    pub summary: SimulationSummary,
}

impl RunReport {
    pub fn digest(&self) -> String {
        self.trace.digest()
    }
}

/// Host runtime
pub struct HostRuntime {
    config: HostConfig,
    simulation_config: SimulationConfig,
    simulation: Simulation,
    logger: EventLogger,
}

impl HostRuntime {
    /// Creates a new host runtime
    pub fn new(config: HostConfig) -> Result<Self, HostRuntimeError> {
        let simulation_config = config.simulation_config()?;
        let simulation = Simulation::new(simulation_config.clone())?;
        let logger = EventLogger::new(config.log_level);

        Ok(Self {
            config,
            simulation_config,
            simulation,
            logger,
        })
    }

    /// Runs the simulation to the end
    ///
    /// Every event is offered to the logger. Processes left unfinished are
    /// logged as warnings; a scheduler failure is logged as an error and
    /// returned.
    pub fn run(&mut self) -> Result<RunReport, HostRuntimeError> {
        let mut trace = EventTrace::new();

        loop {
            match self.simulation.step() {
                Ok(Some(report)) => {
                    for event in &report.events {
                        self.logger.log_event(event);
                    }
                    trace.extend(report.events);
                }
                Ok(None) => break,
                Err(err) => {
                    let entry = LogEntry::new(LogLevel::Error, "simulation aborted")
                        .with_field("reason", &err);
                    self.logger.log(entry);
                    return Err(err.into());
                }
            }
        }

        let summary = SimulationSummary::from_trace(&self.simulation_config, &trace);
        for id in &summary.unfinished {
            let remaining = self
                .simulation
                .process(*id)
                .map_or(0, |process| process.remaining_time());
            self.logger.log(
                LogEntry::new(LogLevel::Warn, "unfinished")
                    .at_tick(self.simulation_config.horizon)
                    .with_field("id", id)
                    .with_field("remaining", remaining),
            );
        }

        Ok(RunReport { trace, summary })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Effective simulation configuration after overrides
    pub fn simulation_config(&self) -> &SimulationConfig {
        &self.simulation_config
    }

    pub fn logger(&self) -> &EventLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut EventLogger {
        &mut self.logger
    }
}
