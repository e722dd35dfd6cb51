use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::customer::Tier;
use crate::error::ConfigError;
use crate::queue::{PriorityServiceQueue, Strategy};

/// One customer of the initial batch
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerSpec {
    pub name: String,
    pub service_time: f64,
    #[serde(default)]
    pub tier: Tier,
}

impl CustomerSpec {
    pub fn new(name: &str, service_time: f64, tier: Tier) -> Self {
        CustomerSpec {
            name: name.to_string(),
            service_time,
            tier,
        }
    }
}

/// Parameters of the random arrival process used by the event simulation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Per-tick success probability of the geometric inter-arrival gap
    pub arrival_probability: f64,
    pub service_mean: f64,
    pub service_std: f64,
    pub vip_probability: f64,
    pub max_customers: usize,
    pub seed: u64,
    pub run_until: usize,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        ArrivalConfig {
            arrival_probability: 0.2,
            service_mean: 4.0,
            service_std: 1.5,
            vip_probability: 0.2,
            max_customers: 50,
            seed: 42,
            run_until: 100_000,
        }
    }
}

impl ArrivalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arrival_probability > 0.0 && self.arrival_probability <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "arrival_probability must be in (0, 1], got {}",
                self.arrival_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.vip_probability) {
            return Err(ConfigError::Invalid(format!(
                "vip_probability must be in [0, 1], got {}",
                self.vip_probability
            )));
        }
        if !self.service_mean.is_finite() || !self.service_std.is_finite() || self.service_std < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "service distribution N({}, {}) is not usable",
                self.service_mean, self.service_std
            )));
        }
        Ok(())
    }
}

fn default_customers() -> Vec<CustomerSpec> {
    vec![
        CustomerSpec::new("Alice", 3.0, Tier::Normal),
        CustomerSpec::new("Bob", 5.0, Tier::Normal),
        CustomerSpec::new("Charlie", 2.0, Tier::Vip),
        CustomerSpec::new("Diana", 4.0, Tier::Normal),
    ]
}

/// Top-level simulation configuration, usually read from TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Pause between services in the console driver
    #[serde(default)]
    pub pacing_ms: u64,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_customers")]
    pub customers: Vec<CustomerSpec>,
    #[serde(default)]
    pub arrivals: ArrivalConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            pacing_ms: 0,
            strategy: Strategy::default(),
            customers: default_customers(),
            arrivals: ArrivalConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self
            .customers
            .iter()
            .find(|c| !c.service_time.is_finite() || c.service_time < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "customer {:?} has service_time {}",
                bad.name, bad.service_time
            )));
        }
        self.arrivals.validate()
    }

    /// Queue holding the configured initial batch
    pub fn initial_queue(&self) -> Result<PriorityServiceQueue, ConfigError> {
        let mut queue = PriorityServiceQueue::with_strategy(self.strategy);
        for spec in &self.customers {
            queue
                .enqueue(spec.name.clone(), spec.service_time, spec.tier)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(queue)
    }
}

/// Install the global tracing subscriber on stderr; `RUST_LOG` overrides the
/// `info` default
pub fn configure_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
