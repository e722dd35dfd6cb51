use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Geometric, Normal};

use crate::config::ArrivalConfig;
use crate::customer::Tier;
use crate::error::ConfigError;
use crate::{Event, Stats};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrivalStats {
    pub generated: usize,
    pub vip_generated: usize,
}

/// Generates randomly spaced customers until `max_customers` have arrived
///
/// The next arrival is scheduled when the previous one is broadcast, so the
/// process is a chain of `CustomerArrived` events started by `Event::Start`.
#[derive(Debug, Clone)]
pub struct ArrivalProcess {
    arrival_interval: Geometric,
    service_duration: Normal<f64>,
    vip_probability: f64,
    max_customers: usize,
    rng: StdRng,
    stats: ArrivalStats,
    awaiting: Option<(usize, String)>,
}

impl ArrivalProcess {
    pub fn new(config: &ArrivalConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let arrival_interval = Geometric::new(config.arrival_probability)
            .map_err(|e| ConfigError::Invalid(format!("arrival interval: {e}")))?;
        let service_duration = Normal::new(config.service_mean, config.service_std)
            .map_err(|e| ConfigError::Invalid(format!("service duration: {e}")))?;

        Ok(ArrivalProcess {
            arrival_interval,
            service_duration,
            vip_probability: config.vip_probability,
            max_customers: config.max_customers,
            rng: StdRng::seed_from_u64(seed),
            stats: ArrivalStats::default(),
            awaiting: None,
        })
    }

    /// Same distributions, fresh counters and RNG
    pub fn reseeded(&self, seed: u64) -> Self {
        ArrivalProcess {
            rng: StdRng::seed_from_u64(seed),
            stats: ArrivalStats::default(),
            awaiting: None,
            ..self.clone()
        }
    }

    fn draw_arrival_interval(&mut self) -> usize {
        self.arrival_interval.sample(&mut self.rng) as usize
    }

    // Whole seconds, never negative.
    fn draw_service_duration(&mut self) -> f64 {
        self.service_duration.sample(&mut self.rng).floor().max(0.0)
    }

    fn draw_tier(&mut self) -> Tier {
        if self.rng.random_bool(self.vip_probability) {
            Tier::Vip
        } else {
            Tier::Normal
        }
    }

    fn next_arrival(&mut self, current_t: usize) -> Option<(usize, Event)> {
        self.awaiting = None;
        if self.stats.generated >= self.max_customers {
            return None;
        }
        let interval = self.draw_arrival_interval();
        let service_duration = self.draw_service_duration();
        let tier = self.draw_tier();

        self.stats.generated += 1;
        if tier == Tier::Vip {
            self.stats.vip_generated += 1;
        }
        let t = current_t.saturating_add(interval);
        let name = format!("Customer-{}", self.stats.generated);
        self.awaiting = Some((t, name.clone()));
        let event = Event::CustomerArrived {
            name,
            service_duration,
            tier,
        };
        Some((t, event))
    }
}

impl des::Agent<Event, Stats> for ArrivalProcess {
    fn act(&mut self, current_t: usize, data: &Event) -> des::Response<Event, Stats> {
        let chain = match data {
            Event::Start => true,
            // only chain off the customer this process scheduled last
            Event::CustomerArrived { name, .. } => self
                .awaiting
                .as_ref()
                .is_some_and(|(t, awaited)| *t == current_t && awaited == name),
            _ => false,
        };
        if !chain {
            return des::Response::new();
        }
        match self.next_arrival(current_t) {
            Some((t, event)) => des::Response::event(t, event),
            None => des::Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::Arrivals(self.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use des::Agent;

    fn config() -> ArrivalConfig {
        ArrivalConfig {
            max_customers: 3,
            ..ArrivalConfig::default()
        }
    }

    fn arrival_stats(process: &ArrivalProcess) -> ArrivalStats {
        match process.stats() {
            Stats::Arrivals(stats) => stats,
            _ => panic!("Expected ArrivalStats"),
        }
    }

    #[test]
    fn start_schedules_first_customer() {
        let mut process = ArrivalProcess::new(&config(), 7).unwrap();
        let response = process.act(10, &Event::Start);

        assert_eq!(response.events.len(), 1);
        match &response.events[0] {
            (t, Event::CustomerArrived { name, service_duration, .. }) => {
                assert!(*t >= 10);
                assert_eq!(name, "Customer-1");
                assert!(*service_duration >= 0.0);
                assert_eq!(service_duration.fract(), 0.0);
            }
            other => panic!("Expected CustomerArrived, got {:?}", other),
        }
    }

    #[test]
    fn stops_after_max_customers() {
        let mut process = ArrivalProcess::new(&config(), 7).unwrap();
        let mut response = process.act(0, &Event::Start);
        let mut arrivals = 0;
        while let Some((t, event)) = response.events.pop() {
            arrivals += 1;
            response = process.act(t, &event);
        }

        assert_eq!(arrivals, 3);
        assert_eq!(arrival_stats(&process).generated, 3);
    }

    #[test]
    fn ignores_foreign_customers() {
        let mut process = ArrivalProcess::new(&config(), 7).unwrap();
        let response = process.act(
            0,
            &Event::CustomerArrived {
                name: "Alice".to_string(),
                service_duration: 3.0,
                tier: Tier::Normal,
            },
        );
        assert!(response.events.is_empty());
    }

    #[test]
    fn vip_probability_extremes() {
        let all_vip = ArrivalConfig {
            vip_probability: 1.0,
            max_customers: 20,
            ..ArrivalConfig::default()
        };
        let mut process = ArrivalProcess::new(&all_vip, 1).unwrap();
        let mut response = process.act(0, &Event::Start);
        while let Some((t, event)) = response.events.pop() {
            response = process.act(t, &event);
        }
        let stats = arrival_stats(&process);
        assert_eq!(stats.generated, 20);
        assert_eq!(stats.vip_generated, 20);
    }

    #[test]
    fn reseeded_is_deterministic() {
        let base = ArrivalProcess::new(&config(), 0).unwrap();
        let mut a = base.reseeded(99);
        let mut b = base.reseeded(99);

        let ra = a.act(0, &Event::Start);
        let rb = b.act(0, &Event::Start);
        assert_eq!(ra.events, rb.events);
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = ArrivalConfig {
            arrival_probability: 1.5,
            ..ArrivalConfig::default()
        };
        assert!(matches!(
            ArrivalProcess::new(&bad, 0),
            Err(ConfigError::Invalid(_))
        ));
    }
}
