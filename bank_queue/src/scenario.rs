//! Seeded event-loop scenarios and sweep aggregation

use des::EventLoop;
use serde::Serialize;

use crate::arrivals::ArrivalProcess;
use crate::config::CustomerSpec;
use crate::queue::Strategy;
use crate::teller::{Teller, TellerStats};
use crate::{Event, Stats};

/// Event loop with the initial batch arriving at t = 0, followed by random
/// arrivals drawn from `arrivals` reseeded with `seed`
pub fn build_scenario(
    initial_customers: &[CustomerSpec],
    arrivals: &ArrivalProcess,
    seed: u64,
    strategy: Strategy,
) -> EventLoop<Event, Stats> {
    let mut events: Vec<(usize, Event)> = initial_customers
        .iter()
        .map(|spec| {
            (
                0,
                Event::CustomerArrived {
                    name: spec.name.clone(),
                    service_duration: spec.service_time,
                    tier: spec.tier,
                },
            )
        })
        .collect();
    events.push((0, Event::Start));

    let agents: Vec<Box<dyn des::Agent<Event, Stats>>> = vec![
        Box::new(Teller::new(strategy)),
        Box::new(arrivals.reseeded(seed)),
    ];

    EventLoop::new(events, agents)
}

/// Seed of scenario `scenario_id` in a sweep starting at `base_seed`
pub fn scenario_seed(base_seed: u64, scenario_id: usize) -> u64 {
    base_seed.wrapping_add(scenario_id as u64)
}

/// Teller stats of one finished scenario, if it had a teller
pub fn teller_stats(stats: &[Stats]) -> Option<&TellerStats> {
    stats.iter().find_map(|s| match s {
        Stats::Teller(ts) => Some(ts),
        _ => None,
    })
}

/// Averages across the successful scenarios of a sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepSummary {
    pub scenarios: usize,
    pub failed: usize,
    pub mean_customers_served: f64,
    pub mean_vip_served: f64,
    pub mean_service_time: f64,
    pub mean_queue_wait: f64,
    pub max_queue_length: usize,
    pub rejected: usize,
}

impl SweepSummary {
    pub fn from_results(results: &[Result<Vec<Stats>, String>]) -> SweepSummary {
        let tellers: Vec<&TellerStats> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .filter_map(|stats| teller_stats(stats))
            .collect();

        let mut summary = SweepSummary {
            scenarios: results.len(),
            failed: results.len() - tellers.len(),
            ..SweepSummary::default()
        };
        if tellers.is_empty() {
            return summary;
        }

        summary.mean_customers_served = mean_of(&tellers, |t| t.report.total_customers as f64);
        summary.mean_vip_served = mean_of(&tellers, |t| t.report.vip_served as f64);
        summary.mean_service_time = mean_of(&tellers, |t| t.report.average_service_time());
        summary.mean_queue_wait = mean_of(&tellers, TellerStats::average_queue_wait);
        summary.max_queue_length = tellers.iter().map(|t| t.max_queue_length).max().unwrap_or(0);
        summary.rejected = tellers.iter().map(|t| t.rejected).sum();
        summary
    }
}

fn mean_of(tellers: &[&TellerStats], f: impl Fn(&TellerStats) -> f64) -> f64 {
    tellers.iter().map(|&t| f(t)).sum::<f64>() / tellers.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrivalConfig;
    use crate::customer::Tier;
    use approx::assert_relative_eq;

    fn no_arrivals() -> ArrivalProcess {
        let config = ArrivalConfig {
            max_customers: 0,
            ..ArrivalConfig::default()
        };
        ArrivalProcess::new(&config, 0).unwrap()
    }

    fn sample_batch() -> Vec<CustomerSpec> {
        vec![
            CustomerSpec::new("Alice", 3.0, Tier::Normal),
            CustomerSpec::new("Bob", 5.0, Tier::Normal),
            CustomerSpec::new("Charlie", 2.0, Tier::Vip),
            CustomerSpec::new("Diana", 4.0, Tier::Normal),
        ]
    }

    #[test]
    fn batch_only_scenario_serves_first_arrival_then_priority() {
        let mut event_loop = build_scenario(&sample_batch(), &no_arrivals(), 1, Strategy::Heap);
        event_loop.run(1_000);

        let stats = event_loop.stats();
        let teller = teller_stats(&stats).unwrap();
        // Alice reaches the idle teller before the others are queued
        assert_eq!(teller.report.served_order, ["Alice", "Charlie", "Bob", "Diana"]);
        assert_relative_eq!(teller.report.total_service_time, 14.0);
        assert_eq!(event_loop.current_t(), 14);
        // Charlie 3, Bob 5, Diana 10
        assert_eq!(teller.total_queue_wait, 18);
    }

    #[test]
    fn summary_counts_failures() {
        let mut event_loop = build_scenario(&sample_batch(), &no_arrivals(), 1, Strategy::TierFifo);
        event_loop.run(1_000);
        let results = vec![Ok(event_loop.stats()), Err("boom".to_string())];

        let summary = SweepSummary::from_results(&results);

        assert_eq!(summary.scenarios, 2);
        assert_eq!(summary.failed, 1);
        assert_relative_eq!(summary.mean_customers_served, 4.0);
        assert_relative_eq!(summary.mean_vip_served, 1.0);
        assert_relative_eq!(summary.mean_service_time, 3.5);
        assert_relative_eq!(summary.mean_queue_wait, 4.5);
        assert_eq!(summary.max_queue_length, 3);
    }

    #[test]
    fn scenario_seed_wraps_near_max() {
        assert_eq!(scenario_seed(10, 5), 15);
        assert_eq!(scenario_seed(u64::MAX, 0), u64::MAX);
        assert_eq!(scenario_seed(u64::MAX, 1), 0);
        assert_eq!(scenario_seed(u64::MAX - 1, 3), 1);
    }

    #[test]
    fn empty_sweep_summary() {
        let summary = SweepSummary::from_results(&[]);
        assert_eq!(summary, SweepSummary::default());
    }
}
