use std::collections::HashMap;

use tracing::{debug, warn};

use crate::customer::Customer;
use crate::queue::{PriorityServiceQueue, Strategy};
use crate::report::ServiceReport;
use crate::{Event, Stats};

/// Observable state of the teller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TellerStats {
    pub report: ServiceReport,
    pub total_queue_wait: usize, // ticks between arrival and start of service
    pub queue_length: usize,
    pub max_queue_length: usize,
    pub rejected: usize,
    pub busy: bool,
}

impl TellerStats {
    /// Mean ticks a served customer spent in the queue
    pub fn average_queue_wait(&self) -> f64 {
        if self.report.total_customers == 0 {
            return 0.0;
        }
        self.total_queue_wait as f64 / self.report.total_customers as f64
    }
}

/// A single teller serving customers from a priority queue
///
/// Service takes `ceil(service_duration)` ticks. When it ends the teller
/// immediately starts on the next customer the queue yields.
pub struct Teller {
    queue: PriorityServiceQueue,
    arrived_at: HashMap<u64, usize>, // arrival seq -> arrival tick
    in_service: Option<Customer>,
    stats: TellerStats,
}

impl Teller {
    pub fn new(strategy: Strategy) -> Teller {
        Teller {
            queue: PriorityServiceQueue::with_strategy(strategy),
            arrived_at: HashMap::new(),
            in_service: None,
            stats: TellerStats::default(),
        }
    }

    /// Customers waiting in dequeue order, excluding the one being served
    pub fn waiting(&self) -> Vec<Customer> {
        self.queue.snapshot()
    }

    fn start_next(&mut self, current_t: usize) -> des::Response<Event, Stats> {
        let Some(customer) = self.queue.dequeue() else {
            return des::Response::new();
        };

        let arrived = self
            .arrived_at
            .remove(&customer.arrival_seq())
            .unwrap_or(current_t);
        self.stats.total_queue_wait += current_t - arrived;

        debug!(
            t = current_t,
            name = customer.name(),
            tier = %customer.tier(),
            waited = current_t - arrived,
            "service started"
        );

        // `as` saturates huge durations to usize::MAX
        let done = current_t.saturating_add(customer.service_duration().ceil() as usize);
        let event = Event::ServiceCompleted {
            name: customer.name().to_string(),
            tier: customer.tier(),
            service_duration: customer.service_duration(),
        };
        self.in_service = Some(customer);
        self.sync_queue_stats();
        des::Response::event(done, event)
    }

    fn sync_queue_stats(&mut self) {
        self.stats.queue_length = self.queue.size();
        self.stats.max_queue_length = self.stats.max_queue_length.max(self.queue.size());
        self.stats.busy = self.in_service.is_some();
    }
}

impl des::Agent<Event, Stats> for Teller {
    fn act(&mut self, current_t: usize, data: &Event) -> des::Response<Event, Stats> {
        match data {
            Event::CustomerArrived {
                name,
                service_duration,
                tier,
            } => {
                match self.queue.admit(name.clone(), *service_duration, *tier) {
                    Ok(seq) => {
                        self.arrived_at.insert(seq, current_t);
                    }
                    Err(e) => {
                        warn!(t = current_t, error = %e, "customer turned away");
                        self.stats.rejected += 1;
                        return des::Response::new();
                    }
                }
                self.sync_queue_stats();

                if self.in_service.is_some() {
                    return des::Response::new();
                }
                self.start_next(current_t)
            }
            Event::ServiceCompleted { .. } => {
                let Some(customer) = self.in_service.take() else {
                    warn!(t = current_t, "service completed while teller idle");
                    return des::Response::new();
                };
                debug!(t = current_t, name = customer.name(), "service completed");
                self.stats.report.record(&customer);
                self.sync_queue_stats();
                self.start_next(current_t)
            }
            _ => des::Response::new(),
        }
    }

    fn stats(&self) -> Stats {
        Stats::Teller(self.stats.clone())
    }
}
