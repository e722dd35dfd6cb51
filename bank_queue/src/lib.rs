//! Bank counter simulation with VIP priority
//!
//! The core is [`queue::PriorityServiceQueue`]: VIP customers leave before
//! normal ones, ties broken by arrival order. Around it sit
//!
//! - [`driver::SimulationDriver`]: drains a queue to a writer and reports totals
//! - [`teller::Teller`] and [`arrivals::ArrivalProcess`]: `des` agents serving
//!   randomly arriving customers in simulated time
//! - [`scenario`]: builds seeded event loops and summarizes parallel sweeps

pub mod arrivals;
pub mod config;
pub mod customer;
pub mod driver;
pub mod error;
pub mod queue;
pub mod report;
pub mod scenario;
pub mod teller;

pub use arrivals::{ArrivalProcess, ArrivalStats};
pub use customer::{Customer, Tier};
pub use error::{ConfigError, QueueError};
pub use queue::{PriorityServiceQueue, Strategy};
pub use report::ServiceReport;
pub use teller::{Teller, TellerStats};

/// Events broadcast through the bank simulation
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Kick off the arrival process
    Start,

    /// A customer walks in and joins the queue
    CustomerArrived {
        name: String,
        service_duration: f64,
        tier: Tier,
    },

    /// The teller finished serving a customer
    ServiceCompleted {
        name: String,
        tier: Tier,
        service_duration: f64,
    },
}

#[derive(Debug, Clone)]
pub enum Stats {
    Teller(TellerStats),
    Arrivals(ArrivalStats),
}
