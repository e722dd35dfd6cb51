//! Console-facing simulation driver
//!
//! Drains a [`PriorityServiceQueue`], writing each service to the given
//! output and pausing between customers. Pacing is cosmetic; it never
//! affects the report.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::queue::PriorityServiceQueue;
use crate::report::ServiceReport;

#[derive(Debug, Clone, Default)]
pub struct SimulationDriver {
    pacing: Duration,
}

impl SimulationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `pacing` after each service
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Write the waiting customers in the order they will be served
    pub fn display<W: Write>(&self, queue: &PriorityServiceQueue, out: &mut W) -> io::Result<()> {
        let waiting = queue.snapshot();
        if waiting.is_empty() {
            return writeln!(out, "Queue is empty.\n");
        }
        debug!(size = waiting.len(), strategy = %queue.strategy(), "displaying queue");
        writeln!(out, "Current Queue:")?;
        for customer in &waiting {
            writeln!(out, " - {}", customer)?;
        }
        writeln!(out)
    }

    /// Serve everyone in the queue and report the totals
    pub fn run<W: Write>(
        &self,
        queue: &mut PriorityServiceQueue,
        out: &mut W,
    ) -> io::Result<ServiceReport> {
        let mut report = ServiceReport::new();
        debug!(customers = queue.size(), "starting service");
        writeln!(out, "Starting service...\n")?;

        while let Some(customer) = queue.dequeue() {
            let tag = if customer.is_vip() { " (VIP)" } else { "" };
            writeln!(out, "Now serving: {}{}", customer.name(), tag)?;
            writeln!(out, "Service time: {} seconds", customer.service_duration())?;
            out.flush()?;
            if !self.pacing.is_zero() {
                thread::sleep(self.pacing);
            }
            report.record(&customer);
            writeln!(out, "{} has been served.\n", customer.name())?;
        }

        Ok(report)
    }
}
