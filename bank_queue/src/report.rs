use std::fmt;

use serde::Serialize;

use crate::customer::Customer;

/// Running totals over served customers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceReport {
    pub total_customers: usize,
    pub total_service_time: f64,
    pub vip_served: usize,
    pub served_order: Vec<String>,
}

impl ServiceReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, customer: &Customer) {
        self.total_customers += 1;
        self.total_service_time += customer.service_duration();
        if customer.is_vip() {
            self.vip_served += 1;
        }
        self.served_order.push(customer.name().to_string());
    }

    /// Mean service time per served customer, 0 when nobody was served
    pub fn average_service_time(&self) -> f64 {
        if self.total_customers == 0 {
            return 0.0;
        }
        self.total_service_time / self.total_customers as f64
    }

    /// The "average waiting time" of the closing summary, which is the mean
    /// service time
    pub fn average_wait(&self) -> f64 {
        self.average_service_time()
    }
}

impl fmt::Display for ServiceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "All customers served.")?;
        writeln!(f, "Total customers: {}", self.total_customers)?;
        writeln!(f, "Total service time: {} seconds", self.total_service_time)?;
        write!(f, "Average waiting time: {:.2} seconds", self.average_wait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::Tier;
    use crate::queue::PriorityServiceQueue;

    #[test]
    fn empty_report_averages_zero() {
        let report = ServiceReport::new();
        assert_eq!(report.average_wait(), 0.0);
        assert!(report.to_string().ends_with("Average waiting time: 0.00 seconds"));
    }

    #[test]
    fn records_totals() {
        let mut queue = PriorityServiceQueue::new();
        queue.enqueue("Alice", 3.0, Tier::Normal).unwrap();
        queue.enqueue("Charlie", 2.0, Tier::Vip).unwrap();

        let mut report = ServiceReport::new();
        while let Some(customer) = queue.dequeue() {
            report.record(&customer);
        }

        assert_eq!(report.total_customers, 2);
        assert_eq!(report.total_service_time, 5.0);
        assert_eq!(report.vip_served, 1);
        assert_eq!(report.served_order, ["Charlie", "Alice"]);
        assert_eq!(report.average_wait(), 2.5);
        assert_eq!(report.average_service_time(), report.average_wait());
        assert!(report.to_string().contains("Total service time: 5 seconds"));
    }
}
