use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority class of a customer; VIP always dequeues first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Normal,
    Vip,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Normal => write!(f, "NORMAL"),
            Tier::Vip => write!(f, "VIP"),
        }
    }
}

/// A customer held by a [`PriorityServiceQueue`](crate::queue::PriorityServiceQueue)
///
/// Only the queue creates customers. The arrival sequence number it assigns
/// breaks ties within a tier and stays internal to the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    name: String,
    service_duration: f64,
    tier: Tier,
    arrival_seq: u64,
}

impl Customer {
    pub(crate) fn new(name: String, service_duration: f64, tier: Tier, arrival_seq: u64) -> Self {
        Customer {
            name,
            service_duration,
            tier,
            arrival_seq,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seconds needed to serve this customer
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_vip(&self) -> bool {
        self.tier == Tier::Vip
    }

    pub(crate) fn arrival_seq(&self) -> u64 {
        self.arrival_seq
    }

    /// Sort key for dequeue order: higher tier first, then earlier arrival
    pub(crate) fn priority_key(&self) -> (std::cmp::Reverse<Tier>, u64) {
        (std::cmp::Reverse(self.tier), self.arrival_seq)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_vip() {
            write!(f, " (VIP)")?;
        }
        write!(f, ", Service Time: {}s", self.service_duration)
    }
}
