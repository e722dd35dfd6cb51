//! Priority service queue
//!
//! Customers leave in (tier descending, arrival ascending) order: every VIP
//! before every normal customer, first come first served within a tier.
//! Two interchangeable backings implement that ordering.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::customer::{Customer, Tier};
use crate::error::QueueError;

/// Storage used behind a [`PriorityServiceQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Binary heap keyed by (tier, arrival)
    #[default]
    Heap,
    /// One FIFO per tier, drained VIP first
    TierFifo,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Heap => write!(f, "heap"),
            Strategy::TierFifo => write!(f, "tier-fifo"),
        }
    }
}

// Max-heap entry: greater means served sooner.
#[derive(Debug)]
struct HeapEntry(Customer);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.priority_key().cmp(&self.0.priority_key())
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
enum Backing {
    Heap(BinaryHeap<HeapEntry>),
    TierFifo {
        vip: VecDeque<Customer>,
        normal: VecDeque<Customer>,
    },
}

#[derive(Debug)]
pub struct PriorityServiceQueue {
    backing: Backing,
    next_seq: u64,
}

impl PriorityServiceQueue {
    pub fn new() -> Self {
        Self::with_strategy(Strategy::Heap)
    }

    pub fn with_strategy(strategy: Strategy) -> Self {
        let backing = match strategy {
            Strategy::Heap => Backing::Heap(BinaryHeap::new()),
            Strategy::TierFifo => Backing::TierFifo {
                vip: VecDeque::new(),
                normal: VecDeque::new(),
            },
        };
        PriorityServiceQueue {
            backing,
            next_seq: 0,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self.backing {
            Backing::Heap(_) => Strategy::Heap,
            Backing::TierFifo { .. } => Strategy::TierFifo,
        }
    }

    /// Add a customer behind everyone of the same or higher tier
    ///
    /// Negative or non-finite durations are rejected and leave the queue
    /// untouched. Zero is accepted.
    pub fn enqueue(
        &mut self,
        name: impl Into<String>,
        service_duration: f64,
        tier: Tier,
    ) -> Result<(), QueueError> {
        self.admit(name.into(), service_duration, tier).map(|_| ())
    }

    /// Enqueue and hand back the assigned arrival sequence number
    pub(crate) fn admit(
        &mut self,
        name: String,
        service_duration: f64,
        tier: Tier,
    ) -> Result<u64, QueueError> {
        if !service_duration.is_finite() || service_duration < 0.0 {
            return Err(QueueError::InvalidArgument {
                name,
                duration: service_duration,
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let customer = Customer::new(name, service_duration, tier, seq);

        match &mut self.backing {
            Backing::Heap(heap) => heap.push(HeapEntry(customer)),
            Backing::TierFifo { vip, normal } => match tier {
                Tier::Vip => vip.push_back(customer),
                Tier::Normal => normal.push_back(customer),
            },
        }
        Ok(seq)
    }

    /// Remove the next customer to serve, `None` when nobody is waiting
    pub fn dequeue(&mut self) -> Option<Customer> {
        match &mut self.backing {
            Backing::Heap(heap) => heap.pop().map(|entry| entry.0),
            Backing::TierFifo { vip, normal } => vip.pop_front().or_else(|| normal.pop_front()),
        }
    }

    pub fn peek(&self) -> Option<&Customer> {
        match &self.backing {
            Backing::Heap(heap) => heap.peek().map(|entry| &entry.0),
            Backing::TierFifo { vip, normal } => vip.front().or_else(|| normal.front()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn size(&self) -> usize {
        match &self.backing {
            Backing::Heap(heap) => heap.len(),
            Backing::TierFifo { vip, normal } => vip.len() + normal.len(),
        }
    }

    /// Current contents in dequeue order, leaving the queue as it is
    pub fn snapshot(&self) -> Vec<Customer> {
        match &self.backing {
            Backing::Heap(heap) => {
                let mut customers: Vec<Customer> =
                    heap.iter().map(|entry| entry.0.clone()).collect();
                customers.sort_by_key(Customer::priority_key);
                customers
            }
            Backing::TierFifo { vip, normal } => vip.iter().chain(normal.iter()).cloned().collect(),
        }
    }
}

impl Default for PriorityServiceQueue {
    fn default() -> Self {
        Self::new()
    }
}
