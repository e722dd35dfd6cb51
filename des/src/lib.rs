//! Minimal discrete event simulation engine
//!
//! Agents react to broadcast events and answer with new events (and
//! optionally new agents). The [`EventLoop`] pops events in time order and
//! hands each one to every agent in turn.
//!
//! Events sharing a timestamp are delivered in the order they were scheduled,
//! so a simulation never depends on heap internals for same-time ties.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

pub mod parallel;

struct Event<T> {
    t: usize,
    seq: u64,
    data: T,
}

impl<T> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.seq == other.seq
    }
}

impl<T> Eq for Event<T> {}

// Reversed so the max-heap pops the earliest (t, seq) first.
impl<T> Ord for Event<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .t
            .cmp(&self.t)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What an agent hands back after reacting to an event
pub struct Response<T, S> {
    pub events: Vec<(usize, T)>,
    pub agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> Response<T, S> {
    pub fn new() -> Response<T, S> {
        Response {
            events: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Respond with a single event scheduled at `t`
    pub fn event(t: usize, data: T) -> Response<T, S> {
        Response {
            events: vec![(t, data)],
            agents: Vec::new(),
        }
    }

    pub fn events(events: Vec<(usize, T)>) -> Response<T, S> {
        Response {
            events,
            agents: Vec::new(),
        }
    }
}

impl<T, S> Default for Response<T, S> {
    fn default() -> Self {
        Response::new()
    }
}

pub trait Agent<T, S> {
    fn act(&mut self, _current_t: usize, _data: &T) -> Response<T, S> {
        Response::new()
    }

    fn stats(&self) -> S;
}

pub struct EventLoop<T, S> {
    queue: BinaryHeap<Event<T>>,
    current_t: usize,
    next_seq: u64,
    agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> EventLoop<T, S> {
    pub fn new(events: Vec<(usize, T)>, agents: Vec<Box<dyn Agent<T, S>>>) -> EventLoop<T, S> {
        let mut event_loop = EventLoop {
            queue: BinaryHeap::with_capacity(events.len()),
            current_t: 0,
            next_seq: 0,
            agents,
        };
        for (t, data) in events {
            event_loop.schedule(t, data);
        }
        event_loop
    }

    fn schedule(&mut self, t: usize, data: T) {
        if t < self.current_t {
            warn!(t, current_t = self.current_t, "dropping event scheduled in the past");
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Event { t, seq, data });
    }

    fn broadcast(&mut self) {
        let Some(event) = self.queue.pop() else {
            return;
        };
        self.current_t = event.t;

        let mut new_events = Vec::new();
        let mut new_agents = Vec::new();
        for agent in &mut self.agents {
            let response = agent.act(self.current_t, &event.data);
            new_events.extend(response.events);
            new_agents.extend(response.agents);
        }

        if !new_agents.is_empty() {
            debug!(t = self.current_t, count = new_agents.len(), "spawning agents");
        }
        self.agents.extend(new_agents);
        for (t, data) in new_events {
            self.schedule(t, data);
        }
    }

    /// Process events until the queue is exhausted or the next event lies
    /// beyond `run_until`
    pub fn run(&mut self, run_until: usize) {
        while let Some(next) = self.queue.peek() {
            if next.t > run_until {
                break;
            }
            self.broadcast();
        }
        debug!(
            current_t = self.current_t,
            pending = self.queue.len(),
            "event loop stopped"
        );
    }

    pub fn current_t(&self) -> usize {
        self.current_t
    }

    /// Number of events still waiting to be broadcast
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> Vec<S> {
        self.agents.iter().map(|agent| agent.stats()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        seen: Vec<(usize, u8)>,
    }

    impl Agent<u8, Vec<(usize, u8)>> for Recorder {
        fn act(&mut self, current_t: usize, data: &u8) -> Response<u8, Vec<(usize, u8)>> {
            self.seen.push((current_t, *data));
            Response::new()
        }

        fn stats(&self) -> Vec<(usize, u8)> {
            self.seen.clone()
        }
    }

    fn recorder() -> Box<dyn Agent<u8, Vec<(usize, u8)>>> {
        Box::new(Recorder { seen: Vec::new() })
    }

    #[test]
    fn min_queue() {
        let mut queue = BinaryHeap::<Event<u8>>::new();
        queue.push(Event { t: 2, seq: 0, data: 2 });
        queue.push(Event { t: 1, seq: 1, data: 1 });
        assert_eq!(queue.peek().map(|e| e.data), Some(1));
    }

    #[test]
    fn same_time_events_are_fifo() {
        let events = vec![(5, 1), (5, 2), (1, 0), (5, 3)];
        let mut event_loop = EventLoop::new(events, vec![recorder()]);

        event_loop.run(100);

        assert_eq!(event_loop.stats()[0], vec![(1, 0), (5, 1), (5, 2), (5, 3)]);
        assert_eq!(event_loop.current_t(), 5);
    }

    #[test]
    fn run_stops_at_run_until() {
        let events = vec![(1, 1), (2, 2), (10, 3)];
        let mut event_loop = EventLoop::new(events, vec![recorder()]);

        event_loop.run(5);

        assert_eq!(event_loop.stats()[0].len(), 2);
        assert_eq!(event_loop.current_t(), 2);
        assert_eq!(event_loop.pending(), 1);
    }

    #[test]
    fn past_events_are_dropped() {
        struct Backwards;
        impl Agent<u8, ()> for Backwards {
            fn act(&mut self, current_t: usize, data: &u8) -> Response<u8, ()> {
                if *data == 0 {
                    Response::events(vec![(current_t - 1, 1), (current_t, 2)])
                } else {
                    Response::new()
                }
            }

            fn stats(&self) {}
        }

        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(Backwards)];
        let mut event_loop = EventLoop::new(vec![(3, 0)], agents);
        event_loop.run(10);

        assert_eq!(event_loop.pending(), 0);
        assert_eq!(event_loop.current_t(), 3);
    }

    #[test]
    fn new_agent() {
        struct Spawner;
        impl Agent<u8, ()> for Spawner {
            fn act(&mut self, _current_t: usize, _data: &u8) -> Response<u8, ()> {
                Response {
                    events: Vec::new(),
                    agents: vec![Box::new(Spawner)],
                }
            }

            fn stats(&self) {}
        }

        let agents: Vec<Box<dyn Agent<u8, ()>>> = vec![Box::new(Spawner)];
        let mut event_loop = EventLoop::new(vec![(1, 1), (2, 2)], agents);
        event_loop.run(10);

        // First event: 1 new agent
        // Second event: 2 new agents
        assert_eq!(event_loop.stats().len(), 4);
    }
}
