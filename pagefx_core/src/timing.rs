//! Rate limiting primitives and the virtual timer queue.
//!
//! The engine owns a millisecond clock that only moves when the host
//! advances it, so every timing decision here is a pure function of
//! `now_ms` and is exactly reproducible in tests.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Leading-edge rate limiter. The first trigger in a window runs
/// immediately; everything else inside the window is dropped, with no
/// trailing call when the window ends.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    window_ms: u64,
    ready_at: u64,
}

impl Throttle {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            ready_at: 0,
        }
    }

    /// Returns true when this trigger should run, opening a new window.
    pub fn admit(&mut self, now_ms: u64) -> bool {
        if now_ms >= self.ready_at {
            self.ready_at = now_ms + self.window_ms;
            true
        } else {
            false
        }
    }
}

/// Trailing- or leading-edge debouncer. Each trigger restarts the quiet
/// period; in trailing mode the call runs once the period elapses, in
/// immediate mode it runs on the first trigger of a burst instead.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    wait_ms: u64,
    immediate: bool,
    deadline: Option<u64>,
}

impl Debounce {
    pub fn new(wait_ms: u64) -> Self {
        Self {
            wait_ms,
            immediate: false,
            deadline: None,
        }
    }

    pub fn immediate(wait_ms: u64) -> Self {
        Self {
            wait_ms,
            immediate: true,
            deadline: None,
        }
    }

    /// Registers a trigger. Returns true when the call should run right
    /// now (immediate mode with no burst in progress).
    pub fn trigger(&mut self, now_ms: u64) -> bool {
        let call_now = self.immediate && self.deadline.is_none();
        self.deadline = Some(now_ms + self.wait_ms);
        call_now
    }

    /// Checks the quiet period against the clock. Returns true at most
    /// once per burst, and only in trailing mode.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                !self.immediate
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> Option<u64> {
        self.deadline
    }
}

#[derive(Debug)]
struct TimerEntry<T> {
    deadline: u64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for TimerEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for TimerEntry<T> {}

impl<T> PartialOrd for TimerEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TimerEntry<T> {
    // Reversed so the max-heap yields the earliest deadline, FIFO on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deadline-ordered queue of pending engine tasks. Two tasks due at the
/// same millisecond run in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BinaryHeap<TimerEntry<T>>,
    seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline_ms: u64, task: T) {
        self.entries.push(TimerEntry {
            deadline: deadline_ms,
            seq: self.seq,
            task,
        });
        self.seq += 1;
    }

    /// Earliest pending deadline, if any task is queued.
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.peek().map(|e| e.deadline)
    }

    /// Pops the next task whose deadline is at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, T)> {
        if self.entries.peek()?.deadline > now_ms {
            return None;
        }
        self.entries.pop().map(|e| (e.deadline, e.task))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
