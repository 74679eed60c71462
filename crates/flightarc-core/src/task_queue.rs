//! Deferred tasks keyed by fire time.
//!
//! Replaces fire-and-forget timers: callers advance time explicitly and
//! collect whatever became due.

use std::collections::BTreeMap;

#[derive(Debug)]
pub struct TaskQueue<T> {
    tasks: BTreeMap<(i64, u64), T>,
    next_seq: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Queue `task` to fire at `fire_at` (ms). Tasks with equal fire times
    /// run in scheduling order.
    pub fn schedule(&mut self, fire_at: i64, task: T) {
        self.tasks.insert((fire_at, self.next_seq), task);
        self.next_seq += 1;
    }

    /// Remove and return every task due at or before `now`, earliest first,
    /// paired with its fire time.
    pub fn pop_due(&mut self, now: i64) -> Vec<(i64, T)> {
        let due = match now.checked_add(1) {
            Some(next) => {
                let later = self.tasks.split_off(&(next, 0));
                std::mem::replace(&mut self.tasks, later)
            }
            None => std::mem::take(&mut self.tasks),
        };
        due.into_iter().map(|((at, _), task)| (at, task)).collect()
    }

    pub fn next_fire_time(&self) -> Option<i64> {
        self.tasks.keys().next().map(|(at, _)| *at)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_only_due_tasks_in_time_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(100, "c");
        queue.schedule(0, "a");
        queue.schedule(50, "b");

        assert_eq!(queue.next_fire_time(), Some(0));
        let due: Vec<_> = queue.pop_due(50).into_iter().map(|(_, t)| t).collect();
        assert_eq!(due, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);

        assert!(queue.pop_due(99).is_empty());
        assert_eq!(queue.pop_due(100), vec![(100, "c")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_fire_times_keep_scheduling_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(10, 1);
        queue.schedule(10, 2);
        queue.schedule(10, 3);
        let due: Vec<_> = queue.pop_due(10).into_iter().map(|(_, t)| t).collect();
        assert_eq!(due, vec![1, 2, 3]);
    }

    #[test]
    fn latest_possible_fire_time_is_still_reachable() {
        let mut queue = TaskQueue::new();
        queue.schedule(i64::MAX, "last");
        queue.schedule(0, "first");

        assert_eq!(queue.pop_due(i64::MAX - 1), vec![(0, "first")]);
        assert_eq!(queue.pop_due(i64::MAX), vec![(i64::MAX, "last")]);
        assert!(queue.is_empty());
    }
}
