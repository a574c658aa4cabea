//! Scheduled tasks driven by clock readings
//!
//! A stage owns one `Scheduler` holding its repeaters (spawn, physics tick,
//! photo rotation) and one-shot delays (stage transitions, effect expiry).
//! The driver polls it once per frame with the current time; nothing fires
//! on its own. Dropping the scheduler cancels every task it holds.

use crate::consts::MAX_CATCHUP;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<E> {
    id: TaskId,
    due_ms: f64,
    period_ms: Option<f64>,
    event: E,
}

/// Ordered timer queue yielding events of type `E`
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: f64,
    next_id: u64,
    tasks: Vec<Task<E>>,
}

impl<E: Clone> Scheduler<E> {
    /// Create a scheduler whose clock starts at `now_ms`
    pub fn new(now_ms: f64) -> Self {
        Self {
            now_ms,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Latest clock reading seen by the scheduler
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Move the clock forward without firing anything. Readings from the past are ignored.
    pub fn advance_to(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn push(&mut self, due_ms: f64, period_ms: Option<f64>, event: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            due_ms,
            period_ms,
            event,
        });
        id
    }

    /// Fire `event` every `period_ms`, first one period from now
    pub fn every(&mut self, period_ms: f64, event: E) -> TaskId {
        let period_ms = period_ms.max(1.0);
        self.push(self.now_ms + period_ms, Some(period_ms), event)
    }

    /// Fire `event` once after `delay_ms`
    pub fn after(&mut self, delay_ms: f64, event: E) -> TaskId {
        self.push(self.now_ms + delay_ms.max(0.0), None, event)
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel every task (stage teardown)
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Pop the next event due at or before `now_ms`.
    ///
    /// Events come out ordered by due time, ties broken by scheduling order.
    /// A repeater fires at most `MAX_CATCHUP` times for one reading; the
    /// rest of its backlog is dropped.
    pub fn poll(&mut self, now_ms: f64) -> Option<E> {
        self.advance_to(now_ms);
        let now = self.now_ms;

        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;

        match self.tasks[idx].period_ms {
            Some(period) => {
                let task = &mut self.tasks[idx];
                let cap = MAX_CATCHUP.max(1) as f64;
                if now - task.due_ms >= period * cap {
                    log::debug!("Task {:?} fell behind, skipping backlog", task.id);
                    task.due_ms = now - period * (cap - 1.0);
                }
                task.due_ms += period;
                Some(task.event.clone())
            }
            None => Some(self.tasks.remove(idx).event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ev {
        Tick,
        Spawn,
        Once,
    }

    fn drain(s: &mut Scheduler<Ev>, now: f64) -> Vec<Ev> {
        std::iter::from_fn(|| s.poll(now)).collect()
    }

    #[test]
    fn test_repeater_fires_each_period() {
        let mut s = Scheduler::new(0.0);
        s.every(16.0, Ev::Tick);
        assert!(drain(&mut s, 15.0).is_empty());
        assert_eq!(drain(&mut s, 16.0), vec![Ev::Tick]);
        assert_eq!(drain(&mut s, 48.0), vec![Ev::Tick, Ev::Tick]);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut s = Scheduler::new(100.0);
        s.after(600.0, Ev::Once);
        assert!(drain(&mut s, 699.0).is_empty());
        assert_eq!(drain(&mut s, 700.0), vec![Ev::Once]);
        assert!(drain(&mut s, 5000.0).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_events_ordered_by_due_time_then_schedule_order() {
        let mut s = Scheduler::new(0.0);
        s.every(1000.0, Ev::Spawn);
        s.every(16.0, Ev::Tick);
        s.after(1000.0, Ev::Once);
        let mut fired = Vec::new();
        let mut t = 0.0;
        while t < 1000.0 {
            t = (t + 16.0_f64).min(1000.0);
            fired.extend(drain(&mut s, t));
        }
        // 62 ticks land before 1000ms, then Spawn and Once (both due at 1000, spawn scheduled first)
        assert_eq!(fired.len(), 62 + 2);
        assert_eq!(fired[fired.len() - 2], Ev::Spawn);
        assert_eq!(fired[fired.len() - 1], Ev::Once);
    }

    #[test]
    fn test_catchup_is_capped() {
        let mut s = Scheduler::new(0.0);
        s.every(10.0, Ev::Tick);
        let fired = drain(&mut s, 10_000.0);
        assert_eq!(fired.len(), MAX_CATCHUP as usize);
        // Back on schedule afterwards
        assert_eq!(drain(&mut s, 10_010.0), vec![Ev::Tick]);
    }

    #[test]
    fn test_catchup_has_no_cliff_past_the_cap() {
        let cap = MAX_CATCHUP as usize;
        // Exactly at the cap: every due tick fires
        let mut s = Scheduler::new(0.0);
        s.every(16.0, Ev::Tick);
        assert_eq!(drain(&mut s, 16.0 * cap as f64).len(), cap);

        // A longer hitch still runs a full burst, then resumes on period
        let mut s = Scheduler::new(0.0);
        s.every(16.0, Ev::Tick);
        assert_eq!(drain(&mut s, 200.0).len(), cap);
        assert!(drain(&mut s, 215.0).is_empty());
        assert_eq!(drain(&mut s, 216.0), vec![Ev::Tick]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new(0.0);
        let tick = s.every(16.0, Ev::Tick);
        let once = s.after(10.0, Ev::Once);
        assert!(s.cancel(once));
        assert!(!s.cancel(once));
        assert!(s.is_scheduled(tick));
        s.cancel_all();
        assert!(drain(&mut s, 1000.0).is_empty());
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut s = Scheduler::new(500.0);
        assert!(s.poll(100.0).is_none());
        assert_eq!(s.now_ms(), 500.0);
        s.after(50.0, Ev::Once);
        assert_eq!(drain(&mut s, 550.0), vec![Ev::Once]);
    }
}
