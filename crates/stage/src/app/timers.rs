use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone)]
struct TimerSlot<T> {
    id: TimerId,
    deadline: Duration,
    seq: u64,
    schedule: Schedule,
    payload: T,
}

/// Deferred callbacks on a virtual clock.
///
/// Every pending timeout or interval lives in this queue as an owned slot, so
/// dropping or clearing the queue is enough to guarantee nothing fires later.
/// Due timers come out in deadline order; ties resolve in scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    slots: Vec<TimerSlot<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            next_seq: 0,
            slots: Vec::new(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn schedule_once(&mut self, delay: Duration, payload: T) -> TimerId {
        self.insert(delay, Schedule::Once, payload)
    }

    /// Zero periods are bumped to one millisecond so an interval can never
    /// starve the clock.
    pub fn schedule_every(&mut self, period: Duration, payload: T) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(period, Schedule::Every(period), payload)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.slots.clear();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots.iter().any(|slot| slot.id == id)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots.iter().map(|slot| slot.deadline).min()
    }

    /// Pops the earliest timer due at or before `until` and moves the clock to
    /// its deadline. Intervals are re-armed one period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let index = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.deadline <= until)
            .min_by_key(|(_, slot)| (slot.deadline, slot.seq))
            .map(|(index, _)| index)?;

        let deadline = self.slots[index].deadline;
        self.now = self.now.max(deadline);

        match self.slots[index].schedule {
            Schedule::Once => {
                let slot = self.slots.swap_remove(index);
                Some((slot.id, slot.payload))
            }
            Schedule::Every(period) => {
                let seq = self.bump_seq();
                let slot = &mut self.slots[index];
                slot.deadline = deadline + period;
                slot.seq = seq;
                Some((slot.id, slot.payload.clone()))
            }
        }
    }

    /// Moves the clock forward without firing anything. Callers drain
    /// [`TimerQueue::pop_due`] first.
    pub fn settle_at(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn insert(&mut self, delay: Duration, schedule: Schedule, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let seq = self.bump_seq();
        self.slots.push(TimerSlot {
            id,
            deadline: self.now + delay,
            seq,
            schedule,
            payload,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain(queue: &mut TimerQueue<&'static str>, until: Duration) -> Vec<(Duration, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, payload)) = queue.pop_due(until) {
            fired.push((queue.now(), payload));
        }
        queue.settle_at(until);
        fired
    }

    #[test]
    fn once_fires_at_deadline_and_is_removed() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(ms(300), "collect");
        assert!(drain(&mut queue, ms(299)).is_empty());
        assert_eq!(drain(&mut queue, ms(300)), vec![(ms(300), "collect")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn interval_rearms_every_period() {
        let mut queue = TimerQueue::new();
        queue.schedule_every(ms(1000), "tick");
        let fired = drain(&mut queue, ms(3500));
        assert_eq!(
            fired,
            vec![(ms(1000), "tick"), (ms(2000), "tick"), (ms(3000), "tick")]
        );
        assert_eq!(queue.next_deadline(), Some(ms(4000)));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(ms(500), "first");
        queue.schedule_once(ms(500), "second");
        let fired = drain(&mut queue, ms(500));
        assert_eq!(fired, vec![(ms(500), "first"), (ms(500), "second")]);
    }

    #[test]
    fn cancel_removes_pending_timer() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_once(ms(400), "drag");
        assert!(queue.is_armed(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(drain(&mut queue, ms(1000)).is_empty());
    }

    #[test]
    fn schedules_are_relative_to_settled_clock() {
        let mut queue = TimerQueue::new();
        queue.settle_at(ms(5000));
        queue.schedule_once(ms(500), "fade");
        assert_eq!(queue.next_deadline(), Some(ms(5500)));
    }

    #[test]
    fn cancel_all_leaves_nothing_to_fire() {
        let mut queue = TimerQueue::new();
        queue.schedule_every(ms(5000), "needs");
        queue.schedule_every(ms(10_000), "decay");
        queue.cancel_all();
        assert!(drain(&mut queue, ms(60_000)).is_empty());
    }
}
