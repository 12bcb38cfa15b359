//! The two timers driving a run: a one-shot "next frame" request that the
//! session re-arms after every frame it runs, and the wall-clock obstacle
//! spawn interval. Both are cancellable, and arming either replaces whatever
//! was armed before, so restarts never stack timers.

use std::time::{Duration, Instant};

/// Identifies one arming of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy)]
struct Armed {
    id: TaskId,
    due: Instant,
    period: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    frame: Option<Armed>,
    spawn: Option<Armed>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, now: Instant, period: Duration) -> Armed {
        self.next_id += 1;
        Armed {
            id: TaskId(self.next_id),
            due: now + period,
            period,
        }
    }

    /// Ask for one frame `period` after `now`.
    pub fn request_frame(&mut self, now: Instant, period: Duration) -> TaskId {
        let armed = self.issue(now, period);
        self.frame = Some(armed);
        armed.id
    }

    /// Consume the frame request if it is due.
    pub fn take_frame(&mut self, now: Instant) -> bool {
        match self.frame {
            Some(f) if now >= f.due => {
                self.frame = None;
                true
            }
            _ => false,
        }
    }

    /// Start the spawn interval, first firing one `period` after `now`.
    pub fn arm_spawn(&mut self, now: Instant, period: Duration) -> TaskId {
        let armed = self.issue(now, period);
        self.spawn = Some(armed);
        armed.id
    }

    /// True at most once per call when the interval has come due. A late poll
    /// fires once and realigns rather than bursting.
    pub fn spawn_fired(&mut self, now: Instant) -> bool {
        let Some(spawn) = self.spawn.as_mut() else {
            return false;
        };
        if now < spawn.due {
            return false;
        }
        spawn.due += spawn.period;
        if spawn.due <= now {
            spawn.due = now + spawn.period;
        }
        true
    }

    pub fn cancel_frame(&mut self) {
        self.frame = None;
    }

    pub fn cancel_spawn(&mut self) {
        self.spawn = None;
    }

    pub fn cancel_all(&mut self) {
        self.cancel_frame();
        self.cancel_spawn();
    }

    #[cfg(test)]
    pub fn frame_task(&self) -> Option<TaskId> {
        self.frame.map(|f| f.id)
    }

    pub fn spawn_task(&self) -> Option<TaskId> {
        self.spawn.map(|s| s.id)
    }

    pub fn armed_count(&self) -> usize {
        self.frame.is_some() as usize + self.spawn.is_some() as usize
    }

    /// Earliest instant anything is due, if anything is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.frame, self.spawn) {
            (Some(f), Some(s)) => Some(f.due.min(s.due)),
            (Some(f), None) => Some(f.due),
            (None, Some(s)) => Some(s.due),
            (None, None) => None,
        }
    }
}
