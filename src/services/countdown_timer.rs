use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
    Stopped, // cancelled before expiry, e.g. after a manual submit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Running(u32),
    Expired,
}

/// Remaining-time bookkeeping. Holds no task; the session feeds it ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total_seconds: u32,
    remaining_seconds: u32,
    state: TimerState,
}

impl Countdown {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            state: TimerState::Idle,
        }
    }

    pub fn start(&mut self) {
        if self.state == TimerState::Idle {
            self.state = TimerState::Running;
        }
    }

    /// Decrements by one second. `Expired` is returned on exactly one tick;
    /// every tick outside `Running` is ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = TimerState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    pub fn stop(&mut self) {
        if matches!(self.state, TimerState::Idle | TimerState::Running) {
            self.state = TimerState::Stopped;
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds - self.remaining_seconds
    }
}

/// Repeating one-second tick source backed by a tokio task. The task is
/// aborted when the timer is stopped or dropped.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
    ticks: mpsc::Receiver<Instant>,
}

impl CountdownTimer {
    pub fn start() -> Self {
        Self::with_period(TICK_INTERVAL)
    }

    pub fn with_period(period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(4);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                let at = interval.tick().await;
                if tx.send(at).await.is_err() {
                    break;
                }
            }
        });

        Self { handle, ticks }
    }

    /// Next tick, or `None` once the timer has been stopped.
    pub async fn next_tick(&mut self) -> Option<Instant> {
        self.ticks.recv().await
    }

    pub fn stop(&mut self) {
        self.handle.abort();
        self.ticks.close();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
