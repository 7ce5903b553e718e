//! Countdown that drives forced submission.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::{AttemptId, SessionEvent};

const TICK: Duration = Duration::from_secs(1);

/// A running countdown. Emits one [`SessionEvent::Tick`] per second for
/// `seconds` seconds, then stops. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawns the countdown on the current tokio runtime.
    pub fn start(attempt: AttemptId, seconds: u32, events: UnboundedSender<SessionEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for _ in 0..seconds {
                ticks.tick().await;
                if events.send(SessionEvent::Tick { attempt }).is_err() {
                    break;
                }
            }
        });

        Self { handle }
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
