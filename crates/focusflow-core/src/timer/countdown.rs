//! Periodic tick source for a shared [`SessionTimer`].
//!
//! The countdown runs as a tokio task that locks the timer once per period
//! and calls `tick()`. The task stops on its own once the timer is no longer
//! active; dropping the [`CountdownHandle`] aborts it on every other path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::engine::SessionTimer;
use crate::events::Event;

/// The timer shared between the ticker task and user intent handlers.
/// Every mutation goes through this one lock.
pub type SharedTimer = Arc<Mutex<SessionTimer>>;

/// An armed countdown. Disarmed when dropped.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Tick `timer` every `period`, forwarding `Ticked` and `SessionEnded`
    /// events to `events`.
    ///
    /// The first tick fires one full period after arming. Must be called
    /// from within a tokio runtime.
    pub fn arm(
        timer: SharedTimer,
        period: Duration,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;

                let (ticked, ended) = {
                    let mut guard = timer.lock().await;
                    if !guard.is_active() {
                        break;
                    }
                    let ended = guard.tick();
                    let ticked = Event::Ticked {
                        mode: guard.mode(),
                        time_left: guard.time_left(),
                        at: chrono::Utc::now(),
                    };
                    (ticked, ended)
                };

                match ended {
                    Some(ended) => {
                        let _ = events.send(ended);
                        break;
                    }
                    None => {
                        if events.send(ticked).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("countdown task finished");
        });

        Self { task }
    }

    /// Whether the ticker task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop ticking now. Equivalent to dropping the handle.
    pub fn disarm(self) {}
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use crate::storage::MemoryStore;
    use crate::timer::TimerMode;

    fn shared(learn_minutes: i64) -> SharedTimer {
        let mut timer = SessionTimer::restore(MemoryStore::default(), NullNotifier);
        timer.set_learn_duration(learn_minutes).unwrap();
        Arc::new(Mutex::new(timer))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_learn_interval_to_completion() {
        let timer = shared(1);
        timer.lock().await.start_or_pause();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = CountdownHandle::arm(timer.clone(), Duration::from_secs(1), tx);

        let mut ticks = 0;
        let ended = loop {
            match rx.recv().await {
                Some(Event::Ticked { .. }) => ticks += 1,
                Some(event @ Event::SessionEnded { .. }) => break event,
                other => panic!("unexpected event: {other:?}"),
            }
        };

        assert_eq!(ticks, 59);
        assert_eq!(ended.session().map(|s| s.duration), Some(60));
        // Sender dropped by the finished task.
        assert!(rx.recv().await.is_none());
        drop(handle);

        let guard = timer.lock().await;
        assert_eq!(guard.mode(), TimerMode::Idle);
        assert_eq!(guard.next_mode(), TimerMode::Break);
        assert_eq!(guard.sessions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_disarms() {
        let timer = shared(1);
        timer.lock().await.start_or_pause();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = CountdownHandle::arm(timer.clone(), Duration::from_secs(1), tx);

        time::sleep(Duration::from_millis(3_500)).await;
        handle.disarm();
        time::sleep(Duration::from_secs(10)).await;

        let guard = timer.lock().await;
        assert_eq!(guard.time_left(), 57);
        assert!(guard.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_paused() {
        let timer = shared(1);
        timer.lock().await.start_or_pause();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = CountdownHandle::arm(timer.clone(), Duration::from_secs(1), tx);

        time::sleep(Duration::from_millis(1_500)).await;
        timer.lock().await.start_or_pause();
        time::sleep(Duration::from_secs(2)).await;

        assert!(handle.is_finished());
        assert_eq!(timer.lock().await.time_left(), 59);
    }
}
