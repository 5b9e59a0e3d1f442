//! Periodic tick trigger for a live workout.
//!
//! Delivers one tick per period to a shared [`WorkoutSession`]. Each tick
//! runs with the session lock held, so overlapping triggers cannot
//! interleave transitions.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::session::{SaveOutcome, TickReport, WorkoutSession};
use crate::storage::WorkoutStore;
use crate::timer::TimerSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DriveOutcome {
    Completed {
        ticks: u64,
        save: Option<SaveOutcome>,
    },
    /// The tick budget ran out; the countdown is frozen where it stopped.
    LimitReached { ticks: u64 },
    /// The timer was not running (never started, or reset by someone else).
    Stopped { ticks: u64 },
    /// The run was paused; ticks stop until someone resumes and drives again.
    Paused { ticks: u64 },
}

/// Drive `session` until it completes, stops running, is paused, or
/// `limit` ticks have been delivered. `on_tick` sees every report with the snapshot
/// taken right after it.
pub async fn run_ticks<F>(
    session: Arc<Mutex<WorkoutSession>>,
    store: &dyn WorkoutStore,
    period: Duration,
    limit: Option<u64>,
    mut on_tick: F,
) -> DriveOutcome
where
    F: FnMut(&TickReport, &TimerSnapshot),
{
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately.
    interval.tick().await;

    let mut ticks = 0;
    loop {
        if let Some(outcome) = halted(&*session.lock().await, ticks) {
            return outcome;
        }
        if limit.is_some_and(|l| ticks >= l) {
            info!(ticks, "tick limit reached");
            return DriveOutcome::LimitReached { ticks };
        }

        interval.tick().await;

        let mut guard = session.lock().await;
        if let Some(outcome) = halted(&guard, ticks) {
            return outcome;
        }
        let report = guard.tick(store);
        ticks += 1;
        on_tick(&report, &guard.snapshot());
        if report.completed() {
            return DriveOutcome::Completed {
                ticks,
                save: report.save,
            };
        }
    }
}

fn halted(session: &WorkoutSession, ticks: u64) -> Option<DriveOutcome> {
    let timer = session.timer();
    if !timer.is_running() {
        debug!(ticks, "timer not running, driver stopped");
        Some(DriveOutcome::Stopped { ticks })
    } else if timer.is_paused() {
        debug!(ticks, "timer paused, driver stopped");
        Some(DriveOutcome::Paused { ticks })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Category;
    use crate::storage::Database;
    use crate::timer::Phase;

    fn shared_session(rest: u32) -> Arc<Mutex<WorkoutSession>> {
        let mut session = WorkoutSession::with_settings(70.0, rest).unwrap();
        session.add_exercise("Push-ups", 5, Category::Strength).unwrap();
        session.add_exercise("Running", 3, Category::Cardio).unwrap();
        session.start().unwrap();
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn drives_run_to_completion() {
        let db = Database::open_memory().unwrap();
        let session = shared_session(2);
        let mut seen = Vec::new();

        let outcome = run_ticks(
            session.clone(),
            &db,
            Duration::from_secs(1),
            None,
            |_, snap| seen.push(snap.phase),
        )
        .await;

        assert_eq!(
            outcome,
            DriveOutcome::Completed {
                ticks: 10,
                save: Some(SaveOutcome::Saved { session_id: 1 }),
            }
        );
        assert_eq!(seen.last(), Some(&Phase::Complete));
        assert_eq!(db.load_all().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn limit_freezes_countdown() {
        let db = Database::open_memory().unwrap();
        let session = shared_session(0);

        let outcome = run_ticks(session.clone(), &db, Duration::from_secs(1), Some(3), |_, _| {})
            .await;

        assert_eq!(outcome, DriveOutcome::LimitReached { ticks: 3 });
        let guard = session.lock().await;
        assert_eq!(guard.timer().state().remaining_seconds, 2);
        assert!(db.load_all().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn paused_session_returns_without_ticking() {
        let db = Database::open_memory().unwrap();
        let session = shared_session(0);
        session.lock().await.pause().unwrap();

        let outcome = time::timeout(
            Duration::from_secs(3600),
            run_ticks(session.clone(), &db, Duration::from_secs(1), None, |_, _| {}),
        )
        .await
        .expect("driver must return for a paused session");

        assert_eq!(outcome, DriveOutcome::Paused { ticks: 0 });
        assert_eq!(session.lock().await.timer().state().remaining_seconds, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_mid_run_stops_driver() {
        let db = Database::open_memory().unwrap();
        let session = shared_session(0);
        let pauser = session.clone();

        let (outcome, ()) = tokio::join!(
            run_ticks(session.clone(), &db, Duration::from_secs(1), None, |_, _| {}),
            async move {
                time::sleep(Duration::from_millis(2500)).await;
                pauser.lock().await.pause().unwrap();
            }
        );

        assert_eq!(outcome, DriveOutcome::Paused { ticks: 2 });
        assert_eq!(session.lock().await.timer().state().remaining_seconds, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_stops_immediately() {
        let db = Database::open_memory().unwrap();
        let session = Arc::new(Mutex::new(WorkoutSession::new()));
        let outcome = run_ticks(session, &db, Duration::from_secs(1), None, |_, _| {}).await;
        assert_eq!(outcome, DriveOutcome::Stopped { ticks: 0 });
    }
}
