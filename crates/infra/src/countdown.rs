//! Live countdowns: one ticking task per displayed product.
//!
//! ## Design
//!
//! - Each watched product gets a tokio task that recomputes its countdown on
//!   a fixed interval and publishes changes on a `watch` channel.
//! - The task stops by itself once the countdown is expired; the last value
//!   (`Countdown::EXPIRED`) stays readable.
//! - [`CountdownWatch`] is the timer resource held by a view. Dropping it
//!   cancels the task.
//! - [`CountdownScheduler`] keys tasks by product id, so a product has at most
//!   one live countdown and can be dismissed by id.
//!
//! Tasks are spawned on the current tokio runtime; the app runs a
//! current-thread runtime so every tick executes on the main context.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use shelflife_core::{Clock, ProductId};
use shelflife_products::{Countdown, Product, governing_expiration, project};

use crate::config::DEFAULT_TICK_INTERVAL;

/// Handle to one live countdown.
#[derive(Debug)]
pub struct CountdownWatch {
    product_id: ProductId,
    updates: watch::Receiver<Countdown>,
    abort: AbortHandle,
}

impl CountdownWatch {
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Most recently published countdown.
    pub fn latest(&self) -> Countdown {
        *self.updates.borrow()
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the task has stopped (expired, dismissed or
    /// replaced); `latest()` still holds the final value.
    pub async fn changed(&mut self) -> Option<Countdown> {
        self.updates.changed().await.ok()?;
        Some(*self.updates.borrow_and_update())
    }

    /// True once the ticking task has ended.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

impl Drop for CountdownWatch {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Owns the live countdown tasks, keyed by product id.
#[derive(Debug)]
pub struct CountdownScheduler {
    clock: Arc<dyn Clock>,
    period: Duration,
    tasks: HashMap<ProductId, AbortHandle>,
}

impl CountdownScheduler {
    /// A zero `period` falls back to [`DEFAULT_TICK_INTERVAL`].
    pub fn new(clock: Arc<dyn Clock>, period: Duration) -> Self {
        let period = if period.is_zero() {
            DEFAULT_TICK_INTERVAL
        } else {
            period
        };
        Self {
            clock,
            period,
            tasks: HashMap::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start a live countdown for `product`.
    ///
    /// The product is a snapshot: after an edit, watch it again. Any existing
    /// countdown for the same id is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn watch(&mut self, product: &Product) -> CountdownWatch {
        self.prune_finished();

        let product_id = product.id_typed();
        if let Some(previous) = self.tasks.remove(&product_id) {
            previous.abort();
            debug!(product_id = %product_id, "replaced existing countdown");
        }

        let governing = governing_expiration(product);
        let initial = project(governing, self.clock.now());
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(run_countdown(
            product_id,
            governing,
            self.clock.clone(),
            self.period,
            tx,
        ));
        let abort = task.abort_handle();
        self.tasks.insert(product_id, abort.clone());

        info!(
            product_id = %product_id,
            expired = initial.expired,
            period_secs = self.period.as_secs_f64(),
            "countdown started"
        );

        CountdownWatch {
            product_id,
            updates: rx,
            abort,
        }
    }

    /// Cancel the countdown for `product_id`. Returns whether one was running.
    pub fn dismiss(&mut self, product_id: ProductId) -> bool {
        match self.tasks.remove(&product_id) {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                debug!(product_id = %product_id, "countdown dismissed");
                was_running
            }
            None => false,
        }
    }

    /// Number of countdowns still ticking.
    pub fn active_count(&mut self) -> usize {
        self.prune_finished();
        self.tasks.len()
    }

    /// Cancel every countdown.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    fn prune_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_countdown(
    product_id: ProductId,
    governing: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
    period: Duration,
    tx: watch::Sender<Countdown>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if tx.is_closed() {
            debug!(product_id = %product_id, "no countdown listeners left");
            break;
        }

        let countdown = project(governing, clock.now());
        let changed = tx.send_if_modified(|current| {
            if *current == countdown {
                false
            } else {
                *current = countdown;
                true
            }
        });

        if countdown.expired {
            info!(product_id = %product_id, "countdown reached expiry; stopping");
            break;
        }

        if changed {
            debug!(
                product_id = %product_id,
                months = countdown.months,
                weeks = countdown.weeks,
                days = countdown.days,
                "countdown updated"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shelflife_core::ManualClock;
    use shelflife_products::{Category, ProductDetails};

    const PERIOD: Duration = Duration::from_secs(10);

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn expiring_at(expiry: DateTime<Utc>) -> Product {
        Product::new(
            ProductId::new(),
            ProductDetails::new("Sunscreen", Category::Face).with_expiry_date(expiry),
            start() - chrono::Duration::days(100),
        )
    }

    fn scheduler(clock: &Arc<ManualClock>) -> CountdownScheduler {
        CountdownScheduler::new(clock.clone(), PERIOD)
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_changes_and_latches_at_expiry() {
        let clock = ManualClock::arc(start());
        let mut scheduler = scheduler(&clock);
        let expiry = start() + chrono::Duration::days(8) + chrono::Duration::hours(1);
        let mut watch = scheduler.watch(&expiring_at(expiry));

        assert_eq!(
            watch.latest(),
            Countdown {
                months: 0,
                weeks: 1,
                days: 1,
                expired: false
            }
        );

        clock.advance(chrono::Duration::days(2));
        let next = watch.changed().await.unwrap();
        assert_eq!((next.weeks, next.days, next.expired), (0, 6, false));

        clock.set(expiry + chrono::Duration::seconds(1));
        assert_eq!(watch.changed().await, Some(Countdown::EXPIRED));

        // no more ticks after expiry
        assert_eq!(watch.changed().await, None);
        assert!(watch.is_finished());
        assert_eq!(watch.latest(), Countdown::EXPIRED);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn recomputes_only_on_tick() {
        let clock = ManualClock::arc(start());
        let mut scheduler = scheduler(&clock);
        let watch = scheduler.watch(&expiring_at(start() + chrono::Duration::days(20)));
        let before = watch.latest();

        // let the immediate first tick run
        tokio::time::sleep(Duration::from_secs(1)).await;
        clock.advance(chrono::Duration::days(3));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(watch.latest(), before);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_ne!(watch.latest(), before);
        assert_eq!(watch.latest().remainder_days(), 17);
    }

    #[tokio::test(start_paused = true)]
    async fn already_expired_and_untracked_finish_immediately() {
        let clock = ManualClock::arc(start());
        let mut scheduler = scheduler(&clock);

        let mut expired = scheduler.watch(&expiring_at(start() - chrono::Duration::days(1)));
        assert_eq!(expired.latest(), Countdown::EXPIRED);
        assert_eq!(expired.changed().await, None);

        let untracked = Product::new(
            ProductId::new(),
            ProductDetails::new("Brush", Category::Face),
            start(),
        );
        let mut untracked = scheduler.watch(&untracked);
        assert_eq!(untracked.latest(), Countdown::EXPIRED);
        assert_eq!(untracked.changed().await, None);

        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_watch_cancels_the_task() {
        let clock = ManualClock::arc(start());
        let mut scheduler = scheduler(&clock);
        let watch = scheduler.watch(&expiring_at(start() + chrono::Duration::days(365)));
        assert_eq!(scheduler.active_count(), 1);

        drop(watch);
        // give the runtime a chance to reap the aborted task
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn watching_again_replaces_previous_countdown() {
        let clock = ManualClock::arc(start());
        let mut scheduler = scheduler(&clock);
        let product = expiring_at(start() + chrono::Duration::days(40));

        let mut first = scheduler.watch(&product);
        let second = scheduler.watch(&product);

        assert_eq!(first.changed().await, None);
        assert!(!second.is_finished());
        assert_eq!(scheduler.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_by_id() {
        let clock = ManualClock::arc(start());
        let mut scheduler = scheduler(&clock);
        let product = expiring_at(start() + chrono::Duration::days(40));
        let mut watch = scheduler.watch(&product);

        assert!(scheduler.dismiss(product.id_typed()));
        assert!(!scheduler.dismiss(product.id_typed()));
        assert_eq!(watch.changed().await, None);
        assert!(watch.is_finished());
    }

    #[test]
    fn zero_period_uses_default() {
        let clock = ManualClock::arc(start());
        let scheduler = CountdownScheduler::new(clock, Duration::ZERO);
        assert_eq!(scheduler.period(), DEFAULT_TICK_INTERVAL);
    }
}
