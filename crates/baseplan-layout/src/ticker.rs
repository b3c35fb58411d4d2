//! Async driver for pending claim countdowns.

use tokio::sync::oneshot;
use tokio::time::{interval, MissedTickBehavior};

use crate::area::CLAIM_TICK;
use crate::Design;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// Every claim completed.
    Drained,
    /// The cancel signal fired; remaining claims were dropped.
    Cancelled,
}

/// Tick every pending claim until none remain or `cancel` fires.
///
/// The interval only exists for the duration of this call, and the call
/// returns at once when nothing is pending. A dropped sender is not a
/// cancel.
pub async fn run_claim_countdowns(
    design: &mut Design,
    mut cancel: oneshot::Receiver<()>,
) -> TickerExit {
    if !design.has_pending_claims() {
        return TickerExit::Drained;
    }
    let mut ticker = interval(CLAIM_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    let mut listening = true;
    loop {
        tokio::select! {
            signal = &mut cancel, if listening => {
                if signal.is_ok() {
                    let dropped = design.cancel_all_claims();
                    tracing::debug!(dropped, "claim countdown cancelled");
                    return TickerExit::Cancelled;
                }
                listening = false;
            }
            _ = ticker.tick() => {
                for area in design.tick(CLAIM_TICK) {
                    tracing::info!(%area, "area claimed");
                }
                if !design.has_pending_claims() {
                    return TickerExit::Drained;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAIN_AREA;
    use baseplan_core::Direction;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn countdown_promotes_the_claim_after_three_seconds() {
        let mut design = Design::new();
        design.start_claim(MAIN_AREA, Direction::Right).unwrap();
        let (_tx, rx) = oneshot::channel();
        let started = Instant::now();

        let exit = run_claim_countdowns(&mut design, rx).await;

        assert_eq!(exit, TickerExit::Drained);
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
        assert_eq!(design.areas().len(), 2);
        assert!(!design.has_pending_claims());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_countdown_and_drops_claims() {
        let mut design = Design::new();
        design.start_claim(MAIN_AREA, Direction::Top).unwrap();
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        let exit = run_claim_countdowns(&mut design, rx).await;

        assert_eq!(exit, TickerExit::Cancelled);
        assert_eq!(design.areas().len(), 1);
        assert!(!design.has_pending_claims());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_does_not_cancel() {
        let mut design = Design::new();
        design.settings.claim_countdown_ms = 500;
        design.start_claim(MAIN_AREA, Direction::Left).unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);

        assert_eq!(run_claim_countdowns(&mut design, rx).await, TickerExit::Drained);
        assert_eq!(design.areas().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_pending_returns_immediately() {
        let mut design = Design::new();
        let (_tx, rx) = oneshot::channel();
        let started = Instant::now();
        assert_eq!(run_claim_countdowns(&mut design, rx).await, TickerExit::Drained);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
