//! Process-wide call budget and throttle for the generation provider.
//!
//! One `SharedQuota` is created per process and cloned into every
//! orchestrator. The budget counts generation requests; the pacer spaces
//! every provider call, retries included. The pacer lock is held across the
//! throttle wait and the call itself, so provider calls are serialized and
//! each one starts at least `min_delay` after the previous one finished.

use chrono::{NaiveDate, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use vta_core::{AssistantConfig, QuotaReset};

/// Outcome of asking for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The request may proceed; it has already been counted.
    Granted {
        /// 1-based number of this request within the current budget
        call_number: u32,
    },

    /// The budget is spent; no provider call may be made.
    Exhausted { used: u32, limit: u32 },
}

#[derive(Debug)]
struct Budget {
    call_count: u32,
    daily_limit: u32,
    reset: QuotaReset,
    day: NaiveDate,
}

impl Budget {
    fn roll_over(&mut self, today: NaiveDate) {
        if self.reset == QuotaReset::CalendarDay && today != self.day {
            tracing::info!(
                "New day {}, resetting generation budget ({} calls used on {})",
                today,
                self.call_count,
                self.day
            );
            self.call_count = 0;
            self.day = today;
        }
    }
}

/// Point-in-time view of the quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub call_count: u32,
    pub daily_limit: u32,
    pub min_delay: Duration,
    pub reset: QuotaReset,
}

impl QuotaSnapshot {
    pub fn is_exhausted(&self) -> bool {
        self.call_count >= self.daily_limit
    }
}

/// Shared, lock-protected quota state.
#[derive(Debug, Clone)]
pub struct SharedQuota {
    budget: Arc<Mutex<Budget>>,
    /// End of the most recent provider call
    last_call: Arc<Mutex<Option<Instant>>>,
    min_delay: Duration,
}

impl SharedQuota {
    pub fn new(daily_limit: u32, min_delay: Duration, reset: QuotaReset) -> Self {
        Self {
            budget: Arc::new(Mutex::new(Budget {
                call_count: 0,
                daily_limit,
                reset,
                day: Utc::now().date_naive(),
            })),
            last_call: Arc::new(Mutex::new(None)),
            min_delay,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.daily_limit, config.min_delay(), config.quota_reset)
    }

    /// Reserve one generation request against the budget.
    ///
    /// A request that later fails is still counted.
    pub async fn acquire(&self) -> QuotaDecision {
        self.acquire_on(Utc::now().date_naive()).await
    }

    pub(crate) async fn acquire_on(&self, today: NaiveDate) -> QuotaDecision {
        let mut budget = self.budget.lock().await;
        budget.roll_over(today);

        if budget.call_count >= budget.daily_limit {
            tracing::warn!(
                "Generation budget reached ({}/{}), skipping provider call",
                budget.call_count,
                budget.daily_limit
            );
            return QuotaDecision::Exhausted {
                used: budget.call_count,
                limit: budget.daily_limit,
            };
        }

        budget.call_count += 1;
        QuotaDecision::Granted {
            call_number: budget.call_count,
        }
    }

    /// Run one provider call under the process-wide throttle.
    ///
    /// Waits until `min_delay` has passed since the previous call finished,
    /// runs `call`, then records its end. Concurrent callers queue on the lock.
    pub async fn paced<F>(&self, call: F) -> F::Output
    where
        F: Future,
    {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let wait = self.min_delay - elapsed;
                tracing::info!("Rate limiting: waiting {:.1} seconds", wait.as_secs_f64());
                tokio::time::sleep(wait).await;
            }
        }

        let output = call.await;
        *last_call = Some(Instant::now());
        output
    }

    pub async fn snapshot(&self) -> QuotaSnapshot {
        let mut budget = self.budget.lock().await;
        budget.roll_over(Utc::now().date_naive());
        QuotaSnapshot {
            call_count: budget.call_count,
            daily_limit: budget.daily_limit,
            min_delay: self.min_delay,
            reset: budget.reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    /// A call that records when it started and then takes `latency`.
    async fn timed_call(latency: Duration) -> Instant {
        let started = Instant::now();
        tokio::time::sleep(latency).await;
        started
    }

    #[tokio::test]
    async fn test_exhausted_after_limit() {
        let quota = SharedQuota::new(2, Duration::ZERO, QuotaReset::Lifetime);

        assert_eq!(quota.acquire().await, QuotaDecision::Granted { call_number: 1 });
        assert_eq!(quota.acquire().await, QuotaDecision::Granted { call_number: 2 });
        assert_eq!(
            quota.acquire().await,
            QuotaDecision::Exhausted { used: 2, limit: 2 }
        );
        assert!(quota.snapshot().await.is_exhausted());
    }

    #[tokio::test]
    async fn test_paced_calls_respect_min_delay() {
        let delay = Duration::from_millis(80);
        let quota = SharedQuota::new(10, delay, QuotaReset::Lifetime);

        let first = quota.paced(timed_call(Duration::ZERO)).await;
        let second = quota.paced(timed_call(Duration::ZERO)).await;

        assert!(second.duration_since(first) >= delay);
    }

    #[tokio::test]
    async fn test_delay_counts_from_end_of_slow_call() {
        let delay = Duration::from_millis(60);
        let quota = SharedQuota::new(10, delay, QuotaReset::Lifetime);

        let first = quota.paced(timed_call(Duration::from_millis(40))).await;
        let second = quota.paced(timed_call(Duration::ZERO)).await;

        assert!(second.duration_since(first) >= delay + Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_spaced() {
        let delay = Duration::from_millis(40);
        let quota = SharedQuota::new(10, delay, QuotaReset::Lifetime);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let quota = quota.clone();
                tokio::spawn(async move { quota.paced(timed_call(Duration::from_millis(10))).await })
            })
            .collect();

        let mut instants = Vec::new();
        for handle in handles {
            instants.push(handle.await.unwrap());
        }
        instants.sort();

        for pair in instants.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= delay);
        }
    }

    #[tokio::test]
    async fn test_pacing_does_not_spend_budget() {
        let quota = SharedQuota::new(1, Duration::ZERO, QuotaReset::Lifetime);
        quota.paced(async {}).await;
        quota.paced(async {}).await;
        assert_eq!(quota.snapshot().await.call_count, 0);
    }

    #[tokio::test]
    async fn test_lifetime_budget_never_refills() {
        let quota = SharedQuota::new(1, Duration::ZERO, QuotaReset::Lifetime);
        quota.acquire_on(day(1)).await;
        assert!(matches!(
            quota.acquire_on(day(2)).await,
            QuotaDecision::Exhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_calendar_day_budget_refills() {
        let quota = SharedQuota::new(1, Duration::ZERO, QuotaReset::CalendarDay);
        assert!(matches!(quota.acquire_on(day(1)).await, QuotaDecision::Granted { .. }));
        assert!(matches!(quota.acquire_on(day(1)).await, QuotaDecision::Exhausted { .. }));
        assert_eq!(
            quota.acquire_on(day(2)).await,
            QuotaDecision::Granted { call_number: 1 }
        );
    }
}
