//! Daily closing aggregation
//!
//! "Closing the day" is a read-only report over sessions closed within one
//! local calendar day. It never mutates session state, so calling it twice
//! with no intervening exits returns the same numbers.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Revenue summary for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClosing {
    /// Sum of closed-session costs, in cents
    pub total_cents: i64,
    /// Number of sessions closed within the day
    pub session_count: u64,
}

pub struct ClosingAggregator {
    repos: Arc<dyn RepositoryProvider>,
    /// Offset defining the lot's local calendar day
    offset: FixedOffset,
}

impl ClosingAggregator {
    pub fn new(repos: Arc<dyn RepositoryProvider>, offset: FixedOffset) -> Self {
        Self { repos, offset }
    }

    /// The `[midnight, next midnight)` window of the local day containing
    /// `reference`, expressed back in UTC.
    pub fn day_window(&self, reference: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let local_midnight = reference
            .with_timezone(&self.offset)
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time");
        // local = utc + offset, so utc = local - offset
        let start = DateTime::<Utc>::from_naive_utc_and_offset(local_midnight - self.offset, Utc);
        (start, start + Duration::days(1))
    }

    /// Total revenue and session count for the local day containing
    /// `reference_time`. Inclusive of the day's start, exclusive of its end.
    pub async fn daily_summary(&self, reference_time: DateTime<Utc>) -> DomainResult<DailyClosing> {
        let (start, end) = self.day_window(reference_time);
        let closed = self.repos.sessions().find_closed_between(start, end).await?;

        let mut total_cents: i64 = 0;
        for session in &closed {
            let cost = session.cost_cents.ok_or_else(|| {
                DomainError::Validation(format!(
                    "closed session {} has no cost recorded",
                    session.id
                ))
            })?;
            total_cents += cost;
        }

        Ok(DailyClosing {
            total_cents,
            session_count: closed.len() as u64,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::parking::ParkingService;
    use crate::domain::{RateTable, VehicleType};
    use crate::test_support::memory_provider;
    use chrono::TimeZone;

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    async fn close_session(
        svc: &ParkingService,
        plate: &str,
        entry: DateTime<Utc>,
        exit: DateTime<Utc>,
    ) {
        svc.register_entry(plate, VehicleType::Car, false, Some(entry))
            .await
            .unwrap();
        svc.register_exit(plate, Some(exit)).await.unwrap();
    }

    #[tokio::test]
    async fn sums_only_sessions_closed_within_the_day() {
        let repos = memory_provider(5);
        let svc = ParkingService::new(repos.clone(), RateTable::default());
        let agg = ClosingAggregator::new(repos, utc_offset());

        let day_before = noon() - Duration::days(1);
        close_session(&svc, "AAA111", day_before - Duration::hours(1), day_before).await;
        close_session(&svc, "BBB222", noon() - Duration::hours(2), noon()).await;
        close_session(
            &svc,
            "CCC333",
            noon() - Duration::hours(1),
            noon() + Duration::hours(1),
        )
        .await;
        // Still active: must not count.
        svc.register_entry("DDD444", VehicleType::Car, false, Some(noon()))
            .await
            .unwrap();

        let summary = agg.daily_summary(noon()).await.unwrap();
        assert_eq!(summary.session_count, 2);
        // Two closed car sessions: 2h and 2h at the default 12000/h rate.
        assert_eq!(summary.total_cents, 2 * 2 * 12000);
    }

    #[tokio::test]
    async fn repeated_calls_are_idempotent() {
        let repos = memory_provider(5);
        let svc = ParkingService::new(repos.clone(), RateTable::default());
        let agg = ClosingAggregator::new(repos, utc_offset());

        close_session(&svc, "AAA111", noon() - Duration::hours(3), noon()).await;

        let first = agg.daily_summary(noon()).await.unwrap();
        let second = agg.daily_summary(noon()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn closing_does_not_close_active_sessions() {
        let repos = memory_provider(5);
        let svc = ParkingService::new(repos.clone(), RateTable::default());
        let agg = ClosingAggregator::new(repos, utc_offset());

        let s = svc
            .register_entry("AAA111", VehicleType::Car, false, Some(noon()))
            .await
            .unwrap();
        agg.daily_summary(noon()).await.unwrap();

        let after = svc.get_session(s.id).await.unwrap();
        assert!(after.is_active());
        assert!(after.exit_time.is_none());
    }

    #[tokio::test]
    async fn window_start_inclusive_end_exclusive() {
        let repos = memory_provider(5);
        let svc = ParkingService::new(repos.clone(), RateTable::default());
        let agg = ClosingAggregator::new(repos.clone(), utc_offset());

        let (start, end) = agg.day_window(noon());
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap());

        // Exit exactly at midnight belongs to the new day.
        close_session(&svc, "AAA111", start - Duration::hours(1), start).await;
        // Exit exactly at the end boundary belongs to the next day.
        close_session(&svc, "BBB222", end - Duration::hours(1), end).await;

        let summary = agg.daily_summary(noon()).await.unwrap();
        assert_eq!(summary.session_count, 1);
    }

    #[tokio::test]
    async fn offset_shifts_the_day_window() {
        let repos = memory_provider(5);
        let agg = ClosingAggregator::new(repos, FixedOffset::west_opt(5 * 3600).unwrap());

        // 02:00 UTC is still the previous local day at UTC-5.
        let reference = Utc.with_ymd_and_hms(2025, 6, 15, 2, 0, 0).unwrap();
        let (start, end) = agg.day_window(reference);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 14, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 15, 5, 0, 0).unwrap());
    }
}
