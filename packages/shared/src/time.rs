//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps are Unix epoch milliseconds (UTC).

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        current_timestamp_millis()
    }
}

/// Manually driven clock for tests.
///
/// Starts at a fixed instant and only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start_millis`
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Move forward by whole seconds
    pub fn advance_secs(&self, secs: i64) {
        self.now.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Current Unix timestamp in milliseconds
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert epoch milliseconds to fractional epoch seconds
pub fn millis_to_epoch_secs(timestamp_millis: i64) -> f64 {
    timestamp_millis as f64 / 1000.0
}

/// Format a timestamp as wall-clock `HH:MM` at the given UTC offset.
///
/// Offsets outside ±24h fall back to UTC.
pub fn format_hh_mm(timestamp_millis: i64, utc_offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    match DateTime::<Utc>::from_timestamp_millis(timestamp_millis) {
        Some(dt) => dt.with_timezone(&offset).format("%H:%M").to_string(),
        None => "00:00".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_manual_clock_stays_frozen_until_advanced() {
        // テスト項目: ManualClock は進めるまで同じ時刻を返す
        // given (前提条件):
        let clock = ManualClock::new(1_000);

        // when (操作):
        let first = clock.now_millis();
        let second = clock.now_millis();

        // then (期待する結果):
        assert_eq!(first, 1_000);
        assert_eq!(second, 1_000);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        // テスト項目: ManualClock を秒単位で進めたり任意の時刻に設定したりできる
        // given (前提条件):
        let clock = ManualClock::new(0);

        // when (操作):
        clock.advance_secs(90);
        let advanced = clock.now_millis();
        clock.set(5_000);

        // then (期待する結果):
        assert_eq!(advanced, 90_000);
        assert_eq!(clock.now_millis(), 5_000);
    }

    #[test]
    fn test_millis_to_epoch_secs_keeps_fraction() {
        // テスト項目: ミリ秒が小数点付きの秒に変換される
        assert_eq!(millis_to_epoch_secs(1_500), 1.5);
    }

    #[test]
    fn test_format_hh_mm_utc() {
        // テスト項目: UTC で HH:MM 形式に変換される
        // given (前提条件):
        // 2023-01-01 09:05:30 UTC
        let timestamp = 1_672_563_930_000;

        // when (操作):
        let result = format_hh_mm(timestamp, 0);

        // then (期待する結果):
        assert_eq!(result, "09:05");
    }

    #[test]
    fn test_format_hh_mm_with_offset() {
        // テスト項目: オフセット指定時は現地時刻で表示される
        // given (前提条件):
        // 2023-01-01 09:05:30 UTC => 18:05 JST
        let timestamp = 1_672_563_930_000;

        // when (操作):
        let result = format_hh_mm(timestamp, 9 * 60);

        // then (期待する結果):
        assert_eq!(result, "18:05");
    }
}
