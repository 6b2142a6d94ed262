// src/models/stats.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::MAX_COUNTER_VALUE;

/// Aggregate learning statistics of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub id: i64,
    pub user_id: i64,
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Consecutive days with at least one answered question.
    pub streak_days: u32,
    /// Cumulative study time in minutes.
    pub total_study_time: u32,
    pub last_active: DateTime<Utc>,
}

impl UserStats {
    pub fn new(id: i64, user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            total_questions: 0,
            correct_answers: 0,
            streak_days: 0,
            total_study_time: 0,
            last_active: now,
        }
    }

    /// Percentage of correct answers, 0 when nothing was answered yet.
    pub fn correct_percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.correct_answers as f64 / self.total_questions as f64) * 100.0).round() as u32
    }

    /// Counts one answered question and advances the daily streak.
    pub fn record_answer(&mut self, correct: bool, now: DateTime<Utc>) {
        self.total_questions = self.total_questions.saturating_add(1);
        if correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
        }
        self.touch_streak(now);
        self.last_active = now;
    }

    fn touch_streak(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        let last = self.last_active.date_naive();

        self.streak_days = if last == today {
            self.streak_days.max(1)
        } else if last.succ_opt() == Some(today) {
            self.streak_days.saturating_add(1)
        } else {
            1
        };
    }

    pub fn add_study_time(&mut self, minutes: u32, now: DateTime<Utc>) {
        self.total_study_time = self.total_study_time.saturating_add(minutes);
        self.last_active = now;
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.total_questions = 0;
        self.correct_answers = 0;
        self.streak_days = 0;
        self.total_study_time = 0;
        self.last_active = now;
    }

    pub fn apply(&mut self, updates: UpdateStatsRequest, now: DateTime<Utc>) {
        if let Some(v) = updates.total_questions {
            self.total_questions = v;
        }
        if let Some(v) = updates.correct_answers {
            self.correct_answers = v;
        }
        if let Some(v) = updates.streak_days {
            self.streak_days = v;
        }
        if let Some(v) = updates.total_study_time {
            self.total_study_time = v;
        }
        self.last_active = now;
    }
}

/// Partial overwrite for `PATCH /api/stats/{userId}`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsRequest {
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub total_questions: Option<u32>,
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub correct_answers: Option<u32>,
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub streak_days: Option<u32>,
    #[validate(range(max = MAX_COUNTER_VALUE))]
    pub total_study_time: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudyTimeRequest {
    #[validate(range(min = 1, max = 1440))]
    pub minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_streak_starts_and_holds_within_a_day() {
        let mut stats = UserStats::new(1, 1, at(10, 8));
        stats.record_answer(true, at(10, 9));
        assert_eq!(stats.streak_days, 1);
        stats.record_answer(false, at(10, 18));
        assert_eq!(stats.streak_days, 1);
        assert_eq!(stats.total_questions, 2);
        assert_eq!(stats.correct_answers, 1);
    }

    #[test]
    fn test_streak_grows_on_consecutive_days_and_resets_after_gap() {
        let mut stats = UserStats::new(1, 1, at(10, 8));
        stats.record_answer(true, at(10, 9));
        stats.record_answer(true, at(11, 9));
        assert_eq!(stats.streak_days, 2);
        stats.record_answer(true, at(11, 9) + Duration::days(3));
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut stats = UserStats::new(1, 1, at(10, 8));
        stats.record_answer(true, at(10, 9));
        stats.add_study_time(15, at(10, 10));
        stats.reset(at(10, 11));
        assert_eq!(stats.total_questions, 0);
        assert_eq!(stats.correct_answers, 0);
        assert_eq!(stats.streak_days, 0);
        assert_eq!(stats.total_study_time, 0);
    }

    #[test]
    fn test_correct_percentage() {
        let mut stats = UserStats::new(1, 1, at(10, 8));
        assert_eq!(stats.correct_percentage(), 0);
        stats.record_answer(true, at(10, 9));
        stats.record_answer(true, at(10, 9));
        stats.record_answer(false, at(10, 9));
        assert_eq!(stats.correct_percentage(), 67);
    }

    #[test]
    fn test_counters_saturate_instead_of_overflowing() {
        let mut stats = UserStats::new(1, 1, at(10, 8));
        stats.apply(
            UpdateStatsRequest {
                total_questions: Some(u32::MAX),
                correct_answers: Some(u32::MAX),
                streak_days: Some(u32::MAX),
                total_study_time: None,
            },
            at(10, 9),
        );
        stats.record_answer(true, at(11, 9));
        assert_eq!(stats.total_questions, u32::MAX);
        assert_eq!(stats.correct_answers, u32::MAX);
        assert_eq!(stats.streak_days, u32::MAX);
    }

    #[test]
    fn test_update_rejects_oversized_counters() {
        let updates = UpdateStatsRequest {
            total_questions: Some(u32::MAX),
            ..Default::default()
        };
        assert!(updates.validate().is_err());

        let updates = UpdateStatsRequest {
            streak_days: Some(12),
            ..Default::default()
        };
        assert!(updates.validate().is_ok());
    }
}
