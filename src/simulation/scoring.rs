// src/simulation/scoring.rs

use serde::Serialize;

use crate::config::PASSING_SCORE_PERCENTAGE;

/// The six IHK grade bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    SehrGut,
    Gut,
    Befriedigend,
    Ausreichend,
    Mangelhaft,
    Ungenuegend,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 92.0 => Grade::SehrGut,
            p if p >= 81.0 => Grade::Gut,
            p if p >= 67.0 => Grade::Befriedigend,
            p if p >= 50.0 => Grade::Ausreichend,
            p if p >= 30.0 => Grade::Mangelhaft,
            _ => Grade::Ungenuegend,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::SehrGut => "Sehr gut",
            Grade::Gut => "Gut",
            Grade::Befriedigend => "Befriedigend",
            Grade::Ausreichend => "Ausreichend",
            Grade::Mangelhaft => "Mangelhaft",
            Grade::Ungenuegend => "Ungenügend",
        }
    }

    /// German school grade, 1 (best) to 6.
    pub fn number(&self) -> u8 {
        match self {
            Grade::SehrGut => 1,
            Grade::Gut => 2,
            Grade::Befriedigend => 3,
            Grade::Ausreichend => 4,
            Grade::Mangelhaft => 5,
            Grade::Ungenuegend => 6,
        }
    }
}

/// Aggregate result of a scored exam attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percentage: f64,
    pub grade: Grade,
    pub passed: bool,
}

impl ScoreSummary {
    pub fn new(total_score: u32, max_possible_score: u32) -> Self {
        let percentage = percentage(total_score, max_possible_score);
        Self {
            total_score,
            max_possible_score,
            percentage,
            grade: Grade::from_percentage(percentage),
            passed: percentage >= PASSING_SCORE_PERCENTAGE,
        }
    }
}

/// Share of `max` reached, 0 when nothing could be scored.
pub fn percentage(score: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    score as f64 / max as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(Grade::from_percentage(100.0), Grade::SehrGut);
        assert_eq!(Grade::from_percentage(92.0), Grade::SehrGut);
        assert_eq!(Grade::from_percentage(91.9), Grade::Gut);
        assert_eq!(Grade::from_percentage(81.0), Grade::Gut);
        assert_eq!(Grade::from_percentage(67.0), Grade::Befriedigend);
        assert_eq!(Grade::from_percentage(66.9), Grade::Ausreichend);
        assert_eq!(Grade::from_percentage(30.0), Grade::Mangelhaft);
        assert_eq!(Grade::from_percentage(29.9), Grade::Ungenuegend);
        assert_eq!(Grade::from_percentage(0.0), Grade::Ungenuegend);
    }

    #[test]
    fn test_exactly_fifty_passes() {
        let summary = ScoreSummary::new(50, 100);
        assert_eq!(summary.grade, Grade::Ausreichend);
        assert_eq!(summary.grade.label(), "Ausreichend");
        assert!(summary.passed);
    }

    #[test]
    fn test_forty_nine_fails() {
        let summary = ScoreSummary::new(49, 100);
        assert_eq!(summary.grade, Grade::Mangelhaft);
        assert_eq!(summary.grade.number(), 5);
        assert!(!summary.passed);
    }

    #[test]
    fn test_nothing_scored() {
        let summary = ScoreSummary::new(0, 0);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.grade, Grade::Ungenuegend);
        assert!(!summary.passed);
    }
}
