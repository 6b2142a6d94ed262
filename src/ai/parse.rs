// src/ai/parse.rs

//! Best-effort extraction of structured fields from model replies.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::feedback::GradingResult;

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Punktzahl:?\s*(\d+)\s*/\s*\d+").expect("valid score regex"));

static CORRECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Korrekt:?\s*(Ja|Nein)").expect("valid correctness regex"));

static FEEDBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Feedback:?").expect("valid feedback regex"));

/// End of the feedback section: the line carrying the "Korrekt" verdict.
static FEEDBACK_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\n\s*-?\s*\**Korrekt:").expect("valid feedback end regex"));

static NUMBERED_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s+[^\n.]+").expect("valid hint regex"));

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

const NO_FEEDBACK: &str = "Keine Bewertung verfügbar.";

/// Reads score, verdict and feedback out of a grading reply.
///
/// Each field is independent: a missing score is 0, a missing verdict is
/// "incorrect" and a missing feedback section makes the whole reply the
/// feedback. The score is capped at `max_score`.
pub fn parse_grading_reply(text: &str, max_score: u32) -> GradingResult {
    let score = SCORE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
        .min(max_score);

    let is_correct = CORRECT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("ja"));

    let feedback = match FEEDBACK_RE.find(text) {
        Some(marker) => {
            let rest = &text[marker.end()..];
            let section = match FEEDBACK_END_RE.find(rest) {
                Some(end) => &rest[..end.start()],
                None => rest,
            };
            section.trim().to_string()
        }
        None => text.trim().to_string(),
    };

    GradingResult {
        feedback: if feedback.is_empty() {
            NO_FEEDBACK.to_string()
        } else {
            feedback
        },
        is_correct,
        score,
        max_score,
    }
}

/// Trims a tip and strips one pair of wrapping quote characters.
pub fn clean_tip(text: &str) -> String {
    const QUOTES: &[char] = &['"', '\'', '„', '“', '”', '»', '«'];

    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix(QUOTES).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(QUOTES).unwrap_or(trimmed);
    trimmed.trim().to_string()
}

/// Splits a hint reply into two or three short hints.
///
/// Numbered items win when there are at least two; otherwise the first
/// three sentences longer than 20 characters are used.
pub fn extract_hints(text: &str) -> Vec<String> {
    let numbered: Vec<String> = NUMBERED_HINT_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();
    if numbered.len() >= 2 {
        return numbered;
    }

    SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > 20)
        .take(3)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_reply() {
        let reply = "- Punktzahl: 7 / 10\n- Feedback: Gute Antwort, aber der Aspekt X fehlt.\nWeitere Details.\n- Korrekt: Ja";
        let result = parse_grading_reply(reply, 10);
        assert_eq!(result.score, 7);
        assert!(result.is_correct);
        assert_eq!(result.feedback, "Gute Antwort, aber der Aspekt X fehlt.\nWeitere Details.");
        assert_eq!(result.max_score, 10);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_tolerates_missing_colon() {
        let reply = "punktzahl 3/5\nFEEDBACK teilweise richtig\n- korrekt: nein";
        let result = parse_grading_reply(reply, 5);
        assert_eq!(result.score, 3);
        assert!(!result.is_correct);
        assert_eq!(result.feedback, "teilweise richtig");
    }

    #[test]
    fn test_unparseable_reply_falls_back_to_whole_text() {
        let reply = "Ich kann diese Antwort leider nicht bewerten.";
        let result = parse_grading_reply(reply, 15);
        assert_eq!(result.score, 0);
        assert!(!result.is_correct);
        assert_eq!(result.feedback, reply);
    }

    #[test]
    fn test_empty_reply_gets_placeholder_feedback() {
        let result = parse_grading_reply("   ", 5);
        assert_eq!(result.feedback, NO_FEEDBACK);
    }

    #[test]
    fn test_score_is_capped() {
        let result = parse_grading_reply("Punktzahl: 12 / 5\nFeedback: super\nKorrekt: Ja", 5);
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_clean_tip() {
        assert_eq!(clean_tip("  \"Lerne täglich 20 Minuten.\"  "), "Lerne täglich 20 Minuten.");
        assert_eq!(clean_tip("'Wiederhole Subnetting.'"), "Wiederhole Subnetting.");
        assert_eq!(clean_tip("„Mach Pausen.“"), "Mach Pausen.");
        assert_eq!(clean_tip("Ohne Anführungszeichen"), "Ohne Anführungszeichen");
    }

    #[test]
    fn test_extract_numbered_hints() {
        let text = "Zum Thema:\n1. Überlege, was ein Primärschlüssel ist\n2. Denke an Normalformen\n3. Prüfe Redundanzen";
        let hints = extract_hints(text);
        assert_eq!(
            hints,
            vec![
                "1. Überlege, was ein Primärschlüssel ist",
                "2. Denke an Normalformen",
                "3. Prüfe Redundanzen",
            ]
        );
    }

    #[test]
    fn test_extract_sentence_hints() {
        let text = "Kurz. Denke an die Schichten des OSI-Modells! Welche Geräte arbeiten mit IP-Adressen? Ok. Router verbinden verschiedene Netze miteinander. Noch ein langer Satz, der nicht mehr gebraucht wird.";
        let hints = extract_hints(text);
        assert_eq!(hints.len(), 3);
        assert_eq!(hints[0], "Denke an die Schichten des OSI-Modells");
        assert_eq!(hints[2], "Router verbinden verschiedene Netze miteinander");
    }
}
