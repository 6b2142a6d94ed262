// src/ai/prompts.rs

use crate::models::{feedback::FeedbackRequest, stats::UserStats};

/// Rubric prompt asking the model to act as an IHK examiner.
pub fn grading_prompt(req: &FeedbackRequest) -> String {
    format!(
        "Du bist ein IHK-Prüfer für Fachinformatiker. Bitte bewerte die Antwort eines Prüflings auf eine Prüfungsfrage.

Prüfungsfrage: {question}

Richtige Antwort gemäß Lösungsschlüssel: {correct}

Antwort des Prüflings: {answer}

Schwierigkeitsgrad der Frage: {difficulty}/3
Maximale Punktzahl: {max}

Bitte bewerte die Antwort nach den folgenden Kriterien:
1. Inhaltliche Richtigkeit
2. Vollständigkeit
3. Fachliche Präzision

Gib deine Bewertung im folgenden Format zurück:
- Punktzahl: X / {max}
- Feedback: Dein detailliertes Feedback zur Antwort
- Korrekt: Ja/Nein (Ist die Antwort insgesamt richtig oder falsch?)

Halte das Feedback konstruktiv und gib spezifische Hinweise, wie die Antwort verbessert werden könnte.
Beziehe dich auf konkrete fachliche Aspekte der Antwort.",
        question = req.question_text,
        correct = req.correct_answer,
        answer = req.user_answer,
        difficulty = req.difficulty,
        max = req.max_points,
    )
}

pub fn chat_prompt(message: &str) -> String {
    format!(
        "Du bist ein Assistent für IHK-Prüfungen im Bereich Fachinformatiker für Anwendungsentwicklung.
Der Nutzer bereitet sich auf diese Prüfung vor und hat folgende Frage:

{message}

Gib eine klare, hilfreiche und fachlich korrekte Antwort. Verwende Beispiele wo möglich und stelle sicher,
dass deine Erklärungen dem Niveau der IHK-Prüfung entsprechen. Beziehe dich auf relevante Konzepte
der Anwendungsentwicklung, Programmierung, Datenbanken oder IT-Systeme, je nachdem, was für die Frage relevant ist."
    )
}

/// Personalized study-tip prompt built from the learner's stats.
pub fn study_tip_prompt(stats: &UserStats, category: Option<&str>) -> String {
    let mut prompt = format!(
        "Als KI-Lernassistent für die IHK-Fachinformatiker-Prüfung, gib mir einen personalisierten Lerntipp.
Berücksichtige folgende Nutzerdaten:
- Beantwortete Fragen: {total}
- Korrekte Antworten: {correct} ({percent}%)
- Aktuelle Streak: {streak} Tage
- Gesamte Lernzeit: {hours}h {minutes}m
",
        total = stats.total_questions,
        correct = stats.correct_answers,
        percent = stats.correct_percentage(),
        streak = stats.streak_days,
        hours = stats.total_study_time / 60,
        minutes = stats.total_study_time % 60,
    );

    if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("- Aktuell lernt der Nutzer: {}\n", category));
    }

    prompt.push_str(
        "\nGib nur einen kurzen, prägnanten Tipp (max. 120 Zeichen), der motivierend und hilfreich ist. \
Formatiere die Antwort als einfachen Text ohne Einleitung oder Abschluss.",
    );
    prompt
}

/// Hint prompt that asks for guidance without revealing the answer.
pub fn hint_prompt(question_text: &str) -> String {
    format!(
        "Als Lernassistent für die IHK-Prüfungsvorbereitung, gib mir eine Hilfestellung zu folgender Frage:

\"{question_text}\"

Wichtig: Verrate NICHT die Antwort! Biete stattdessen:
1. Eine allgemeine Erklärung des Themas
2. 1-2 Hinweise, die zum Denken anregen
3. Einen Ansatz zur Lösungsfindung

Formatiere deine Antwort als einfachen Text, maximal 200 Wörter."
    )
}
