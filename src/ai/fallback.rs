// src/ai/fallback.rs

/// Canned hints per category, shown when the model cannot be reached.
pub fn fallback_hints(category: &str) -> Vec<String> {
    let hints: [&str; 3] = match category {
        "Anwendungsentwicklung" => [
            "Überlege, welche Konzepte der Softwareentwicklung hier relevant sein könnten.",
            "Denke an die grundlegenden Prinzipien der Programmierung.",
            "Beziehe dich auf den Entwicklungsprozess von Software.",
        ],
        "Netzwerktechnik" => [
            "Denke an die verschiedenen Netzwerkschichten und ihre Funktionen.",
            "Überlege, welche Protokolle hier relevant sein könnten.",
            "Beziehe Netzwerktopologien und ihre Eigenschaften ein.",
        ],
        "Datenbanken" => [
            "Überlege, welche Datenbankkonzepte hier eine Rolle spielen könnten.",
            "Denke an die Normalformen und Datenbankdesign.",
            "Beziehe SQL-Konzepte und Abfragetypen ein.",
        ],
        _ => [
            "Analysiere die Frage sorgfältig und identifiziere die Schlüsselkonzepte.",
            "Überlege, welche grundlegenden Prinzipien hier angewendet werden könnten.",
            "Versuche, das Problem in kleinere Teilaspekte zu zerlegen.",
        ],
    };
    hints.iter().map(|h| h.to_string()).collect()
}
