// src/store.rs

//! In-memory repository for questions, users, progress, stats and levels.
//!
//! Nothing is persisted; a restart discards all imported data. One store is
//! built at startup and shared with the handlers through `AppState`.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    config::DEFAULT_USER_ID,
    models::{
        level::{
            LevelSessionOutcome, NewQuizLevel, NewUserLevelProgress, QuizLevel,
            UpdateLevelProgressRequest, UserLevelProgress, default_levels,
        },
        progress::{RecordProgressRequest, UserProgress},
        question::{BatchOutcome, NewQuestion, Question, QuestionKind, QuestionOption},
        stats::{UpdateStatsRequest, UserStats},
        user::{NewUser, User},
    },
};

pub type SharedStore = Arc<RwLock<QuestionStore>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("Level {0} is still locked")]
    Locked(i64),
}

/// Auto-increment counters, one per entity type.
#[derive(Debug)]
struct IdCounters {
    user: i64,
    question: i64,
    progress: i64,
    stats: i64,
    level: i64,
    level_progress: i64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            user: 1,
            question: 1,
            progress: 1,
            stats: 1,
            level: 1,
            level_progress: 1,
        }
    }
}

fn next(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

#[derive(Debug, Default)]
pub struct QuestionStore {
    users: BTreeMap<i64, User>,
    questions: BTreeMap<i64, Question>,
    progress: BTreeMap<i64, UserProgress>,
    stats: BTreeMap<i64, UserStats>,
    levels: BTreeMap<i64, QuizLevel>,
    level_progress: BTreeMap<i64, UserLevelProgress>,
    ids: IdCounters,
}

impl QuestionStore {
    /// An empty store without seed data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store with example questions, the default user and the default levels.
    pub fn seeded() -> Self {
        let mut store = Self::empty();
        for question in sample_questions() {
            store.create_question(question);
        }

        let user = store.create_user(NewUser {
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
        });

        for (index, level) in default_levels().into_iter().enumerate() {
            let level = store.create_level(level);
            if index == 0 {
                store.create_level_progress(NewUserLevelProgress {
                    user_id: user.id,
                    level_id: level.id,
                    questions_completed: 0,
                    questions_correct: 0,
                    is_unlocked: true,
                    is_completed: false,
                });
            }
        }

        debug_assert_eq!(user.id, DEFAULT_USER_ID);
        store
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    // --- Users ---

    pub fn get_user(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    /// Creates a user together with zeroed stats.
    pub fn create_user(&mut self, new_user: NewUser) -> User {
        let now = Utc::now();
        let user = User {
            id: next(&mut self.ids.user),
            username: new_user.username,
            email: new_user.email,
            created_at: now,
        };
        self.users.insert(user.id, user.clone());

        let stats_id = next(&mut self.ids.stats);
        self.stats.insert(stats_id, UserStats::new(stats_id, user.id, now));
        user
    }

    // --- Questions ---

    pub fn questions(&self) -> Vec<Question> {
        self.questions.values().cloned().collect()
    }

    pub fn question(&self, id: i64) -> Option<&Question> {
        self.questions.get(&id)
    }

    pub fn questions_by_category(&self, category: &str) -> Vec<Question> {
        self.filter_questions(|q| q.category == category)
    }

    pub fn questions_by_difficulty(&self, difficulty: u8) -> Vec<Question> {
        self.filter_questions(|q| q.difficulty == Some(difficulty))
    }

    /// Inclusive range; questions without a difficulty count as 1.
    pub fn questions_by_difficulty_range(&self, min: u8, max: u8) -> Vec<Question> {
        self.filter_questions(|q| (min..=max).contains(&q.effective_difficulty()))
    }

    fn filter_questions(&self, pred: impl Fn(&Question) -> bool) -> Vec<Question> {
        self.questions.values().filter(|q| pred(q)).cloned().collect()
    }

    pub fn create_question(&mut self, new_question: NewQuestion) -> Question {
        let question = new_question.into_question(next(&mut self.ids.question));
        self.questions.insert(question.id, question.clone());
        question
    }

    /// Inserts questions whose text is not stored yet, in order.
    ///
    /// A question matching an earlier one of the same batch is skipped too,
    /// since that one is already stored by the time it is compared.
    pub fn create_questions(&mut self, batch: Vec<NewQuestion>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for new_question in batch {
            let duplicate = self
                .questions
                .values()
                .any(|existing| existing.question_text == new_question.question_text);

            if duplicate {
                outcome.skipped += 1;
            } else {
                outcome.created.push(self.create_question(new_question));
            }
        }

        outcome
    }

    // --- Progress & stats ---

    pub fn progress_for_user(&self, user_id: i64) -> Vec<UserProgress> {
        self.progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Stores an answer and counts it in the user's stats, if they exist.
    pub fn record_progress(&mut self, req: RecordProgressRequest) -> UserProgress {
        let now = Utc::now();
        let progress = UserProgress {
            id: next(&mut self.ids.progress),
            user_id: req.user_id,
            question_id: req.question_id,
            correct: req.correct,
            attempts: req.attempts,
            last_attempted: now,
        };
        self.progress.insert(progress.id, progress.clone());

        if let Some(stats) = self.stats_mut(req.user_id) {
            stats.record_answer(req.correct, now);
        }

        progress
    }

    pub fn stats(&self, user_id: i64) -> Option<&UserStats> {
        self.stats.values().find(|s| s.user_id == user_id)
    }

    fn stats_mut(&mut self, user_id: i64) -> Option<&mut UserStats> {
        self.stats.values_mut().find(|s| s.user_id == user_id)
    }

    fn existing_stats_mut(&mut self, user_id: i64) -> Result<&mut UserStats, StoreError> {
        self.stats_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("User stats not found for user {}", user_id)))
    }

    pub fn update_stats(&mut self, user_id: i64, updates: UpdateStatsRequest) -> Result<UserStats, StoreError> {
        let stats = self.existing_stats_mut(user_id)?;
        stats.apply(updates, Utc::now());
        Ok(stats.clone())
    }

    pub fn add_study_time(&mut self, user_id: i64, minutes: u32) -> Result<UserStats, StoreError> {
        let stats = self.existing_stats_mut(user_id)?;
        stats.add_study_time(minutes, Utc::now());
        Ok(stats.clone())
    }

    pub fn reset_stats(&mut self, user_id: i64) -> Result<UserStats, StoreError> {
        let stats = self.existing_stats_mut(user_id)?;
        stats.reset(Utc::now());
        Ok(stats.clone())
    }

    // --- Levels ---

    /// All levels sorted by their `order`.
    pub fn levels(&self) -> Vec<QuizLevel> {
        let mut levels: Vec<QuizLevel> = self.levels.values().cloned().collect();
        levels.sort_by_key(|l| l.order);
        levels
    }

    pub fn level(&self, id: i64) -> Option<&QuizLevel> {
        self.levels.get(&id)
    }

    pub fn create_level(&mut self, new_level: NewQuizLevel) -> QuizLevel {
        let level = new_level.into_level(next(&mut self.ids.level), Utc::now());
        self.levels.insert(level.id, level.clone());
        level
    }

    // --- Level progress ---

    pub fn level_progress_for_user(&self, user_id: i64) -> Vec<UserLevelProgress> {
        self.level_progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn level_progress(&self, user_id: i64, level_id: i64) -> Option<&UserLevelProgress> {
        self.level_progress
            .values()
            .find(|p| p.user_id == user_id && p.level_id == level_id)
    }

    fn level_progress_id(&self, user_id: i64, level_id: i64) -> Option<i64> {
        self.level_progress(user_id, level_id).map(|p| p.id)
    }

    pub fn create_level_progress(&mut self, new_progress: NewUserLevelProgress) -> UserLevelProgress {
        let progress = new_progress.into_progress(next(&mut self.ids.level_progress), Utc::now());
        self.level_progress.insert(progress.id, progress.clone());
        progress
    }

    /// Partial update; a missing row is an error, never an upsert.
    pub fn update_level_progress(
        &mut self,
        user_id: i64,
        level_id: i64,
        updates: UpdateLevelProgressRequest,
    ) -> Result<UserLevelProgress, StoreError> {
        let id = self.level_progress_id(user_id, level_id).ok_or_else(|| {
            StoreError::NotFound(format!(
                "User level progress not found for user {} and level {}",
                user_id, level_id
            ))
        })?;

        let progress = self
            .level_progress
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Level progress {} vanished", id)))?;
        progress.apply(updates, Utc::now());
        Ok(progress.clone())
    }

    /// Books a finished quiz session at a level.
    ///
    /// The level must be unlocked for the user. A missing row is created on
    /// first play only for an entry level (first by order or without an
    /// unlock requirement). Completion is recomputed and the next level
    /// unlocks once enough questions were completed here.
    pub fn record_level_session(
        &mut self,
        user_id: i64,
        level_id: i64,
        answered: u32,
        correct: u32,
    ) -> Result<LevelSessionOutcome, StoreError> {
        let level = self
            .levels
            .get(&level_id)
            .ok_or_else(|| StoreError::NotFound(format!("Level {} not found", level_id)))?;
        let is_entry_level = level.required_questions_to_unlock == 0
            || self.levels.values().all(|other| other.order >= level.order);
        let now = Utc::now();

        let existing = self
            .level_progress(user_id, level_id)
            .map(|row| (row.id, row.is_unlocked));
        let id = match existing {
            Some((_, false)) => return Err(StoreError::Locked(level_id)),
            Some((id, true)) => id,
            None if is_entry_level => self.create_unlocked_progress(user_id, level_id, now).id,
            None => return Err(StoreError::Locked(level_id)),
        };

        let progress = self
            .level_progress
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Level progress {} vanished", id)))?;
        progress.questions_completed = progress.questions_completed.saturating_add(answered);
        progress.questions_correct = progress.questions_correct.saturating_add(correct);
        progress.is_completed = progress.meets_completion();
        progress.last_played = now;
        let progress = progress.clone();

        let unlocked_level_id = self.unlock_next_level(user_id, level_id, progress.questions_completed, now);

        Ok(LevelSessionOutcome {
            progress,
            unlocked_level_id,
        })
    }

    fn create_unlocked_progress(&mut self, user_id: i64, level_id: i64, now: DateTime<Utc>) -> UserLevelProgress {
        let progress = UserLevelProgress {
            id: next(&mut self.ids.level_progress),
            user_id,
            level_id,
            questions_completed: 0,
            questions_correct: 0,
            is_unlocked: true,
            is_completed: false,
            last_played: now,
        };
        self.level_progress.insert(progress.id, progress.clone());
        progress
    }

    /// Returns the id of the level that became unlocked, if any.
    fn unlock_next_level(&mut self, user_id: i64, level_id: i64, completed: u32, now: DateTime<Utc>) -> Option<i64> {
        let current_order = self.levels.get(&level_id)?.order;
        let next_level = self
            .levels
            .values()
            .filter(|l| l.order > current_order)
            .min_by_key(|l| l.order)?;

        if completed < next_level.required_questions_to_unlock {
            return None;
        }
        let next_id = next_level.id;

        match self.level_progress_id(user_id, next_id) {
            Some(id) => {
                let row = self.level_progress.get_mut(&id)?;
                if row.is_unlocked {
                    return None;
                }
                row.is_unlocked = true;
                row.last_played = now;
            }
            None => {
                self.create_unlocked_progress(user_id, next_id, now);
            }
        }

        tracing::info!("User {} unlocked level {}", user_id, next_id);
        Some(next_id)
    }
}

fn options(texts: [&str; 4]) -> Vec<QuestionOption> {
    texts.into_iter().map(QuestionOption::new).collect()
}

fn sample_questions() -> Vec<NewQuestion> {
    let question = |category: &str, text: &str, opts: [&str; 4], correct: usize, explanation: &str, difficulty: u8| {
        NewQuestion {
            category: category.to_string(),
            question_text: text.to_string(),
            options: options(opts),
            correct_answer: correct,
            explanation: Some(explanation.to_string()),
            difficulty: Some(difficulty),
            kind: QuestionKind::MultipleChoice,
            points: None,
            original_task: None,
        }
    };

    vec![
        question(
            "Anwendungsentwicklung",
            "Welche der folgenden Aussagen beschreibt das Konzept einer RESTful API korrekt?",
            [
                "RESTful APIs verwenden Ressourcen-orientierte URLs und HTTP-Methoden wie GET, POST, PUT und DELETE, um CRUD-Operationen durchzuführen.",
                "Eine RESTful API dient ausschließlich zum Streamen von Videoinhalten und benötigt immer einen WebSocket zur Kommunikation.",
                "RESTful APIs sind zustandslos, nutzen standardisierte HTTP-Methoden, verwenden unterschiedliche URIs für verschiedene Ressourcen und können Daten in unterschiedlichen Formaten wie JSON oder XML zurückgeben.",
                "REST ist ein Protokoll zur Verschlüsselung von Datenbankinhalten und wird nur für interne Netzwerke verwendet.",
            ],
            2,
            "Eine RESTful API ist ein Architekturstil für verteilte Systeme: zustandslos, mit standardisierten HTTP-Methoden, ressourcenorientierten URLs und verschiedenen Datenformaten.",
            2,
        ),
        question(
            "Datenbanken",
            "Was sind die ACID-Eigenschaften in Datenbanksystemen?",
            [
                "Algorithm, Computation, Integration, Distribution",
                "Atomicity, Consistency, Isolation, Durability",
                "Authentication, Caching, Indexing, Denormalization",
                "Allocation, Compression, Iteration, Deletion",
            ],
            1,
            "ACID steht für Atomarität, Konsistenz, Isoliertheit und Dauerhaftigkeit. Diese Eigenschaften garantieren die zuverlässige Verarbeitung von Transaktionen.",
            1,
        ),
        question(
            "Netzwerktechnik",
            "Welche Netzwerkkomponente arbeitet auf der OSI-Schicht 3 (Vermittlungsschicht)?",
            ["Switch", "Hub", "Router", "Repeater"],
            2,
            "Ein Router arbeitet auf der Vermittlungsschicht und leitet Pakete anhand von IP-Adressen zwischen Netzwerken weiter.",
            2,
        ),
        question(
            "Programmierung",
            "Was ist ein Lambda-Ausdruck in der Programmierung?",
            [
                "Ein Protokoll zur Nachrichtenübermittlung zwischen Netzwerkdiensten",
                "Ein grafisches Benutzeroberflächen-Element",
                "Eine anonyme Funktion, die inline definiert werden kann",
                "Ein spezieller Datentyp für Dezimalzahlen",
            ],
            2,
            "Ein Lambda-Ausdruck ist eine anonyme Funktion, die als Ausdruck an Ort und Stelle formuliert wird.",
            2,
        ),
        question(
            "Betriebssysteme",
            "Was ist der Hauptunterschied zwischen Prozessen und Threads?",
            [
                "Threads teilen sich einen gemeinsamen Adressraum, während Prozesse voneinander isoliert sind",
                "Prozesse können nur sequentiell ausgeführt werden, Threads immer parallel",
                "Threads können nur in interpreted Sprachen verwendet werden, Prozesse in kompilierten",
                "Prozesse sind ein veraltetes Konzept, moderne Betriebssysteme verwenden nur noch Threads",
            ],
            0,
            "Threads eines Prozesses teilen sich den Adressraum, Prozesse haben voneinander isolierte Speicherbereiche.",
            3,
        ),
    ]
}
