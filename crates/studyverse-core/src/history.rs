//! In-memory session history.
//!
//! Each feature keeps its own [`BoundedHistory`]: new entries are prepended and
//! the list is truncated to the most recent [`HISTORY_CAPACITY`] items. The
//! oldest entry is dropped silently. There is no persistence and no
//! deduplication; everything is lost when the owning session is dropped.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ChatTurn;
use crate::context::StudyContext;
use crate::ids::ConversationId;
use crate::quiz::QuizQuestion;

/// Default number of entries kept per list.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list with a fixed capacity.
#[derive(Clone, Debug)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Empty list with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Empty list with a smaller capacity, clamped to `1..=HISTORY_CAPACITY`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, HISTORY_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, dropping the oldest one past capacity.
    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Alias of [`len`](Self::len) used by the dashboard.
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }
}

impl<T> Default for BoundedHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A generated summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    /// Context the summary was generated from.
    pub context: StudyContext,
    /// Markdown summary.
    pub summary: String,
    /// When the summary was generated.
    pub created_at: DateTime<Utc>,
}

/// A generated quiz.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    /// Context the quiz was generated from.
    pub context: StudyContext,
    /// Generated questions.
    pub questions: Vec<QuizQuestion>,
    /// When the quiz was generated.
    pub created_at: DateTime<Utc>,
}

/// A generated essay outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRecord {
    /// Context the outline was generated from.
    pub context: StudyContext,
    /// Markdown outline.
    pub outline: String,
    /// When the outline was generated.
    pub created_at: DateTime<Utc>,
}

/// A finished tutor conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorConversation {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Ordered transcript.
    pub conversation: Vec<ChatTurn>,
    /// When the conversation was closed.
    pub created_at: DateTime<Utc>,
}

/// Entry counts shown on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    /// Stored summaries.
    pub summaries: usize,
    /// Stored quizzes.
    pub quizzes: usize,
    /// Stored outlines.
    pub outlines: usize,
    /// Stored tutor conversations.
    pub tutor_conversations: usize,
}

/// The four per-feature history lists of one session.
#[derive(Clone, Debug, Default)]
pub struct HistoryStore {
    summaries: BoundedHistory<SummaryRecord>,
    quizzes: BoundedHistory<QuizRecord>,
    outlines: BoundedHistory<OutlineRecord>,
    conversations: BoundedHistory<TutorConversation>,
}

impl HistoryStore {
    /// Store with the default capacity per list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a custom capacity per list.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            summaries: BoundedHistory::with_capacity(capacity),
            quizzes: BoundedHistory::with_capacity(capacity),
            outlines: BoundedHistory::with_capacity(capacity),
            conversations: BoundedHistory::with_capacity(capacity),
        }
    }

    /// Record a summary.
    pub fn push_summary(&mut self, context: StudyContext, summary: String) {
        self.summaries.push(SummaryRecord {
            context,
            summary,
            created_at: Utc::now(),
        });
    }

    /// Record a quiz.
    pub fn push_quiz(&mut self, context: StudyContext, questions: Vec<QuizQuestion>) {
        self.quizzes.push(QuizRecord {
            context,
            questions,
            created_at: Utc::now(),
        });
    }

    /// Record an outline.
    pub fn push_outline(&mut self, context: StudyContext, outline: String) {
        self.outlines.push(OutlineRecord {
            context,
            outline,
            created_at: Utc::now(),
        });
    }

    /// Record a tutor transcript. Empty transcripts are ignored.
    ///
    /// Returns whether an entry was stored.
    pub fn push_conversation(&mut self, id: ConversationId, conversation: Vec<ChatTurn>) -> bool {
        if conversation.is_empty() {
            return false;
        }
        self.conversations.push(TutorConversation {
            id,
            conversation,
            created_at: Utc::now(),
        });
        true
    }

    /// Summary history.
    pub fn summaries(&self) -> &BoundedHistory<SummaryRecord> {
        &self.summaries
    }

    /// Quiz history.
    pub fn quizzes(&self) -> &BoundedHistory<QuizRecord> {
        &self.quizzes
    }

    /// Outline history.
    pub fn outlines(&self) -> &BoundedHistory<OutlineRecord> {
        &self.outlines
    }

    /// Tutor conversation history.
    pub fn conversations(&self) -> &BoundedHistory<TutorConversation> {
        &self.conversations
    }

    /// Counts for the dashboard tiles.
    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            summaries: self.summaries.count(),
            quizzes: self.quizzes.count(),
            outlines: self.outlines.count(),
            tutor_conversations: self.conversations.count(),
        }
    }
}
