//! Turn orchestration over a fixed three-slot answer ring.

use bardo_client::{ChatBackend, ClientError, MAX_ANSWERS, SessionReference};
use tracing::{debug, info};

/// One slot of the answer ring: candidate content plus the reference
/// components needed to continue that specific branch.
///
/// All three slots always exist; unused ones are empty-content placeholders
/// left over from an earlier turn. `Conversation::answer_count` bounds which
/// indices are meaningful.
#[derive(Debug, Clone, Default)]
pub struct AnswerVariant {
    pub content: String,
    pub conversation_id: String,
    pub response_id: String,
    pub choice_id: String,
}

impl AnswerVariant {
    /// The reference continuing this variant's branch.
    #[must_use]
    pub fn reference(&self) -> SessionReference {
        SessionReference::new(
            self.conversation_id.clone(),
            self.response_id.clone(),
            self.choice_id.clone(),
        )
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A single logical conversation with the backend.
///
/// Single-writer: a handle must not be driven by two turns at once. The
/// handle itself takes no locks; the session store serializes access per
/// handle, and distinct handles are fully independent.
pub struct Conversation<B> {
    backend: B,
    variants: [AnswerVariant; MAX_ANSWERS],
    current: usize,
    num_answers: usize,
}

impl<B> Conversation<B>
where
    B: ChatBackend,
{
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            variants: Default::default(),
            current: 0,
            num_answers: 0,
        }
    }

    /// Ask one question, continuing the currently selected branch.
    ///
    /// The cursor is reset to slot 0 before any network I/O, so a failed
    /// turn leaves the state pointing at slot 0 of the previous turn's
    /// answers. The variants themselves are only overwritten after a fully
    /// successful decode; every failure leaves them stale but usable.
    pub async fn ask(&mut self, prompt: &str) -> Result<(), ClientError> {
        // Capture the selected branch before the cursor reset.
        let reference = self.variants[self.current].reference();
        self.current = 0;

        debug!(
            "asking on {} branch",
            if reference.is_new() { "new" } else { "existing" }
        );

        let turn = self.backend.ask(prompt, &reference).await?;

        let count = turn.answers.len().min(MAX_ANSWERS);
        // Conversation/response identity is shared across all variants;
        // only the per-variant choice id differs.
        for variant in &mut self.variants {
            variant.conversation_id = turn.conversation_id.clone();
            variant.response_id = turn.response_id.clone();
        }
        for (slot, answer) in self.variants.iter_mut().zip(turn.answers) {
            slot.choice_id = answer.choice_id;
            slot.content = answer.content;
        }
        self.num_answers = count;

        info!("turn succeeded with {count} answer(s)");
        Ok(())
    }

    /// Content of the currently selected variant.
    #[must_use]
    pub fn current_answer(&self) -> &str {
        &self.variants[self.current].content
    }

    /// Move the cursor forward on the ring. Independent of `answer_count`;
    /// callers consult the count to know which indices are meaningful.
    pub const fn next(&mut self) {
        self.current = (self.current + 1) % MAX_ANSWERS;
    }

    /// Move the cursor backward on the ring.
    pub const fn prev(&mut self) {
        self.current = (self.current + MAX_ANSWERS - 1) % MAX_ANSWERS;
    }

    /// Advance the cursor and return the newly selected answer.
    pub fn next_answer(&mut self) -> &str {
        self.next();
        self.current_answer()
    }

    /// Step the cursor back and return the newly selected answer.
    pub fn prev_answer(&mut self) -> &str {
        self.prev();
        self.current_answer()
    }

    /// Start a logically new conversation on the same handle: clear all
    /// slots and put the cursor back at 0. Credentials and the backend are
    /// reused.
    pub fn reset(&mut self) {
        for variant in &mut self.variants {
            variant.clear();
        }
        self.current = 0;
        self.num_answers = 0;
        info!("conversation reset");
    }

    /// Answers produced by the most recent successful turn.
    #[must_use]
    pub const fn answer_count(&self) -> usize {
        self.num_answers
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// The variant ring, stale slots included.
    #[must_use]
    pub const fn variants(&self) -> &[AnswerVariant; MAX_ANSWERS] {
        &self.variants
    }
}
