//! Id generation for entities synthesized by the engine
//!
//! The engine never reads a clock or a random source on its own; callers hand
//! it an [`IdGenerator`] so that tests can assert exact ids.

use uuid::Uuid;

/// Source of unique id tokens
pub trait IdGenerator {
    /// Produce the next token. Tokens must be unique for the generator's lifetime.
    fn next_token(&mut self) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_token(&mut self) -> String {
        (**self).next_token()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_token(&mut self) -> String {
        (**self).next_token()
    }
}

/// Monotonic counter: "1", "2", "3", ...
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `start` instead of 1
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: start.saturating_sub(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_token(&mut self) -> String {
        self.next += 1;
        self.next.to_string()
    }
}

/// Random v4 UUIDs in simple (hyphen-less) form
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_token(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
