/// Iterator state definitions for tracking crawl progress
///
/// This module defines the lifecycle a crawl iterator moves through, and which
/// moves between states are legal.
use crate::ItemizeError;
use std::fmt;

/// Represents the current state of a crawl iterator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IteratorState {
    // ===== Active States =====
    /// Nothing fetched yet; the frontier holds only the root
    Idle,

    /// A fetch is in flight or about to start
    Advancing,

    // ===== Terminal States =====
    /// Frontier drained; no more items will ever be produced
    Exhausted,

    /// Terminated by the caller; no further activity permitted
    Closed,
}

impl IteratorState {
    /// Returns true if this is a terminal state (no further items)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Closed)
    }

    /// Returns true if the iterator may still fetch pages
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Idle | Self::Advancing)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// Closing is always allowed and idempotent. Exhaustion is idempotent but
    /// can never be left except by closing.
    pub fn can_transition_to(&self, next: Self) -> bool {
        match (*self, next) {
            (_, Self::Closed) => true,
            (Self::Closed, _) => false,
            (Self::Exhausted, Self::Exhausted) => true,
            (Self::Exhausted, _) => false,
            (Self::Idle, Self::Advancing) | (Self::Idle, Self::Exhausted) => true,
            (Self::Advancing, Self::Advancing) | (Self::Advancing, Self::Exhausted) => true,
            (_, Self::Idle) => false,
        }
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition_to(&mut self, next: Self) -> Result<(), ItemizeError> {
        if !self.can_transition_to(next) {
            return Err(ItemizeError::InvalidTransition {
                from: *self,
                to: next,
            });
        }

        *self = next;
        Ok(())
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Advancing => "advancing",
            Self::Exhausted => "exhausted",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IteratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
