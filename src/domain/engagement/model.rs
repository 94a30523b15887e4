//! Like / dislike / block state machine
//!
//! A user holds at most one reaction per article. Requesting the reaction
//! the user already holds clears it; requesting the other one replaces it.
//! Blocking is a separate flag that never touches the reaction.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Reaction::Like),
            "dislike" => Some(Reaction::Dislike),
            _ => None,
        }
    }
}

/// What a toggle did, as reported back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementAction {
    Liked,
    Unliked,
    Disliked,
    Undisliked,
    Blocked,
    Unblocked,
}

impl EngagementAction {
    pub fn message(&self) -> &'static str {
        match self {
            EngagementAction::Liked => "Article liked successfully",
            EngagementAction::Unliked => "Article unliked successfully",
            EngagementAction::Disliked => "Article disliked successfully",
            EngagementAction::Undisliked => "Article undisliked successfully",
            EngagementAction::Blocked => "Article blocked successfully",
            EngagementAction::Unblocked => "Article unblocked successfully",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementAction::Liked => "liked",
            EngagementAction::Unliked => "unliked",
            EngagementAction::Disliked => "disliked",
            EngagementAction::Undisliked => "undisliked",
            EngagementAction::Blocked => "blocked",
            EngagementAction::Unblocked => "unblocked",
        }
    }
}

impl fmt::Display for EngagementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying a reaction request to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionTransition {
    pub next: Option<Reaction>,
    pub action: EngagementAction,
}

pub fn toggle_reaction(current: Option<Reaction>, requested: Reaction) -> ReactionTransition {
    if current == Some(requested) {
        let action = match requested {
            Reaction::Like => EngagementAction::Unliked,
            Reaction::Dislike => EngagementAction::Undisliked,
        };
        return ReactionTransition { next: None, action };
    }

    let action = match requested {
        Reaction::Like => EngagementAction::Liked,
        Reaction::Dislike => EngagementAction::Disliked,
    };
    ReactionTransition {
        next: Some(requested),
        action,
    }
}

/// Returns the new blocked flag and the matching action.
pub fn toggle_block(currently_blocked: bool) -> (bool, EngagementAction) {
    if currently_blocked {
        (false, EngagementAction::Unblocked)
    } else {
        (true, EngagementAction::Blocked)
    }
}
