//! Vote ledger planning.
//!
//! Questions and answers each carry two voter sets, `upvotes` and
//! `downvotes`. A voter may appear in at most one of them. A vote request
//! names a direction and the voter's current stance as seen by the caller;
//! [`VotePlan::for_vote`] turns that into the single set of removals and
//! additions the store applies in one row update.
//!
//! | direction | has_up_voted | has_down_voted | effect                      |
//! |-----------|--------------|----------------|-----------------------------|
//! | up        | true         | -              | remove from upvotes         |
//! | up        | false        | true           | move downvotes -> upvotes   |
//! | up        | false        | false          | add to upvotes              |
//! | down      | -            | true           | remove from downvotes       |
//! | down      | true         | false          | move upvotes -> downvotes   |
//! | down      | false        | false          | add to downvotes            |

use serde::{Deserialize, Serialize};

/// Which way a vote is cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// The caller's view of a voter's membership before the vote.
///
/// The ledger does not re-read this from storage; callers that loaded the
/// item can derive it with [`VoteSets::prior_for`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorVote {
    #[serde(default)]
    pub has_up_voted: bool,
    #[serde(default)]
    pub has_down_voted: bool,
}

/// Set mutations for one vote, applied together in a single row update.
///
/// Additions never duplicate a voter already present, and adding a voter to
/// one set always clears them from the other, so a stale prior state cannot
/// leave the voter in both sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VotePlan {
    pub remove_up: bool,
    pub remove_down: bool,
    pub add_up: bool,
    pub add_down: bool,
}

impl VotePlan {
    /// Compute the mutation for `direction` given the voter's prior stance.
    pub fn for_vote(direction: VoteDirection, prior: PriorVote) -> Self {
        match direction {
            VoteDirection::Up => {
                if prior.has_up_voted {
                    Self {
                        remove_up: true,
                        ..Self::default()
                    }
                } else if prior.has_down_voted {
                    Self {
                        remove_down: true,
                        add_up: true,
                        ..Self::default()
                    }
                } else {
                    Self {
                        add_up: true,
                        ..Self::default()
                    }
                }
            }
            VoteDirection::Down => {
                if prior.has_down_voted {
                    Self {
                        remove_down: true,
                        ..Self::default()
                    }
                } else if prior.has_up_voted {
                    Self {
                        remove_up: true,
                        add_down: true,
                        ..Self::default()
                    }
                } else {
                    Self {
                        add_down: true,
                        ..Self::default()
                    }
                }
            }
        }
    }

    /// Whether this plan withdraws a vote without casting a new one.
    pub fn is_retraction(&self) -> bool {
        !self.add_up && !self.add_down
    }
}

/// A voter's resulting stance on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Up,
    Down,
    None,
}

/// In-memory pair of voter sets with the same semantics as the store update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteSets<V> {
    upvotes: Vec<V>,
    downvotes: Vec<V>,
}

impl<V: Copy + Eq> VoteSets<V> {
    pub fn new(upvotes: Vec<V>, downvotes: Vec<V>) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn upvotes(&self) -> &[V] {
        &self.upvotes
    }

    pub fn downvotes(&self) -> &[V] {
        &self.downvotes
    }

    /// The voter's current membership, in the shape vote requests expect.
    pub fn prior_for(&self, voter: V) -> PriorVote {
        PriorVote {
            has_up_voted: self.upvotes.contains(&voter),
            has_down_voted: self.downvotes.contains(&voter),
        }
    }

    pub fn stance_of(&self, voter: V) -> Stance {
        let prior = self.prior_for(voter);
        match (prior.has_up_voted, prior.has_down_voted) {
            (true, _) => Stance::Up,
            (false, true) => Stance::Down,
            (false, false) => Stance::None,
        }
    }

    /// Apply `plan` for `voter` with the same rules as the store update.
    pub fn apply(&mut self, voter: V, plan: &VotePlan) {
        if plan.remove_up || plan.add_down {
            self.upvotes.retain(|v| *v != voter);
        }
        if plan.remove_down || plan.add_up {
            self.downvotes.retain(|v| *v != voter);
        }
        if plan.add_up && !self.upvotes.contains(&voter) {
            self.upvotes.push(voter);
        }
        if plan.add_down && !self.downvotes.contains(&voter) {
            self.downvotes.push(voter);
        }
    }

    /// Cast a vote using the stance recorded in these sets as the prior state.
    pub fn vote(&mut self, voter: V, direction: VoteDirection) -> VotePlan {
        let plan = VotePlan::for_vote(direction, self.prior_for(voter));
        self.apply(voter, &plan);
        plan
    }
}
