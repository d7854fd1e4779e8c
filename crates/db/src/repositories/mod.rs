//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod answer_repo;
pub mod interaction_repo;
pub mod question_repo;
pub mod tag_repo;
pub mod user_repo;
pub mod vote_repo;

pub use answer_repo::AnswerRepo;
pub use interaction_repo::InteractionRepo;
pub use question_repo::QuestionRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
pub use vote_repo::{VoteRepo, VoteTarget};
