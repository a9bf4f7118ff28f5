pub mod scheduler;
pub mod scoring;
pub mod state;


pub use scheduler::{
    ReviewScheduler,
    SelectionOutcome,
    WordAction,
    NEW_WORDS_PER_SESSION,
};
pub use state::{
    LearningState,
    SessionStats,
};
