pub mod core;
pub mod library;
pub mod persistence;
pub mod review;

pub use crate::core::{
    CihuiError,
    LearningMetadata,
    WordRecord,
};
pub use crate::library::WordLibrary;
pub use crate::review::{
    ReviewScheduler,
    SelectionOutcome,
    WordAction,
};
