pub mod errors;
pub mod models;

pub use errors::CihuiError;
pub use models::{
    LearningMetadata,
    WordRecord,
    MAX_STRENGTH,
};
