pub mod catalog;
pub mod question;
pub mod request;
pub mod solution;

pub use question::{
    AnswerQuestion, ChoiceQuestion, OpenQuestion, QuestionResult, RawQuestion, ResultSet,
    ShortAnswerQuestion,
};
pub use request::{
    DetailLevel, DifficultyLevel, DoubtRequest, FileHandle, GenerationRequest, Mode,
    QuestionFormat, Source, SourceKind, Upload, SOURCE_COUNT_BOUNDS, TOPIC_COUNT_BOUNDS,
};
pub use solution::Solution;
