pub mod quizzes;
pub mod stats;
pub mod users;
