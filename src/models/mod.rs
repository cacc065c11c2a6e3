mod question;
mod score;
mod taxonomy;
mod topic;

pub use question::{Choice, Question};
pub use score::ScoreRecord;
pub use taxonomy::CourseTopicMap;
pub use topic::TopicKey;
