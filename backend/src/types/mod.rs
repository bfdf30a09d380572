mod id;

pub use id::{FocusSessionId, StudySessionId, TaskId, UserId, DEFAULT_USER_ID};
