pub mod failure_log;
pub mod selector;
pub mod submitter;
pub mod validation;

pub use failure_log::FailureLog;
pub use selector::{select_follow_ups, select_follow_ups_raw, FollowUpSet};
pub use submitter::{SectionSubmitter, SubmitError};
pub use validation::{validate_answers, FieldIssue};
