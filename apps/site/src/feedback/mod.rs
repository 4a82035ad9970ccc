// Feedback intake: validation, the submission pipeline, and its HTTP handlers.
// Rows only ever reach the store through `pipeline::submit_feedback`.

pub mod handlers;
pub mod pipeline;
pub mod validation;
