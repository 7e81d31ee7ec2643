pub mod screen_ctx;
pub mod screen_flow;

pub use screen_ctx::ScreenCtx;
pub use screen_flow::{form_for, FlowError, ScreenController, ScreenState, SubmitOutcome};
