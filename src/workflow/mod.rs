pub mod action_ctx;
pub mod generation_flow;

pub use action_ctx::ActionCtx;
pub use generation_flow::GenerationFlow;
