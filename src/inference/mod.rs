pub mod client;
pub mod http;

pub use client::{
    with_timeout, DecisionGameContext, DecisionPrompt, DecisionReply, DialoguePrompt, DialogueReply,
    InferenceClient, InferenceError, ProfileSummary,
};
pub use http::HttpInferenceClient;
