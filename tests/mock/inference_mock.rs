use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use houseguest_cognition::inference::{
    DecisionPrompt, DecisionReply, DialoguePrompt, DialogueReply, InferenceClient, InferenceError,
};

pub struct MockInferenceClient {
    decision_response: Result<DecisionReply, InferenceError>,
    dialogue_response: Result<DialogueReply, InferenceError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_decision_prompt: Mutex<Option<DecisionPrompt>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            decision_response: Err(InferenceError::Network("connection refused".to_string())),
            dialogue_response: Err(InferenceError::Network("connection refused".to_string())),
            delay: None,
            calls: AtomicUsize::new(0),
            last_decision_prompt: Mutex::new(None),
        }
    }

    pub fn with_decision(mut self, selected_option: Option<&str>, reasoning: &str) -> Self {
        self.decision_response = Ok(DecisionReply {
            selected_option: selected_option.map(str::to_string),
            reasoning: reasoning.to_string(),
        });
        self
    }

    pub fn with_dialogue(mut self, text: &str) -> Self {
        self.dialogue_response = Ok(DialogueReply {
            generated_text: text.to_string(),
        });
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn unreachable() -> Self {
        Self::new()
    }

    pub fn server_error() -> Self {
        let mut mock = Self::new();
        let error = InferenceError::Api {
            status: 500,
            message: "internal error".to_string(),
        };
        mock.decision_response = Err(error.clone());
        mock.dialogue_response = Err(error);
        mock
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_decision_prompt(&self) -> Option<DecisionPrompt> {
        self.last_decision_prompt.lock().unwrap().clone()
    }

    async fn wait(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn decide(&self, prompt: &DecisionPrompt) -> Result<DecisionReply, InferenceError> {
        *self.last_decision_prompt.lock().unwrap() = Some(prompt.clone());
        self.wait().await;
        self.decision_response.clone()
    }

    async fn speak(&self, _prompt: &DialoguePrompt) -> Result<DialogueReply, InferenceError> {
        self.wait().await;
        self.dialogue_response.clone()
    }
}
