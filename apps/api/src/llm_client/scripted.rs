// In-memory gateway for tests: replays queued completions and records prompts.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionGateway, LlmError};

#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<(String, u32)>>,
}

impl ScriptedGateway {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Some(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A gateway whose every call fails with `LlmError::EmptyResponse`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    pub fn last_max_tokens(&self) -> Option<u32> {
        self.prompts.lock().unwrap().last().map(|(_, t)| *t)
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or(LlmError::EmptyResponse)
    }
}
