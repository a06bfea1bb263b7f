//! Scripted backend for tests and offline runs.
//!
//! Responses are consumed in order; every request is recorded so tests can
//! inspect what the gateway sent.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::backend::{
    BackendError, BackendResult, GenerateRequest, GenerateResponse, GenerationBackend,
};

/// One scripted reply.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Successful response.
    Ok(GenerateResponse),
    /// API failure with the given status and message.
    ApiError {
        /// HTTP status.
        status: u16,
        /// Error message.
        message: String,
    },
    /// Successful call with no usable candidate.
    Empty,
}

/// A backend that replays scripted replies.
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockBackend {
    /// Backend with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Ok(GenerateResponse::text(text)));
        self
    }

    /// Queue an audio reply.
    #[must_use]
    pub fn with_audio(self, base64_pcm: impl Into<String>) -> Self {
        self.push(MockReply::Ok(GenerateResponse::audio(
            "audio/L16;codec=pcm;rate=24000",
            base64_pcm,
        )));
        self
    }

    /// Queue an API error reply.
    #[must_use]
    pub fn with_error(self, status: u16, message: impl Into<String>) -> Self {
        self.push(MockReply::ApiError {
            status,
            message: message.into(),
        });
        self
    }

    /// Queue an empty-candidate reply.
    #[must_use]
    pub fn with_empty(self) -> Self {
        self.push(MockReply::Empty);
        self
    }

    /// Queue any reply.
    pub fn push(&self, reply: MockReply) {
        self.replies.lock().push_back(reply);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> BackendResult<GenerateResponse> {
        self.requests.lock().push(request.clone());
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(MockReply::Ok(response)) => Ok(response),
            Some(MockReply::ApiError { status, message }) => Err(BackendError::Api {
                status,
                message,
                code: None,
            }),
            Some(MockReply::Empty) => Err(BackendError::EmptyCandidate { reason: None }),
            None => Err(BackendError::Other {
                message: "mock backend has no scripted reply".into(),
            }),
        }
    }
}
