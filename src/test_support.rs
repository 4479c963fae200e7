//! In-process fakes for the collaborator traits.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::actions::{ActionError, EnvironmentControl, HueSat, PowerState};
use crate::llm::{ChatRequest, LlmError, LlmProvider};
use crate::stt::{SttEngine, SttError};
use crate::tts::{TtsError, TtsProvider};

// ── LLM ────────────────────────────────────────────────

/// Replies from a script, one per call. An exhausted script fails the call.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
    panics: bool,
}

impl ScriptedLlm {
    pub fn replying<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn slow(delay: Duration, reply: &str) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying([reply])
        }
    }

    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.panics {
            panic!("model client exploded");
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.ok_or_else(|| LlmError::EmptyResponse("scripted".to_string()))
    }

    fn id(&self) -> &str {
        "scripted"
    }
}

// ── Environment ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum EnvCall {
    Light {
        name: String,
        power: PowerState,
        brightness: Option<u8>,
        color: Option<HueSat>,
    },
    Tv(String),
    Status,
}

#[derive(Default)]
pub struct RecordingEnvironment {
    calls: Mutex<Vec<EnvCall>>,
    fail_tv: bool,
    panic_on_status: bool,
}

impl RecordingEnvironment {
    pub fn failing_tv() -> Self {
        Self {
            fail_tv: true,
            ..Self::default()
        }
    }

    pub fn panicking_status() -> Self {
        Self {
            panic_on_status: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<EnvCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: EnvCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EnvironmentControl for RecordingEnvironment {
    async fn control_light(
        &self,
        name: &str,
        power: PowerState,
        brightness: Option<u8>,
        color: Option<HueSat>,
    ) -> Result<String, ActionError> {
        self.record(EnvCall::Light {
            name: name.to_string(),
            power,
            brightness,
            color,
        });
        Ok(format!("light {} {}", name, power))
    }

    async fn control_tv(&self, raw_line: &str) -> Result<String, ActionError> {
        self.record(EnvCall::Tv(raw_line.to_string()));
        if self.fail_tv {
            return Err(ActionError::Unavailable("tv offline".to_string()));
        }
        Ok(format!("tv {}", raw_line))
    }

    async fn get_status(&self) -> Result<String, ActionError> {
        self.record(EnvCall::Status);
        if self.panic_on_status {
            panic!("status sensor exploded");
        }
        Ok("all devices nominal".to_string())
    }

    fn id(&self) -> &str {
        "recording"
    }
}

// ── Speech ─────────────────────────────────────────────

pub enum FakeTranscript {
    Text(String),
    Fail,
}

pub struct FakeStt {
    transcript: FakeTranscript,
    calls: Mutex<Vec<(usize, String)>>,
}

impl FakeStt {
    pub fn hearing(text: &str) -> Self {
        Self {
            transcript: FakeTranscript::Text(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: FakeTranscript::Fail,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// (audio length, format) per call.
    pub fn calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SttEngine for FakeStt {
    fn id(&self) -> String {
        "fake_stt".to_string()
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        format: &str,
        _language: Option<&str>,
    ) -> Result<String, SttError> {
        self.calls
            .lock()
            .unwrap()
            .push((audio.len(), format.to_string()));
        match &self.transcript {
            FakeTranscript::Text(text) => Ok(text.clone()),
            FakeTranscript::Fail => Err(SttError::TranscriptionFailed("decoder offline".to_string())),
        }
    }
}

pub struct FakeTts {
    fail: bool,
    spoken: Mutex<Vec<String>>,
}

impl FakeTts {
    pub fn working() -> Self {
        Self {
            fail: false,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsProvider for FakeTts {
    fn id(&self) -> String {
        "fake_tts".to_string()
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.spoken.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(TtsError::SynthesisFailed("vocoder offline".to_string()));
        }
        Ok(format!("WAV:{}", text).into_bytes())
    }
}
