use crate::actions::LoggingAvatar;
use crate::ai::{CommandDispatcher, ModelClient, PromptContext, TurnOrchestrator};
use crate::llm::{LlmParams, ResponseMode};
use crate::relay::session::RelaySession;
use crate::stt::SttService;
use crate::tts::TtsProvider;
use crate::test_support::{FakeStt, FakeTts, RecordingEnvironment, ScriptedLlm};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;

// ── Frames ──────────────────────────────────────────────────

/// A clip big enough to pass the STT size floor.
pub fn fake_clip() -> Vec<u8> {
    let mut clip = b"RIFF".to_vec();
    clip.resize(4096, 0x11);
    clip
}

pub fn audio_frame(clip: &[u8]) -> String {
    serde_json::json!({ "event": "audio_data", "data": BASE64.encode(clip) }).to_string()
}

pub fn text_frame(text: &str) -> String {
    serde_json::json!({ "event": "text_input", "data": text }).to_string()
}

pub fn decode_audio(audio_base64: &str) -> Vec<u8> {
    BASE64.decode(audio_base64).unwrap()
}

// ── Session setup ───────────────────────────────────────────

pub struct Harness {
    pub session: Arc<RelaySession>,
    pub llm: Arc<ScriptedLlm>,
    pub stt: Arc<FakeStt>,
    pub tts: Arc<FakeTts>,
    pub env: Arc<RecordingEnvironment>,
}

pub fn harness(mode: ResponseMode, llm: ScriptedLlm, stt: FakeStt, tts: FakeTts) -> Harness {
    let llm = Arc::new(llm);
    let stt = Arc::new(stt);
    let tts = Arc::new(tts);
    let env = Arc::new(RecordingEnvironment::default());

    let client = ModelClient::new(
        llm.clone(),
        Arc::new(PromptContext::for_mode(mode)),
        mode,
        LlmParams::default(),
    );
    let orchestrator = TurnOrchestrator::new(
        client,
        CommandDispatcher::new(env.clone(), Arc::new(LoggingAvatar)),
    )
    .with_dispatch_pacing(Duration::ZERO);

    let session = Arc::new(RelaySession::new(
        SttService::with_engine(stt.clone(), None),
        Arc::new(orchestrator),
        Some(tts.clone() as Arc<dyn TtsProvider>),
        "wav",
    ));

    Harness {
        session,
        llm,
        stt,
        tts,
        env,
    }
}

pub const STRUCTURED_REPLY: &str = r#"{"dialogue":"Lights, camera, Elysia!","expression":"grinning","gesture":"wave","internal_thought_in_character":"They came back."}"#;

pub fn structured_harness(stt: FakeStt, tts: FakeTts) -> Harness {
    harness(
        ResponseMode::Structured,
        ScriptedLlm::replying([STRUCTURED_REPLY]),
        stt,
        tts,
    )
}
