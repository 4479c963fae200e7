use super::helpers::*;
use crate::ai::action::API_FAILURE_DIALOGUE;
use crate::ai::FreeformTurn;
use crate::llm::ResponseMode;
use crate::relay::protocol::InboundEvent;
use crate::relay::session::action_from_freeform;
use crate::test_support::{FakeStt, FakeTts, ScriptedLlm};

// ── Audio turns ─────────────────────────────────────────────

#[tokio::test]
async fn test_audio_turn_runs_full_pipeline() {
    let h = structured_harness(FakeStt::hearing("hello Elysia"), FakeTts::working());

    let reply = h.session.handle_frame(&audio_frame(&fake_clip())).await.unwrap();

    assert_eq!(reply.dialogue, "Lights, camera, Elysia!");
    assert_eq!(reply.expression, "grinning");
    assert_eq!(reply.gesture, "wave");
    assert_eq!(reply.internal_thought_in_character, "They came back.");
    assert_eq!(decode_audio(&reply.audio_base64), b"WAV:Lights, camera, Elysia!");

    assert_eq!(h.stt.calls(), vec![(4096, "wav".to_string())]);
    let requests = h.llm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages[1].content, "hello Elysia");
}

#[tokio::test]
async fn test_stt_failure_answers_without_model_call() {
    let h = structured_harness(FakeStt::failing(), FakeTts::working());

    let reply = h.session.handle_frame(&audio_frame(&fake_clip())).await.unwrap();

    assert_eq!(reply.dialogue, "Sorry, I didn't quite catch that.");
    assert_eq!(reply.expression, "confused");
    assert_eq!(reply.gesture, "tilt_head");
    assert!(reply.internal_thought_in_character.contains("decoder offline"));
    assert!(h.llm.requests().is_empty(), "model must not be called");
    assert!(!reply.audio_base64.is_empty(), "sentinel is still spoken");
}

#[tokio::test]
async fn test_empty_transcript_is_unheard() {
    let h = structured_harness(FakeStt::hearing(""), FakeTts::working());

    let reply = h.session.handle_frame(&audio_frame(&fake_clip())).await.unwrap();

    assert_eq!(reply.expression, "confused");
    assert!(h.llm.requests().is_empty());
}

// ── Text turns ──────────────────────────────────────────────

#[tokio::test]
async fn test_text_input_skips_stt() {
    let h = structured_harness(FakeStt::hearing("unused"), FakeTts::working());

    let reply = h.session.handle_frame(&text_frame("  hi there  ")).await.unwrap();

    assert_eq!(reply.expression, "grinning");
    assert!(h.stt.calls().is_empty());
    assert_eq!(h.llm.requests()[0].messages[1].content, "hi there");
}

#[tokio::test]
async fn test_blank_text_input_is_unheard() {
    let h = structured_harness(FakeStt::hearing("unused"), FakeTts::working());
    let reply = h.session.handle_event(InboundEvent::TextInput("   ".to_string())).await;
    assert_eq!(reply.gesture, "tilt_head");
    assert!(h.llm.requests().is_empty());
}

// ── Degradation ─────────────────────────────────────────────

#[tokio::test]
async fn test_tts_failure_yields_empty_audio() {
    let h = structured_harness(FakeStt::hearing("hello"), FakeTts::failing());

    let reply = h.session.handle_frame(&text_frame("hello")).await.unwrap();

    assert_eq!(reply.dialogue, "Lights, camera, Elysia!");
    assert_eq!(reply.audio_base64, "");
    assert_eq!(h.tts.spoken(), vec!["Lights, camera, Elysia!".to_string()]);
}

#[tokio::test]
async fn test_model_failure_skips_speech() {
    let h = harness(
        ResponseMode::Structured,
        ScriptedLlm::failing(),
        FakeStt::hearing("hello"),
        FakeTts::working(),
    );

    let reply = h.session.handle_frame(&text_frame("hello")).await.unwrap();

    assert_eq!(reply.dialogue, API_FAILURE_DIALOGUE);
    assert_eq!(reply.expression, "distressed");
    assert_eq!(reply.audio_base64, "");
    assert!(h.tts.spoken().is_empty());
}

#[tokio::test]
async fn test_bad_frames_are_dropped() {
    let h = structured_harness(FakeStt::hearing("hello"), FakeTts::working());

    assert!(h.session.handle_frame("{not json").await.is_none());
    assert!(h.session.handle_frame(r#"{"event":"dance","data":""}"#).await.is_none());
    assert!(h.llm.requests().is_empty());
}

#[tokio::test]
async fn test_undecodable_audio_is_answered_as_unheard() {
    let h = structured_harness(FakeStt::hearing("hello"), FakeTts::working());

    let reply = h
        .session
        .handle_frame(r#"{"event":"audio_data","data":"***"}"#)
        .await
        .expect("audio frames always get a reply");

    assert_eq!(reply.expression, "confused");
    assert_eq!(reply.gesture, "tilt_head");
    assert!(reply.internal_thought_in_character.contains("base64"));
    assert!(h.stt.calls().is_empty());
    assert!(h.llm.requests().is_empty());
}

// ── Freeform mapping ────────────────────────────────────────

#[tokio::test]
async fn test_freeform_turn_maps_to_outbound_fields() {
    let h = harness(
        ResponseMode::Freeform,
        ScriptedLlm::replying(["Let there be light~\nLIGHT:wiz:ON:brightness=60\nEXPRESSION:smug"]),
        FakeStt::hearing("unused"),
        FakeTts::working(),
    );

    let reply = h.session.handle_frame(&text_frame("lights please")).await.unwrap();

    assert_eq!(reply.dialogue, "Let there be light~");
    assert_eq!(reply.expression, "smug");
    assert_eq!(reply.gesture, "idle");
    assert_eq!(
        reply.internal_thought_in_character,
        "light wiz on | Character expression set to SMUG"
    );
    assert_eq!(h.env.calls().len(), 1);
    assert_eq!(h.tts.spoken(), vec!["Let there be light~".to_string()]);
}

#[test]
fn test_freeform_without_prose_speaks_summary() {
    let action = action_from_freeform(FreeformTurn {
        summary: "TV turned on".to_string(),
        reply: String::new(),
        expression: None,
    });
    assert_eq!(action.dialogue, "TV turned on");
    assert_eq!(action.expression, "neutral");
    assert_eq!(action.internal_thought, "TV turned on");
}
