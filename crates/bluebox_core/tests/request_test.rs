use bluebox_core::{
    ContentPart, ConversationRequest, IntentKind, MessageContent, ModelTier, Role,
};
use bluebox_error::RelayErrorKind;
use serde_json::json;

fn parse(value: serde_json::Value) -> Result<ConversationRequest, RelayErrorKind> {
    ConversationRequest::from_value(&value).map_err(|e| e.kind().clone())
}

#[test]
fn non_json_body_is_malformed() {
    let err = ConversationRequest::from_json(b"not json").unwrap_err();
    assert!(matches!(err.kind(), RelayErrorKind::MalformedRequestBody(_)));
}

#[test]
fn non_object_body_is_malformed() {
    let err = parse(json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, RelayErrorKind::MalformedRequestBody(_)));
}

#[test]
fn missing_messages_is_empty_conversation() {
    assert_eq!(parse(json!({})).unwrap_err(), RelayErrorKind::EmptyConversation);
    assert_eq!(
        parse(json!({"messages": "hello"})).unwrap_err(),
        RelayErrorKind::EmptyConversation
    );
}

#[test]
fn all_invalid_entries_is_empty_conversation() {
    let body = json!({
        "messages": [
            {"role": 7, "content": "x"},
            {"role": "user", "content": 42},
            {"role": "tool", "content": "x"},
            "just a string",
            {"role": "user", "content": [{"type": "audio", "data": "..."}]}
        ]
    });
    assert_eq!(parse(body).unwrap_err(), RelayErrorKind::EmptyConversation);
}

#[test]
fn malformed_entries_are_dropped_silently() {
    let body = json!({
        "messages": [
            {"role": "user", "content": "first"},
            {"role": "user", "content": null},
            {"role": "assistant", "content": "second"}
        ]
    });
    let request = parse(body).unwrap();
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[1].role, Role::Assistant);
}

#[test]
fn only_first_system_message_is_kept() {
    let body = json!({
        "messages": [
            {"role": "system", "content": "one"},
            {"role": "user", "content": "hi"},
            {"role": "system", "content": "two"}
        ]
    });
    let request = parse(body).unwrap();
    assert_eq!(request.messages.len(), 2);
    let system = request.system_message().unwrap();
    assert_eq!(system.content, MessageContent::from("one"));
}

#[test]
fn unknown_parts_are_filtered_from_arrays() {
    let body = json!({
        "messages": [{
            "role": "user",
            "content": [
                {"type": "text", "text": "what is this?"},
                {"type": "video", "url": "x"},
                {"type": "image_url", "image_url": {"url": "https://img.example/cat.png"}}
            ]
        }]
    });
    let request = parse(body).unwrap();
    let MessageContent::Parts(parts) = &request.messages[0].content else {
        panic!("expected parts");
    };
    assert_eq!(parts.len(), 2);
    assert!(parts[1].is_image());
    assert!(request.messages[0].has_image());
}

#[test]
fn bare_string_image_url_is_accepted() {
    let body = json!({
        "messages": [{
            "role": "user",
            "content": [{"type": "image_url", "image_url": "data:image/png;base64,AAAA"}]
        }]
    });
    let request = parse(body).unwrap();
    assert_eq!(
        request.messages[0].content,
        MessageContent::Parts(vec![ContentPart::image("data:image/png;base64,AAAA")])
    );
}

#[test]
fn model_tier_defaults_to_basic() {
    let one = json!({"role": "user", "content": "hi"});
    assert_eq!(parse(json!({"messages": [one.clone()]})).unwrap().model_tier, ModelTier::Basic);
    assert_eq!(
        parse(json!({"messages": [one.clone()], "modelTier": "Premium"}))
            .unwrap()
            .model_tier,
        ModelTier::Basic
    );
    assert_eq!(
        parse(json!({"messages": [one], "modelTier": "premium"}))
            .unwrap()
            .model_tier,
        ModelTier::Premium
    );
}

#[test]
fn legacy_tags_are_stripped_without_changing_intent() {
    let body = json!({"messages": [{"role": "user", "content": "[Search] rust async"}]});
    let request = parse(body).unwrap();
    assert_eq!(request.intent.kind, IntentKind::Plain);
    assert_eq!(request.last_user_text().as_deref(), Some("rust async"));
}

#[test]
fn legacy_tags_are_only_stripped_from_user_text() {
    let body = json!({"messages": [
        {"role": "system", "content": "Answer [Search] requests with sources."},
        {"role": "user", "content": "hi"},
        {"role": "assistant", "content": "Hello!\n\n"},
        {"role": "user", "content": "[News] cricket"}
    ]});
    let request = parse(body).unwrap();
    assert_eq!(request.messages.len(), 4);
    assert_eq!(
        request.messages[0].content,
        MessageContent::Text("Answer [Search] requests with sources.".to_string())
    );
    assert_eq!(request.messages[2].content, MessageContent::Text("Hello!\n\n".to_string()));
    assert_eq!(request.messages[3].content, MessageContent::Text("cricket".to_string()));
}

#[test]
fn tag_only_user_message_is_dropped() {
    let body = json!({"messages": [
        {"role": "user", "content": "what happened today"},
        {"role": "user", "content": "[News]"}
    ]});
    let request = parse(body).unwrap();
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.last_user_text().as_deref(), Some("what happened today"));

    let body = json!({"messages": [{"role": "user", "content": " [News] "}]});
    assert_eq!(parse(body).unwrap_err(), RelayErrorKind::EmptyConversation);
}

#[test]
fn tag_only_text_beside_an_image_is_kept() {
    let body = json!({"messages": [{"role": "user", "content": [
        {"type": "text", "text": "[Search]"},
        {"type": "image_url", "image_url": "https://example.com/cat.png"}
    ]}]});
    let request = parse(body).unwrap();
    assert_eq!(request.messages.len(), 1);
    assert!(request.messages[0].has_image());
}

#[test]
fn structured_intent_is_parsed() {
    let body = json!({
        "messages": [{"role": "user", "content": "headlines please"}],
        "intent": {"kind": "news"}
    });
    let request = parse(body).unwrap();
    assert_eq!(request.intent.kind, IntentKind::News);
    assert_eq!(request.intent.text, None);
}

#[test]
fn windowed_keeps_last_messages_and_system() {
    let mut messages = vec![json!({"role": "system", "content": "persona"})];
    for i in 0..20 {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        messages.push(json!({"role": role, "content": format!("m{i}")}));
    }
    let request = parse(json!({"messages": messages})).unwrap();

    let (system, history) = request.windowed(12);
    assert!(system.is_some());
    assert_eq!(history.len(), 12);
    assert_eq!(history[0].content.text(), "m8");
    assert_eq!(history[11].content.text(), "m19");
    assert!(history.iter().all(|m| m.role != Role::System));
}

#[test]
fn windowed_shorter_than_window_keeps_everything() {
    let body = json!({"messages": [{"role": "user", "content": "a"}, {"role": "assistant", "content": "b"}]});
    let (system, history) = parse(body).unwrap().windowed(12);
    assert!(system.is_none());
    assert_eq!(history.len(), 2);
}
