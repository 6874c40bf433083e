use bluebox_interface::FinishReason;
use bluebox_models::{SseEvent, SseLineBuffer, chunk_from_event};

#[test]
fn multiple_events_in_one_chunk() {
    let mut buffer = SseLineBuffer::new();
    let events = buffer.feed(b"data: {\"n\":1}\n\ndata: {\"n\":2}\n\n");
    assert_eq!(
        events,
        vec![
            SseEvent::Data("{\"n\":1}".to_string()),
            SseEvent::Data("{\"n\":2}".to_string()),
        ]
    );
}

#[test]
fn multibyte_character_split_across_chunks() {
    let line = "data: {\"c\":\"héllo\"}\n".as_bytes();
    let split = line.iter().position(|b| *b == 0xC3).unwrap() + 1;

    let mut buffer = SseLineBuffer::new();
    assert!(buffer.feed(&line[..split]).is_empty());
    assert_eq!(
        buffer.feed(&line[split..]),
        vec![SseEvent::Data("{\"c\":\"héllo\"}".to_string())]
    );
}

#[test]
fn non_data_fields_are_ignored() {
    let mut buffer = SseLineBuffer::new();
    let events = buffer.feed(b": keep-alive\nevent: message\nid: 4\r\ndata: [DONE]\r\n");
    assert_eq!(events, vec![SseEvent::Done]);
}

#[test]
fn flush_parses_unterminated_line() {
    let mut buffer = SseLineBuffer::new();
    assert!(buffer.feed(b"data: {\"tail\":true}").is_empty());
    assert_eq!(
        buffer.flush(),
        vec![SseEvent::Data("{\"tail\":true}".to_string())]
    );
    assert!(buffer.flush().is_empty());
}

#[test]
fn delta_content_becomes_text_chunk() {
    let event = SseEvent::Data(
        r#"{"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#.to_string(),
    );
    let chunk = chunk_from_event(event).unwrap().unwrap();
    assert_eq!(chunk.content, "Hel");
    assert!(!chunk.is_final);
}

#[test]
fn role_only_delta_is_skipped() {
    let event = SseEvent::Data(
        r#"{"choices":[{"index":0,"delta":{"role":"assistant"},"finish_reason":null}]}"#.to_string(),
    );
    assert!(chunk_from_event(event).is_none());
}

#[test]
fn finish_reason_marks_final_chunk() {
    let event = SseEvent::Data(
        r#"{"choices":[{"index":0,"delta":{},"finish_reason":"length"}]}"#.to_string(),
    );
    let chunk = chunk_from_event(event).unwrap().unwrap();
    assert!(chunk.is_final);
    assert_eq!(chunk.finish_reason, Some(FinishReason::Length));
}

#[test]
fn in_band_error_is_reported() {
    let event = SseEvent::Data(r#"{"error":{"message":"overloaded","type":"server_error"}}"#.to_string());
    assert!(chunk_from_event(event).unwrap().is_err());
}

#[test]
fn invalid_json_is_reported() {
    assert!(chunk_from_event(SseEvent::Data("{not json".to_string())).unwrap().is_err());
}
