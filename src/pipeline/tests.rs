use crate::pipeline::{chunk_stream, ChunkAccumulator, Decoder, NdjsonDecoder};
use crate::request::Mode;
use crate::types::message::Role;
use crate::types::{FinalResult, ResponseChunk};
use crate::Error;
use bytes::Bytes;
use futures::StreamExt;
use serde_json::json;

fn byte_stream(parts: Vec<&'static str>) -> crate::BoxStream<'static, Bytes> {
    Box::pin(futures::stream::iter(parts).map(|s| Ok::<Bytes, Error>(Bytes::from(s))))
}

#[tokio::test]
async fn lines_split_across_read_boundaries_are_reassembled() {
    // One logical line delivered in three arbitrary byte slices.
    let input = byte_stream(vec!["{\"response\":\"He", "llo\",\"done\"", ":false}\n"]);
    let values: Vec<_> = NdjsonDecoder
        .decode_stream(input)
        .await
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(values, vec![json!({"response": "Hello", "done": false})]);
}

#[tokio::test]
async fn multibyte_character_split_across_reads_is_preserved() {
    // "é" is 0xC3 0xA9; the read boundary falls between its two bytes.
    let frames = vec![
        Bytes::from(&b"{\"response\":\"caf\xC3"[..]),
        Bytes::from(&b"\xA9\",\"done\":true}\n"[..]),
    ];
    let input: crate::BoxStream<'static, Bytes> =
        Box::pin(futures::stream::iter(frames).map(Ok::<Bytes, Error>));
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    let chunk = chunks.next().await.unwrap().unwrap();
    assert_eq!(chunk.fragment(), "café");
    assert!(chunk.is_done());
}

#[tokio::test]
async fn invalid_utf8_line_is_a_decode_error() {
    let frames = vec![Bytes::from(&b"\xFF\xFE\n"[..])];
    let input: crate::BoxStream<'static, Bytes> =
        Box::pin(futures::stream::iter(frames).map(Ok::<Bytes, Error>));
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    let err = chunks.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(chunks.next().await.is_none());
}

#[tokio::test]
async fn three_chunks_concatenate_to_hello() {
    let input = byte_stream(vec![
        "{\"response\":\"Hel\",\"done\":false}\n{\"response\":\"lo\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n",
    ]);
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    let mut acc = ChunkAccumulator::new(Mode::Completion);
    let mut seen = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.unwrap();
        seen.push(chunk.clone());
        acc.push(&chunk);
    }

    assert_eq!(seen.len(), 3);
    assert!(seen[..2].iter().all(|c| !c.is_done()));
    assert!(seen[2].is_done());
    assert_eq!(acc.finish(), FinalResult::Completion("Hello".into()));
}

#[tokio::test]
async fn stream_ends_exactly_at_the_done_chunk() {
    // Anything after the terminal chunk must never be produced.
    let input = byte_stream(vec![
        "{\"response\":\"a\",\"done\":true}\n{\"response\":\"ghost\",\"done\":false}\n",
    ]);
    let chunks: Vec<_> = chunk_stream(Mode::Completion, 200, input)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].as_ref().unwrap().is_done());
}

#[tokio::test]
async fn eof_before_done_is_truncation() {
    let input = byte_stream(vec!["{\"response\":\"Hi\",\"done\":false}\n"]);
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    let first = chunks.next().await.unwrap().unwrap();
    assert_eq!(first.fragment(), "Hi");

    let err = chunks.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::TruncatedStream));
    assert!(chunks.next().await.is_none());
}

#[tokio::test]
async fn partial_trailing_line_is_truncation_not_decode_error() {
    let input = byte_stream(vec![
        "{\"response\":\"Hi\",\"done\":false}\n{\"response\":\"cut",
    ]);
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    chunks.next().await.unwrap().unwrap();
    let err = chunks.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::TruncatedStream));
}

#[tokio::test]
async fn garbled_line_terminates_with_decode_error() {
    let input = byte_stream(vec![
        "{\"response\":\"ok\",\"done\":false}\nnot json at all\n{\"response\":\"never\",\"done\":true}\n",
    ]);
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    chunks.next().await.unwrap().unwrap();
    let err = chunks.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    // No resynchronization on the next line.
    assert!(chunks.next().await.is_none());
}

#[tokio::test]
async fn shape_mismatch_is_a_decode_error() {
    // Valid JSON, wrong protocol shape: "message" must be an object.
    let input = byte_stream(vec!["{\"message\":\"nope\",\"done\":false}\n"]);
    let mut chunks = chunk_stream(Mode::Chat, 200, input).await.unwrap();

    let err = chunks.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(chunks.next().await.is_none());
}

#[tokio::test]
async fn chat_chunks_carry_message_fragments() {
    let input = byte_stream(vec![
        "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n{\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":true}\n",
    ]);
    let mut chunks = chunk_stream(Mode::Chat, 200, input).await.unwrap();

    let mut acc = ChunkAccumulator::new(Mode::Chat);
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.unwrap();
        assert!(matches!(chunk, ResponseChunk::Chat { .. }));
        acc.push(&chunk);
    }

    let result = acc.finish();
    let message = result.message().unwrap();
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content, "Hello");
}

#[tokio::test]
async fn in_band_error_object_maps_to_server_error_even_when_done() {
    let input = byte_stream(vec![
        "{\"error\":\"model 'missing' not found\",\"done\":true}\n",
    ]);
    let mut chunks = chunk_stream(Mode::Completion, 200, input).await.unwrap();

    let err = chunks.next().await.unwrap().unwrap_err();
    match err {
        Error::Server { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("not found"));
        }
        other => panic!("expected server error, got {:?}", other),
    }
    assert!(chunks.next().await.is_none());
}

#[tokio::test]
async fn empty_lines_between_objects_are_skipped() {
    let input = byte_stream(vec![
        "{\"response\":\"a\",\"done\":false}\n\n\n{\"response\":\"b\",\"done\":true}\n",
    ]);
    let chunks: Vec<_> = chunk_stream(Mode::Completion, 200, input)
        .await
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].fragment(), "a");
    assert!(chunks[1].is_done());
}
