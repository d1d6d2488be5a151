use crate::common::test_data::mv;
use gambit::messages::{FramedMessage, WireConfig, WireProtocolError};
use gambit::storage::GameId;
use gambit::{ClientCommand, ServerMessage};
use std::time::Duration;
use tokio_test::io::Builder;

#[tokio::test]
async fn test_frame_split_across_reads() {
    let framing = FramedMessage::default();
    let command = ClientCommand::make_move("token", GameId(7), mv("e7e8=q"));
    let frame = framing.encode(&command).unwrap();

    // Deliver the prefix and body in awkward pieces
    let mut stream = Builder::new()
        .read(&frame[..1])
        .read(&frame[1..6])
        .read(&frame[6..])
        .build();

    let decoded: ClientCommand = framing.read_message(&mut stream).await.unwrap();
    assert_eq!(decoded, command);
}

#[tokio::test]
async fn test_write_produces_length_prefix() {
    let framing = FramedMessage::default();
    let message = ServerMessage::notification("alice moved e2e4");
    let frame = framing.encode(&message).unwrap();
    let body_len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
    assert_eq!(body_len, frame.len() - 4);

    let mut stream = Builder::new().write(&frame).build();
    framing.write_message(&mut stream, &message).await.unwrap();
}

#[tokio::test]
async fn test_oversized_prefix_rejected_before_body() {
    let framing = FramedMessage::new(WireConfig::new(64, Duration::from_secs(1)));
    let mut stream = Builder::new().read(&1000u32.to_be_bytes()).build();

    let result = framing.read_message::<ServerMessage>(&mut stream).await;
    assert!(matches!(
        result,
        Err(WireProtocolError::MessageTooLarge { size: 1000, max_size: 64 })
    ));
}

#[tokio::test]
async fn test_eof_mid_body() {
    let framing = FramedMessage::default();
    let frame = framing.encode(&ServerMessage::error("Error: x")).unwrap();
    let mut stream = Builder::new().read(&frame[..frame.len() - 1]).build();

    let result = framing.read_message::<ServerMessage>(&mut stream).await;
    assert!(matches!(result, Err(WireProtocolError::UnexpectedEof { .. })));
}
