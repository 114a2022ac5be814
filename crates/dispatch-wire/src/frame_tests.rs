// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.unwrap();
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.unwrap();
    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_big_endian_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.unwrap();

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn oversized_declared_length_is_rejected_before_allocating() {
    let mut len_bytes = (MAX_FRAME_BYTES as u32 + 1).to_be_bytes().to_vec();
    len_bytes.extend_from_slice(b"short");
    let mut cursor = std::io::Cursor::new(len_bytes);

    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, WireError::FrameTooLarge { .. }));
}

#[tokio::test]
async fn truncated_frame_is_an_io_error() {
    let mut cursor = std::io::Cursor::new(vec![0u8, 0, 0, 5, b'h', b'i']);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, WireError::Io(_)));
}
