//! WebSocket handshake and text framing
//!
//! Pure byte-level helpers for the dashboard transport: the HTTP 101
//! upgrade response with the RFC 6455 accept key, server-side text frame
//! encoding, and client frame decoding (unmasking). Socket handling is
//! the listener's concern.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha1::{Digest, Sha1};

/// Fixed GUID appended to the client key before hashing.
pub const HANDSHAKE_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

const OPCODE_TEXT: u8 = 0x1;

/// Compute `Sec-WebSocket-Accept`: base64(SHA-1(key + GUID)).
pub fn accept_key(client_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(client_key.as_bytes());
    hasher.update(HANDSHAKE_GUID.as_bytes());
    BASE64.encode(hasher.finalize())
}

/// Build the 101 upgrade response for an HTTP handshake request.
///
/// Returns `None` when the request carries no `Sec-WebSocket-Key`
/// header.
pub fn handshake_response(request: &str) -> Option<String> {
    let key = request.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("sec-websocket-key") {
            Some(value.trim())
        } else {
            None
        }
    })?;

    Some(format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n\r\n",
        accept_key(key)
    ))
}

/// Encode a server-to-client text frame (FIN set, unmasked).
pub fn encode_text_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 10);
    frame.push(0x80 | OPCODE_TEXT);

    let len = payload.len();
    if len < 126 {
        frame.push(len as u8);
    } else if len <= u16::MAX as usize {
        frame.push(126);
        frame.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        frame.push(127);
        frame.extend_from_slice(&(len as u64).to_be_bytes());
    }

    frame.extend_from_slice(payload);
    frame
}

/// Decode a client-to-server text frame, unmasking the payload.
///
/// Returns `None` for anything that is not a complete, masked text
/// frame with a UTF-8 payload.
pub fn decode_text_frame(frame: &[u8]) -> Option<String> {
    if frame.len() < 2 {
        return None;
    }
    if frame[0] & 0x0F != OPCODE_TEXT {
        return None;
    }
    // Client frames must be masked.
    if frame[1] & 0x80 == 0 {
        return None;
    }

    let len7 = (frame[1] & 0x7F) as usize;
    let (payload_len, mut offset) = match len7 {
        126 => {
            let bytes: [u8; 2] = frame.get(2..4)?.try_into().ok()?;
            (u16::from_be_bytes(bytes) as usize, 4)
        }
        127 => {
            let bytes: [u8; 8] = frame.get(2..10)?.try_into().ok()?;
            (u64::from_be_bytes(bytes) as usize, 10)
        }
        n => (n, 2),
    };

    let mask: [u8; 4] = frame.get(offset..offset + 4)?.try_into().ok()?;
    offset += 4;

    let masked = frame.get(offset..offset + payload_len)?;
    let payload: Vec<u8> = masked
        .iter()
        .enumerate()
        .map(|(i, byte)| byte ^ mask[i % 4])
        .collect();

    String::from_utf8(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_key_rfc_vector() {
        // Worked example from RFC 6455 §1.3.
        assert_eq!(
            accept_key("dGhlIHNhbXBsZSBub25jZQ=="),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }

    #[test]
    fn test_handshake_response() {
        let request = "GET /feed HTTP/1.1\r\n\
                       Host: localhost:8080\r\n\
                       Upgrade: websocket\r\n\
                       Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\r\n";
        let response = handshake_response(request).unwrap();

        assert!(response.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
        assert!(response.contains("Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n"));
        assert!(response.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_handshake_without_key() {
        assert!(handshake_response("GET / HTTP/1.1\r\nHost: x\r\n\r\n").is_none());
    }

    #[test]
    fn test_encode_short_text_frame() {
        let frame = encode_text_frame(b"hello");
        assert_eq!(frame[0], 0x81);
        assert_eq!(frame[1], 5);
        assert_eq!(&frame[2..], b"hello");
    }

    #[test]
    fn test_encode_medium_text_frame() {
        let payload = vec![b'x'; 300];
        let frame = encode_text_frame(&payload);
        assert_eq!(frame[0], 0x81);
        assert_eq!(frame[1], 126);
        assert_eq!(u16::from_be_bytes([frame[2], frame[3]]), 300);
        assert_eq!(frame.len(), 4 + 300);
    }

    #[test]
    fn test_decode_masked_frame() {
        // "abc" masked with 0x11 0x22 0x33 0x44.
        let mask = [0x11, 0x22, 0x33, 0x44];
        let mut frame = vec![0x81, 0x80 | 3];
        frame.extend_from_slice(&mask);
        for (i, byte) in b"abc".iter().enumerate() {
            frame.push(byte ^ mask[i % 4]);
        }

        assert_eq!(decode_text_frame(&frame).unwrap(), "abc");
    }

    #[test]
    fn test_decode_rejects_unmasked() {
        let frame = encode_text_frame(b"abc");
        assert!(decode_text_frame(&frame).is_none());
    }

    #[test]
    fn test_decode_rejects_truncated() {
        assert!(decode_text_frame(&[0x81]).is_none());
        assert!(decode_text_frame(&[0x81, 0x83, 0x01, 0x02]).is_none());
    }
}
