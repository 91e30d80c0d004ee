//! Fuzz target for ServerMessage::decode
//!
//! Feeds arbitrary text to the frame decoder. Decoding must never panic, and
//! anything that decodes must survive a re-encode and decode unchanged in
//! kind.

#![no_main]

use castlink_proto::ServerMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(message) = ServerMessage::decode(text) else {
        return;
    };
    let encoded = message.encode().expect("decoded message must encode");
    let again = ServerMessage::decode(&encoded).expect("encoded message must decode");
    assert_eq!(message.kind(), again.kind());
});
