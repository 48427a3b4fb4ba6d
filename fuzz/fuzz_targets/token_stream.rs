#![no_main]
use libfuzzer_sys::fuzz_target;
use txconf::{TokenSource, XmlLexer};

fuzz_target!(|data: &[u8]| {
    let mut lexer = XmlLexer::new(data);
    for _ in 0..data.len().saturating_add(2) {
        match lexer.next_token() {
            Ok(token) if token.kind == txconf::TokenKind::Eof => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }
});
