#![no_main]

use std::io::Read;
use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_http11_text::{
    EncodingRegistry, Response, SilentObserver, TextExtractor, TextLimits, TextType,
};

#[derive(Arbitrary, Debug)]
struct FuzzResponse {
    content_type: Option<String>,
    content_encoding: Option<String>,
    max_buffered_body_size: u16,
    read_size: u8,
    body: Vec<u8>,
}

fuzz_target!(|input: FuzzResponse| {
    let extractor = TextExtractor::new()
        .with_limits(TextLimits {
            max_buffered_body_size: input.max_buffered_body_size as usize,
            ..TextLimits::default()
        })
        .with_registry(EncodingRegistry::new().with_observer(Arc::new(SilentObserver)));

    let mut response = Response::new(200, "OK");
    if let Some(value) = &input.content_type {
        response.add_header("Content-Type", value);
    }
    if let Some(value) = &input.content_encoding {
        response.add_header("Content-Encoding", value);
    }

    let check = |text_type: &TextType| {
        if matches!(text_type, TextType::Other(_)) {
            Err("other".to_string())
        } else {
            Ok(())
        }
    };

    let Ok((mut stream, _)) = extractor.extract_text_stream(response.body(&input.body[..]), Some(&check))
    else {
        return;
    };

    let mut buf = vec![0u8; (input.read_size as usize).max(1)];
    let mut out = Vec::new();
    while let Ok(n) = stream.read(&mut buf) {
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }

    // identity 以外は常に有効な UTF-8
    if !stream.encoding().is_identity() {
        assert!(std::str::from_utf8(&out).is_ok());
    }
});
