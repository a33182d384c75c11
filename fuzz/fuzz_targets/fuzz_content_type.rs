#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http11_text::content_encoding::{ContentDecoder, ContentEncoding};
use shiguredo_http11_text::content_type::ContentType;
use shiguredo_http11_text::resolve_encoding;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(ct) = ContentType::parse(s) {
            let _ = ct.text_type().is_html();
            let _ = ct.has_charset();
            // charset は小文字化済み
            assert_eq!(ct.charset(), ct.charset().to_ascii_lowercase());
            let _ = resolve_encoding(ct.charset());
        }

        if let Ok(ce) = ContentEncoding::parse(s) {
            let _ = ce.body_coding();
            let displayed = ce.to_string();
            assert!(ContentEncoding::parse(&displayed).is_ok());
        }

        let _ = ContentDecoder::new(&b""[..], Some(s)).is_decompressing();
    }
});
