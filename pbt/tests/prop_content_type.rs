//! Content-Type のプロパティテスト

use pbt::charset_label;
use proptest::prelude::*;
use shiguredo_http11_text::{ContentType, ContentTypeError, TextType};

// ========================================
// Strategy 定義
// ========================================

// text/* 以外でテキストとして扱わないメディアタイプ
fn binary_media_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("image"),
        Just("audio"),
        Just("video"),
        Just("multipart"),
        Just("font"),
        Just("model"),
    ]
}

// application/* のうちテキストとして扱うサブタイプ
fn text_application_subtype() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("json"), Just("javascript"), Just("x-javascript")]
}

// 大文字小文字を混ぜる
fn mixed_case(s: &str, mask: u64) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 64) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

// ========================================
// メディアタイプ
// ========================================

// text/* は全てテキスト
proptest! {
    #[test]
    fn content_type_text_any_subtype(subtype in "[a-z0-9.-]{1,16}") {
        let ct = ContentType::parse(&format!("text/{}", subtype)).unwrap();
        prop_assert_eq!(ct.text_type().as_str(), subtype.as_str());
        prop_assert_eq!(ct.charset(), "");
        prop_assert!(!ct.has_charset());
    }
}

// application/json, javascript, x-javascript はテキスト
proptest! {
    #[test]
    fn content_type_text_application(subtype in text_application_subtype(), mask in any::<u64>()) {
        let ct = ContentType::parse(&mixed_case(&format!("application/{}", subtype), mask)).unwrap();
        prop_assert_eq!(ct.text_type().as_str(), subtype);
    }
}

// その他の application/* はテキストではない
proptest! {
    #[test]
    fn content_type_other_application(subtype in "[a-z0-9.-]{1,16}") {
        prop_assume!(!matches!(subtype.as_str(), "json" | "javascript" | "x-javascript"));
        let input = format!("application/{}", subtype);
        prop_assert_eq!(
            ContentType::parse(&input),
            Err(ContentTypeError::NotText(input.clone()))
        );
    }
}

proptest! {
    #[test]
    fn content_type_binary_media(media_type in binary_media_type(), subtype in "[a-z]{1,8}") {
        let result = ContentType::parse(&format!("{}/{}; charset=utf-8", media_type, subtype));
        prop_assert!(matches!(result, Err(ContentTypeError::NotText(_))));
    }
}

// text/html は大文字小文字を区別しない
proptest! {
    #[test]
    fn content_type_html_case_insensitive(mask in any::<u64>()) {
        let ct = ContentType::parse(&mixed_case("text/html", mask)).unwrap();
        prop_assert_eq!(ct.text_type(), &TextType::Html);
    }
}

// 空白だけのヘッダーは text/plain; charset=utf-8
proptest! {
    #[test]
    fn content_type_blank(blank in "[ \t]{0,8}") {
        let ct = ContentType::parse(&blank).unwrap();
        prop_assert_eq!(ct.text_type(), &TextType::Plain);
        prop_assert_eq!(ct.charset(), "utf-8");
    }
}

// ========================================
// charset パラメータ
// ========================================

// charset は小文字化して取り出す
proptest! {
    #[test]
    fn content_type_charset_lowercased(
        subtype in prop_oneof![Just("html"), Just("plain"), Just("css")],
        charset in charset_label(),
        mask in any::<u64>(),
        spaces in " {0,3}"
    ) {
        let input = format!("text/{};{}charset={}", subtype, spaces, mixed_case(&charset, mask));
        let ct = ContentType::parse(&input).unwrap();
        prop_assert_eq!(ct.charset(), charset.as_str());
        prop_assert!(ct.has_charset());
    }
}

// 引用符で囲まれた charset
proptest! {
    #[test]
    fn content_type_quoted_charset(charset in charset_label()) {
        let ct = ContentType::parse(&format!("text/html; charset=\"{}\"", charset)).unwrap();
        prop_assert_eq!(ct.charset(), charset.as_str());
    }
}

// 最初の charset パラメータが使われる
proptest! {
    #[test]
    fn content_type_first_charset_wins(first in charset_label(), second in charset_label()) {
        let input = format!("text/plain; charset={}; charset={}", first, second);
        let ct = ContentType::parse(&input).unwrap();
        prop_assert_eq!(ct.charset(), first.as_str());
    }
}

// 他のパラメータを挟んでも charset を取り出せる
proptest! {
    #[test]
    fn content_type_charset_after_other_param(
        name in "[a-z]{1,8}",
        value in "[a-z0-9]{1,8}",
        charset in charset_label()
    ) {
        prop_assume!(name != "charset");
        let input = format!("text/plain; {}={}; charset={}", name, value, charset);
        let ct = ContentType::parse(&input).unwrap();
        prop_assert_eq!(ct.charset(), charset.as_str());
    }
}

// ========================================
// 任意の入力
// ========================================

// 任意の文字列でパニックしない
proptest! {
    #[test]
    fn content_type_no_panic(input in ".{0,64}") {
        if let Ok(ct) = ContentType::parse(&input) {
            // 取り出した charset は常に小文字
            prop_assert_eq!(ct.charset(), ct.charset().to_ascii_lowercase());
        }
    }
}
