//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// charset ラベル
// ========================================

/// 解決できる charset ラベル (小文字)
pub const SUPPORTED_CHARSETS: &[&str] = &[
    "",
    "ascii",
    "utf-8",
    "gbk",
    "gb2312",
    "gb-2312",
    "gb18030",
    "gb-18030",
    "big5",
    "euckr",
    "shiftjis",
    "shift_jis",
    "iso-8859-1",
    "windows-1252",
];

/// 解決できる charset ラベル
pub fn supported_charset() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(SUPPORTED_CHARSETS)
}

/// Content-Type の charset パラメータに現れうるラベル
pub fn charset_label() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,16}".prop_map(|s| s)
}

// ========================================
// HTML 生成
// ========================================

/// `<head>` に置くダミーの `<meta name>` 要素
pub fn filler_meta() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-zA-Z0-9 ]{0,48}")
        .prop_map(|(name, content)| format!("<meta name=\"{}\" content=\"{}\">\n", name, content))
}

/// `<head>` の中身のダミー (`count` 個の `<meta name>`)
pub fn head_filler(count: std::ops::Range<usize>) -> impl Strategy<Value = String> {
    proptest::collection::vec(filler_meta(), count).prop_map(|metas| metas.concat())
}

/// `<meta charset>` を `filler` の後ろに置いた HTML
pub fn html_with_meta_charset(filler: &str, charset: &str) -> String {
    format!(
        "<!doctype html>\n<html><head>\n{}<meta charset=\"{}\">\n</head><body>body</body></html>",
        filler, charset
    )
}
