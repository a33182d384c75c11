//! HTML の `<head>` から charset 宣言を探す
//!
//! ## 概要
//!
//! ボディの先頭 [`TextLimits::sniff_window`] バイトを HTML として解釈し、
//! `<meta charset>` または `<meta http-equiv="Content-Type">` を探します。
//! 見つからず文書がウィンドウより大きい場合は、ウィンドウより後ろにある
//! `</head>` まで範囲を広げて探し直します (最大 [`TextLimits::max_widen_passes`] 回)。
//!
//! ASCII 互換のエンコーディングでのみ機能します。
//! 見つからないのは通常の結果であり、エラーにはなりません。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http11_text::sniff::detect_charset;
//!
//! let html = br#"<!doctype html><html><head><meta charset="GBK"></head></html>"#;
//! assert_eq!(detect_charset(html), "gbk");
//!
//! assert_eq!(detect_charset(b"<html><body>no charset</body></html>"), "");
//! ```

use scraper::{ElementRef, Html};

use crate::content_type::ContentType;
use crate::limits::TextLimits;

/// charset 探索器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetSniffer {
    sniff_window: usize,
    max_widen_passes: usize,
}

impl Default for CharsetSniffer {
    fn default() -> Self {
        Self::new(&TextLimits::default())
    }
}

impl CharsetSniffer {
    /// 制限設定から探索器を作成
    pub fn new(limits: &TextLimits) -> Self {
        Self {
            sniff_window: limits.sniff_window,
            max_widen_passes: limits.max_widen_passes,
        }
    }

    /// charset を探す
    ///
    /// 見つからなければ空文字列を返す。返すラベルは小文字化済み。
    pub fn sniff(&self, source: &[u8]) -> String {
        let mut window = &source[..source.len().min(self.sniff_window)];
        let mut search_from = 0;
        let mut passes = 0;

        loop {
            if let Some(charset) = find_declaration(window) {
                log::trace!(
                    "charset {:?} declared within {} bytes",
                    charset,
                    window.len()
                );
                return charset;
            }

            if passes >= self.max_widen_passes || source.len() <= self.sniff_window {
                break;
            }
            match find_head_close(source, search_from) {
                Some(pos) if pos > window.len() => {
                    log::debug!("widening charset window: {} -> {} bytes", window.len(), pos);
                    window = &source[..pos];
                    search_from = pos + 1;
                    passes += 1;
                }
                _ => break,
            }
        }

        String::new()
    }
}

/// デフォルトの制限設定で charset を探す
pub fn detect_charset(source: &[u8]) -> String {
    CharsetSniffer::default().sniff(source)
}

/// 1 つのウィンドウから charset 宣言を探す
///
/// `<meta http-equiv="Content-Type">` が見つかった時点で探索は終わる。
/// その content から charset を取り出せなくても `Some("")` を返す。
fn find_declaration(window: &[u8]) -> Option<String> {
    let source = String::from_utf8_lossy(window);
    let document = Html::parse_document(&source);

    let metas: Vec<ElementRef<'_>> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "meta")
        .collect();

    // HTML5 の <meta charset> が最優先
    if let Some(charset) = metas
        .iter()
        .find_map(|element| element.value().attr("charset"))
    {
        return Some(charset.trim().to_ascii_lowercase());
    }

    let content = metas.iter().find_map(|element| {
        let http_equiv = element.value().attr("http-equiv")?;
        if http_equiv.trim().eq_ignore_ascii_case("content-type") {
            Some(element.value().attr("content").unwrap_or_default())
        } else {
            None
        }
    })?;

    Some(
        ContentType::parse(content)
            .map(|ct| ct.charset().to_string())
            .unwrap_or_default(),
    )
}

/// `from` 以降で最初の `</head>` の開始位置を探す
///
/// `</ head >` のような空白と大文字小文字の違いを許容する。
fn find_head_close(source: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while pos + 1 < source.len() {
        if source[pos] == b'<' && source[pos + 1] == b'/' {
            let mut i = skip_spaces(source, pos + 2);
            if source
                .get(i..i + 4)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(b"head"))
            {
                i = skip_spaces(source, i + 4);
                if source.get(i) == Some(&b'>') {
                    return Some(pos);
                }
            }
        }
        pos += 1;
    }
    None
}

fn skip_spaces(source: &[u8], mut pos: usize) -> usize {
    while source.get(pos) == Some(&b' ') {
        pos += 1;
    }
    pos
}
