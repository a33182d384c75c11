//! Content-Type ヘッダーからのテキスト種別と charset の抽出
//!
//! ## 概要
//!
//! Content-Type ヘッダーを寛容にパースし、テキストとして扱えるかどうかの分類と
//! 明示された charset を取り出します。
//!
//! RFC 9110 の厳密な文法ではなく、実際のサーバーが返す崩れた値でも
//! 先頭の `type/subtype` と `charset=` パラメータを拾えることを優先します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http11_text::content_type::{ContentType, TextType};
//!
//! let ct = ContentType::parse("text/html; charset=GBK").unwrap();
//! assert_eq!(ct.text_type(), &TextType::Html);
//! assert_eq!(ct.charset(), "gbk");
//!
//! // ヘッダーなしは text/plain; charset=utf-8 とみなす
//! let ct = ContentType::parse("").unwrap();
//! assert_eq!(ct.text_type(), &TextType::Plain);
//! assert_eq!(ct.charset(), "utf-8");
//!
//! // テキストではない
//! assert!(ContentType::parse("application/octet-stream").is_err());
//! ```

use core::fmt;

/// Content-Type パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeError {
    /// テキストとして分類できない (小文字化したヘッダー値を保持)
    NotText(String),
}

impl fmt::Display for ContentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTypeError::NotText(content_type) => {
                write!(f, "not text: {:?}", content_type)
            }
        }
    }
}

impl std::error::Error for ContentTypeError {}

/// テキスト種別
///
/// `text/*` はサブタイプがそのまま種別になる。
/// `application/*` は json, javascript, x-javascript のみテキスト扱い。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextType {
    Html,
    Plain,
    Json,
    Javascript,
    XJavascript,
    Other(String),
}

impl TextType {
    /// サブタイプ (小文字) から種別を作成
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype {
            "html" => TextType::Html,
            "plain" => TextType::Plain,
            "json" => TextType::Json,
            "javascript" => TextType::Javascript,
            "x-javascript" => TextType::XJavascript,
            _ => TextType::Other(subtype.to_string()),
        }
    }

    /// 正規化したサブタイプ
    pub fn as_str(&self) -> &str {
        match self {
            TextType::Html => "html",
            TextType::Plain => "plain",
            TextType::Json => "json",
            TextType::Javascript => "javascript",
            TextType::XJavascript => "x-javascript",
            TextType::Other(value) => value.as_str(),
        }
    }

    /// HTML かどうか
    pub fn is_html(&self) -> bool {
        matches!(self, TextType::Html)
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// テキストとして分類済みの Content-Type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    text_type: TextType,
    /// 小文字化済み。空文字列は「明示されていない」
    charset: String,
}

impl ContentType {
    /// Content-Type ヘッダー値をパース
    ///
    /// 空のヘッダーは `text/plain; charset=utf-8` として扱う。
    pub fn parse(input: &str) -> Result<Self, ContentTypeError> {
        if input.trim().is_empty() {
            return Ok(ContentType {
                text_type: TextType::Plain,
                charset: "utf-8".to_string(),
            });
        }

        let input = input.to_ascii_lowercase();

        let text_type = match find_media_type(&input) {
            Some(("text", subtype)) => Some(TextType::from_subtype(subtype)),
            Some(("application", subtype @ ("json" | "javascript" | "x-javascript"))) => {
                Some(TextType::from_subtype(subtype))
            }
            _ => None,
        };
        let Some(text_type) = text_type else {
            return Err(ContentTypeError::NotText(input));
        };

        let charset = find_charset(&input).unwrap_or_default().to_string();

        Ok(ContentType { text_type, charset })
    }

    /// テキスト種別を取得
    pub fn text_type(&self) -> &TextType {
        &self.text_type
    }

    /// charset を取得 (明示されていなければ空文字列)
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// charset が明示されているかどうか
    pub fn has_charset(&self) -> bool {
        !self.charset.is_empty()
    }

    /// (charset, テキスト種別) に分解
    pub fn into_parts(self) -> (String, TextType) {
        (self.charset, self.text_type)
    }
}

/// Content-Type ヘッダー値をパース
///
/// [`ContentType::parse`] と同じ。
pub fn parse_content_type(input: &str) -> Result<ContentType, ContentTypeError> {
    ContentType::parse(input)
}

/// 不正な Content-Type を返すサーバー向けの補正フック
///
/// パース前のヘッダー値を書き換える純粋関数として扱う。
/// `None` を返した場合は元の値をそのまま使う。
/// クロージャ `Fn(&str) -> Option<String>` はそのまま使える。
pub trait ContentTypeFixer: Send + Sync {
    /// ヘッダー値を補正する
    fn fix(&self, content_type: &str) -> Option<String>;
}

impl<F> ContentTypeFixer for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn fix(&self, content_type: &str) -> Option<String> {
        self(content_type)
    }
}

/// 最初に現れる `type/subtype` を探す
///
/// 前後は任意の文字を許容する (先頭の空白や壊れた接頭辞を読み飛ばす)。
fn find_media_type(input: &str) -> Option<(&str, &str)> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if !is_media_char(bytes[pos]) {
            pos += 1;
            continue;
        }

        let type_start = pos;
        let type_end = run_end(bytes, pos, is_media_char);
        pos = type_end;

        if bytes.get(type_end) != Some(&b'/') {
            continue;
        }
        let subtype_start = type_end + 1;
        let subtype_end = run_end(bytes, subtype_start, is_media_char);
        if subtype_end > subtype_start {
            return Some((
                &input[type_start..type_end],
                &input[subtype_start..subtype_end],
            ));
        }
    }

    None
}

/// 最初に現れる `; charset=<token>` を探す
///
/// `;` と `charset` の間の空白は許容する。値は引用符で囲まれていてもよい。
fn find_charset(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();

    for (semicolon, _) in input.match_indices(';') {
        let mut pos = semicolon + 1;
        while bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
        let Some(rest) = input[pos..].strip_prefix("charset=") else {
            continue;
        };

        let mut start = input.len() - rest.len();
        if bytes.get(start) == Some(&b'"') {
            start += 1;
        }
        let end = run_end(bytes, start, is_charset_char);
        if end > start {
            return Some(&input[start..end]);
        }
    }

    None
}

fn run_end(bytes: &[u8], start: usize, pred: fn(u8) -> bool) -> usize {
    bytes[start.min(bytes.len())..]
        .iter()
        .position(|&b| !pred(b))
        .map_or(bytes.len(), |n| start + n)
}

/// `type` / `subtype` に使える文字 (小文字化後)
fn is_media_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.')
}

/// charset トークンに使える文字 (小文字化後)
fn is_charset_char(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_')
}
