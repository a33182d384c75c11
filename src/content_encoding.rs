//! Content-Encoding ヘッダーパースとボディの展開 (RFC 9110 Section 8.4)
//!
//! ## 概要
//!
//! Content-Encoding ヘッダーのパースと、gzip / deflate で圧縮された
//! ボディを読み込みながら展開する [`ContentDecoder`] を提供します。
//!
//! 展開するのは Content-Encoding がちょうど `gzip` (`x-gzip`) か `deflate` の場合のみです。
//! それ以外 (`br`, `identity`, 複数指定など) はボディをそのまま返します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http11_text::content_encoding::{ContentCoding, ContentEncoding};
//!
//! let ce = ContentEncoding::parse("gzip").unwrap();
//! assert_eq!(ce.body_coding(), Some(&ContentCoding::Gzip));
//!
//! let ce = ContentEncoding::parse("gzip, br").unwrap();
//! assert_eq!(ce.body_coding(), None);
//! ```

use core::fmt;
use std::io::{self, Read};

use flate2::read::{GzDecoder, ZlibDecoder};

/// Content-Encoding パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEncodingError {
    /// 空の入力
    Empty,
    /// 不正なエンコーディングトークン
    InvalidEncoding,
}

impl fmt::Display for ContentEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentEncodingError::Empty => write!(f, "empty Content-Encoding"),
            ContentEncodingError::InvalidEncoding => {
                write!(f, "invalid Content-Encoding token")
            }
        }
    }
}

impl std::error::Error for ContentEncodingError {}

/// コンテント コーディング (Content Coding)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCoding {
    Gzip,
    Deflate,
    Identity,
    Other(String),
}

impl ContentCoding {
    /// 正規化したトークン値
    pub fn as_str(&self) -> &str {
        match self {
            ContentCoding::Gzip => "gzip",
            ContentCoding::Deflate => "deflate",
            ContentCoding::Identity => "identity",
            ContentCoding::Other(value) => value.as_str(),
        }
    }
}

/// Content-Encoding ヘッダー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEncoding {
    encodings: Vec<ContentCoding>,
}

impl ContentEncoding {
    /// Content-Encoding ヘッダーをパース
    pub fn parse(input: &str) -> Result<Self, ContentEncodingError> {
        let encodings = input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_coding)
            .collect::<Result<Vec<_>, _>>()?;

        if encodings.is_empty() {
            return Err(ContentEncodingError::Empty);
        }

        Ok(ContentEncoding { encodings })
    }

    /// エンコーディング一覧
    pub fn encodings(&self) -> &[ContentCoding] {
        &self.encodings
    }

    /// ボディの展開に使うコーディング
    ///
    /// 単一の gzip / deflate のときだけ返す。
    pub fn body_coding(&self) -> Option<&ContentCoding> {
        match self.encodings.as_slice() {
            [coding @ (ContentCoding::Gzip | ContentCoding::Deflate)] => Some(coding),
            _ => None,
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.encodings.iter().map(ContentCoding::as_str).collect();
        write!(f, "{}", values.join(", "))
    }
}

fn parse_coding(token: &str) -> Result<ContentCoding, ContentEncodingError> {
    if !is_valid_token(token) {
        return Err(ContentEncodingError::InvalidEncoding);
    }

    let normalized = token.to_ascii_lowercase();
    let coding = match normalized.as_str() {
        "gzip" | "x-gzip" => ContentCoding::Gzip,
        "deflate" => ContentCoding::Deflate,
        "identity" => ContentCoding::Identity,
        _ => ContentCoding::Other(normalized),
    };

    Ok(coding)
}

fn is_valid_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

fn is_token_char(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'0'..=b'9' | b'A'..=b'Z' | b'^' | b'_' | b'`' | b'a'..=b'z' | b'|' | b'~'
    )
}

/// Content-Encoding に応じてボディを展開するストリーム
///
/// 展開エラーは `io::Error` として返る。
pub enum ContentDecoder<R> {
    /// そのまま
    Plain(R),
    /// gzip
    Gzip(GzDecoder<R>),
    /// deflate (zlib 形式)
    Deflate(ZlibDecoder<R>),
}

impl<R> fmt::Debug for ContentDecoder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentDecoder::Plain(_) => "Plain",
            ContentDecoder::Gzip(_) => "Gzip",
            ContentDecoder::Deflate(_) => "Deflate",
        };
        f.debug_tuple("ContentDecoder").field(&name).finish()
    }
}

impl<R: Read> ContentDecoder<R> {
    /// Content-Encoding ヘッダー値からストリームを作成
    ///
    /// ヘッダーがない、パースできない、gzip / deflate 以外の場合はそのまま返す。
    pub fn new(body: R, content_encoding: Option<&str>) -> Self {
        let coding = content_encoding.and_then(|value| match ContentEncoding::parse(value) {
            Ok(ce) => ce.body_coding().cloned(),
            Err(e) => {
                log::debug!("ignoring Content-Encoding {:?}: {}", value, e);
                None
            }
        });

        match coding {
            Some(ContentCoding::Gzip) => ContentDecoder::Gzip(GzDecoder::new(body)),
            Some(ContentCoding::Deflate) => ContentDecoder::Deflate(ZlibDecoder::new(body)),
            _ => ContentDecoder::Plain(body),
        }
    }

    /// 展開しているかどうか
    pub fn is_decompressing(&self) -> bool {
        !matches!(self, ContentDecoder::Plain(_))
    }

    /// 内部のストリームを取り出す
    pub fn into_inner(self) -> R {
        match self {
            ContentDecoder::Plain(r) => r,
            ContentDecoder::Gzip(d) => d.into_inner(),
            ContentDecoder::Deflate(d) => d.into_inner(),
        }
    }
}

impl<R: Read> Read for ContentDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ContentDecoder::Plain(r) => r.read(buf),
            ContentDecoder::Gzip(d) => d.read(buf),
            ContentDecoder::Deflate(d) => d.read(buf),
        }
    }
}
