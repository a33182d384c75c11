//! HTTP レスポンスから UTF-8 テキストを取り出す
//!
//! ## 概要
//!
//! 1. Content-Type からテキスト種別と charset を取り出す (テキストでなければエラー)
//! 2. Content-Encoding が gzip / deflate ならボディを展開する
//! 3. charset が明示されているか HTML 以外なら、ボディをそのままストリームとしてデコードする
//! 4. charset が明示されていない HTML はボディを全て読み込み、`<head>` から charset を探してデコードする
//!
//! charset を解決できなかった場合はデコードを一切行わない。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http11_text::{Response, TextType, extract_text};
//!
//! let response = Response::new(200, "OK")
//!     .header("Content-Type", "text/html")
//!     .body(&b"<html><head><meta charset=\"iso-8859-1\"></head><body>caf\xe9</body></html>"[..]);
//!
//! let (text, text_type) = extract_text(response, None).unwrap();
//! assert_eq!(text_type, TextType::Html);
//! assert!(text.contains("café"));
//! ```

use std::fmt;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

use crate::Error;
use crate::content_encoding::ContentDecoder;
use crate::content_type::{ContentType, ContentTypeFixer, TextType};
use crate::decode::TextReader;
use crate::encoding::{EncodingRegistry, TextEncoding};
use crate::limits::TextLimits;
use crate::response::Response;
use crate::sniff::CharsetSniffer;

/// デコード前にテキスト種別を検査するフック
///
/// `Err` に理由を入れて返すと、ボディを読む前に [`Error::TextTypeRejected`] で失敗する。
/// クロージャ `Fn(&TextType) -> Result<(), String>` はそのまま使える。
pub trait TextTypeCheck {
    /// テキスト種別を検査する
    fn check(&self, text_type: &TextType) -> Result<(), String>;
}

impl<F> TextTypeCheck for F
where
    F: Fn(&TextType) -> Result<(), String>,
{
    fn check(&self, text_type: &TextType) -> Result<(), String> {
        self(text_type)
    }
}

/// HTML 以外を拒否する
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireHtml;

impl TextTypeCheck for RequireHtml {
    fn check(&self, text_type: &TextType) -> Result<(), String> {
        if text_type.is_html() {
            Ok(())
        } else {
            Err(format!("the type of response is [{}] but not html", text_type))
        }
    }
}

/// デコード済みテキストのストリーム
///
/// UTF-8 のバイト列を返す `Read`。
/// identity の場合はボディのバイト列をそのまま返すため、不正な UTF-8 が含まれることがある。
#[derive(Debug)]
pub struct TextStream<R> {
    inner: TextReader<Source<R>>,
}

enum Source<R> {
    /// ボディを直接読み込む
    Body(ContentDecoder<R>),
    /// charset 探索のため読み込み済み
    Buffered(Cursor<Vec<u8>>),
}

impl<R> fmt::Debug for Source<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Body(body) => f.debug_tuple("Body").field(body).finish(),
            Source::Buffered(data) => f
                .debug_struct("Buffered")
                .field("len", &data.get_ref().len())
                .field("position", &data.position())
                .finish(),
        }
    }
}

impl<R: Read> Read for Source<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Body(body) => body.read(buf),
            Source::Buffered(data) => data.read(buf),
        }
    }
}

impl<R: Read> TextStream<R> {
    /// デコードに使うエンコーディング
    pub fn encoding(&self) -> TextEncoding {
        self.inner.encoding()
    }

    /// ボディを全て読み込み済みかどうか (charset 探索を行った場合)
    pub fn is_buffered(&self) -> bool {
        matches!(self.inner.get_ref(), Source::Buffered(_))
    }

    /// 残りを全て読み込んで文字列にする
    ///
    /// 不正な UTF-8 は U+FFFD に置き換える。
    pub fn into_string(mut self) -> Result<String, Error> {
        let mut data = Vec::new();
        self.inner.read_to_end(&mut data)?;
        Ok(into_utf8_lossy(data))
    }
}

impl<R: Read> Read for TextStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// charset 解決まで済ませたボディ
enum Prepared<R> {
    Streaming(ContentDecoder<R>, TextEncoding),
    Buffered(Vec<u8>, TextEncoding),
}

/// レスポンスからテキストを取り出す
///
/// 内部状態を持たないため、複数のスレッドから共有して使える。
#[derive(Clone, Default)]
pub struct TextExtractor {
    limits: TextLimits,
    sniffer: CharsetSniffer,
    registry: EncodingRegistry,
    fixer: Option<Arc<dyn ContentTypeFixer>>,
}

impl fmt::Debug for TextExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextExtractor")
            .field("limits", &self.limits)
            .field("registry", &self.registry)
            .field("fixer", &self.fixer.is_some())
            .finish()
    }
}

impl TextExtractor {
    /// デフォルト設定で作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 制限設定を変更 (ビルダーパターン)
    pub fn with_limits(mut self, limits: TextLimits) -> Self {
        self.sniffer = CharsetSniffer::new(&limits);
        self.limits = limits;
        self
    }

    /// charset レジストリを差し替える (ビルダーパターン)
    pub fn with_registry(mut self, registry: EncodingRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Content-Type の補正フックを設定 (ビルダーパターン)
    pub fn with_content_type_fixer(mut self, fixer: Arc<dyn ContentTypeFixer>) -> Self {
        self.fixer = Some(fixer);
        self
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &TextLimits {
        &self.limits
    }

    /// テキストのストリームを取り出す
    ///
    /// charset が明示されているか HTML 以外の場合、ボディは読み込みながらデコードされる。
    pub fn extract_text_stream<B: Read>(
        &self,
        response: Response<B>,
        check: Option<&dyn TextTypeCheck>,
    ) -> Result<(TextStream<B>, TextType), Error> {
        let (prepared, text_type) = self.prepare(response, check)?;
        let (source, encoding) = match prepared {
            Prepared::Streaming(body, encoding) => (Source::Body(body), encoding),
            Prepared::Buffered(data, encoding) => (Source::Buffered(Cursor::new(data)), encoding),
        };
        let stream = TextStream {
            inner: TextReader::new(source, encoding),
        };
        Ok((stream, text_type))
    }

    /// テキストを全て取り出す
    pub fn extract_text<B: Read>(
        &self,
        response: Response<B>,
        check: Option<&dyn TextTypeCheck>,
    ) -> Result<(String, TextType), Error> {
        let (prepared, text_type) = self.prepare(response, check)?;
        let text = match prepared {
            Prepared::Streaming(body, encoding) => {
                let mut data = Vec::new();
                TextReader::new(body, encoding).read_to_end(&mut data)?;
                into_utf8_lossy(data)
            }
            Prepared::Buffered(data, TextEncoding::Identity) => into_utf8_lossy(data),
            Prepared::Buffered(data, encoding) => encoding.decode(&data).into_owned(),
        };
        Ok((text, text_type))
    }

    fn prepare<B: Read>(
        &self,
        response: Response<B>,
        check: Option<&dyn TextTypeCheck>,
    ) -> Result<(Prepared<B>, TextType), Error> {
        let content_type = self.parse_content_type(response.content_type().unwrap_or_default())?;

        if let Some(check) = check {
            check
                .check(content_type.text_type())
                .map_err(|reason| Error::TextTypeRejected {
                    text_type: content_type.text_type().clone(),
                    reason,
                })?;
        }

        // ここより前ではボディを読まない
        let content_encoding = response.content_encoding().map(str::to_string);
        let body = ContentDecoder::new(response.into_body(), content_encoding.as_deref());

        let (charset, text_type) = content_type.into_parts();
        if !charset.is_empty() || !text_type.is_html() {
            let encoding = self.registry.resolve(&charset)?;
            log::debug!(
                "streaming {} body as {} (charset {:?})",
                text_type,
                encoding,
                charset
            );
            return Ok((Prepared::Streaming(body, encoding), text_type));
        }

        let data = read_body(body, self.limits.max_buffered_body_size)?;
        let charset = self.sniffer.sniff(&data);
        let encoding = self.registry.resolve(&charset)?;
        log::debug!(
            "buffered {} bytes of html, detected charset {:?} ({})",
            data.len(),
            charset,
            encoding
        );
        Ok((Prepared::Buffered(data, encoding), text_type))
    }

    fn parse_content_type(&self, value: &str) -> Result<ContentType, Error> {
        let fixed = self.fixer.as_ref().and_then(|fixer| fixer.fix(value));
        if let Some(fixed) = &fixed {
            log::trace!("Content-Type {:?} fixed to {:?}", value, fixed);
        }
        Ok(ContentType::parse(fixed.as_deref().unwrap_or(value))?)
    }
}

/// デフォルト設定でテキストのストリームを取り出す
pub fn extract_text_stream<B: Read>(
    response: Response<B>,
    check: Option<&dyn TextTypeCheck>,
) -> Result<(TextStream<B>, TextType), Error> {
    TextExtractor::default().extract_text_stream(response, check)
}

/// デフォルト設定でテキストを全て取り出す
pub fn extract_text<B: Read>(
    response: Response<B>,
    check: Option<&dyn TextTypeCheck>,
) -> Result<(String, TextType), Error> {
    TextExtractor::default().extract_text(response, check)
}

/// 上限付きでボディを全て読み込む
fn read_body<R: Read>(body: R, limit: usize) -> Result<Vec<u8>, Error> {
    let mut data = Vec::new();
    let take = u64::try_from(limit.saturating_add(1)).unwrap_or(u64::MAX);
    body.take(take).read_to_end(&mut data)?;
    if data.len() > limit {
        return Err(Error::BodyTooLarge {
            size: data.len(),
            limit,
        });
    }
    Ok(data)
}

fn into_utf8_lossy(data: Vec<u8>) -> String {
    match String::from_utf8(data) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
