//! charset ラベルからデコーダーへの対応表
//!
//! 対応する charset は固定の語彙のみ。
//! ASCII 互換 / UTF-8 のラベルは変換なし (identity) として扱い、
//! レガシーエンコーディングだけを [`encoding_rs`] でデコードする。
//!
//! | ラベル | デコーダー |
//! |--------|-----------|
//! | `""`, `ascii`, `utf-8` | identity |
//! | `gbk` | GBK |
//! | `gb18030`, `gb-18030` | gb18030 |
//! | `gb2312`, `gb-2312` | GBK (GB2312 の上位集合) |
//! | `big5` | Big5 |
//! | `euckr` | EUC-KR |
//! | `shiftjis`, `shift_jis` | Shift_JIS |
//! | `iso-8859-1`, `windows-1252` | windows-1252 (ISO-8859-1 の上位集合) |
//!
//! 上記以外のラベルは [`Error::UnsupportedCharset`] になる。
//! 未対応のまま identity として扱うとテキストが壊れるため、黙って通すことはしない。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http11_text::encoding::{resolve_encoding, TextEncoding};
//!
//! assert_eq!(resolve_encoding("utf-8").unwrap(), TextEncoding::Identity);
//!
//! let gbk = resolve_encoding("gbk").unwrap();
//! assert_eq!(gbk.decode(b"\xc4\xe3\xba\xc3"), "你好");
//!
//! assert!(resolve_encoding("koi8-r").is_err());
//! ```

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::Error;
use crate::decode::TextReader;

/// 解決済みのデコーダー
///
/// 状態を持たないため、プロセス全体で共有して使い回せる。
/// ストリームごとの状態は [`TextReader`] が持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// 変換なし (UTF-8 / ASCII 互換)
    Identity,
    /// レガシーエンコーディング
    Legacy(&'static Encoding),
}

impl TextEncoding {
    /// エンコーディング名
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Identity => "identity",
            TextEncoding::Legacy(encoding) => encoding.name(),
        }
    }

    /// 変換なしかどうか
    pub fn is_identity(&self) -> bool {
        matches!(self, TextEncoding::Identity)
    }

    /// バイト列を一括で UTF-8 文字列にデコード
    ///
    /// 不正なバイト列は U+FFFD に置き換える。BOM は取り除かない。
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            TextEncoding::Identity => String::from_utf8_lossy(bytes),
            TextEncoding::Legacy(encoding) => encoding.decode_without_bom_handling(bytes).0,
        }
    }

    /// 読み込みながらデコードするストリームを作成
    pub fn reader<R: Read>(self, inner: R) -> TextReader<R> {
        TextReader::new(inner, self)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 未対応の charset を検出したときの通知先
pub trait CharsetObserver: Send + Sync {
    /// 未対応の charset ラベルが要求された
    fn unsupported_charset(&self, charset: &str);
}

/// `log` クレートに error レベルで出力する通知先 (デフォルト)
///
/// 対応 charset の不足を運用で気付けるよう、呼び出し元のスタックも出力する。
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CharsetObserver for LogObserver {
    fn unsupported_charset(&self, charset: &str) {
        log::error!(
            "charset [{}] is not supported\n{}",
            charset,
            Backtrace::force_capture()
        );
    }
}

/// 何もしない通知先
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl CharsetObserver for SilentObserver {
    fn unsupported_charset(&self, _charset: &str) {}
}

/// charset ラベルからデコーダーを解決する
#[derive(Clone)]
pub struct EncodingRegistry {
    observer: Arc<dyn CharsetObserver>,
}

impl fmt::Debug for EncodingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingRegistry").finish_non_exhaustive()
    }
}

impl Default for EncodingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodingRegistry {
    /// [`LogObserver`] を通知先とするレジストリを作成
    pub fn new() -> Self {
        Self {
            observer: Arc::new(LogObserver),
        }
    }

    /// 通知先を差し替える (ビルダーパターン)
    pub fn with_observer(mut self, observer: Arc<dyn CharsetObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// charset ラベルを解決
    ///
    /// ラベルは小文字化済みであること。
    pub fn resolve(&self, charset: &str) -> Result<TextEncoding, Error> {
        match lookup(charset) {
            Some(encoding) => Ok(encoding),
            None => {
                self.observer.unsupported_charset(charset);
                Err(Error::UnsupportedCharset(charset.to_string()))
            }
        }
    }
}

/// デフォルトのレジストリで charset ラベルを解決
pub fn resolve_encoding(charset: &str) -> Result<TextEncoding, Error> {
    EncodingRegistry::new().resolve(charset)
}

// http://www.iana.org/assignments/character-sets/character-sets.xhtml
fn lookup(charset: &str) -> Option<TextEncoding> {
    let encoding = match charset {
        "" | "ascii" | "utf-8" => return Some(TextEncoding::Identity),
        "gbk" | "gb2312" | "gb-2312" => encoding_rs::GBK,
        "gb18030" | "gb-18030" => encoding_rs::GB18030,
        "big5" => encoding_rs::BIG5,
        "euckr" => encoding_rs::EUC_KR,
        "shiftjis" | "shift_jis" => encoding_rs::SHIFT_JIS,
        "iso-8859-1" | "windows-1252" => encoding_rs::WINDOWS_1252,
        _ => return None,
    };
    Some(TextEncoding::Legacy(encoding))
}
