use std::fmt;

use crate::content_type::{ContentTypeError, TextType};

/// テキスト抽出エラー
#[derive(Debug)]
pub enum Error {
    /// Content-Type がテキストとして分類できない
    NotText(String),
    /// 対応していない charset
    UnsupportedCharset(String),
    /// 呼び出し側のチェックでテキスト種別が拒否された
    TextTypeRejected { text_type: TextType, reason: String },
    /// charset 探索用に読み込むボディが大きすぎる
    BodyTooLarge { size: usize, limit: usize },
    /// ボディの読み込み / 展開中の I/O エラー
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotText(content_type) => write!(f, "not text: {:?}", content_type),
            Error::UnsupportedCharset(charset) => {
                write!(f, "unsupported charset: {:?}", charset)
            }
            Error::TextTypeRejected { text_type, reason } => {
                write!(f, "text type {} rejected: {}", text_type, reason)
            }
            Error::BodyTooLarge { size, limit } => {
                write!(f, "body too large: {} > {}", size, limit)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ContentTypeError> for Error {
    fn from(e: ContentTypeError) -> Self {
        match e {
            ContentTypeError::NotText(content_type) => Error::NotText(content_type),
        }
    }
}
