//! # shiguredo_http11_text
//!
//! HTTP レスポンスの charset を判定して UTF-8 テキストに変換するライブラリ
//!
//! ## 特徴
//!
//! - **Content-Type 優先**: ヘッダーで charset が明示されていればそれを使う
//! - **HTML の charset 探索**: 明示されていない HTML は `<head>` の `<meta>` から charset を探す
//! - **ストリーミング**: charset が分かっているボディは全体を読み込まずにデコードする
//! - **圧縮対応**: gzip / deflate で圧縮されたボディを展開してからデコードする
//! - **同期 I/O**: ボディは `std::io::Read` として扱い、内部でスレッドを使わない
//!
//! ## 使い方
//!
//! ### テキストを全て取り出す
//!
//! ```rust
//! use shiguredo_http11_text::{Response, TextType, extract_text};
//!
//! let response = Response::new(200, "OK")
//!     .header("Content-Type", "text/plain; charset=gbk")
//!     .body(&b"\xc4\xe3\xba\xc3"[..]);
//!
//! let (text, text_type) = extract_text(response, None).unwrap();
//! assert_eq!(text, "你好");
//! assert_eq!(text_type, TextType::Plain);
//! ```
//!
//! ### ストリームとして取り出す
//!
//! ```rust
//! use std::io::Read;
//!
//! use shiguredo_http11_text::{RequireHtml, Response, extract_text_stream};
//!
//! let response = Response::new(200, "OK")
//!     .header("Content-Type", "text/html; charset=big5")
//!     .body(&b"<p>\xa4\xa4\xa4\xe5</p>"[..]);
//!
//! let (mut stream, _) = extract_text_stream(response, Some(&RequireHtml)).unwrap();
//! let mut html = String::new();
//! stream.read_to_string(&mut html).unwrap();
//! assert_eq!(html, "<p>中文</p>");
//! ```
//!
//! ### 個別の処理
//!
//! ```rust
//! use shiguredo_http11_text::{detect_charset, parse_content_type, resolve_encoding};
//!
//! let ct = parse_content_type("text/html;charset=GBK").unwrap();
//! assert_eq!(ct.charset(), "gbk");
//!
//! assert_eq!(detect_charset(br#"<head><meta charset="big5"></head>"#), "big5");
//!
//! let encoding = resolve_encoding("shift_jis").unwrap();
//! assert_eq!(encoding.decode(b"\x82\xa0"), "あ");
//! ```

pub mod content_encoding;
pub mod content_type;
mod decode;
pub mod encoding;
mod error;
mod extract;
mod limits;
mod response;
pub mod sniff;

pub use content_type::{ContentType, ContentTypeError, ContentTypeFixer, TextType, parse_content_type};
pub use decode::TextReader;
pub use encoding::{
    CharsetObserver, EncodingRegistry, LogObserver, SilentObserver, TextEncoding, resolve_encoding,
};
pub use error::Error;
pub use extract::{
    RequireHtml, TextExtractor, TextStream, TextTypeCheck, extract_text, extract_text_stream,
};
pub use limits::TextLimits;
pub use response::Response;
pub use sniff::{CharsetSniffer, detect_charset};
