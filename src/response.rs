use std::io::{self, Read};

/// テキスト抽出の対象となる HTTP レスポンス
///
/// ボディは一度だけ読み込める `Read` として扱う。
/// 接続中のソケットでもメモリ上のバイト列でもよい。
#[derive(Debug, Clone)]
pub struct Response<B = io::Empty> {
    /// ステータスコード (200, 404, etc.)
    pub status_code: u16,
    /// ステータスフレーズ (OK, Not Found, etc.)
    pub reason_phrase: String,
    /// ヘッダー
    pub headers: Vec<(String, String)>,
    /// ボディ
    pub body: B,
}

impl Response {
    /// ボディが空のレスポンスを作成
    pub fn new(status_code: u16, reason_phrase: &str) -> Self {
        Self {
            status_code,
            reason_phrase: reason_phrase.to_string(),
            headers: Vec::new(),
            body: io::empty(),
        }
    }
}

impl<B> Response<B> {
    /// ヘッダーを追加 (ビルダーパターン)
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// ボディを設定 (ビルダーパターン)
    pub fn body<C: Read>(self, body: C) -> Response<C> {
        Response {
            status_code: self.status_code,
            reason_phrase: self.reason_phrase,
            headers: self.headers,
            body,
        }
    }

    /// ヘッダーを追加
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// ヘッダーを取得 (大文字小文字を区別しない)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// ヘッダーが存在するか確認
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Content-Type ヘッダーの値を取得
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("Content-Type")
    }

    /// Content-Encoding ヘッダーの値を取得
    pub fn content_encoding(&self) -> Option<&str> {
        self.get_header("Content-Encoding")
    }

    /// ボディを取り出す
    pub fn into_body(self) -> B {
        self.body
    }

    /// ステータスコードが成功 (2xx) か確認
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// ステータスコードがリダイレクト (3xx) か確認
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// ステータスコードがクライアントエラー (4xx) か確認
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// ステータスコードがサーバーエラー (5xx) か確認
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let response = Response::new(200, "OK")
            .header("Content-Type", "text/html")
            .header("content-encoding", "gzip")
            .body(&b"body"[..]);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.content_encoding(), Some("gzip"));
        assert!(response.has_header("CONTENT-TYPE"));
        assert!(!response.has_header("Content-Length"));
        assert_eq!(response.into_body(), b"body");
    }

    #[test]
    fn test_get_header_first_wins() {
        let mut response = Response::new(200, "OK");
        response.add_header("Content-Type", "text/plain");
        response.add_header("Content-Type", "text/html");
        assert_eq!(response.content_type(), Some("text/plain"));
    }

    #[test]
    fn test_status_helpers() {
        assert!(Response::new(204, "No Content").is_success());
        assert!(Response::new(301, "Moved Permanently").is_redirect());
        assert!(Response::new(404, "Not Found").is_client_error());
        assert!(Response::new(503, "Service Unavailable").is_server_error());
        assert!(!Response::new(503, "Service Unavailable").is_success());
    }
}
