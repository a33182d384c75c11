//! 読み込みながら UTF-8 へ変換するストリーム

use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder};

use crate::encoding::TextEncoding;

/// 入力 / 出力バッファサイズ
const BUFFER_SIZE: usize = 8 * 1024;

/// バイトストリームを UTF-8 テキストストリームに変換する `Read` アダプタ
///
/// identity の場合は入力をそのまま返す。
/// レガシーエンコーディングの場合は入力をチャンク単位で読み込み、
/// デコードできた分からすぐに返す (全体をバッファしない)。
pub struct TextReader<R> {
    inner: R,
    encoding: TextEncoding,
    state: Option<DecodeState>,
}

struct DecodeState {
    decoder: Decoder,
    input: Box<[u8]>,
    input_pos: usize,
    input_len: usize,
    output: Box<[u8]>,
    output_pos: usize,
    output_len: usize,
    eof: bool,
    finished: bool,
}

impl<R> std::fmt::Debug for TextReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextReader")
            .field("encoding", &self.encoding)
            .field(
                "pending",
                &self
                    .state
                    .as_ref()
                    .map_or(0, |s| s.output_len - s.output_pos),
            )
            .finish()
    }
}

impl<R: Read> TextReader<R> {
    /// 新しい TextReader を作成
    pub fn new(inner: R, encoding: TextEncoding) -> Self {
        let state = match encoding {
            TextEncoding::Identity => None,
            TextEncoding::Legacy(encoding) => Some(DecodeState {
                decoder: encoding.new_decoder_without_bom_handling(),
                input: vec![0u8; BUFFER_SIZE].into_boxed_slice(),
                input_pos: 0,
                input_len: 0,
                output: vec![0u8; BUFFER_SIZE].into_boxed_slice(),
                output_pos: 0,
                output_len: 0,
                eof: false,
                finished: false,
            }),
        };
        Self {
            inner,
            encoding,
            state,
        }
    }
}

impl<R> TextReader<R> {
    /// デコードに使うエンコーディング
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// 内部のストリームを参照
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// 内部のストリームを取り出す
    ///
    /// デコード途中のデータは破棄される。
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for TextReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(state) = self.state.as_mut() else {
            return self.inner.read(buf);
        };
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if state.output_pos < state.output_len {
                let n = (state.output_len - state.output_pos).min(buf.len());
                buf[..n].copy_from_slice(&state.output[state.output_pos..state.output_pos + n]);
                state.output_pos += n;
                return Ok(n);
            }
            if state.finished {
                return Ok(0);
            }

            if state.input_pos == state.input_len && !state.eof {
                let n = self.inner.read(&mut state.input)?;
                state.input_pos = 0;
                state.input_len = n;
                state.eof = n == 0;
            }

            state.decode_chunk();
        }
    }
}

impl DecodeState {
    /// 入力バッファを出力バッファへ変換する
    fn decode_chunk(&mut self) {
        let (result, read, written, _replaced) = self.decoder.decode_to_utf8(
            &self.input[self.input_pos..self.input_len],
            &mut self.output,
            self.eof,
        );
        self.input_pos += read;
        self.output_pos = 0;
        self.output_len = written;

        if self.eof && matches!(result, CoderResult::InputEmpty) {
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 回の read で最大 `chunk` バイトしか返さないリーダー
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn read_all<R: Read>(mut reader: R) -> String {
        let mut s = String::new();
        reader.read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn test_identity_passthrough() {
        let mut reader = TextReader::new(&b"a\xffb"[..], TextEncoding::Identity);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"a\xffb");
    }

    #[test]
    fn test_legacy_decode() {
        let reader = TextReader::new(
            &b"\xc4\xe3\xba\xc3, world"[..],
            TextEncoding::Legacy(encoding_rs::GBK),
        );
        assert_eq!(read_all(reader), "你好, world");
    }

    #[test]
    fn test_split_multibyte_sequence() {
        // 1 バイトずつ届いても 2 バイト文字を正しく復元する
        let data = b"\x82\xa0\x82\xa2\x82\xa4";
        let reader = TextReader::new(
            Trickle { data, chunk: 1 },
            TextEncoding::Legacy(encoding_rs::SHIFT_JIS),
        );
        assert_eq!(read_all(reader), "あいう");
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        let reader = TextReader::new(
            &b"ok\x82"[..],
            TextEncoding::Legacy(encoding_rs::SHIFT_JIS),
        );
        assert_eq!(read_all(reader), "ok\u{FFFD}");
    }

    #[test]
    fn test_small_output_buffer() {
        let mut reader = TextReader::new(
            &b"\xa4\xa4\xa4\xe5"[..],
            TextEncoding::Legacy(encoding_rs::BIG5),
        );
        let mut out = Vec::new();
        let mut buf = [0u8; 1];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(String::from_utf8(out).unwrap(), "中文");
    }

    #[test]
    fn test_large_input() {
        let data: Vec<u8> = b"caf\xe9 ".repeat(10_000);
        let reader = TextReader::new(
            &data[..],
            TextEncoding::Legacy(encoding_rs::WINDOWS_1252),
        );
        let text = read_all(reader);
        assert_eq!(text.len(), "café ".len() * 10_000);
        assert!(text.starts_with("café café "));
    }

    #[test]
    fn test_empty_input() {
        let reader = TextReader::new(&b""[..], TextEncoding::Legacy(encoding_rs::EUC_KR));
        assert_eq!(read_all(reader), "");
    }

    #[test]
    fn test_streams_before_eof() {
        // 途中でエラーになるリーダーでも、それまでのデータは取り出せる
        struct FailAfter<'a>(Option<&'a [u8]>);

        impl Read for FailAfter<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.0.take() {
                    Some(data) => {
                        buf[..data.len()].copy_from_slice(data);
                        Ok(data.len())
                    }
                    None => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                }
            }
        }

        let mut reader = TextReader::new(
            FailAfter(Some(&b"caf\xe9"[..])),
            TextEncoding::Legacy(encoding_rs::WINDOWS_1252),
        );
        let mut buf = [0u8; 64];
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], "café".as_bytes());
        assert_eq!(
            reader.read(&mut buf).unwrap_err().kind(),
            io::ErrorKind::ConnectionReset
        );
    }
}
