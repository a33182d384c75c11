//! 保存済みの HTTP レスポンスボディからテキストを取り出す例
//!
//! 使い方:
//!   cargo run -p text_extract -- body.html --content-type "text/html"
//!   cargo run -p text_extract -- body.gz --content-type "text/plain; charset=gbk" --content-encoding gzip
//!   cargo run -p text_extract -- body.html --html-only --verbose

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::sync::Arc;

use shiguredo_http11_text::{
    CharsetObserver, EncodingRegistry, RequireHtml, Response, TextExtractor, TextLimits,
    TextTypeCheck,
};

/// 非対応の charset を標準エラー出力に表示する
struct StderrObserver;

impl CharsetObserver for StderrObserver {
    fn unsupported_charset(&self, charset: &str) {
        eprintln!("charset [{}] is not supported", charset);
    }
}

/// ライブラリのログを標準エラー出力に表示する
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "text_extract";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // --content-type オプション
    let content_type: Option<String> = noargs::opt("content-type")
        .short('t')
        .doc("Content-Type header value (default: none)")
        .take(&mut args)
        .present_and_then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // --content-encoding オプション
    let content_encoding: Option<String> = noargs::opt("content-encoding")
        .short('e')
        .doc("Content-Encoding header value (e.g., gzip, deflate)")
        .take(&mut args)
        .present_and_then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // --sniff-window オプション
    let sniff_window: usize = noargs::opt("sniff-window")
        .doc("Bytes to inspect for <meta charset> before widening (default: 512)")
        .default("512")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // --html-only フラグ
    let html_only: bool = noargs::flag("html-only")
        .doc("Reject responses whose type is not text/html")
        .take(&mut args)
        .is_present();

    // --verbose フラグ
    let verbose: bool = noargs::flag("verbose")
        .short('v')
        .doc("Print library logs to stderr")
        .take(&mut args)
        .is_present();

    // 位置引数: ボディのファイル
    let path: String = noargs::arg("<BODY_FILE>")
        .doc("File containing the raw response body")
        .take(&mut args)
        .then(|a| Ok::<_, &str>(a.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        return Ok(());
    }

    if verbose {
        log::set_logger(&LOGGER).map_err(|e| format!("{:?}", e))?;
        log::set_max_level(log::LevelFilter::Debug);
    }

    let mut response = Response::new(200, "OK");
    if let Some(value) = &content_type {
        response.add_header("Content-Type", value);
    }
    if let Some(value) = &content_encoding {
        response.add_header("Content-Encoding", value);
    }
    let response = response.body(BufReader::new(File::open(&path)?));

    let extractor = TextExtractor::new()
        .with_limits(TextLimits {
            sniff_window,
            ..TextLimits::default()
        })
        .with_registry(EncodingRegistry::new().with_observer(Arc::new(StderrObserver)));

    let check: Option<&dyn TextTypeCheck> = if html_only { Some(&RequireHtml) } else { None };
    let (mut stream, text_type) = extractor.extract_text_stream(response, check)?;
    eprintln!("type: {}, encoding: {}", text_type, stream.encoding());

    let mut stdout = io::stdout().lock();
    let mut buf = [0u8; 8192];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        stdout.write_all(&buf[..n])?;
    }
    stdout.flush()?;

    Ok(())
}
