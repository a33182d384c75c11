#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_http11_text::{CharsetSniffer, TextLimits};

#[derive(Arbitrary, Debug)]
struct FuzzSniff {
    sniff_window: u16,
    max_widen_passes: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: FuzzSniff| {
    let sniffer = CharsetSniffer::new(&TextLimits {
        sniff_window: input.sniff_window as usize,
        max_widen_passes: input.max_widen_passes as usize,
        ..TextLimits::default()
    });

    let charset = sniffer.sniff(&input.data);
    assert_eq!(charset, charset.to_ascii_lowercase());
});
