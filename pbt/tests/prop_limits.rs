//! TextLimits 構造体のプロパティテスト (limits.rs)

use proptest::prelude::*;
use shiguredo_http11_text::{TextExtractor, TextLimits};

// Default のプロパティ: 各フィールドが期待値を持つ
#[test]
fn text_limits_default_values() {
    let limits = TextLimits::default();

    assert_eq!(limits.sniff_window, 512);
    assert_eq!(limits.max_widen_passes, 1);
    assert_eq!(limits.max_buffered_body_size, 10 * 1024 * 1024); // 10MB
}

// unlimited のプロパティ: 各フィールドが usize::MAX
#[test]
fn text_limits_unlimited_values() {
    let limits = TextLimits::unlimited();

    assert_eq!(limits.sniff_window, usize::MAX);
    assert_eq!(limits.max_widen_passes, usize::MAX);
    assert_eq!(limits.max_buffered_body_size, usize::MAX);
}

// Clone のプロパティ: クローンが元と等しい
proptest! {
    #[test]
    fn text_limits_clone_eq(
        sniff_window in 1usize..100_000,
        max_widen_passes in 0usize..16,
        max_buffered_body_size in 1usize..100_000_000
    ) {
        let limits = TextLimits {
            sniff_window,
            max_widen_passes,
            max_buffered_body_size,
        };

        let cloned = limits.clone();
        prop_assert_eq!(limits, cloned);
    }
}

// TextExtractor に設定した値がそのまま取り出せる
proptest! {
    #[test]
    fn text_extractor_keeps_limits(
        sniff_window in 1usize..100_000,
        max_widen_passes in 0usize..16,
        max_buffered_body_size in 1usize..100_000_000
    ) {
        let limits = TextLimits {
            sniff_window,
            max_widen_passes,
            max_buffered_body_size,
        };

        let extractor = TextExtractor::new().with_limits(limits.clone());
        prop_assert_eq!(extractor.limits(), &limits);
    }
}
