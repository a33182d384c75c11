/// テキスト抽出の制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLimits {
    /// charset 探索で最初に調べる先頭バイト数 (デフォルト: 512 バイト)
    pub sniff_window: usize,
    /// `</head>` まで探索範囲を広げる最大回数 (デフォルト: 1)
    ///
    /// 0 にすると先頭ウィンドウだけを調べる。
    pub max_widen_passes: usize,
    /// charset 探索のためにメモリへ読み込むボディの最大サイズ (デフォルト: 10MB)
    ///
    /// charset が宣言されていない HTML のみが対象。
    /// ストリーミング経路では使用しない。
    pub max_buffered_body_size: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            sniff_window: 512,
            max_widen_passes: 1,
            max_buffered_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl TextLimits {
    /// 制限なしの設定を作成
    ///
    /// `</head>` が現れる限り探索範囲を広げ続ける。
    pub fn unlimited() -> Self {
        Self {
            sniff_window: usize::MAX,
            max_widen_passes: usize::MAX,
            max_buffered_body_size: usize::MAX,
        }
    }
}
