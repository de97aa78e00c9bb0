/// State threaded through chunk decoding for one container.
pub struct RIFXReaderContext {
    pub after_burned: bool,
    pub ils_body_offset: usize,
    pub dir_version: u16,
    /// Whether the script context chunk was spelled `LctX`; decides the
    /// handler-record layout and the variable-index multiplier.
    pub lctx_capital_x: bool,
}

impl RIFXReaderContext {
    pub fn new() -> RIFXReaderContext {
        RIFXReaderContext {
            after_burned: false,
            ils_body_offset: 0,
            dir_version: 0,
            lctx_capital_x: false,
        }
    }
}

impl Default for RIFXReaderContext {
    fn default() -> Self {
        Self::new()
    }
}
