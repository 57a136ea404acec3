/// Stable algorithm IDs (u16) as carried on the wire.
pub mod algorithm_ids {
    pub const NONE: u16    = 0x0000;
    pub const DEFLATE: u16 = 0x0001;
    pub const GZIP: u16    = 0x0002;
    pub const ZSTD: u16    = 0x0003;

    /// Terminal sentinel: number of known algorithms. Never dispatched.
    pub const ALGORITHMS_COUNT: u16 = 0x0004;
}

/// Default compression levels.
pub const DEFAULT_LEVEL_DEFLATE: u32 = 6; // zlib's Z_DEFAULT_COMPRESSION
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;

/// zlib window size (log2) for both raw-zlib and gzip framing.
pub const ZLIB_WINDOW_BITS: u8 = 15;
