/// Size of every scratch output chunk unless configured otherwise (1 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Max block size sanity bound (1 MiB).
pub const MAX_BLOCK_SIZE: usize = 1024 * 1024;
