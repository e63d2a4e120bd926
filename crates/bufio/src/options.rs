/// Buffer size used by [`BufReader::new`](crate::BufReader::new) and
/// [`BufWriter::new`](crate::BufWriter::new).
pub const DEFAULT_BUF_SIZE: usize = 4096;

/// Smallest capacity a [`BufReader`](crate::BufReader) will accept; smaller
/// requests are raised to this.
pub const MIN_READ_BUF_SIZE: usize = 16;

/// Default upper bound on the size of a single scanner token.
///
/// The actual maximum token size may be smaller as the buffer may need to
/// include, for instance, a newline.
pub const MAX_SCAN_TOKEN_SIZE: usize = 64 * 1024;

/// Size of the first scanner buffer allocation.
pub const START_SCAN_BUF_SIZE: usize = 4096;

/// How many zero-byte, error-free fills are tolerated before a source is
/// reported as making no progress. The scanner uses the same bound for
/// empty tokens at end of input.
pub(crate) const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;

/// Configuration for a [`Scanner`](crate::Scanner).
///
/// # Examples
///
/// ```rust
/// use bufio::{Scanner, ScannerOptions};
///
/// let options = ScannerOptions {
///     initial_capacity: 2,
///     ..Default::default()
/// };
/// let scanner = Scanner::with_options(&b"one\ntwo"[..], options);
/// ```
///
/// # Default
///
/// [`START_SCAN_BUF_SIZE`] and [`MAX_SCAN_TOKEN_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannerOptions {
    /// Size of the buffer allocated before the first read.
    ///
    /// The buffer doubles whenever a token does not fit, up to
    /// `max_token_size`. Zero means [`START_SCAN_BUF_SIZE`] (capped at
    /// `max_token_size`).
    ///
    /// # Default
    ///
    /// [`START_SCAN_BUF_SIZE`]
    pub initial_capacity: usize,

    /// Largest buffer the scanner will grow to.
    ///
    /// Setting it equal to `initial_capacity` disables growth: a token that
    /// does not fit ends the scan with
    /// [`Error::TokenTooLong`](crate::Error::TokenTooLong).
    ///
    /// # Default
    ///
    /// [`MAX_SCAN_TOKEN_SIZE`]
    pub max_token_size: usize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            initial_capacity: START_SCAN_BUF_SIZE,
            max_token_size: MAX_SCAN_TOKEN_SIZE,
        }
    }
}
