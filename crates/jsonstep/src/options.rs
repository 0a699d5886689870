/// Default number of bytes handed to the engine per chunk.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration shared by the input adapters.
///
/// # Examples
///
/// ```rust
/// use jsonstep::ParserOptions;
///
/// let options = ParserOptions::new(8 * 1024 - 6);
/// assert_eq!(options.buffer_size(), 8 * 1024);
/// ```
///
/// # Default
///
/// A buffer size of 8192 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Number of bytes read and tokenized at a time.
    ///
    /// Always a non-zero multiple of 8: sizes that are not are rounded up to
    /// the next multiple, and zero becomes 8.
    ///
    /// # Default
    ///
    /// `8192`
    buffer_size: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ParserOptions {
    /// Creates options with the given buffer size, rounded as described on
    /// [`ParserOptions::buffer_size`].
    #[must_use]
    pub const fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: round_buffer_size(buffer_size),
        }
    }

    /// Replaces the buffer size, rounding it.
    #[must_use]
    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = round_buffer_size(buffer_size);
        self
    }

    /// The effective buffer size.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

/// Largest multiple of 8 a `usize` can hold.
const MAX_BUFFER_SIZE: usize = usize::MAX & !7;

const fn round_buffer_size(size: usize) -> usize {
    if size == 0 {
        return 8;
    }
    match size.checked_next_multiple_of(8) {
        Some(rounded) => rounded,
        None => MAX_BUFFER_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_buffer_size() {
        assert_eq!(ParserOptions::default().buffer_size(), 8 * 1024);
    }

    #[rstest]
    #[case(0, 8)]
    #[case(1, 8)]
    #[case(8, 8)]
    #[case(9, 16)]
    #[case(8 * 1024 - 6, 8 * 1024)]
    #[case(8 * 1024, 8 * 1024)]
    #[case(usize::MAX - 3, usize::MAX & !7)]
    #[case(usize::MAX, usize::MAX & !7)]
    fn buffer_size_is_rounded_up(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(ParserOptions::new(requested).buffer_size(), expected);
        assert_eq!(
            ParserOptions::default()
                .with_buffer_size(requested)
                .buffer_size(),
            expected
        );
    }
}
