/// Errors raised while walking, decoding or writing a boot information stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootInfoError {
    /// The boot information does not start on an 8-byte boundary.
    #[error("boot information is not 8-byte aligned")]
    Alignment,
    /// A size field points outside the declared stream, a payload is too
    /// short for its tag type, or the stream ends without an end tag.
    #[error("boot information stream is malformed")]
    MalformedStream,
    /// A string payload is not valid UTF-8.
    #[error("boot information string is not valid UTF-8")]
    InvalidString,
    /// The output buffer cannot hold the tag being written.
    #[error("tag stream does not fit the output buffer")]
    BufferTooSmall,
}
