//! Error types for the sprite renderer.

pub use sprig_test_utils::DrawError;

/// Errors that can occur while creating a [`GraphicsContext`](crate::GraphicsContext).
#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    /// No adapter matched the requested options.
    #[error("failed to find a suitable GPU adapter")]
    NoAdapter,
    /// The adapter refused to create a device.
    #[error("failed to create device: {0}")]
    DeviceRequest(String),
}

/// Errors raised by [`SpriteBatch`](crate::SpriteBatch) and its slot table.
///
/// The first four variants are caller bugs. They are returned before any state
/// is touched, so the batch is left exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum SpriteBatchError {
    #[error("must call begin() before render() or end()")]
    NotBegun,
    #[error("begin() called while the batch is already accumulating; call end() first")]
    AlreadyBegun,
    #[error("slot index {slot} is out of range for {capacity} texture slots")]
    SlotOutOfRange { slot: usize, capacity: usize },
    #[error("all {capacity} texture slots are occupied")]
    BatchFull { capacity: usize },
    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// Errors raised while creating a [`Texture`](crate::Texture).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero")]
    ZeroSize,
    #[error("expected {expected} bytes of RGBA8 pixel data for {width}x{height}, got {actual}")]
    PixelDataSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SpriteBatchError::NotBegun.to_string(),
            "must call begin() before render() or end()"
        );
        assert_eq!(
            SpriteBatchError::SlotOutOfRange {
                slot: 9,
                capacity: 8
            }
            .to_string(),
            "slot index 9 is out of range for 8 texture slots"
        );
        assert_eq!(
            SpriteBatchError::from(DrawError::NoRenderTarget).to_string(),
            "no render target is set"
        );
        assert_eq!(
            GraphicsError::NoAdapter.to_string(),
            "failed to find a suitable GPU adapter"
        );
    }
}
