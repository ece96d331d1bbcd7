//! Audio source abstraction for capturing meeting audio.

use anyhow::Result;

/// Trait for audio capture sources (microphone, test fixtures, etc.).
///
/// A source captures audio while started and returns all samples when
/// stopped. The sample rate is fixed per source.
pub trait AudioSource {
    /// Start capturing audio.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing and return all captured samples.
    fn stop(&mut self) -> Result<Vec<f32>>;

    /// Whether this source is currently capturing.
    fn is_active(&self) -> bool;

    /// The sample rate of captured audio.
    fn sample_rate(&self) -> u32;
}
