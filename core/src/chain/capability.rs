use crate::chain::{Chain, Modulation};
use crate::prelude::ChainResult;

/// Chain that needs a specific input sample rate whatever runs upstream.
pub trait FixedIfSampleRate {
    /// Required input rate in samples per second.
    fn fixed_if_sample_rate(&self) -> u32;
}

/// Marker for chains whose output qualifies as high-definition audio.
pub trait HdAudio {}

/// Chain that follows its input sample rate by swapping stages in place.
pub trait SampleRateTunable {
    fn sample_rate(&self) -> u32;

    /// Returns `false` when the rate is unchanged and nothing was replaced.
    fn set_sample_rate(&mut self, sample_rate: u32) -> ChainResult<bool>;
}

/// A demodulator chain as seen by a generic driver.
///
/// Optional capabilities are discovered through the `as_*` queries, never by
/// matching on `modulation()`.
pub trait Demodulator: Send {
    fn chain(&self) -> &Chain;
    fn chain_mut(&mut self) -> &mut Chain;
    fn modulation(&self) -> Modulation;

    fn as_fixed_if_sample_rate(&self) -> Option<&dyn FixedIfSampleRate> {
        None
    }

    fn as_hd_audio(&self) -> Option<&dyn HdAudio> {
        None
    }

    fn as_sample_rate_tunable_mut(&mut self) -> Option<&mut dyn SampleRateTunable> {
        None
    }
}
