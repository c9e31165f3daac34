//! Demodulator chain core.
//!
//! A chain owns an ordered sequence of opaque stages wired in series, can
//! swap a single stage in place while the rest keeps its state, and exposes
//! optional capabilities (fixed IF rate, HD audio) to a generic driver.

pub mod chain;
pub mod flow;
pub mod prelude;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use chain::{
    build_demodulator, Am, Chain, Demodulator, DemodulatorParams, FixedIfSampleRate, HdAudio,
    Modulation, NFm, SampleRateTunable, Ssb, WFm,
};
pub use prelude::{ChainError, ChainResult, Ports, Stage, StageFactory};
