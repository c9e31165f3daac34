pub mod link;
pub mod sample;
pub mod spec;

pub use link::Link;
pub use sample::{Format, SampleBlock};
pub use spec::{AgcConfig, AgcProfile, StageSpec};
