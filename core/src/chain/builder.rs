use crate::chain::{Am, Demodulator, NFm, Ssb, WFm};
use crate::prelude::{ChainResult, StageFactory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modulation schemes with a demodulator chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Modulation {
    Am,
    Nfm,
    Wfm,
    Ssb,
}

impl Modulation {
    pub const ALL: [Modulation; 4] = [
        Modulation::Am,
        Modulation::Nfm,
        Modulation::Wfm,
        Modulation::Ssb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modulation::Am => "am",
            Modulation::Nfm => "nfm",
            Modulation::Wfm => "wfm",
            Modulation::Ssb => "ssb",
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown modulation: {0}")]
pub struct UnknownModulation(pub String);

impl FromStr for Modulation {
    type Err = UnknownModulation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Modulation::ALL
            .into_iter()
            .find(|modulation| modulation.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownModulation(value.to_string()))
    }
}

/// Construction parameters shared by the chain constructors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemodulatorParams {
    /// Input sample rate in samples per second.
    pub sample_rate: u32,
    /// Wideband FM de-emphasis time constant in seconds.
    pub tau: f32,
}

impl Default for DemodulatorParams {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            tau: 50e-6,
        }
    }
}

/// Builds the chain for `modulation`. Parameters a chain does not use are ignored.
pub fn build_demodulator<F>(
    modulation: Modulation,
    params: &DemodulatorParams,
    factory: F,
) -> ChainResult<Box<dyn Demodulator>>
where
    F: StageFactory + Send + 'static,
{
    let demodulator: Box<dyn Demodulator> = match modulation {
        Modulation::Am => Box::new(Am::new(&factory)?),
        Modulation::Nfm => Box::new(NFm::new(factory, params.sample_rate)?),
        Modulation::Wfm => Box::new(WFm::new(&factory, params.sample_rate, params.tau)?),
        Modulation::Ssb => Box::new(Ssb::new(&factory)?),
    };
    Ok(demodulator)
}
