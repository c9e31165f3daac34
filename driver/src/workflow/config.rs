use crate::generator::signal::SignalConfig;
use anyhow::Context;
use demodcore::{DemodulatorParams, Modulation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything one driver session needs: which chain, its parameters and the
/// shape of the synthetic input.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub modulation: Modulation,
    pub sample_rate: u32,
    pub tau: f32,
    pub block_size: usize,
    pub blocks: usize,
    pub tone_hz: f32,
    pub noise: f32,
    pub seed: u64,
    /// New input rate applied halfway through the run (narrowband FM only).
    pub retune_rate: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let params = DemodulatorParams::default();
        Self {
            modulation: Modulation::Nfm,
            sample_rate: params.sample_rate,
            tau: params.tau,
            block_size: 1024,
            blocks: 16,
            tone_hz: 1_000.0,
            noise: 0.01,
            seed: 0,
            retune_rate: None,
        }
    }
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading session config {}", path_ref.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing session config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(modulation: Modulation, sample_rate: u32, tau: f32) -> Self {
        Self {
            modulation,
            sample_rate,
            tau,
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> DemodulatorParams {
        DemodulatorParams {
            sample_rate: self.sample_rate,
            tau: self.tau,
        }
    }

    pub fn to_signal_config(&self) -> SignalConfig {
        SignalConfig {
            sample_rate: self.sample_rate,
            tone_hz: self.tone_hz,
            noise: self.noise,
            seed: self.seed,
        }
    }
}
