use crate::generator::signal::ToneSource;
use crate::probe::{ProbeCounters, ProbeFactory};
use crate::workflow::config::SessionConfig;
use anyhow::Context;
use demodcore::prelude::{Link, SampleBlock};
use demodcore::{build_demodulator, Demodulator, Modulation};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub modulation: Modulation,
    pub stages: Vec<&'static str>,
    pub fixed_if_sample_rate: Option<u32>,
    pub hd_audio: bool,
    pub input_samples: usize,
    pub output_samples: usize,
    pub replacements: usize,
    pub probes: Vec<ProbeCounters>,
}

/// Applies a mid-run rate change when the chain supports one.
fn retune(demod: &mut dyn Demodulator, sample_rate: u32) -> anyhow::Result<()> {
    let modulation = demod.modulation();
    match demod.as_sample_rate_tunable_mut() {
        Some(tunable) => {
            let replaced = tunable
                .set_sample_rate(sample_rate)
                .with_context(|| format!("changing {} sample rate", modulation))?;
            info!("retune to {} (stage replaced: {})", sample_rate, replaced);
        }
        None => {
            warn!(
                "{} chain has no sample-rate reconfiguration, ignoring retune to {}",
                modulation, sample_rate
            );
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct Runner {
    config: SessionConfig,
}

impl Runner {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<RunSummary> {
        let factory = ProbeFactory::new();
        let modulation = self.config.modulation;
        let mut demod = build_demodulator(modulation, &self.config.to_params(), factory.clone())
            .with_context(|| format!("building {} chain", modulation))?;

        let fixed_if_sample_rate = demod
            .as_fixed_if_sample_rate()
            .map(|cap| cap.fixed_if_sample_rate());
        let hd_audio = demod.as_hd_audio().is_some();
        if let Some(rate) = fixed_if_sample_rate {
            info!("chain requires a fixed IF rate of {} S/s", rate);
        }

        let chain = demod.chain_mut();
        let input = Link::new(chain.input_format());
        let output = Link::new(chain.output_format());
        chain
            .set_input(Some(input.clone()))
            .context("attaching chain input")?;
        chain
            .set_output(Some(output.clone()))
            .context("attaching chain output")?;

        let mut source = ToneSource::new(&self.config.to_signal_config())?;
        let mut input_samples = 0;
        let mut output_samples = 0;

        for index in 0..self.config.blocks {
            if index == self.config.blocks / 2 {
                if let Some(rate) = self.config.retune_rate {
                    retune(&mut *demod, rate)?;
                }
            }

            let block = source.next_block(self.config.block_size);
            input_samples += block.len();
            input
                .push(SampleBlock::ComplexFloat(block))
                .context("queueing input block")?;
            demod
                .chain_mut()
                .work()
                .with_context(|| format!("processing block {}", index))?;
            output_samples += output.drain().iter().map(SampleBlock::len).sum::<usize>();
        }

        let chain = demod.chain();
        Ok(RunSummary {
            modulation: demod.modulation(),
            stages: chain.stages().map(|stage| stage.spec().name()).collect(),
            fixed_if_sample_rate,
            hd_audio,
            input_samples,
            output_samples,
            replacements: chain.metrics().replacements,
            probes: factory.counters(),
        })
    }
}
