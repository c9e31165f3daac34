//! Analog demodulator chains.

use crate::chain::{Chain, Demodulator, FixedIfSampleRate, HdAudio, Modulation, SampleRateTunable};
use crate::flow::{AgcConfig, AgcProfile};
use crate::prelude::{ChainError, ChainResult, Format, StageFactory, StageSpec};
use log::debug;

/// Input rate the wideband FM chain decimates to.
pub const WFM_IF_SAMPLE_RATE: u32 = 200_000;

fn check_sample_rate(sample_rate: u32) -> ChainResult<()> {
    if sample_rate == 0 {
        return Err(ChainError::InvalidParameter("sample rate must be positive".into()));
    }
    Ok(())
}

fn build_chain(factory: &dyn StageFactory, specs: &[StageSpec]) -> ChainResult<Chain> {
    let stages = specs
        .iter()
        .map(|spec| factory.build(spec))
        .collect::<ChainResult<Vec<_>>>()?;
    Chain::new(stages)
}

/// Amplitude demodulation: envelope, DC removal, slow AGC.
pub struct Am {
    chain: Chain,
}

impl Am {
    pub fn new(factory: &dyn StageFactory) -> ChainResult<Self> {
        let agc = AgcConfig::new(Format::Float)
            .with_profile(AgcProfile::Slow)
            .with_initial_gain(200.0);
        let chain = build_chain(
            factory,
            &[StageSpec::AmDemod, StageSpec::DcBlock, StageSpec::Agc(agc)],
        )?;
        Ok(Self { chain })
    }
}

impl Demodulator for Am {
    fn chain(&self) -> &Chain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn modulation(&self) -> Modulation {
        Modulation::Am
    }
}

/// Narrowband FM. The de-emphasis stage follows the input sample rate and is
/// swapped in place when the rate changes.
pub struct NFm {
    chain: Chain,
    factory: Box<dyn StageFactory + Send>,
    sample_rate: u32,
}

impl NFm {
    pub const DEEMPHASIS_INDEX: usize = 2;

    pub fn new<F>(factory: F, sample_rate: u32) -> ChainResult<Self>
    where
        F: StageFactory + Send + 'static,
    {
        check_sample_rate(sample_rate)?;
        let agc = AgcConfig::new(Format::Float)
            .with_profile(AgcProfile::Slow)
            .with_max_gain(3.0);
        let chain = build_chain(
            &factory,
            &[
                StageSpec::FmDemod,
                StageSpec::Limit,
                StageSpec::NfmDeemphasis { sample_rate },
                StageSpec::Agc(agc),
            ],
        )?;
        Ok(Self {
            chain,
            factory: Box::new(factory),
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Rebuilds the de-emphasis stage for `sample_rate`.
    ///
    /// Returns `false` without touching the chain when the rate is unchanged.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> ChainResult<bool> {
        if sample_rate == self.sample_rate {
            debug!("nfm sample rate already {}", sample_rate);
            return Ok(false);
        }
        check_sample_rate(sample_rate)?;
        let stage = self
            .factory
            .build(&StageSpec::NfmDeemphasis { sample_rate })?;
        self.chain.replace(Self::DEEMPHASIS_INDEX, stage)?;
        self.sample_rate = sample_rate;
        Ok(true)
    }
}

impl SampleRateTunable for NFm {
    fn sample_rate(&self) -> u32 {
        NFm::sample_rate(self)
    }

    fn set_sample_rate(&mut self, sample_rate: u32) -> ChainResult<bool> {
        NFm::set_sample_rate(self, sample_rate)
    }
}

impl Demodulator for NFm {
    fn chain(&self) -> &Chain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn modulation(&self) -> Modulation {
        Modulation::Nfm
    }

    fn as_sample_rate_tunable_mut(&mut self) -> Option<&mut dyn SampleRateTunable> {
        Some(self)
    }
}

/// Wideband FM, decimated to a fixed intermediate rate before de-emphasis.
pub struct WFm {
    chain: Chain,
    sample_rate: u32,
    tau: f32,
}

impl WFm {
    pub fn new(factory: &dyn StageFactory, sample_rate: u32, tau: f32) -> ChainResult<Self> {
        check_sample_rate(sample_rate)?;
        let chain = build_chain(
            factory,
            &[
                StageSpec::FmDemod,
                StageSpec::Limit,
                StageSpec::FractionalDecimator {
                    format: Format::Float,
                    rate: WFM_IF_SAMPLE_RATE as f32 / sample_rate as f32,
                    prefilter: true,
                },
                StageSpec::WfmDeemphasis { sample_rate, tau },
            ],
        )?;
        Ok(Self {
            chain,
            sample_rate,
            tau,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn tau(&self) -> f32 {
        self.tau
    }
}

impl FixedIfSampleRate for WFm {
    fn fixed_if_sample_rate(&self) -> u32 {
        WFM_IF_SAMPLE_RATE
    }
}

impl HdAudio for WFm {}

impl Demodulator for WFm {
    fn chain(&self) -> &Chain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn modulation(&self) -> Modulation {
        Modulation::Wfm
    }

    fn as_fixed_if_sample_rate(&self) -> Option<&dyn FixedIfSampleRate> {
        Some(self)
    }

    fn as_hd_audio(&self) -> Option<&dyn HdAudio> {
        Some(self)
    }
}

/// Single sideband: real part of the complex input, default AGC.
pub struct Ssb {
    chain: Chain,
}

impl Ssb {
    pub fn new(factory: &dyn StageFactory) -> ChainResult<Self> {
        let chain = build_chain(
            factory,
            &[
                StageSpec::RealPart,
                StageSpec::Agc(AgcConfig::new(Format::Float)),
            ],
        )?;
        Ok(Self { chain })
    }
}

impl Demodulator for Ssb {
    fn chain(&self) -> &Chain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn modulation(&self) -> Modulation {
        Modulation::Ssb
    }
}
