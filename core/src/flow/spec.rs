use crate::flow::Format;
use serde::{Deserialize, Serialize};

/// Adaptation speed of an automatic gain control stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgcProfile {
    Slow,
    Fast,
}

/// Automatic gain control settings. `None` leaves the stage default in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgcConfig {
    pub format: Format,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<AgcProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_gain: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gain: Option<f32>,
}

impl AgcConfig {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            profile: None,
            initial_gain: None,
            max_gain: None,
        }
    }

    pub fn with_profile(mut self, profile: AgcProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_initial_gain(mut self, gain: f32) -> Self {
        self.initial_gain = Some(gain);
        self
    }

    pub fn with_max_gain(mut self, gain: f32) -> Self {
        self.max_gain = Some(gain);
        self
    }
}

/// Description of a stage instance: which algorithm and with which parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageSpec {
    AmDemod,
    DcBlock,
    FmDemod,
    Limit,
    NfmDeemphasis {
        sample_rate: u32,
    },
    WfmDeemphasis {
        sample_rate: u32,
        tau: f32,
    },
    FractionalDecimator {
        format: Format,
        rate: f32,
        prefilter: bool,
    },
    RealPart,
    Agc(AgcConfig),
}

impl StageSpec {
    pub fn input_format(&self) -> Format {
        match self {
            StageSpec::AmDemod | StageSpec::FmDemod | StageSpec::RealPart => Format::ComplexFloat,
            StageSpec::DcBlock
            | StageSpec::Limit
            | StageSpec::NfmDeemphasis { .. }
            | StageSpec::WfmDeemphasis { .. } => Format::Float,
            StageSpec::FractionalDecimator { format, .. } => *format,
            StageSpec::Agc(config) => config.format,
        }
    }

    pub fn output_format(&self) -> Format {
        match self {
            StageSpec::FractionalDecimator { format, .. } => *format,
            StageSpec::Agc(config) => config.format,
            _ => Format::Float,
        }
    }

    /// Short stable name, used in logs and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            StageSpec::AmDemod => "am_demod",
            StageSpec::DcBlock => "dc_block",
            StageSpec::FmDemod => "fm_demod",
            StageSpec::Limit => "limit",
            StageSpec::NfmDeemphasis { .. } => "nfm_deemphasis",
            StageSpec::WfmDeemphasis { .. } => "wfm_deemphasis",
            StageSpec::FractionalDecimator { .. } => "fractional_decimator",
            StageSpec::RealPart => "real_part",
            StageSpec::Agc(_) => "agc",
        }
    }
}
