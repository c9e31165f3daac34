pub use crate::flow::{Format, Link, SampleBlock, StageSpec};

/// Common error type for chain assembly and reconfiguration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("a chain needs at least one stage")]
    EmptyChain,
    #[error("stage index {index} out of range for chain of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("format mismatch: expected {expected}, found {actual}")]
    FormatMismatch { expected: Format, actual: Format },
    #[error("stage is not connected: {0}")]
    Disconnected(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("stage failure: {0}")]
    Stage(String),
}

pub type ChainResult<T> = Result<T, ChainError>;

/// Links currently attached to a stage.
#[derive(Debug, Clone, Default)]
pub struct Ports {
    pub input: Option<Link>,
    pub output: Option<Link>,
}

impl Ports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the queued input blocks, failing when no input link is attached.
    pub fn drain_input(&self) -> ChainResult<Vec<SampleBlock>> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| ChainError::Disconnected("no input link".into()))?;
        Ok(input.drain())
    }

    pub fn emit(&self, block: SampleBlock) -> ChainResult<()> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| ChainError::Disconnected("no output link".into()))?;
        output.push(block)
    }
}

/// One opaque processing step inside a chain.
///
/// The chain only relies on this surface: it never looks at the algorithm a
/// stage runs, only at its formats and the links attached to it.
pub trait Stage: Send {
    fn spec(&self) -> &StageSpec;
    fn ports(&self) -> &Ports;
    fn ports_mut(&mut self) -> &mut Ports;

    /// Consumes every block queued on the input link and returns the number
    /// of samples pushed to the output link.
    fn work(&mut self) -> ChainResult<usize>;

    /// Called once when the owning chain drops or replaces the stage.
    fn release(&mut self) {}

    fn input_format(&self) -> Format {
        self.spec().input_format()
    }

    fn output_format(&self) -> Format {
        self.spec().output_format()
    }

    fn set_input(&mut self, link: Option<Link>) -> ChainResult<()> {
        if let Some(link) = &link {
            check_format(self.input_format(), link.format())?;
        }
        self.ports_mut().input = link;
        Ok(())
    }

    fn set_output(&mut self, link: Option<Link>) -> ChainResult<()> {
        if let Some(link) = &link {
            check_format(self.output_format(), link.format())?;
        }
        self.ports_mut().output = link;
        Ok(())
    }
}

/// Builds stage instances from their descriptions.
pub trait StageFactory {
    fn build(&self, spec: &StageSpec) -> ChainResult<Box<dyn Stage>>;
}

pub(crate) fn check_format(expected: Format, actual: Format) -> ChainResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ChainError::FormatMismatch { expected, actual })
    }
}
