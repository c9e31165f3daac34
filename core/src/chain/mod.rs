//! Chain base: an owned, ordered stage sequence wired in series.

pub mod analog;
pub mod builder;
pub mod capability;

pub use analog::{Am, NFm, Ssb, WFm};
pub use builder::{build_demodulator, DemodulatorParams, Modulation, UnknownModulation};
pub use capability::{Demodulator, FixedIfSampleRate, HdAudio, SampleRateTunable};

use crate::prelude::{ChainError, ChainResult, Format, Link, Stage, StageSpec};
use crate::telemetry::{ChainMetrics, MetricsSnapshot};
use log::{debug, info};

/// Ordered stage sequence. Stage `i` writes into `links[i]`, which stage
/// `i + 1` reads from.
pub struct Chain {
    stages: Vec<Box<dyn Stage>>,
    links: Vec<Link>,
    input: Option<Link>,
    output: Option<Link>,
    metrics: ChainMetrics,
}

impl Chain {
    /// Takes ownership of `stages` and connects every adjacent pair.
    ///
    /// An empty sequence is rejected. Connection failures reported by a stage
    /// (usually a format mismatch) are returned unchanged and every stage is
    /// released.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> ChainResult<Self> {
        if stages.is_empty() {
            return Err(ChainError::EmptyChain);
        }

        let mut chain = Self {
            stages,
            links: Vec::new(),
            input: None,
            output: None,
            metrics: ChainMetrics::new(),
        };

        for index in 0..chain.stages.len() - 1 {
            let link = Link::new(chain.stages[index].output_format());
            chain.stages[index].set_output(Some(link.clone()))?;
            chain.stages[index + 1].set_input(Some(link.clone()))?;
            chain.links.push(link);
        }

        debug!(
            "chain built: {}",
            chain
                .stages
                .iter()
                .map(|stage| stage.spec().name())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for a constructed chain.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, index: usize) -> Option<&dyn Stage> {
        self.stages.get(index).map(|stage| stage.as_ref())
    }

    pub fn stages(&self) -> impl Iterator<Item = &dyn Stage> + '_ {
        self.stages.iter().map(|stage| stage.as_ref())
    }

    /// Position of the first stage whose spec matches `predicate`.
    pub fn index_of<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&StageSpec) -> bool,
    {
        self.stages.iter().position(|stage| predicate(stage.spec()))
    }

    pub fn describe(&self) -> Vec<StageSpec> {
        self.stages.iter().map(|stage| stage.spec().clone()).collect()
    }

    pub fn input_format(&self) -> Format {
        self.stages[0].input_format()
    }

    pub fn output_format(&self) -> Format {
        self.stages[self.stages.len() - 1].output_format()
    }

    pub fn input(&self) -> Option<&Link> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&Link> {
        self.output.as_ref()
    }

    /// Attaches the upstream link to the first stage.
    pub fn set_input(&mut self, link: Option<Link>) -> ChainResult<()> {
        self.stages[0].set_input(link.clone())?;
        self.input = link;
        Ok(())
    }

    /// Attaches the downstream link to the last stage.
    pub fn set_output(&mut self, link: Option<Link>) -> ChainResult<()> {
        let last = self.stages.len() - 1;
        self.stages[last].set_output(link.clone())?;
        self.output = link;
        Ok(())
    }

    /// True when every adjacent pair shares exactly one link.
    pub fn is_fully_connected(&self) -> bool {
        self.stages.windows(2).all(|pair| {
            match (&pair[0].ports().output, &pair[1].ports().input) {
                (Some(out), Some(inp)) => out.same_as(inp),
                _ => false,
            }
        })
    }

    /// Swaps the stage at `index` for `stage`, keeping every other stage and
    /// link untouched.
    ///
    /// Samples already queued for the old stage are drained through it first
    /// when it has somewhere to write them; otherwise they stay on the input
    /// link for the new stage. If the new stage refuses a link, the old stage
    /// stays in place.
    pub fn replace(&mut self, index: usize, mut stage: Box<dyn Stage>) -> ChainResult<()> {
        let len = self.stages.len();
        if index >= len {
            return Err(ChainError::OutOfRange { index, len });
        }

        let input = self.input_link(index);
        let output = self.output_link(index);

        let has_pending = self.stages[index]
            .ports()
            .input
            .as_ref()
            .is_some_and(|link| !link.is_empty());
        if has_pending && output.is_some() {
            self.stages[index].work()?;
        }

        stage.set_input(input)?;
        stage.set_output(output)?;

        let mut old = std::mem::replace(&mut self.stages[index], stage);
        if let Err(err) = old.set_input(None).and_then(|_| old.set_output(None)) {
            debug!("detaching {} failed: {}", old.spec().name(), err);
        }
        old.release();

        self.metrics.record_replacement();
        info!(
            "replaced stage {} ({} -> {})",
            index,
            old.spec().name(),
            self.stages[index].spec().name()
        );
        Ok(())
    }

    /// Runs every stage once in data-flow order and returns the number of
    /// samples the last stage produced.
    pub fn work(&mut self) -> ChainResult<usize> {
        if self.input.is_none() {
            return Err(ChainError::Disconnected("chain input".into()));
        }
        if self.output.is_none() {
            return Err(ChainError::Disconnected("chain output".into()));
        }

        let mut produced = 0;
        for stage in self.stages.iter_mut() {
            produced = stage.work()?;
        }
        self.metrics.record_pass(produced);
        Ok(produced)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn input_link(&self, index: usize) -> Option<Link> {
        if index == 0 {
            self.input.clone()
        } else {
            Some(self.links[index - 1].clone())
        }
    }

    fn output_link(&self, index: usize) -> Option<Link> {
        if index == self.stages.len() - 1 {
            self.output.clone()
        } else {
            Some(self.links[index].clone())
        }
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.release();
        }
    }
}
