//! Topology probe stages.
//!
//! They carry no DSP: each probe forwards silence of its output format, sized
//! by the rate change its spec describes, and counts what went through it.

use demodcore::prelude::{ChainResult, Ports, SampleBlock, Stage, StageFactory, StageSpec};
use log::debug;
use std::sync::{Arc, Mutex};

/// Per-stage counters collected by every probe built from one factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProbeCounters {
    pub name: &'static str,
    pub samples_in: usize,
    pub samples_out: usize,
    pub released: bool,
}

#[derive(Clone, Default)]
pub struct ProbeFactory {
    counters: Arc<Mutex<Vec<ProbeCounters>>>,
}

impl ProbeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of every probe built so far, in build order.
    pub fn counters(&self) -> Vec<ProbeCounters> {
        self.counters
            .lock()
            .map(|counters| counters.clone())
            .unwrap_or_default()
    }
}

impl StageFactory for ProbeFactory {
    fn build(&self, spec: &StageSpec) -> ChainResult<Box<dyn Stage>> {
        let slot = if let Ok(mut counters) = self.counters.lock() {
            counters.push(ProbeCounters {
                name: spec.name(),
                ..Default::default()
            });
            counters.len() - 1
        } else {
            0
        };
        Ok(Box::new(ProbeStage {
            spec: spec.clone(),
            ports: Ports::new(),
            ratio: output_ratio(spec),
            slot,
            counters: self.counters.clone(),
        }))
    }
}

fn output_ratio(spec: &StageSpec) -> f64 {
    match spec {
        StageSpec::FractionalDecimator { rate, .. } => f64::from(*rate),
        _ => 1.0,
    }
}

pub struct ProbeStage {
    spec: StageSpec,
    ports: Ports,
    ratio: f64,
    slot: usize,
    counters: Arc<Mutex<Vec<ProbeCounters>>>,
}

impl ProbeStage {
    fn update<F: FnOnce(&mut ProbeCounters)>(&self, apply: F) {
        if let Ok(mut counters) = self.counters.lock() {
            if let Some(entry) = counters.get_mut(self.slot) {
                apply(entry);
            }
        }
    }
}

impl Stage for ProbeStage {
    fn spec(&self) -> &StageSpec {
        &self.spec
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn work(&mut self) -> ChainResult<usize> {
        let mut consumed = 0;
        let mut produced = 0;
        for block in self.ports.drain_input()? {
            let len = (block.len() as f64 * self.ratio).round() as usize;
            self.ports
                .emit(SampleBlock::silence(self.output_format(), len))?;
            consumed += block.len();
            produced += len;
        }
        self.update(|entry| {
            entry.samples_in += consumed;
            entry.samples_out += produced;
        });
        Ok(produced)
    }

    fn release(&mut self) {
        self.update(|entry| entry.released = true);
        debug!("released probe {} ({})", self.slot, self.spec.name());
    }
}
