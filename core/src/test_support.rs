//! Recording stage factory shared by the unit tests.

use crate::prelude::{
    check_format, ChainError, ChainResult, Link, Ports, SampleBlock, Stage, StageFactory, StageSpec,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct JournalInner {
    built: Vec<(u64, &'static str)>,
    released: Vec<u64>,
}

/// Shared record of which stages were built and released.
#[derive(Clone, Default)]
pub struct Journal {
    inner: Arc<Mutex<JournalInner>>,
}

impl Journal {
    pub fn built(&self) -> Vec<(u64, &'static str)> {
        self.inner.lock().unwrap().built.clone()
    }

    pub fn released(&self) -> Vec<u64> {
        self.inner.lock().unwrap().released.clone()
    }

    fn register(&self, name: &'static str) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.built.len() as u64 + 1;
        inner.built.push((id, name));
        id
    }

    fn release(&self, id: u64) {
        self.inner.lock().unwrap().released.push(id);
    }
}

/// Stage that forwards sample counts and records its lifecycle.
pub struct MockStage {
    id: u64,
    spec: StageSpec,
    ports: Ports,
    journal: Journal,
    refuse_detach: bool,
}

impl Stage for MockStage {
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
        let mut produced = 0;
        for block in self.ports.drain_input()? {
            let len = block.len();
            self.ports
                .emit(SampleBlock::silence(self.output_format(), len))?;
            produced += len;
        }
        Ok(produced)
    }

    fn set_input(&mut self, link: Option<Link>) -> ChainResult<()> {
        if link.is_none() && self.refuse_detach {
            return Err(ChainError::Stage("detach refused".into()));
        }
        if let Some(link) = &link {
            check_format(self.input_format(), link.format())?;
        }
        self.ports.input = link;
        Ok(())
    }

    fn release(&mut self) {
        self.journal.release(self.id);
    }
}

#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub journal: Journal,
    fail_on: Option<&'static str>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory whose builds of the named stage fail.
    pub fn failing_on(name: &'static str) -> Self {
        Self {
            journal: Journal::default(),
            fail_on: Some(name),
        }
    }

    pub fn stage(&self, spec: StageSpec) -> Box<dyn Stage> {
        self.build(&spec).unwrap()
    }

    /// Stage that fails when its input link is detached.
    pub fn stage_refusing_detach(&self, spec: StageSpec) -> Box<dyn Stage> {
        let id = self.journal.register(spec.name());
        Box::new(MockStage {
            id,
            spec,
            ports: Ports::new(),
            journal: self.journal.clone(),
            refuse_detach: true,
        })
    }
}

impl StageFactory for RecordingFactory {
    fn build(&self, spec: &StageSpec) -> ChainResult<Box<dyn Stage>> {
        if self.fail_on == Some(spec.name()) {
            return Err(ChainError::Stage(format!("cannot build {}", spec.name())));
        }
        let id = self.journal.register(spec.name());
        Ok(Box::new(MockStage {
            id,
            spec: spec.clone(),
            ports: Ports::new(),
            journal: self.journal.clone(),
            refuse_detach: false,
        }))
    }
}

/// Address of a live stage, used to compare identities.
pub fn identity(stage: &dyn Stage) -> *const () {
    stage as *const _ as *const ()
}
