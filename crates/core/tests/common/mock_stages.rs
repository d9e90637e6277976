//! Mock stages for integration tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tf_core::stages::{ScriptedStage, Stage, StageDescriptor, StageError, StageInput, StageSink};
use tf_protocol::{FileType, GeneratedFile, LogLevel};
use tokio::sync::Notify;

/// Descriptor named after `id`, e.g. "stage-2" / "Stage 2 role".
#[allow(dead_code)]
pub fn descriptor(id: &str) -> StageDescriptor {
    StageDescriptor::new(id, format!("{id} agent"), format!("{id} role"), format!("{id} phase"))
}

/// A stage that reports some progress and emits one file of `file_type`.
#[allow(dead_code)]
pub fn file_stage(id: &str, file_type: FileType) -> ScriptedStage {
    ScriptedStage::new(descriptor(id))
        .progress(50, format!("{id} halfway"))
        .log(LogLevel::Info, format!("{id} working"))
        .file(GeneratedFile::new(
            format!("{id}/output.txt"),
            format!("{id} content"),
            file_type,
        ))
}

/// A stage that writes `count` log lines and nothing else.
#[allow(dead_code)]
pub fn chatty_stage(id: &str, count: usize) -> ScriptedStage {
    (0..count).fold(ScriptedStage::new(descriptor(id)), |stage, i| {
        stage.log(LogLevel::Info, format!("line {i}"))
    })
}

/// Records every input it is run with.
#[allow(dead_code)]
pub struct RecordingStage {
    descriptor: StageDescriptor,
    files: Vec<GeneratedFile>,
    pub seen: Arc<Mutex<Vec<StageInput>>>,
}

#[allow(dead_code)]
impl RecordingStage {
    pub fn new(id: &str, files: Vec<GeneratedFile>) -> Self {
        Self {
            descriptor: descriptor(id),
            files,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Stage for RecordingStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(
        &self,
        input: &StageInput,
        _sink: &StageSink,
    ) -> Result<Vec<GeneratedFile>, StageError> {
        self.seen.lock().expect("lock poisoned").push(input.clone());
        Ok(self.files.clone())
    }
}

/// Blocks inside `run` until released, so tests can act while a project is
/// processing.
#[allow(dead_code)]
pub struct GateStage {
    descriptor: StageDescriptor,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[allow(dead_code)]
impl GateStage {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: descriptor(id),
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl Stage for GateStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(
        &self,
        _input: &StageInput,
        sink: &StageSink,
    ) -> Result<Vec<GeneratedFile>, StageError> {
        sink.progress(10, "Waiting at gate").await;
        self.entered.notify_one();
        self.release.notified().await;
        Ok(vec![GeneratedFile::new(
            "gate.txt",
            "released",
            FileType::Backend,
        )])
    }
}

/// Panics halfway through `run`.
#[allow(dead_code)]
pub struct PanickingStage {
    descriptor: StageDescriptor,
}

#[allow(dead_code)]
impl PanickingStage {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: descriptor(id),
        }
    }
}

#[async_trait]
impl Stage for PanickingStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(
        &self,
        _input: &StageInput,
        sink: &StageSink,
    ) -> Result<Vec<GeneratedFile>, StageError> {
        sink.progress(20, "About to index").await;
        let empty: Vec<GeneratedFile> = Vec::new();
        let file = empty[0].clone();
        Ok(vec![file])
    }
}

/// Keeps a clone of its sink after returning, so tests can report through
/// it once the stage is done.
#[allow(dead_code)]
pub struct StashingStage {
    descriptor: StageDescriptor,
    pub stashed: Arc<Mutex<Option<StageSink>>>,
}

#[allow(dead_code)]
impl StashingStage {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: descriptor(id),
            stashed: Arc::new(Mutex::new(None)),
        }
    }

    pub fn take_sink(&self) -> StageSink {
        self.stashed
            .lock()
            .expect("lock poisoned")
            .take()
            .expect("stage ran")
    }
}

#[async_trait]
impl Stage for StashingStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    async fn run(
        &self,
        _input: &StageInput,
        sink: &StageSink,
    ) -> Result<Vec<GeneratedFile>, StageError> {
        *self.stashed.lock().expect("lock poisoned") = Some(sink.clone());
        Ok(Vec::new())
    }
}
