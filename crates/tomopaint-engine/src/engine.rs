//! The orchestrator: reacts to paint and control events with debounced
//! fit/predict cycles on a single background worker.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{error, info};

use tomopaint_core::config::{EngineConfig, TomopaintConfig};
use tomopaint_core::errors::{EngineError, TomoResult};
use tomopaint_core::labels::{
    AlignedHistograms, ClassHistogram, ClassifierKind, FeatureSelection, FeatureSetId,
};
use tomopaint_core::traits::{IFittedModel, ILabelStore, IStatusSink};
use tomopaint_core::volume::{RegionScope, SpatialMask};
use tomopaint_features::{resolve, FeatureProvider};
use tomopaint_learn::{predict_volume, Trainer};
use tomopaint_store::VolumeDataset;

use crate::debounce::Debouncer;
use crate::worker::Worker;

/// Runtime toggles. Every change restarts the debounce window, so a run
/// of quick adjustments costs one cycle.
#[derive(Debug, Clone)]
pub struct ControlState {
    pub classifier: ClassifierKind,
    pub scope: RegionScope,
    pub selection: FeatureSelection,
    /// When off, cycles skip fitting entirely.
    pub live_fit: bool,
    /// When off, a fitted model is kept but never applied to the volume.
    pub live_prediction: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::RandomForest,
            scope: RegionScope::WholeVolume,
            selection: FeatureSelection::default(),
            live_fit: true,
            live_prediction: true,
        }
    }
}

/// What one completed cycle did. Sent on the completion channel so hosts
/// and tests can observe cycle boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub fitted: bool,
    pub predicted: bool,
}

pub(crate) struct EngineCore {
    pub(crate) dataset: Arc<VolumeDataset>,
    provider: FeatureProvider,
    trainer: Trainer,
    pub(crate) config: EngineConfig,
    control: Mutex<ControlState>,
    // Serializes fit/predict cycles across the worker thread and
    // synchronous callers: at most one cycle runs at a time.
    cycle_lock: Mutex<()>,
    model: RwLock<Option<Arc<dyn IFittedModel>>>,
    pub(crate) sink: Arc<dyn IStatusSink>,
    pub(crate) estimating: AtomicBool,
    completions: Sender<CycleReport>,
}

impl EngineCore {
    fn run_cycle(&self) {
        match self.cycle() {
            Ok(report) => {
                let _ = self.completions.send(report);
            }
            Err(err) => {
                error!(%err, "annotation cycle failed");
                self.sink.set_status(&format!("Error: {err}"));
                let _ = self.completions.send(CycleReport { fitted: false, predicted: false });
            }
        }
    }

    fn cycle(&self) -> TomoResult<CycleReport> {
        let _running = self.cycle_lock.lock();
        let control = self.control.lock().clone();
        let mut report = CycleReport { fitted: false, predicted: false };
        if !control.live_fit {
            self.publish_histograms()?;
            self.sink.set_status("Ready");
            return Ok(report);
        }

        self.sink.set_status("Fitting model ...");
        let mask = resolve(&control.scope, self.dataset.shape());
        let features = self.provider.fetch(&mask, control.selection)?;
        let painting = self.dataset.painting().read_region(&mask)?;

        if let Some(model) = self.trainer.fit(control.classifier, features.view(), &painting)? {
            *self.model.write() = Some(Arc::clone(&model));
            report.fitted = true;

            if control.live_prediction {
                self.sink.set_status("Predicting labels ...");
                // Training may be view-scoped, but prediction always
                // covers the whole volume and replaces the prediction
                // array wholesale.
                let full = SpatialMask::full(self.dataset.shape());
                let full_features = if mask == full {
                    features
                } else {
                    self.provider.fetch(&full, control.selection)?
                };
                let predicted =
                    predict_volume(model.as_ref(), full_features.view(), self.dataset.shape())?;
                self.dataset.prediction().replace_all(&predicted)?;
                report.predicted = true;
            }
        }

        self.publish_histograms()?;
        self.sink.set_status("Ready");
        info!(fitted = report.fitted, predicted = report.predicted, "cycle complete");
        Ok(report)
    }

    fn publish_histograms(&self) -> TomoResult<AlignedHistograms> {
        let painting = self.dataset.painting().class_histogram()?;
        let prediction = self.dataset.prediction().class_histogram()?;
        let aligned = ClassHistogram::align(&painting, &prediction);
        self.sink.update_histograms(&aligned);
        Ok(aligned)
    }
}

/// Facade the host talks to. Paint strokes and control changes come in;
/// debounced fit/predict cycles, status text, and histogram updates go
/// out through the injected sink.
pub struct AnnotationEngine {
    core: Arc<EngineCore>,
    worker: Worker<()>,
    debouncer: Debouncer,
    completions: Receiver<CycleReport>,
}

impl AnnotationEngine {
    pub fn new(
        dataset: Arc<VolumeDataset>,
        config: TomopaintConfig,
        sink: Arc<dyn IStatusSink>,
    ) -> TomoResult<Self> {
        let provider = FeatureProvider::new(
            dataset.feature_set(FeatureSetId::Intensity),
            dataset.feature_set(FeatureSetId::Embedding),
        );
        let (tx, rx) = unbounded();
        let core = Arc::new(EngineCore {
            dataset,
            provider,
            trainer: Trainer::new(config.learn),
            config: config.engine,
            control: Mutex::new(ControlState::default()),
            cycle_lock: Mutex::new(()),
            model: RwLock::new(None),
            sink,
            estimating: AtomicBool::new(false),
            completions: tx,
        });

        let worker_core = Arc::clone(&core);
        let worker = Worker::spawn("tomopaint-cycle", move |()| worker_core.run_cycle())
            .map_err(|e| EngineError::WorkerStopped { reason: e.to_string() })?;

        let slot = worker.slot();
        let window = Duration::from_millis(core.config.debounce_ms);
        let debouncer = Debouncer::spawn("tomopaint-debounce", window, move || {
            slot.submit(());
        })
        .map_err(|e| EngineError::WorkerStopped { reason: e.to_string() })?;

        Ok(Self { core, worker, debouncer, completions: rx })
    }

    // ── Painting ─────────────────────────────────────────────────────

    /// Write one painted voxel and restart the debounce window.
    pub fn paint_voxel(&self, z: usize, y: usize, x: usize, label: i32) -> TomoResult<()> {
        self.paint(&[[z, y, x]], label)
    }

    /// Write a brush stroke and restart the debounce window.
    pub fn paint(&self, voxels: &[[usize; 3]], label: i32) -> TomoResult<()> {
        self.core.dataset.painting().write_voxels(voxels, label)?;
        self.debouncer.trigger();
        Ok(())
    }

    // ── Control changes ──────────────────────────────────────────────

    pub fn set_classifier(&self, kind: ClassifierKind) {
        self.core.control.lock().classifier = kind;
        self.debouncer.trigger();
    }

    pub fn set_scope(&self, scope: RegionScope) {
        self.core.control.lock().scope = scope;
        self.debouncer.trigger();
    }

    pub fn set_selection(&self, selection: FeatureSelection) {
        self.core.control.lock().selection = selection;
        self.debouncer.trigger();
    }

    pub fn set_live_fit(&self, on: bool) {
        self.core.control.lock().live_fit = on;
        self.debouncer.trigger();
    }

    pub fn set_live_prediction(&self, on: bool) {
        self.core.control.lock().live_prediction = on;
        self.debouncer.trigger();
    }

    pub fn control(&self) -> ControlState {
        self.core.control.lock().clone()
    }

    // ── Cycles ───────────────────────────────────────────────────────

    /// Run one fit/predict cycle on the calling thread, bypassing the
    /// debounce window. Blocks until any in-flight worker cycle finishes;
    /// cycles never overlap.
    pub fn run_cycle_now(&self) -> TomoResult<CycleReport> {
        self.core.cycle()
    }

    /// Queue a cycle on the worker immediately, skipping the debounce
    /// window. Latest-wins like any other submission.
    pub fn request_cycle(&self) {
        self.worker.submit(());
    }

    /// Restart the debounce window as if a paint event had arrived.
    pub fn trigger_refit(&self) {
        self.debouncer.trigger();
    }

    /// Whether the worker is inside a cycle right now.
    pub fn is_busy(&self) -> bool {
        self.worker.is_busy()
    }

    /// Completion events, one per worker cycle, in order.
    pub fn completions(&self) -> &Receiver<CycleReport> {
        &self.completions
    }

    /// The most recently fitted model, if any cycle has produced one.
    pub fn model(&self) -> Option<Arc<dyn IFittedModel>> {
        self.core.model.read().clone()
    }

    /// Current painting/prediction class distributions, aligned over the
    /// union of observed classes.
    pub fn histograms(&self) -> TomoResult<AlignedHistograms> {
        self.core.publish_histograms()
    }

    pub fn dataset(&self) -> &Arc<VolumeDataset> {
        &self.core.dataset
    }

    pub(crate) fn core(&self) -> &Arc<EngineCore> {
        &self.core
    }
}
