use crate::config::Config;
use crate::device_camera::interface::FacingMode;
use crate::image_classifier::interface::Outcome;

#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub classifier: ModelClassifier,
    pub camera: ModelCamera,
    pub facing_mode: FacingMode,
    /// Id of the newest stream acquisition. Only its result may change `camera`.
    pub stream_request: u64,
    /// Set while a classification is in flight. Disables the trigger.
    pub busy: bool,
    pub outcome: Option<Outcome>,
    /// Why the last classification run failed, cleared by the next success.
    pub classify_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ModelClassifier {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ModelCamera {
    #[default]
    Acquiring,
    Live,
    Unavailable(String),
}

impl Model {
    pub fn init(facing_mode: FacingMode) -> Self {
        Self {
            classifier: ModelClassifier::default(),
            camera: ModelCamera::default(),
            facing_mode,
            stream_request: 1,
            busy: false,
            outcome: None,
            classify_error: None,
        }
    }

    pub fn can_trigger_classify(&self) -> bool {
        self.classifier == ModelClassifier::Loaded && !self.busy
    }

    pub fn can_classify(&self) -> bool {
        self.can_trigger_classify() && self.camera == ModelCamera::Live
    }
}

#[derive(Debug)]
pub enum Event {
    ClassifierLoadDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    StreamAcquireDone {
        request: u64,
        facing_mode: FacingMode,
        result: Result<(), Box<dyn std::error::Error + Send + Sync>>,
    },
    ClassifyPressed,
    ClassifyDone(Result<Outcome, Box<dyn std::error::Error + Send + Sync>>),
    SwitchCameraPressed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    LoadClassifier,
    AcquireStream { request: u64, facing_mode: FacingMode },
    Classify,
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    let model = Model::init(config.facing_mode);
    let effects = vec![
        Effect::LoadClassifier,
        Effect::AcquireStream {
            request: model.stream_request,
            facing_mode: model.facing_mode,
        },
    ];
    (model, effects)
}

pub fn transition(_config: &Config, model: Model, event: Event) -> (Model, Vec<Effect>) {
    match event {
        Event::ClassifierLoadDone(Ok(())) => (
            Model {
                classifier: ModelClassifier::Loaded,
                ..model
            },
            vec![],
        ),

        Event::ClassifierLoadDone(Err(e)) => (
            Model {
                classifier: ModelClassifier::Failed(e.to_string()),
                ..model
            },
            vec![],
        ),

        // Superseded by a later switch, even if it was for the same mode.
        Event::StreamAcquireDone { request, .. } if request != model.stream_request => {
            (model, vec![])
        }

        Event::StreamAcquireDone {
            result: Ok(()), ..
        } => (
            Model {
                camera: ModelCamera::Live,
                ..model
            },
            vec![],
        ),

        Event::StreamAcquireDone { result: Err(e), .. } => (
            Model {
                camera: ModelCamera::Unavailable(e.to_string()),
                ..model
            },
            vec![],
        ),

        Event::SwitchCameraPressed => {
            let facing_mode = model.facing_mode.toggle();
            let request = model.stream_request + 1;
            (
                Model {
                    facing_mode,
                    stream_request: request,
                    camera: ModelCamera::Acquiring,
                    ..model
                },
                vec![Effect::AcquireStream {
                    request,
                    facing_mode,
                }],
            )
        }

        Event::ClassifyPressed if model.can_classify() => (
            Model {
                busy: true,
                ..model
            },
            vec![Effect::Classify],
        ),

        Event::ClassifyPressed => (model, vec![]),

        Event::ClassifyDone(_) if !model.busy => (model, vec![]),

        Event::ClassifyDone(Ok(outcome)) => (
            Model {
                busy: false,
                outcome: Some(outcome),
                classify_error: None,
                ..model
            },
            vec![],
        ),

        Event::ClassifyDone(Err(e)) => (
            Model {
                busy: false,
                classify_error: Some(e.to_string()),
                ..model
            },
            vec![],
        ),
    }
}
