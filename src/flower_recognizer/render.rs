use crate::device_camera::interface::FacingMode;
use crate::flower_recognizer::core::{Model, ModelCamera, ModelClassifier};
use crate::image_classifier::interface::Outcome;

pub const TITLE: &str = "Flower Recognition App";

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub title: &'static str,
    pub classify_button: ButtonView,
    pub switch_camera_button: ButtonView,
    /// The user-facing camera is shown like a mirror.
    pub mirror_preview: bool,
    pub status: Option<String>,
    pub result: Option<ResultPanel>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub enabled: bool,
    pub spinner: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultPanel {
    pub title: &'static str,
    pub flower: String,
    pub confidence: String,
}

pub fn render(model: &Model) -> View {
    View {
        title: TITLE,
        classify_button: ButtonView {
            label: if model.busy {
                "Recognizing..."
            } else {
                "Recognize Flower"
            },
            enabled: model.can_trigger_classify(),
            spinner: model.busy,
        },
        switch_camera_button: ButtonView {
            label: "Switch Camera",
            enabled: true,
            spinner: false,
        },
        mirror_preview: model.facing_mode == FacingMode::User,
        status: render_status(model),
        result: model.outcome.as_ref().map(render_result),
    }
}

pub fn render_result(outcome: &Outcome) -> ResultPanel {
    ResultPanel {
        title: "Recognition Result",
        flower: outcome.label.name().to_string(),
        confidence: format_confidence(outcome.confidence),
    }
}

/// `0.87231` becomes `"87.23%"`.
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", f64::from(confidence) * 100.0)
}

fn render_status(model: &Model) -> Option<String> {
    if let ModelClassifier::Failed(reason) = &model.classifier {
        return Some(format!("Model failed to load: {}", reason));
    }
    if let ModelCamera::Unavailable(reason) = &model.camera {
        return Some(format!("Camera unavailable: {}", reason));
    }
    if let Some(reason) = &model.classify_error {
        return Some(format!("Recognition failed: {}", reason));
    }
    match (&model.classifier, &model.camera) {
        (ModelClassifier::Loading, _) => Some("Loading model...".to_string()),
        (_, ModelCamera::Acquiring) => Some("Starting camera...".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::interface::FlowerLabel;

    fn ready_model() -> Model {
        Model {
            classifier: ModelClassifier::Loaded,
            camera: ModelCamera::Live,
            ..Model::init(FacingMode::Environment)
        }
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.87231), "87.23%");
        assert_eq!(format_confidence(1.0), "100.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(0.5), "50.00%");
    }

    #[test]
    fn test_no_outcome_renders_no_panel() {
        let view = render(&ready_model());

        assert_eq!(view.result, None);
        assert_eq!(view.status, None);
    }

    #[test]
    fn test_outcome_renders_panel() {
        let model = Model {
            outcome: Some(Outcome {
                label: FlowerLabel::Tulip,
                confidence: 0.87231,
            }),
            ..ready_model()
        };

        let view = render(&model);

        assert_eq!(
            view.result,
            Some(ResultPanel {
                title: "Recognition Result",
                flower: "Tulip".to_string(),
                confidence: "87.23%".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_button_states() {
        let loading = render(&Model::init(FacingMode::Environment));
        assert!(!loading.classify_button.enabled);
        assert_eq!(loading.classify_button.label, "Recognize Flower");
        assert_eq!(loading.status.as_deref(), Some("Loading model..."));

        let ready = render(&ready_model());
        assert!(ready.classify_button.enabled);
        assert!(!ready.classify_button.spinner);

        let busy = render(&Model {
            busy: true,
            ..ready_model()
        });
        assert!(!busy.classify_button.enabled);
        assert!(busy.classify_button.spinner);
        assert_eq!(busy.classify_button.label, "Recognizing...");
    }

    #[test]
    fn test_switch_camera_is_always_enabled() {
        let models = [
            Model::init(FacingMode::User),
            ready_model(),
            Model {
                busy: true,
                ..ready_model()
            },
            Model {
                camera: ModelCamera::Unavailable("denied".to_string()),
                ..ready_model()
            },
        ];

        for model in &models {
            let view = render(model);
            assert!(view.switch_camera_button.enabled);
            assert_eq!(view.switch_camera_button.label, "Switch Camera");
        }
    }

    #[test]
    fn test_user_facing_preview_is_mirrored() {
        assert!(render(&Model::init(FacingMode::User)).mirror_preview);
        assert!(!render(&Model::init(FacingMode::Environment)).mirror_preview);
    }

    #[test]
    fn test_failures_are_surfaced() {
        let model = Model {
            camera: ModelCamera::Unavailable("permission denied".to_string()),
            ..ready_model()
        };
        assert_eq!(
            render(&model).status.as_deref(),
            Some("Camera unavailable: permission denied")
        );

        let model = Model {
            classifier: ModelClassifier::Failed("missing file".to_string()),
            ..ready_model()
        };
        let view = render(&model);
        assert!(!view.classify_button.enabled);
        assert_eq!(
            view.status.as_deref(),
            Some("Model failed to load: missing file")
        );
    }
}
