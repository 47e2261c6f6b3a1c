use crate::device_camera::interface::Frame;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowerLabel {
    Daisy,
    Dandelion,
    Rose,
    Sunflower,
    Tulip,
}

/// Output order of the model. Index `i` of the score vector belongs to `FLOWER_LABELS[i]`.
pub const FLOWER_LABELS: [FlowerLabel; 5] = [
    FlowerLabel::Daisy,
    FlowerLabel::Dandelion,
    FlowerLabel::Rose,
    FlowerLabel::Sunflower,
    FlowerLabel::Tulip,
];

impl FlowerLabel {
    pub fn from_index(index: usize) -> Option<Self> {
        FLOWER_LABELS.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlowerLabel::Daisy => "Daisy",
            FlowerLabel::Dandelion => "Dandelion",
            FlowerLabel::Rose => "Rose",
            FlowerLabel::Sunflower => "Sunflower",
            FlowerLabel::Tulip => "Tulip",
        }
    }
}

impl fmt::Display for FlowerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one classification run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub label: FlowerLabel,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyError {
    NoFrame,
    ModelNotLoaded,
    UnexpectedOutputLength { expected: usize, actual: usize },
    InvalidScore { index: usize, score: f32 },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::NoFrame => write!(f, "no camera frame available"),
            ClassifyError::ModelNotLoaded => write!(f, "model has not finished loading"),
            ClassifyError::UnexpectedOutputLength { expected, actual } => {
                write!(f, "model returned {actual} scores, expected {expected}")
            }
            ClassifyError::InvalidScore { index, score } => {
                write!(f, "score {score} at index {index} is not in [0, 1]")
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

pub trait ImageClassifier {
    /// Loads the model artifact. Calling it again after success is a no-op.
    fn load(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn is_loaded(&self) -> bool;

    /// Runs the forward pass and returns one score per entry of `FLOWER_LABELS`.
    fn infer(&self, frame: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>>;
}
