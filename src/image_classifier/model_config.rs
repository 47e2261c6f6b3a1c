#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// Side of the square buffer the frame is drawn into before cropping.
    pub capture_size: u32,
    /// (height, width) of the model input.
    pub input_shape: (u32, u32),
}
