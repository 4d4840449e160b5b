mod vision_client;

pub use vision_client::{GeminiVisionClient, VisionError, VisionModel};
