use crate::model::Prediction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub sentiment: u8,
    pub confidence: f32,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            sentiment: prediction.sentiment.code(),
            confidence: prediction.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
