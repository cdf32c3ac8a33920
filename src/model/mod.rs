mod cache;
mod device;
mod distilbert;
mod types;

pub use cache::*;
pub use device::{describe, select_device};
pub use distilbert::DistilBertClassifier;
pub use types::*;

use crate::{Error, Result, config::ModelConfig};
use tracing::debug;

/// A loaded text-classification pipeline.
///
/// Implementations are shared read-only across request tasks.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification>;
}

/// Maps classifier output onto sentiment codes.
pub struct SentimentModel {
    classifier: Box<dyn TextClassifier>,
}

impl SentimentModel {
    pub fn new(classifier: impl TextClassifier + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Loads the DistilBERT pipeline described by `config`. Blocks until the
    /// weights are in memory.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        Ok(Self::new(DistilBertClassifier::load(config)?))
    }

    pub fn predict_sentiment(&self, text: &str) -> Result<Prediction> {
        let Classification { label, score } = self.classifier.classify(text)?;

        if !(0.0..=1.0).contains(&score) {
            return Err(Error::inference(format!(
                "Classifier returned confidence {} outside [0, 1]",
                score
            )));
        }

        let sentiment = Sentiment::from_label(&label);
        debug!(
            "Classified text as {} ({:?}) with confidence {:.4}",
            label, sentiment, score
        );

        Ok(Prediction {
            sentiment,
            confidence: score,
        })
    }
}
