use sentiment_service::{
    Error, Result,
    model::{Classification, TextClassifier},
};
use std::sync::{Arc, Mutex};

const POSITIVE_WORDS: [&str; 4] = ["love", "great", "excellent", "amazing"];
const NEGATIVE_WORDS: [&str; 4] = ["terrible", "hate", "awful", "worst"];

/// Keyword-driven stand-in for the DistilBERT pipeline
#[derive(Debug, Default)]
pub struct MockClassifier {
    pub inputs: Arc<Mutex<Vec<String>>>,
    pub fixed: Option<(String, f32)>,
    pub error: Option<String>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: &str, score: f32) -> Self {
        self.fixed = Some((label.to_string(), score));
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Shared handle to every text the classifier has seen
    pub fn inputs(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.inputs)
    }
}

impl TextClassifier for MockClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        self.inputs.lock().unwrap().push(text.to_string());

        if let Some(ref error) = self.error {
            return Err(Error::inference(error.clone()));
        }

        if let Some((ref label, score)) = self.fixed {
            return Ok(Classification {
                label: label.clone(),
                score,
            });
        }

        let lower = text.to_lowercase();
        let (label, score) = if POSITIVE_WORDS.iter().any(|w| lower.contains(w)) {
            ("POSITIVE", 0.9998)
        } else if NEGATIVE_WORDS.iter().any(|w| lower.contains(w)) {
            ("NEGATIVE", 0.9995)
        } else {
            // Two-class models still commit to a side on neutral text
            ("POSITIVE", 0.61)
        };

        Ok(Classification {
            label: label.to_string(),
            score,
        })
    }
}
