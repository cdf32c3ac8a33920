//! DistilBERT sequence classifier running on candle.
//!
//! The encoder comes from `candle_transformers`; the classification head
//! (`pre_classifier` → ReLU → `classifier` over the `[CLS]` state) matches the
//! layout written by `DistilBertForSequenceClassification` checkpoints.

use super::cache::ModelCache;
use super::device::{describe, select_device};
use super::types::Classification;
use super::TextClassifier;
use crate::{Error, Result, config::ModelConfig};
use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder, linear, ops::softmax};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// The parts of `config.json` the classification head needs.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    dim: usize,
    max_position_embeddings: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

pub struct DistilBertClassifier {
    encoder: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    id2label: HashMap<u32, String>,
    device: Device,
}

impl DistilBertClassifier {
    /// Loads weights, config and tokenizer from the cache directory and binds
    /// them to the configured device.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let cache = ModelCache::new(&config.cache_dir);
        let device = select_device(config.device, config.cuda_ordinal)?;

        info!(
            "Loading DistilBERT classifier from {} on {}",
            cache.dir().display(),
            describe(&device)
        );

        let config_path = cache.config_path();
        let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::model(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;
        let encoder_config: DistilBertConfig = serde_json::from_str(&config_str)?;
        let head_config: HeadConfig = serde_json::from_str(&config_str)?;

        let id2label = parse_id2label(&head_config.id2label)?;
        if id2label.is_empty() {
            return Err(Error::model("config.json has no id2label mapping"));
        }

        let weights_path = cache.weights_path().ok_or_else(|| {
            Error::model(format!(
                "Model weights not found in {}",
                cache.dir().display()
            ))
        })?;
        let vb = var_builder(&weights_path, &device)?;

        let encoder = DistilBertModel::load(vb.pp("distilbert"), &encoder_config)?;
        let pre_classifier = linear(head_config.dim, head_config.dim, vb.pp("pre_classifier"))?;
        let classifier = linear(head_config.dim, id2label.len(), vb.pp("classifier"))?;

        let mut tokenizer = cache.load_tokenizer()?;
        let max_length = config.max_length.min(head_config.max_position_embeddings);
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))?;

        info!(
            "Model loaded with labels {:?}, max length {}",
            id2label.values().collect::<Vec<_>>(),
            max_length
        );

        Ok(Self {
            encoder,
            pre_classifier,
            classifier,
            tokenizer,
            id2label,
            device,
        })
    }

    /// Softmax probabilities over the model's labels, indexed by label id.
    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self.tokenizer.encode(text, true)?;
        debug!("Encoded input into {} tokens", encoding.len());

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        // Non-zero entries are excluded from attention.
        let padding_mask = Tensor::new(encoding.get_attention_mask(), &self.device)?
            .unsqueeze(0)?
            .eq(0u32)?;

        let hidden = self.encoder.forward(&input_ids, &padding_mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;

        let probs = softmax(&logits, D::Minus1)?;
        Ok(probs.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()?)
    }
}

impl TextClassifier for DistilBertClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        let probs = self.probabilities(text)?;

        let (pred_id, score) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| Error::inference("Model produced no logits"))?;

        let label = self
            .id2label
            .get(&(pred_id as u32))
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{}", pred_id));

        Ok(Classification { label, score })
    }
}

fn var_builder(weights_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let is_safetensors = weights_path
        .extension()
        .is_some_and(|ext| ext == "safetensors");

    let vb = if is_safetensors {
        // SAFETY: the cache directory is written once by `prepare-model` and
        // not modified while the service runs.
        unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
    } else {
        VarBuilder::from_pth(weights_path, DType::F32, device)?
    };
    Ok(vb)
}

fn parse_id2label(raw: &HashMap<String, String>) -> Result<HashMap<u32, String>> {
    raw.iter()
        .map(|(id, label)| {
            id.parse::<u32>()
                .map(|id| (id, label.clone()))
                .map_err(|_| Error::model(format!("Invalid label id '{}' in id2label", id)))
        })
        .collect()
}
