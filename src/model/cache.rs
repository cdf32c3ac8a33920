//! On-disk layout of the model cache directory and the one-shot downloader
//! that fills it from the Hugging Face Hub.

use crate::{Error, Result};
use hf_hub::api::tokio::{Api, ApiRepo};
use std::path::{Path, PathBuf};
use tokenizers::decoders::wordpiece::WordPiece as WordPieceDecoder;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Model, Tokenizer, TokenizerBuilder};
use tracing::{debug, info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";
pub const VOCAB_FILE: &str = "vocab.txt";

const WEIGHT_FILES: [&str; 2] = [SAFETENSORS_FILE, PYTORCH_FILE];

#[cfg(test)]
pub(crate) const TEST_VOCAB: &str =
    "[PAD]\n[UNK]\n[CLS]\n[SEP]\n[MASK]\ni\nlove\nthis\nproduct\n!\n";

/// Files written by [`ModelCache::download`], and the ones that could not be
/// fetched together with the reason.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub saved: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DownloadReport {
    /// True when config, weights and a tokenizer all made it to disk.
    pub fn is_complete(&self) -> bool {
        let saved = |name: &str| self.saved.iter().any(|f| f == name);
        saved(CONFIG_FILE) && WEIGHT_FILES.iter().any(|f| saved(f)) && saved(TOKENIZER_FILE)
    }
}

#[derive(Debug, Clone)]
pub struct ModelCache {
    dir: PathBuf,
}

impl ModelCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    pub fn vocab_path(&self) -> PathBuf {
        self.dir.join(VOCAB_FILE)
    }

    /// Safetensors weights if present, otherwise a pickled PyTorch checkpoint.
    pub fn weights_path(&self) -> Option<PathBuf> {
        WEIGHT_FILES
            .iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads `tokenizer.json`, or assembles an uncased WordPiece tokenizer
    /// from `vocab.txt` when only the vocabulary was saved.
    pub fn load_tokenizer(&self) -> Result<Tokenizer> {
        let tokenizer_path = self.tokenizer_path();
        if tokenizer_path.is_file() {
            debug!("Loading tokenizer from {}", tokenizer_path.display());
            return Ok(Tokenizer::from_file(&tokenizer_path)?);
        }

        let vocab_path = self.vocab_path();
        if vocab_path.is_file() {
            debug!("Building tokenizer from {}", vocab_path.display());
            return wordpiece_tokenizer(&vocab_path);
        }

        Err(Error::tokenizer(format!(
            "No {} or {} in {}",
            TOKENIZER_FILE,
            VOCAB_FILE,
            self.dir.display()
        )))
    }

    /// Downloads `repo_id` into the cache directory.
    ///
    /// A file that fails to download is recorded in the report and the
    /// remaining files are still attempted.
    pub async fn download(&self, repo_id: &str) -> Result<DownloadReport> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let api = Api::new()?;
        let repo = api.model(repo_id.to_string());
        let mut report = DownloadReport::default();

        self.fetch_first(&repo, &[CONFIG_FILE], &mut report).await;
        self.fetch_first(&repo, &WEIGHT_FILES, &mut report).await;
        self.fetch_first(&repo, &[TOKENIZER_CONFIG_FILE], &mut report)
            .await;

        match self
            .fetch_first(&repo, &[TOKENIZER_FILE, VOCAB_FILE], &mut report)
            .await
        {
            Some(VOCAB_FILE) => match self.write_tokenizer_from_vocab() {
                Ok(()) => report.saved.push(TOKENIZER_FILE.to_string()),
                Err(e) => {
                    warn!("Error saving tokenizer: {}", e);
                    report
                        .failed
                        .push((TOKENIZER_FILE.to_string(), e.to_string()));
                }
            },
            Some(_) => {}
            None => warn!("No tokenizer files found in {}", repo_id),
        }

        Ok(report)
    }

    /// Fetches the first candidate the repository provides and copies it into
    /// the cache directory. Returns the name of the stored file.
    async fn fetch_first(
        &self,
        repo: &ApiRepo,
        candidates: &[&'static str],
        report: &mut DownloadReport,
    ) -> Option<&'static str> {
        for &name in candidates {
            let stored = match repo.get(name).await {
                Ok(source) => tokio::fs::copy(&source, self.dir.join(name))
                    .await
                    .map_err(Error::from),
                Err(e) => Err(Error::from(e)),
            };

            match stored {
                Ok(_) => {
                    info!("Saved {} to {}", name, self.dir.display());
                    report.saved.push(name.to_string());
                    return Some(name);
                }
                Err(e) => {
                    warn!("Error saving {}: {}", name, e);
                    report.failed.push((name.to_string(), e.to_string()));
                }
            }
        }
        None
    }

    fn write_tokenizer_from_vocab(&self) -> Result<()> {
        let tokenizer = wordpiece_tokenizer(&self.vocab_path())?;
        tokenizer.save(self.tokenizer_path(), false)?;
        Ok(())
    }

    /// Every file under the cache directory, sorted.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.dir.clone()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Whether a file can actually be created in the cache directory.
    pub fn is_writable(&self) -> bool {
        let check_path = self.dir.join(".write_check");
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&check_path)
        {
            Ok(_) => std::fs::remove_file(&check_path).is_ok(),
            Err(e) => {
                debug!("{} is not writable: {}", self.dir.display(), e);
                false
            }
        }
    }
}

fn wordpiece_tokenizer(vocab_path: &Path) -> Result<Tokenizer> {
    let vocab = vocab_path
        .to_str()
        .ok_or_else(|| Error::tokenizer(format!("Non UTF-8 path: {}", vocab_path.display())))?;

    let model = WordPiece::from_file(vocab)
        .unk_token("[UNK]".to_string())
        .build()?;
    let special = |token: &str| {
        model
            .token_to_id(token)
            .map(|id| (token.to_string(), id))
            .ok_or_else(|| Error::tokenizer(format!("{} missing from vocabulary", token)))
    };
    let processor = BertProcessing::new(special("[SEP]")?, special("[CLS]")?);

    let tokenizer = TokenizerBuilder::new()
        .with_model(model)
        .with_normalizer(Some(BertNormalizer::new(true, true, None, true)))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(processor))
        .with_decoder(Some(WordPieceDecoder::default()))
        .build()?;

    Ok(Tokenizer::from(tokenizer))
}
