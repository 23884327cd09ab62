use std::fs;
use std::path::Path;

use rand::seq::IndexedRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{Difficulty, Snippet, SnippetProvider};

const BUILTIN: &str = include_str!("../../data/snippets.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
    #[error("language '{0}' is listed more than once")]
    DuplicateLanguage(String),
    #[error("snippet #{index} has a blank answer")]
    EmptyAnswer { index: usize },
    #[error("snippet #{index} uses topic '{topic}' which is not listed for '{language}'")]
    UnknownTopic {
        index: usize,
        language: String,
        topic: String,
    },
    #[error("no snippet available for {language} / {topic}")]
    NoSnippet { language: String, topic: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub topics: Vec<String>,
}

/// Snippet collection loaded from JSON, validated on load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile")]
pub struct Catalog {
    languages: Vec<LanguageEntry>,
    snippets: Vec<Snippet>,
}

/// Catalog as it appears on disk, before validation
#[derive(Deserialize)]
struct CatalogFile {
    languages: Vec<LanguageEntry>,
    snippets: Vec<Snippet>,
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        let catalog = Catalog {
            languages: file.languages,
            snippets: file.snippets,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

impl Catalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), snippets = catalog.snippets.len(), "loaded snippet catalog");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Catalog::try_from(file)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (i, lang) in self.languages.iter().enumerate() {
            if self.languages[..i].iter().any(|l| l.name == lang.name) {
                return Err(CatalogError::DuplicateLanguage(lang.name.clone()));
            }
        }

        for (index, snippet) in self.snippets.iter().enumerate() {
            if snippet.answer.trim().is_empty() {
                return Err(CatalogError::EmptyAnswer { index });
            }
            let listed = self
                .language(&snippet.language)
                .is_some_and(|l| l.topics.contains(&snippet.topic));
            if !listed {
                return Err(CatalogError::UnknownTopic {
                    index,
                    language: snippet.language.clone(),
                    topic: snippet.topic.clone(),
                });
            }
        }
        Ok(())
    }

    fn language(&self, name: &str) -> Option<&LanguageEntry> {
        self.languages.iter().find(|l| l.name == name)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Number of snippets for a language and topic, across all difficulties
    pub fn count(&self, language: &str, topic: &str) -> usize {
        self.matching(language, topic).count()
    }

    fn matching<'s: 'q, 'q>(
        &'s self,
        language: &'q str,
        topic: &'q str,
    ) -> impl Iterator<Item = &'s Snippet> + 'q {
        self.snippets
            .iter()
            .filter(move |s| s.language == language && s.topic == topic)
    }
}

impl SnippetProvider for Catalog {
    fn languages(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }

    fn topics(&self, language: &str) -> Vec<&str> {
        self.language(language)
            .map(|l| l.topics.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Uniform among exact matches, falling back to any difficulty of the
    /// same language and topic.
    fn pick(
        &self,
        language: &str,
        topic: &str,
        difficulty: Difficulty,
        rng: &mut dyn RngCore,
    ) -> Result<&Snippet, CatalogError> {
        let exact: Vec<&Snippet> = self
            .matching(language, topic)
            .filter(|s| s.difficulty == difficulty)
            .collect();

        let candidates = if exact.is_empty() {
            debug!(language, topic, %difficulty, "no exact match, using any difficulty");
            self.matching(language, topic).collect()
        } else {
            exact
        };

        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| CatalogError::NoSnippet {
                language: language.to_string(),
                topic: topic.to_string(),
            })
    }
}
