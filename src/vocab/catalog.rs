//! Word pack catalog
//!
//! The catalog is static content. A JSON file can replace the built-in packs:
//! ```json
//! [{ "name": "...", "icon": "🦉", "character": "...", "characterPrompt": "...",
//!    "color": "bg-pink-100", "words": [{ "id": "...", "en": "...", "cn": "...", "category": "..." }] }]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::VocabularyEntry;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog has no word packs")]
    Empty,

    #[error("Duplicate word id: {0}")]
    DuplicateWord(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// An ordered group of words presented together, fronted by a mascot character
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPack {
    pub name: String,
    /// Fallback glyph shown while (or instead of) the generated icon
    pub icon: String,
    pub character: String,
    /// Prompt sent to the image service to draw the character icon
    pub character_prompt: String,
    #[serde(default)]
    pub color: String,
    pub words: Vec<VocabularyEntry>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    packs: Vec<WordPack>,
}

impl Catalog {
    pub fn new(packs: Vec<WordPack>) -> Result<Self> {
        if packs.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for word in packs.iter().flat_map(|p| p.words.iter()) {
            if !seen.insert(word.id.as_str()) {
                return Err(CatalogError::DuplicateWord(word.id.clone()));
            }
        }

        Ok(Self { packs })
    }

    /// Load packs from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let packs: Vec<WordPack> = serde_json::from_str(&content)?;
        log::info!("catalog: loaded {} packs from {}", packs.len(), path.display());
        Self::new(packs)
    }

    pub fn packs(&self) -> &[WordPack] {
        &self.packs
    }

    pub fn pack(&self, name: &str) -> Option<&WordPack> {
        self.packs.iter().find(|p| p.name == name)
    }

    /// Name of the first pack, used as the starting category
    pub fn default_category(&self) -> &str {
        &self.packs[0].name
    }

    pub fn all_words(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.packs.iter().flat_map(|p| p.words.iter())
    }

    pub fn find_word(&self, word_id: &str) -> Option<&VocabularyEntry> {
        self.all_words().find(|w| w.id == word_id)
    }

    /// Packs shipped with the application
    pub fn builtin() -> Self {
        Self {
            packs: vec![subjects_pack(), animals_pack()],
        }
    }
}

/// Name of the first built-in category
pub const DEFAULT_CATEGORY: &str = "Unit 1 学科王国";

fn pack_words(category: &str, words: &[(&str, &str, &str)]) -> Vec<VocabularyEntry> {
    words
        .iter()
        .map(|(id, en, cn)| VocabularyEntry::new(id, en, cn, category))
        .collect()
}

fn subjects_pack() -> WordPack {
    WordPack {
        name: DEFAULT_CATEGORY.to_string(),
        icon: "🦉".to_string(),
        character: "Professor Owl".to_string(),
        character_prompt: "Cute 3D cartoon owl professor wearing round glasses, big sparkling eyes, \
            soft pastel background, app icon style."
            .to_string(),
        color: "bg-pink-100".to_string(),
        words: pack_words(
            DEFAULT_CATEGORY,
            &[
                ("u1-math", "math", "数学"),
                ("u1-music", "music", "音乐"),
                ("u1-art", "art", "美术"),
                ("u1-science", "science", "科学"),
                ("u1-english", "English", "英语"),
                ("u1-chinese", "Chinese", "语文"),
                ("u1-pe", "PE", "体育"),
                ("u1-history", "history", "历史"),
            ],
        ),
    }
}

fn animals_pack() -> WordPack {
    let category = "Unit 2 动物王国";
    WordPack {
        name: category.to_string(),
        icon: "🐼".to_string(),
        character: "Panda Ranger".to_string(),
        character_prompt: "Cute 3D cartoon panda park ranger with a little hat, big sparkling eyes, \
            soft pastel background, app icon style."
            .to_string(),
        color: "bg-green-100".to_string(),
        words: pack_words(
            category,
            &[
                ("u2-cat", "cat", "猫"),
                ("u2-dog", "dog", "狗"),
                ("u2-rabbit", "rabbit", "兔子"),
                ("u2-panda", "panda", "熊猫"),
                ("u2-tiger", "tiger", "老虎"),
                ("u2-elephant", "elephant", "大象"),
                ("u2-monkey", "monkey", "猴子"),
                ("u2-bird", "bird", "鸟"),
            ],
        ),
    }
}
