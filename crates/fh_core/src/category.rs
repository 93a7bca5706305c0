use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The fixed set of article categories. `General` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Ai,
    Apple,
    GoogleAndroid,
    Business,
    Technology,
    Gadget,
    Programming,
    Game,
    AutoEv,
    Crypto,
    Book,
    General,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Ai,
        Category::Apple,
        Category::GoogleAndroid,
        Category::Business,
        Category::Technology,
        Category::Gadget,
        Category::Programming,
        Category::Game,
        Category::AutoEv,
        Category::Crypto,
        Category::Book,
        Category::General,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Ai => "ai",
            Category::Apple => "apple",
            Category::GoogleAndroid => "google_android",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Gadget => "gadget",
            Category::Programming => "programming",
            Category::Game => "game",
            Category::AutoEv => "auto_ev",
            Category::Crypto => "crypto",
            Category::Book => "book",
            Category::General => "general",
        }
    }

    /// Display label used on the rendered site.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Ai => "AI・機械学習",
            Category::Apple => "Apple製品",
            Category::GoogleAndroid => "Google・Android",
            Category::Business => "ビジネス・投資",
            Category::Technology => "テクノロジー",
            Category::Gadget => "ガジェット",
            Category::Programming => "プログラミング",
            Category::Game => "ゲーム",
            Category::AutoEv => "自動車・EV",
            Category::Crypto => "暗号通貨・ブロックチェーン",
            Category::Book => "書籍・教育",
            Category::General => "一般",
        }
    }

    /// Accepts either the slug or the display label. Older artifacts used
    /// `tech` for technology.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "tech" {
            return Some(Category::Technology);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == name || c.label() == name)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

// Unknown names collapse to the fallback so categorization stays total.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Category::from_name(&name).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_and_label_lookup() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.slug()), Some(category));
            assert_eq!(Category::from_name(category.label()), Some(category));
        }
        assert_eq!(Category::from_name("tech"), Some(Category::Technology));
        assert_eq!(Category::from_name("sports"), None);
    }

    #[test]
    fn test_unknown_category_deserializes_to_general() {
        let category: Category = serde_json::from_str("\"sports\"").unwrap();
        assert_eq!(category, Category::General);

        let category: Category = serde_json::from_str("\"Apple製品\"").unwrap();
        assert_eq!(category, Category::Apple);
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"apple\"");
    }
}
