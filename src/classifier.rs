//! Name-based classification of applications.
//!
//! A name maps to a glyph, a category, the category's color pair and a short
//! label. All rule tables are ordered; the first matching rule wins, so
//! product-specific rules sit before broader ones.

use serde::Serialize;

pub const DISPLAY_NAME_MAX: usize = 12;
pub const GENERIC_GLYPH: &str = "📱";
pub const DEFAULT_CATEGORY: &str = "default";
const ELLIPSIS: char = '…';
const PLAIN_LABEL_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub normal: &'static str,
    pub hover: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub icon: String,
    pub category: &'static str,
    pub colors: ColorPair,
    pub display_name: String,
    pub full_name: String,
}

pub trait Classifier: Send + Sync {
    fn classify(&self, name: &str) -> Classification;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Patterns,
    Plain,
}

pub fn create_classifier(kind: ClassifierKind) -> Box<dyn Classifier> {
    match kind {
        ClassifierKind::Patterns => Box::new(PatternClassifier::default()),
        ClassifierKind::Plain => Box::new(PlainClassifier),
    }
}

const ICON_RULES: &[(&[&str], &str)] = &[
    // development
    (&["visual studio", "vs code", "code"], "👨‍💻"),
    (&["xcode"], "🔨"),
    (&["cursor", "windsurf"], "⚡"),
    (&["zed"], "⚡"),
    (&["jetbrains", "toolbox"], "🧰"),
    // browsers
    (&["chrome", "google chrome"], "🌐"),
    (&["safari"], "🧭"),
    (&["firefox"], "🦊"),
    (&["arc"], "🌈"),
    // communication
    (&["discord"], "💬"),
    (&["zoom"], "📹"),
    (&["teams", "microsoft teams"], "👥"),
    (&["outlook"], "📧"),
    // creative
    (&["imovie"], "🎬"),
    (&["garageband"], "🎵"),
    (&["keynote"], "📊"),
    (&["pages"], "📝"),
    (&["numbers"], "📈"),
    // utilities
    (&["raycast"], "🚀"),
    (&["commander", "finder"], "📁"),
    (&["dropbox"], "📦"),
    (&["onedrive", "google drive"], "☁️"),
    (&["defender", "security"], "🛡️"),
    // documents
    (&["notion"], "📋"),
    (&["obsidian"], "🧠"),
    (&["kindle", "amazon kindle"], "📚"),
    (&["upnote"], "📝"),
    // google
    (&["google docs"], "📝"),
    (&["google sheets"], "📊"),
    (&["google slides"], "🎯"),
    // microsoft office
    (&["word", "microsoft word"], "📄"),
    (&["excel", "microsoft excel"], "📊"),
    (&["powerpoint", "microsoft powerpoint"], "🎯"),
    (&["onenote", "microsoft onenote"], "📝"),
    // misc
    (&["docker"], "🐳"),
    (&["chatgpt"], "🤖"),
    (&["perplexity"], "🔍"),
    (&["devtoys"], "🔧"),
    (&["iterm", "terminal"], "⌨️"),
    (&["pgadmin"], "🗄️"),
    (&["karabiner"], "⌨️"),
    (&["logi"], "🖱️"),
    (&["calendar", "notion calendar"], "📅"),
    (&["github"], "🐙"),
    (&["anaconda"], "🐍"),
    (&["hhkb"], "⌨️"),
];

const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "development",
        &[
            "visual studio", "vs code", "code", "xcode", "cursor", "windsurf", "zed",
            "jetbrains", "toolbox", "docker", "github", "anaconda", "iterm", "terminal",
            "devtoys", "pgadmin",
        ],
    ),
    ("browser", &["chrome", "safari", "firefox", "arc"]),
    ("communication", &["discord", "zoom", "teams", "outlook"]),
    ("creative", &["imovie", "garageband", "keynote", "pages", "numbers"]),
    (
        "utility",
        &[
            "raycast", "commander", "finder", "dropbox", "onedrive", "google drive",
            "defender", "karabiner", "logi", "hhkb",
        ],
    ),
    ("document", &["notion", "obsidian", "kindle", "upnote"]),
    ("google", &["google docs", "google sheets", "google slides", "google drive"]),
    (
        "microsoft",
        &["word", "excel", "powerpoint", "onenote", "teams", "outlook", "onedrive"],
    ),
];

const DEFAULT_COLORS: ColorPair = ColorPair {
    normal: "rgba(102, 126, 234, 0.8)",
    hover: "rgba(118, 75, 162, 0.8)",
};

const CATEGORY_COLORS: &[(&str, ColorPair)] = &[
    (
        "development",
        ColorPair { normal: "rgba(76, 175, 80, 0.8)", hover: "rgba(56, 142, 60, 1.0)" },
    ),
    (
        "browser",
        ColorPair { normal: "rgba(33, 150, 243, 0.8)", hover: "rgba(25, 118, 210, 1.0)" },
    ),
    (
        "communication",
        ColorPair { normal: "rgba(156, 39, 176, 0.8)", hover: "rgba(123, 31, 162, 1.0)" },
    ),
    (
        "creative",
        ColorPair { normal: "rgba(255, 152, 0, 0.8)", hover: "rgba(230, 126, 34, 1.0)" },
    ),
    (
        "utility",
        ColorPair { normal: "rgba(96, 125, 139, 0.8)", hover: "rgba(69, 90, 100, 1.0)" },
    ),
    (
        "document",
        ColorPair { normal: "rgba(63, 81, 181, 0.8)", hover: "rgba(48, 63, 159, 1.0)" },
    ),
    (
        "google",
        ColorPair { normal: "rgba(244, 67, 54, 0.8)", hover: "rgba(211, 47, 47, 1.0)" },
    ),
    (
        "microsoft",
        ColorPair { normal: "rgba(0, 150, 136, 0.8)", hover: "rgba(0, 121, 107, 1.0)" },
    ),
    (DEFAULT_CATEGORY, DEFAULT_COLORS),
];

const PRIORITY_WORDS: &[&str] = &["VS", "Code", "Chrome", "Safari", "Firefox", "Teams", "Word", "Excel"];

/// The full rule tables.
#[derive(Clone, Copy, Debug)]
pub struct PatternClassifier {
    max_display_len: usize,
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self {
            max_display_len: DISPLAY_NAME_MAX,
        }
    }
}

impl PatternClassifier {
    pub fn with_max_display_len(max_display_len: usize) -> Self {
        Self {
            max_display_len: max_display_len.max(1),
        }
    }

    pub fn icon(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        ICON_RULES
            .iter()
            .find(|(patterns, _)| matches_any(&lower, patterns))
            .map(|(_, glyph)| glyph.to_string())
            .unwrap_or_else(|| initial_glyph(name))
    }

    pub fn category(&self, name: &str) -> &'static str {
        let lower = name.to_lowercase();
        CATEGORY_RULES
            .iter()
            .find(|(_, patterns)| matches_any(&lower, patterns))
            .map(|(category, _)| *category)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn display_name(&self, name: &str) -> String {
        let max = self.max_display_len;
        if name.chars().count() <= max {
            return name.to_string();
        }

        let lower = name.to_lowercase();
        if let Some(word) = PRIORITY_WORDS
            .iter()
            .find(|word| lower.contains(&word.to_lowercase()))
        {
            return word.to_string();
        }

        if let Some(first) = name.split_whitespace().next() {
            if first.chars().count() <= max {
                return first.to_string();
            }
        }

        let mut short: String = name.chars().take(max - 1).collect();
        short.push(ELLIPSIS);
        short
    }
}

impl Classifier for PatternClassifier {
    fn classify(&self, name: &str) -> Classification {
        let category = self.category(name);
        Classification {
            icon: self.icon(name),
            category,
            colors: colors_for(category),
            display_name: self.display_name(name),
            full_name: name.to_string(),
        }
    }
}

/// Stand-in used when the rule tables are not wanted: one glyph, one palette.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainClassifier;

impl Classifier for PlainClassifier {
    fn classify(&self, name: &str) -> Classification {
        Classification {
            icon: GENERIC_GLYPH.to_string(),
            category: DEFAULT_CATEGORY,
            colors: DEFAULT_COLORS,
            display_name: name.chars().take(PLAIN_LABEL_LEN).collect(),
            full_name: name.to_string(),
        }
    }
}

pub fn colors_for(category: &str) -> ColorPair {
    CATEGORY_COLORS
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, pair)| *pair)
        .unwrap_or(DEFAULT_COLORS)
}

fn matches_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| haystack.contains(pattern))
}

fn initial_glyph(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| GENERIC_GLYPH.to_string())
}
