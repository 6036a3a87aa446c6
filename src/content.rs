//! Form inputs and the generated content bundle
//!
//! These types are shared by the TUI and the one-shot `generate` command and
//! don't depend on any UI framework.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Humorous,
    Formal,
    Casual,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Humorous => "humorous",
            Tone::Formal => "formal",
            Tone::Casual => "casual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "humorous" => Some(Tone::Humorous),
            "formal" => Some(Tone::Formal),
            "casual" => Some(Tone::Casual),
            _ => None,
        }
    }

    pub fn all() -> Vec<Tone> {
        vec![Tone::Humorous, Tone::Formal, Tone::Casual]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tone::Humorous => "Humorous",
            Tone::Formal => "Formal",
            Tone::Casual => "Casual",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tone::Humorous => Tone::Formal,
            Tone::Formal => Tone::Casual,
            Tone::Casual => Tone::Humorous,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tone::Humorous => Tone::Casual,
            Tone::Formal => Tone::Humorous,
            Tone::Casual => Tone::Formal,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Twitter,
    Instagram,
    Linkedin,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "twitter" => Some(Platform::Twitter),
            "instagram" => Some(Platform::Instagram),
            "linkedin" => Some(Platform::Linkedin),
            _ => None,
        }
    }

    pub fn all() -> Vec<Platform> {
        vec![Platform::Twitter, Platform::Instagram, Platform::Linkedin]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "LinkedIn",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Platform::Twitter => Platform::Instagram,
            Platform::Instagram => Platform::Linkedin,
            Platform::Linkedin => Platform::Twitter,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Platform::Twitter => Platform::Linkedin,
            Platform::Instagram => Platform::Twitter,
            Platform::Linkedin => Platform::Instagram,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asks the generation service for.
///
/// Serializes to the request body of `POST /generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormInput {
    pub prompt: String,
    pub tone: Tone,
    pub platform: Platform,
}

impl FormInput {
    pub fn new(prompt: impl Into<String>, tone: Tone, platform: Platform) -> Self {
        Self {
            prompt: prompt.into(),
            tone,
            platform,
        }
    }

    /// The prompt is the only required field.
    pub fn is_submittable(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// The multi-media bundle returned by the generation service.
///
/// Every field is optional on the wire; absent fields become empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedContent {
    pub text: String,
    pub image: String,
    pub video: String,
    pub meme: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl GeneratedContent {
    /// The field shown by `view`, or `None` when the service left it empty.
    pub fn field(&self, view: ContentView) -> Option<&str> {
        let value = match view {
            ContentView::Text => &self.text,
            ContentView::Image => &self.image,
            ContentView::Video => &self.video,
            ContentView::Meme => &self.meme,
        };
        if value.is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// The four mutually exclusive result tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentView {
    #[default]
    Text,
    Image,
    Video,
    Meme,
}

impl ContentView {
    pub fn all() -> [ContentView; 4] {
        [
            ContentView::Text,
            ContentView::Image,
            ContentView::Video,
            ContentView::Meme,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ContentView::Text => "Text",
            ContentView::Image => "Image",
            ContentView::Video => "Video",
            ContentView::Meme => "Meme",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ContentView::Text => "No text generated.",
            ContentView::Image => "No image generated.",
            ContentView::Video => "No video generated.",
            ContentView::Meme => "No meme generated.",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ContentView::Text => 0,
            ContentView::Image => 1,
            ContentView::Video => 2,
            ContentView::Meme => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Whether the field is a media URL rather than prose.
    pub fn is_media(&self) -> bool {
        !matches!(self, ContentView::Text)
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % 4).unwrap_or_default()
    }

    pub fn prev(self) -> Self {
        Self::from_index((self.index() + 3) % 4).unwrap_or_default()
    }

    /// Hit-test a column offset against the tab strip.
    ///
    /// Tabs are laid out as ` Title ` separated by a one-column divider,
    /// which is how `ratatui::widgets::Tabs` draws them with default padding.
    pub fn at_offset(offset: u16) -> Option<Self> {
        let mut start = 0u16;
        for view in Self::all() {
            let width = view.title().len() as u16 + 2;
            if offset >= start && offset < start + width {
                return Some(view);
            }
            start += width + 1;
        }
        None
    }
}
