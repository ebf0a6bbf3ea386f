//! Styled paragraph model handed to a [`DocumentWriter`](crate::DocumentWriter).
//!
//! Sizes follow WordprocessingML units: font sizes in half-points, spacing and
//! indents in twentieths of a point, border widths in eighths of a point.

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    Center,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
}

impl Spacing {
    pub const fn new(before: u32, after: u32) -> Self {
        Self { before, after }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Heading1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderEdge {
    Top,
    Bottom,
}

/// Horizontal rule drawn along one edge of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub edge: BorderEdge,
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRun {
    pub text: String,
    pub size: Option<u32>,
    pub bold: bool,
    pub color: Option<&'static str>,
    pub right_to_left: Option<bool>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, hex: &'static str) -> Self {
        self.color = Some(hex);
        self
    }

    pub fn right_to_left(mut self, rtl: bool) -> Self {
        self.right_to_left = Some(rtl);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Sniffs the format from the leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Inline picture sized in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRun {
    pub data: Arc<[u8]>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    Image(ImageRun),
}

impl From<TextRun> for Inline {
    fn from(run: TextRun) -> Self {
        Inline::Text(run)
    }
}

impl From<ImageRun> for Inline {
    fn from(run: ImageRun) -> Self {
        Inline::Image(run)
    }
}

/// One paragraph of the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentBlock {
    pub alignment: Option<Alignment>,
    pub spacing: Spacing,
    pub indent_right: Option<u32>,
    pub heading: Option<HeadingLevel>,
    pub bidirectional: Option<bool>,
    pub border: Option<Border>,
    pub inlines: Vec<Inline>,
}

impl DocumentBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            alignment: Some(alignment),
            ..Self::default()
        }
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing = Spacing::new(before, after);
        self
    }

    pub fn indent_right(mut self, twips: u32) -> Self {
        self.indent_right = Some(twips);
        self
    }

    pub fn heading(mut self, level: HeadingLevel) -> Self {
        self.heading = Some(level);
        self
    }

    pub fn bidirectional(mut self, bidi: bool) -> Self {
        self.bidirectional = Some(bidi);
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn push(mut self, inline: impl Into<Inline>) -> Self {
        self.inlines.push(inline.into());
        self
    }

    /// Concatenated text of all text runs.
    pub fn plain_text(&self) -> String {
        self.inlines
            .iter()
            .filter_map(|inline| match inline {
                Inline::Text(run) => Some(run.text.as_str()),
                Inline::Image(_) => None,
            })
            .collect()
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageRun> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Image(image) => Some(image),
            Inline::Text(_) => None,
        })
    }
}

/// Page setup for the single document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub right_to_left: bool,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            right_to_left: true,
            margin_top: 1000,
            margin_right: 1500,
            margin_bottom: 1000,
            margin_left: 1500,
        }
    }
}
