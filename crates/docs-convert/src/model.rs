//! The internal document-mutation model the walker builds up and the
//! assembler (`crate::assemble`) turns into an ordered [`Operation`] list.

/// A single Google Docs `batchUpdate` request, in the shape the Converter
/// reasons about internally (absolute 1-based indices, already resolved).
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    InsertText {
        index: usize,
        text: String,
    },
    InsertInlineImage {
        index: usize,
        uri: String,
    },
    InsertTable {
        index: usize,
        rows: usize,
        columns: usize,
    },
    UpdateTextStyle {
        start: usize,
        end: usize,
        style: TextStyle,
    },
    UpdateParagraphStyle {
        start: usize,
        end: usize,
        style: ParagraphStyle,
    },
    CreateParagraphBullets {
        start: usize,
        end: usize,
        preset: BulletPreset,
    },
    DeleteParagraphBullets {
        start: usize,
        end: usize,
    },
}

/// A run of inline character formatting. Each `Some` field names a Docs
/// `TextStyle` field that this update touches; the fields mask sent to the
/// API (see [`TextStyle::fields_mask`]) is derived directly from which
/// fields are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub link_url: Option<String>,
    pub font_family: Option<String>,
    pub foreground_color: Option<RgbColor>,
    pub background_color: Option<RgbColor>,
}

impl TextStyle {
    pub fn bold() -> Self {
        TextStyle {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        TextStyle {
            italic: Some(true),
            ..Default::default()
        }
    }

    pub fn strikethrough() -> Self {
        TextStyle {
            strikethrough: Some(true),
            ..Default::default()
        }
    }

    pub fn code() -> Self {
        TextStyle {
            font_family: Some("Consolas".to_owned()),
            ..Default::default()
        }
    }

    pub fn link(url: String) -> Self {
        TextStyle {
            link_url: Some(url),
            underline: Some(true),
            foreground_color: Some(RgbColor::LINK_BLUE),
            ..Default::default()
        }
    }

    /// Comma-separated list of the Docs API field names this style touches,
    /// as required alongside any `updateTextStyle` request.
    pub fn fields_mask(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.underline.is_some() {
            fields.push("underline");
        }
        if self.strikethrough.is_some() {
            fields.push("strikethrough");
        }
        if self.link_url.is_some() {
            fields.push("link");
        }
        if self.font_family.is_some() {
            fields.push("weightedFontFamily");
        }
        if self.foreground_color.is_some() {
            fields.push("foregroundColor");
        }
        if self.background_color.is_some() {
            fields.push("backgroundColor");
        }
        fields.join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RgbColor {
    pub const LINK_BLUE: RgbColor = RgbColor {
        red: 0.06,
        green: 0.33,
        blue: 0.80,
    };

    pub const CODE_BACKGROUND: RgbColor = RgbColor {
        red: 0.961,
        green: 0.961,
        blue: 0.961,
    };

    pub const BLOCKQUOTE_BORDER: RgbColor = RgbColor {
        red: 0.7,
        green: 0.7,
        blue: 0.7,
    };
}

/// A run of paragraph-level formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyle {
    pub named_style_type: Option<NamedStyleType>,
    pub indent_start_pt: Option<f64>,
    pub indent_first_line_pt: Option<f64>,
    pub indent_end_pt: Option<f64>,
    pub border_left: Option<Border>,
    pub border_bottom: Option<Border>,
    pub shading_background: Option<RgbColor>,
}

impl ParagraphStyle {
    pub fn named_style(named_style_type: NamedStyleType) -> Self {
        ParagraphStyle {
            named_style_type: Some(named_style_type),
            ..Default::default()
        }
    }

    pub fn blockquote(depth: u32) -> Self {
        let indent = 36.0 * depth as f64;
        ParagraphStyle {
            indent_start_pt: Some(indent),
            indent_first_line_pt: Some(indent),
            border_left: Some(Border {
                width_pt: 3.0,
                color: RgbColor::BLOCKQUOTE_BORDER,
                padding_pt: 12.0,
            }),
            ..Default::default()
        }
    }

    pub fn code_fence() -> Self {
        ParagraphStyle {
            shading_background: Some(RgbColor::CODE_BACKGROUND),
            ..Default::default()
        }
    }

    pub fn rule() -> Self {
        ParagraphStyle {
            border_bottom: Some(Border {
                width_pt: 1.0,
                color: RgbColor::BLOCKQUOTE_BORDER,
                padding_pt: 1.0,
            }),
            ..Default::default()
        }
    }

    pub fn fields_mask(&self) -> String {
        let mut fields = Vec::new();
        if self.named_style_type.is_some() {
            fields.push("namedStyleType");
        }
        if self.indent_start_pt.is_some() {
            fields.push("indentStart");
        }
        if self.indent_first_line_pt.is_some() {
            fields.push("indentFirstLine");
        }
        if self.indent_end_pt.is_some() {
            fields.push("indentEnd");
        }
        if self.border_left.is_some() {
            fields.push("borderLeft");
        }
        if self.border_bottom.is_some() {
            fields.push("borderBottom");
        }
        if self.shading_background.is_some() {
            fields.push("shading");
        }
        fields.join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width_pt: f64,
    pub color: RgbColor,
    pub padding_pt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedStyleType {
    Normal,
    Title,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl NamedStyleType {
    pub fn from_heading_level(level: markdown_ast::HeadingLevel) -> Self {
        use markdown_ast::HeadingLevel::*;
        match level {
            H1 => NamedStyleType::Heading1,
            H2 => NamedStyleType::Heading2,
            H3 => NamedStyleType::Heading3,
            H4 => NamedStyleType::Heading4,
            H5 => NamedStyleType::Heading5,
            H6 => NamedStyleType::Heading6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletPreset {
    BulletDiscCircleSquare,
    NumberedDecimalAlphaRoman,
}
