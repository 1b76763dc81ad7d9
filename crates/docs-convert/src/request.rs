//! `serde`-derived types mirroring the Google Docs `batchUpdate` JSON wire
//! schema, so that an [`Operation`] list can be turned into the exact
//! request bodies the external MCP tool layer submits in a `batchUpdate`
//! call. This is the only part of the crate that knows about JSON; the
//! planner and assembler work entirely in terms of [`Operation`].

use serde::Serialize;

use crate::model::{
    BulletPreset, NamedStyleType, Operation, ParagraphStyle, RgbColor, TextStyle,
};

/// Turn an ordered [`Operation`] list into the `batchUpdate` request array.
pub fn operations_to_requests(ops: &[Operation]) -> Vec<Request> {
    ops.iter().map(Request::from_operation).collect()
}

/// One single-key `batchUpdate` request object. Serializes with
/// `serde(rename_all = "camelCase")` so the variant name matches the Docs
/// API's request key (`insertText`, `updateTextStyle`, ...).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertTextRequest),
    InsertInlineImage(InsertInlineImageRequest),
    InsertTable(InsertTableRequest),
    UpdateTextStyle(UpdateTextStyleRequest),
    UpdateParagraphStyle(UpdateParagraphStyleRequest),
    CreateParagraphBullets(CreateParagraphBulletsRequest),
    DeleteParagraphBullets(DeleteParagraphBulletsRequest),
}

impl Request {
    fn from_operation(op: &Operation) -> Request {
        match op {
            Operation::InsertText { index, text } => {
                Request::InsertText(InsertTextRequest {
                    location: Location { index: *index },
                    text: text.clone(),
                })
            },
            Operation::InsertInlineImage { index, uri } => {
                Request::InsertInlineImage(InsertInlineImageRequest {
                    location: Location { index: *index },
                    uri: uri.clone(),
                })
            },
            Operation::InsertTable {
                index,
                rows,
                columns,
            } => Request::InsertTable(InsertTableRequest {
                location: Location { index: *index },
                rows: *rows,
                columns: *columns,
            }),
            Operation::UpdateTextStyle { start, end, style } => {
                Request::UpdateTextStyle(UpdateTextStyleRequest {
                    range: Range {
                        start_index: *start,
                        end_index: *end,
                    },
                    fields: style.fields_mask(),
                    text_style: TextStyleRequest::from_model(style),
                })
            },
            Operation::UpdateParagraphStyle { start, end, style } => {
                Request::UpdateParagraphStyle(UpdateParagraphStyleRequest {
                    range: Range {
                        start_index: *start,
                        end_index: *end,
                    },
                    fields: style.fields_mask(),
                    paragraph_style: ParagraphStyleRequest::from_model(style),
                })
            },
            Operation::CreateParagraphBullets { start, end, preset } => {
                Request::CreateParagraphBullets(CreateParagraphBulletsRequest {
                    range: Range {
                        start_index: *start,
                        end_index: *end,
                    },
                    bullet_preset: BulletPresetWire::from_model(*preset),
                })
            },
            Operation::DeleteParagraphBullets { start, end } => {
                Request::DeleteParagraphBullets(DeleteParagraphBulletsRequest {
                    range: Range {
                        start_index: *start,
                        end_index: *end,
                    },
                })
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertTextRequest {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertInlineImageRequest {
    pub location: Location,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertTableRequest {
    pub location: Location,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyleRequest {
    pub range: Range,
    pub text_style: TextStyleRequest,
    pub fields: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyleRequest {
    pub range: Range,
    pub paragraph_style: ParagraphStyleRequest,
    pub fields: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphBulletsRequest {
    pub range: Range,
    pub bullet_preset: BulletPresetWire,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParagraphBulletsRequest {
    pub range: Range,
}

//======================================
// Style wire types
//======================================

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamilyWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColorWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColorWire>,
}

impl TextStyleRequest {
    fn from_model(style: &TextStyle) -> Self {
        TextStyleRequest {
            bold: style.bold,
            italic: style.italic,
            underline: style.underline,
            strikethrough: style.strikethrough,
            link: style
                .link_url
                .as_ref()
                .map(|url| LinkWire { url: url.clone() }),
            weighted_font_family: style.font_family.as_ref().map(|family| {
                WeightedFontFamilyWire {
                    font_family: family.clone(),
                }
            }),
            foreground_color: style
                .foreground_color
                .map(OptionalColorWire::from_model),
            background_color: style
                .background_color
                .map(OptionalColorWire::from_model),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkWire {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamilyWire {
    pub font_family: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionalColorWire {
    pub color: ColorWire,
}

impl OptionalColorWire {
    fn from_model(color: RgbColor) -> Self {
        OptionalColorWire {
            color: ColorWire {
                rgb_color: RgbColorWire::from_model(color),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorWire {
    pub rgb_color: RgbColorWire,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RgbColorWire {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RgbColorWire {
    fn from_model(color: RgbColor) -> Self {
        RgbColorWire {
            red: color.red,
            green: color.green,
            blue: color.blue,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<DimensionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_first_line: Option<DimensionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_end: Option<DimensionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<BorderWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<BorderWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<ShadingWire>,
}

impl ParagraphStyleRequest {
    fn from_model(style: &ParagraphStyle) -> Self {
        ParagraphStyleRequest {
            named_style_type: style.named_style_type.map(NamedStyleType::wire_name),
            indent_start: style.indent_start_pt.map(DimensionWire::points),
            indent_first_line: style.indent_first_line_pt.map(DimensionWire::points),
            indent_end: style.indent_end_pt.map(DimensionWire::points),
            border_left: style.border_left.map(BorderWire::from_model),
            border_bottom: style.border_bottom.map(BorderWire::from_model),
            shading: style.shading_background.map(|color| ShadingWire {
                background_color: OptionalColorWire::from_model(color),
            }),
        }
    }
}

impl NamedStyleType {
    fn wire_name(self) -> &'static str {
        match self {
            NamedStyleType::Normal => "NORMAL_TEXT",
            NamedStyleType::Title => "TITLE",
            NamedStyleType::Heading1 => "HEADING_1",
            NamedStyleType::Heading2 => "HEADING_2",
            NamedStyleType::Heading3 => "HEADING_3",
            NamedStyleType::Heading4 => "HEADING_4",
            NamedStyleType::Heading5 => "HEADING_5",
            NamedStyleType::Heading6 => "HEADING_6",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionWire {
    pub magnitude: f64,
    pub unit: &'static str,
}

impl DimensionWire {
    fn points(magnitude: f64) -> Self {
        DimensionWire {
            magnitude,
            unit: "PT",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BorderWire {
    pub color: OptionalColorWire,
    pub width: DimensionWire,
    pub padding: DimensionWire,
    pub dash_style: &'static str,
}

impl BorderWire {
    fn from_model(border: crate::model::Border) -> Self {
        BorderWire {
            color: OptionalColorWire::from_model(border.color),
            width: DimensionWire::points(border.width_pt),
            padding: DimensionWire::points(border.padding_pt),
            dash_style: "SOLID",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShadingWire {
    pub background_color: OptionalColorWire,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BulletPresetWire(&'static str);

impl BulletPresetWire {
    fn from_model(preset: BulletPreset) -> Self {
        BulletPresetWire(match preset {
            BulletPreset::BulletDiscCircleSquare => "BULLET_DISC_CIRCLE_SQUARE",
            BulletPreset::NumberedDecimalAlphaRoman => "NUMBERED_DECIMAL_ALPHA_ROMAN",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_text_request_serializes_as_single_key_object() {
        let ops = vec![Operation::InsertText {
            index: 1,
            text: "hi\n".to_owned(),
        }];
        let requests = operations_to_requests(&ops);
        let json = serde_json::to_value(&requests).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "insertText": {
                    "location": {"index": 1},
                    "text": "hi\n",
                },
            }])
        );
    }

    #[test]
    fn update_paragraph_style_request_names_heading_and_fields() {
        let ops = vec![Operation::UpdateParagraphStyle {
            start: 1,
            end: 4,
            style: ParagraphStyle::named_style(NamedStyleType::Heading1),
        }];
        let requests = operations_to_requests(&ops);
        let json = serde_json::to_value(&requests).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "updateParagraphStyle": {
                    "range": {"startIndex": 1, "endIndex": 4},
                    "paragraphStyle": {"namedStyleType": "HEADING_1"},
                    "fields": "namedStyleType",
                },
            }])
        );
    }

    #[test]
    fn create_paragraph_bullets_request_names_preset() {
        let ops = vec![Operation::CreateParagraphBullets {
            start: 1,
            end: 5,
            preset: BulletPreset::NumberedDecimalAlphaRoman,
        }];
        let requests = operations_to_requests(&ops);
        let json = serde_json::to_value(&requests).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "createParagraphBullets": {
                    "range": {"startIndex": 1, "endIndex": 5},
                    "bulletPreset": "NUMBERED_DECIMAL_ALPHA_ROMAN",
                },
            }])
        );
    }
}
