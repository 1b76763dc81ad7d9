//! Convert a Markdown source into a single, self-consistent Google Docs
//! `batchUpdate` request batch.
//!
//! [`convert()`] is a pure function: `(markdown, start_index) -> Vec<Operation>`.
//! It parses the input with [`markdown_ast`], walks the resulting block tree
//! once to build up text, style ranges, and structural operations
//! (`crate::walker`), then orders everything into the fixed emission
//! sequence the Docs API requires (`crate::assemble`). [`request`] turns the
//! resulting [`Operation`] list into the `serde`-derived wire types an MCP
//! tool layer would submit as JSON.
//!
//! There is no I/O, no shared state between calls, and no retrying: a call
//! either returns a complete operation list or a [`ConvertError`].

mod assemble;
mod error;
mod model;
pub mod request;
mod table;
mod walker;

pub use error::ConvertError;
pub use model::{
    Border, BulletPreset, NamedStyleType, Operation, ParagraphStyle, RgbColor,
    TextStyle,
};
pub use request::{operations_to_requests, Request};

/// Convert `markdown` into the ordered list of Google Docs `batchUpdate`
/// operations that reproduce it, starting at the 1-based document index
/// `start_index`.
///
/// Returns an empty list for empty input. Returns [`ConvertError`] if the
/// Markdown cannot be parsed into a balanced block tree, or if a table
/// exceeds the column safety cap.
#[tracing::instrument(skip(markdown), fields(markdown_len = markdown.len(), start_index))]
pub fn convert(
    markdown: &str,
    start_index: usize,
) -> Result<Vec<Operation>, ConvertError> {
    let blocks = markdown_ast::markdown_to_ast(markdown)?;

    let result = walker::walk_document(&blocks, start_index)?;

    let ops = assemble::assemble(result);

    tracing::debug!(op_count = ops.len(), "converted markdown to docs batch");

    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_produces_empty_operation_list() {
        assert_eq!(convert("", 1).unwrap(), vec![]);
    }

    #[test]
    fn simple_bold_matches_worked_example() {
        let ops = convert("Here is **bold** text", 1).unwrap();

        assert_eq!(
            ops,
            vec![
                Operation::InsertText {
                    index: 1,
                    text: "Here is bold text\n".to_owned(),
                },
                Operation::UpdateTextStyle {
                    start: 9,
                    end: 13,
                    style: TextStyle::bold(),
                },
            ]
        );
    }

    #[test]
    fn adjacent_bold_runs_produce_two_ranges_not_one() {
        let ops = convert("**a****b**", 1).unwrap();

        let bold_ranges: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::UpdateTextStyle { start, end, style }
                    if style.bold == Some(true) =>
                {
                    Some((*start, *end))
                },
                _ => None,
            })
            .collect();

        assert_eq!(bold_ranges, vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn single_insert_law_holds_alongside_a_table() {
        let ops = convert("| a | b |\n|---|---|\n| 1 | 2 |", 1).unwrap();

        let body_inserts = ops
            .iter()
            .filter(|op| matches!(op, Operation::InsertText { index, .. } if *index == 1))
            .count();
        assert_eq!(body_inserts, 0, "empty buffer body insert is suppressed");

        assert_eq!(
            ops[0],
            Operation::InsertTable {
                index: 1,
                rows: 2,
                columns: 2,
            }
        );
        assert_eq!(
            ops[1],
            Operation::InsertText {
                index: 4,
                text: "a".to_owned(),
            }
        );
        assert_eq!(
            ops[2],
            Operation::InsertText {
                index: 6,
                text: "b".to_owned(),
            }
        );
        assert_eq!(
            ops[3],
            Operation::InsertText {
                index: 9,
                text: "1".to_owned(),
            }
        );
        assert_eq!(
            ops[4],
            Operation::InsertText {
                index: 11,
                text: "2".to_owned(),
            }
        );

        let header_bold = ops.iter().any(|op| {
            matches!(
                op,
                Operation::UpdateTextStyle { start: 4, end: 7, style }
                    if style.bold == Some(true)
            )
        });
        assert!(header_bold, "header row should be bolded over [4,7)");
    }

    #[test]
    fn multi_list_nesting_shifts_second_bullet_range() {
        let input = indoc! {"
            - A
              - B
            - C

            1. X
               1. Y
        "};

        let ops = convert(input, 1).unwrap();

        let text = ops
            .iter()
            .find_map(|op| match op {
                Operation::InsertText { index: 1, text } => Some(text.clone()),
                _ => None,
            })
            .expect("single body insert");
        assert_eq!(text, "A\n\tB\nC\nX\n\tY\n");

        let bullet_ops: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::CreateParagraphBullets { start, end, preset } => {
                    Some((*start, *end, *preset))
                },
                _ => None,
            })
            .collect();

        assert_eq!(bullet_ops.len(), 2);
        assert_eq!(
            bullet_ops[0],
            (1, 8, BulletPreset::BulletDiscCircleSquare)
        );
        // The second list's range is shifted back by 1 to compensate for the
        // single TAB the first CreateParagraphBullets will remove.
        assert_eq!(
            bullet_ops[1],
            (7, 12, BulletPreset::NumberedDecimalAlphaRoman)
        );
    }

    #[test]
    fn heading_after_list_deletes_bullets_on_the_heading() {
        let ops = convert("- item\n\n# H", 1).unwrap();

        let has_delete = ops
            .iter()
            .any(|op| matches!(op, Operation::DeleteParagraphBullets { .. }));
        assert!(has_delete, "heading after a list must clear bullet style");

        let has_heading_style = ops.iter().any(|op| {
            matches!(
                op,
                Operation::UpdateParagraphStyle { style, .. }
                    if style.named_style_type == Some(NamedStyleType::Heading1)
            )
        });
        assert!(has_heading_style);
    }

    #[test]
    fn blockquote_records_indent_border_and_italic_range() {
        let ops = convert("> Be *careful*.", 1).unwrap();

        assert_eq!(
            ops[0],
            Operation::InsertText {
                index: 1,
                text: "Be careful.\n".to_owned(),
            }
        );

        let has_italic_careful = ops.iter().any(|op| {
            matches!(
                op,
                Operation::UpdateTextStyle { start: 4, end: 11, style }
                    if style.italic == Some(true)
            )
        });
        assert!(has_italic_careful);

        let has_blockquote_paragraph_style = ops.iter().any(|op| {
            matches!(
                op,
                Operation::UpdateParagraphStyle { start: 1, end: 13, style }
                    if style.border_left.is_some()
            )
        });
        assert!(has_blockquote_paragraph_style);
    }

    #[test]
    fn nested_blockquote_indent_scales_with_depth() {
        let input = indoc! {"
            > outer
            > > inner
        "};

        let ops = convert(input, 1).unwrap();

        let indents: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::UpdateParagraphStyle { style, .. } => style.indent_start_pt,
                _ => None,
            })
            .collect();

        assert!(
            indents.contains(&36.0),
            "outer blockquote should indent by depth 1: {indents:?}"
        );
        assert!(
            indents.contains(&72.0),
            "inner blockquote should indent by depth 2: {indents:?}"
        );
    }

    #[test]
    fn nested_list_inside_a_blockquote_keeps_its_own_bullets() {
        let input = indoc! {"
            - item

            > - nested
        "};

        let ops = convert(input, 1).unwrap();

        let bullet_ranges: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::CreateParagraphBullets { start, end, .. } => Some((*start, *end)),
                _ => None,
            })
            .collect();
        assert_eq!(bullet_ranges.len(), 2, "both lists get their own bullet range");

        let delete_ranges: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::DeleteParagraphBullets { start, end } => Some((*start, *end)),
                _ => None,
            })
            .collect();

        for (bullet_start, bullet_end) in &bullet_ranges {
            for (delete_start, delete_end) in &delete_ranges {
                let overlaps = bullet_start < delete_end && delete_start < bullet_end;
                assert!(
                    !overlaps,
                    "a DeleteParagraphBullets range must not overlap a CreateParagraphBullets \
                     range: bullets {bullet_start:?}..{bullet_end:?} vs delete \
                     {delete_start:?}..{delete_end:?}"
                );
            }
        }
    }

    #[test]
    fn table_after_list_deletes_bullets_on_the_table() {
        let ops = convert("- item\n\n| a |\n|---|\n| 1 |\n", 1).unwrap();

        let has_delete = ops
            .iter()
            .any(|op| matches!(op, Operation::DeleteParagraphBullets { .. }));
        assert!(has_delete, "table after a list must clear bullet style");

        let has_table = ops
            .iter()
            .any(|op| matches!(op, Operation::InsertTable { .. }));
        assert!(has_table);
    }

    #[test]
    fn oversized_table_reports_the_offending_data_row() {
        let header = "| a |".to_owned();
        let sep = "|---|".to_owned();
        let mut row_one = "| 1 |".to_owned();
        for _ in 0..65 {
            row_one.push_str(" 1 |");
        }
        let input = format!("{header}\n{sep}\n{row_one}\n");

        let err = convert(&input, 1).unwrap_err();
        match err {
            ConvertError::TableShape { row, .. } => assert_eq!(row, 1),
            other => panic!("expected TableShape, got {other:?}"),
        }
    }

    #[test]
    fn strikethrough_and_task_list_render_checkbox_glyphs() {
        let input = "- [x] done ~~old~~\n- [ ] todo\n";
        let ops = convert(input, 1).unwrap();

        let text = ops
            .iter()
            .find_map(|op| match op {
                Operation::InsertText { index: 1, text } => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(text, "\u{2611} done old\n\u{2610} todo\n");

        let has_strikethrough = ops.iter().any(|op| {
            matches!(
                op,
                Operation::UpdateTextStyle { style, .. }
                    if style.strikethrough == Some(true)
            )
        });
        assert!(has_strikethrough);

        let bullet_ops: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, Operation::CreateParagraphBullets { .. }))
            .collect();
        assert_eq!(bullet_ops.len(), 1, "one bullet range spans both items");
    }

    #[test]
    fn balanced_stacks_hold_for_deeply_nested_input() {
        let input = indoc! {"
            # Example

            * A
              - A.A

                hello world

                * *A.A.A*
        "};

        // Would panic via debug_assert in walk_document if stacks were
        // unbalanced; success here is the assertion.
        convert(input, 1).unwrap();
    }

    #[test]
    fn pure_text_input_canonicalizes_softbreaks_to_spaces() {
        let ops = convert("line one\nline two", 1).unwrap();

        assert_eq!(
            ops,
            vec![Operation::InsertText {
                index: 1,
                text: "line one line two\n".to_owned(),
            }]
        );
    }

    #[test]
    fn unsupported_image_uri_is_skipped_not_fatal() {
        let ops = convert("![alt](not-a-uri)", 1).unwrap();

        assert!(!ops
            .iter()
            .any(|op| matches!(op, Operation::InsertInlineImage { .. })));
    }

    #[test]
    fn supported_image_uri_emits_inline_image_operation() {
        let ops = convert("![alt](https://example.com/x.png)", 1).unwrap();

        assert!(ops.iter().any(|op| matches!(
            op,
            Operation::InsertInlineImage { uri, .. } if uri == "https://example.com/x.png"
        )));
    }

    #[test]
    fn oversized_table_is_rejected() {
        let mut header = "|".to_owned();
        let mut sep = "|".to_owned();
        for _ in 0..65 {
            header.push_str(" a |");
            sep.push_str("---|");
        }
        let input = format!("{header}\n{sep}\n");

        let err = convert(&input, 1).unwrap_err();
        assert!(matches!(err, ConvertError::TableShape { .. }));
    }
}
