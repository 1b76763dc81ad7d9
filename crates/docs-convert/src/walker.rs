//! The core recursive tree walk: threads one mutable [`Walker`] state
//! through a single pass over `markdown_ast::Block`s, producing the
//! components the assembler (`crate::assemble`) later orders into the
//! final [`Operation`] list.
//!
//! This mirrors the state-threaded recursive walk pattern used elsewhere in
//! this codebase for flattening a block tree into a different format's
//! native structure: one `State` (here, [`Walker`]) passed by `&mut` through
//! a family of mutually recursive `walk_*` functions, one per `Block`/
//! `Inline` variant.

use markdown_ast::{Block, HeadingLevel, Inline, Inlines, ListItem};

use crate::{
    error::ConvertError,
    model::{
        BulletPreset, NamedStyleType, Operation, ParagraphStyle, TextStyle,
    },
    table,
};

pub(crate) struct Walker {
    start_index: usize,
    buffer: String,
    cursor: usize,

    style_stack: Vec<StyleFrame>,
    style_ranges: Vec<(usize, usize, TextStyle)>,

    paragraph_ops: Vec<Operation>,
    bullet_ops: Vec<Operation>,
    delete_bullet_ops: Vec<Operation>,
    table_ops: Vec<Operation>,
    image_ops: Vec<Operation>,

    list_stack: Vec<bool>,
    list_start_cursor: Option<usize>,
    list_tab_accum: usize,
    tab_debt: usize,
    just_exited_list: bool,
    blockquote_depth: u32,
}

struct StyleFrame {
    start: usize,
    style: TextStyle,
}

/// Output of a single `convert()` walk: the raw components, not yet ordered
/// into the fixed assembly sequence (that's `crate::assemble::assemble`).
pub(crate) struct WalkResult {
    pub start_index: usize,
    pub buffer: String,
    pub style_ranges: Vec<(usize, usize, TextStyle)>,
    pub paragraph_ops: Vec<Operation>,
    pub bullet_ops: Vec<Operation>,
    pub delete_bullet_ops: Vec<Operation>,
    pub table_ops: Vec<Operation>,
    pub image_ops: Vec<Operation>,
}

pub(crate) fn walk_document(
    blocks: &[Block],
    start_index: usize,
) -> Result<WalkResult, ConvertError> {
    let mut walker = Walker {
        start_index,
        buffer: String::new(),
        cursor: start_index,
        style_stack: Vec::new(),
        style_ranges: Vec::new(),
        paragraph_ops: Vec::new(),
        bullet_ops: Vec::new(),
        delete_bullet_ops: Vec::new(),
        table_ops: Vec::new(),
        image_ops: Vec::new(),
        list_stack: Vec::new(),
        list_start_cursor: None,
        list_tab_accum: 0,
        tab_debt: 0,
        just_exited_list: false,
        blockquote_depth: 0,
    };

    walker.walk_blocks(blocks)?;

    debug_assert!(walker.style_stack.is_empty());
    debug_assert!(walker.list_stack.is_empty());

    Ok(WalkResult {
        start_index: walker.start_index,
        buffer: walker.buffer,
        style_ranges: walker.style_ranges,
        paragraph_ops: walker.paragraph_ops,
        bullet_ops: walker.bullet_ops,
        delete_bullet_ops: walker.delete_bullet_ops,
        table_ops: walker.table_ops,
        image_ops: walker.image_ops,
    })
}

impl Walker {
    fn append(&mut self, text: &str) -> usize {
        let start = self.cursor;
        self.buffer.push_str(text);
        self.cursor += text.chars().count();
        start
    }

    fn push_style(&mut self, style: TextStyle) {
        self.style_stack.push(StyleFrame {
            start: self.cursor,
            style,
        });
    }

    fn pop_style(&mut self) {
        let frame = self
            .style_stack
            .pop()
            .expect("pop_style called with empty style stack");

        if frame.start != self.cursor {
            self.style_ranges.push((frame.start, self.cursor, frame.style));
        }
    }

    fn record_range(&mut self, start: usize, end: usize, style: TextStyle) {
        if start != end {
            self.style_ranges.push((start, end, style));
        }
    }

    /// Shift an index recorded onto a [`Operation`] that the assembler will
    /// emit *after* every `CreateParagraphBullets` has already run (rule-6
    /// index repair, `DeleteParagraphBullets` and `InsertInlineImage`): by
    /// the time such an operation is applied, every earlier top-level list's
    /// TABs have already been stripped from the document. `UpdateTextStyle`/
    /// `UpdateParagraphStyle`/table operations are emitted *before* bullet
    /// creation (see `crate::assemble`), so the TABs they index into are
    /// still literally present when they run and must NOT be shifted here.
    fn adjusted(&self, index: usize) -> usize {
        index - self.tab_debt
    }

    /// If the previous block was a list that just closed, emit
    /// `DeleteParagraphBullets` over the range this new block occupies so
    /// that Docs doesn't propagate bullet style onto it.
    fn maybe_delete_bullets(&mut self, start: usize, end: usize) {
        if self.just_exited_list {
            self.delete_bullet_ops.push(Operation::DeleteParagraphBullets {
                start: self.adjusted(start),
                end: self.adjusted(end),
            });
            self.just_exited_list = false;
        }
    }

    fn clear_just_exited_list(&mut self) {
        self.just_exited_list = false;
    }

    /// Snapshot and consume the pending-bullet-deletion flag. Blocks that
    /// recurse into further blocks (`BlockQuote`) must call this *before*
    /// recursing, since the recursion can itself enter and exit a list and
    /// so reset the flag to a value meant for the nested content, not for
    /// the range this call will eventually check.
    fn take_just_exited_list(&mut self) -> bool {
        std::mem::take(&mut self.just_exited_list)
    }

    fn walk_blocks(&mut self, blocks: &[Block]) -> Result<(), ConvertError> {
        for block in blocks {
            self.walk_block(block)?;
        }
        Ok(())
    }

    fn walk_block(&mut self, block: &Block) -> Result<(), ConvertError> {
        match block {
            Block::Heading(level, text) => {
                let start = self.cursor;
                self.walk_inlines(text)?;
                self.append("\n");
                let end = self.cursor;

                self.maybe_delete_bullets(start, end);

                self.paragraph_ops.push(Operation::UpdateParagraphStyle {
                    start,
                    end,
                    style: ParagraphStyle::named_style(
                        NamedStyleType::from_heading_level(*level),
                    ),
                });
            },
            Block::Paragraph(text) => {
                let start = self.cursor;
                self.walk_inlines(text)?;
                self.append("\n");
                let end = self.cursor;

                self.maybe_delete_bullets(start, end);
            },
            Block::List { ordered, items } => {
                self.walk_list_with_kind(items, *ordered)?;
            },
            Block::CodeBlock { kind: _, code } => {
                let start = self.cursor;
                self.append(code);
                self.append("\n");
                let end = self.cursor;

                self.maybe_delete_bullets(start, end);

                self.record_range(start, end, TextStyle::code());
                self.paragraph_ops.push(Operation::UpdateParagraphStyle {
                    start,
                    end,
                    style: ParagraphStyle::code_fence(),
                });
            },
            Block::BlockQuote { kind: _, blocks } => {
                // Snapshot the flag before recursing: nested list content
                // inside this blockquote will clear and possibly re-set it
                // for its own purposes, and that must not leak into the
                // decision of whether *this* blockquote followed a list.
                //
                // If the blockquote's own first block is a list, that list's
                // own CreateParagraphBullets already lays down the bullet
                // style for this range, the same as a list immediately
                // following another list needs no DeleteParagraphBullets of
                // its own; emitting one here would just strip the bullets
                // the nested list is about to create.
                let opens_with_list = matches!(blocks.first(), Some(Block::List { .. }));
                let pending_delete = self.take_just_exited_list() && !opens_with_list;
                let start = self.cursor;

                self.blockquote_depth += 1;
                let depth = self.blockquote_depth;
                self.walk_blocks(blocks)?;
                self.blockquote_depth -= 1;

                let end = self.cursor;

                if pending_delete {
                    self.delete_bullet_ops.push(Operation::DeleteParagraphBullets {
                        start: self.adjusted(start),
                        end: self.adjusted(end),
                    });
                }

                self.record_range(start, end, TextStyle::italic());
                self.paragraph_ops.push(Operation::UpdateParagraphStyle {
                    start,
                    end,
                    style: ParagraphStyle::blockquote(depth),
                });
            },
            Block::Table {
                alignments: _,
                headers,
                rows,
            } => {
                // The table's own anchor paragraph is the one-index slot it
                // replaces; that's the range to strip inherited bullet
                // formatting from, not the whole table's index span.
                let start = self.cursor;
                self.maybe_delete_bullets(start, start + 1);
                self.walk_table(headers, rows)?;
            },
            Block::Rule => {
                let start = self.cursor;
                self.append("\n");
                let end = self.cursor;

                self.maybe_delete_bullets(start, end);

                self.paragraph_ops.push(Operation::UpdateParagraphStyle {
                    start,
                    end,
                    style: ParagraphStyle::rule(),
                });
            },
        }

        Ok(())
    }

    fn walk_list_with_kind(
        &mut self,
        items: &[ListItem],
        ordered: bool,
    ) -> Result<(), ConvertError> {
        let is_top_level = self.list_stack.is_empty();
        if is_top_level {
            // A list immediately following another list must not inherit
            // the previous list's pending bullet-deletion: that flag is
            // only meant to clear bullet style from non-list content, and
            // this list is about to lay down its own bullets anyway.
            self.clear_just_exited_list();
            self.list_start_cursor = Some(self.cursor);
            self.list_tab_accum = 0;
        }

        self.list_stack.push(ordered);

        for item in items {
            self.walk_list_item(item)?;
        }

        self.list_stack.pop();

        if self.list_stack.is_empty() {
            let raw_start = self
                .list_start_cursor
                .take()
                .expect("list_start_cursor set when entering top-level list");
            let raw_end = self.cursor;

            let preset = if ordered {
                BulletPreset::NumberedDecimalAlphaRoman
            } else {
                BulletPreset::BulletDiscCircleSquare
            };

            self.bullet_ops.push(Operation::CreateParagraphBullets {
                start: self.adjusted(raw_start),
                end: self.adjusted(raw_end),
                preset,
            });

            self.tab_debt += self.list_tab_accum;
            self.just_exited_list = true;
        }

        Ok(())
    }

    fn walk_list_item(
        &mut self,
        item: &ListItem,
    ) -> Result<(), ConvertError> {
        let depth = self.list_stack.len() as u32;

        if depth > 1 {
            let tabs = "\t".repeat(depth as usize - 1);
            self.append(&tabs);
            self.list_tab_accum += depth as usize - 1;
        }

        if let Some(checked) = item.checked {
            self.append(if checked { "\u{2611} " } else { "\u{2610} " });
        }

        for block in &item.blocks {
            match block {
                Block::List { items: nested_items, .. } => {
                    // The aggregated bullet range covers the whole top-level
                    // list as one unit, so a nested list's own
                    // ordered/unordered kind is ignored in favor of the
                    // outermost list's kind (see crate-level design notes).
                    self.walk_list_with_kind(
                        nested_items,
                        *self.list_stack.first().unwrap_or(&false),
                    )?;
                },
                other => self.walk_block(other)?,
            }
        }

        Ok(())
    }

    fn walk_table(
        &mut self,
        headers: &[Inlines],
        rows: &[Vec<Inlines>],
    ) -> Result<(), ConvertError> {
        let widest_row = rows
            .iter()
            .enumerate()
            .max_by_key(|(_, row)| row.len())
            .filter(|(_, row)| row.len() > headers.len())
            .map(|(idx, row)| (idx + 1, row.len()));

        let (offending_row, columns) = match widest_row {
            Some((row, columns)) => (row, columns),
            None => (0, headers.len()),
        };

        if columns > table::MAX_COLUMNS {
            return Err(ConvertError::TableShape {
                row: offending_row,
                columns,
                max: table::MAX_COLUMNS,
            });
        }

        let row_count = 1 + rows.len();
        // Table operations are emitted before any CreateParagraphBullets
        // (see crate::assemble), so the TABs an earlier list left in the
        // document are still present when this table is inserted; no
        // tab_debt adjustment applies here.
        let table_start = self.cursor;

        self.table_ops.push(Operation::InsertTable {
            index: table_start,
            rows: row_count,
            columns,
        });
        self.cursor += table::empty_table_index_cost(row_count, columns);

        let mut offset = 0usize;
        let mut header_range: Option<(usize, usize)> = None;

        for (col, cell) in headers.iter().enumerate() {
            let text = inlines_to_plain_text(cell);
            if text.is_empty() {
                continue;
            }

            let index =
                table::cell_start_index(table_start, columns, 0, col)
                    + offset;

            header_range = Some(match header_range {
                None => (index, index + text.chars().count()),
                Some((s, _)) => (s, index + text.chars().count()),
            });

            offset += text.chars().count();
            self.table_ops
                .push(Operation::InsertText { index, text });
        }

        if let Some((start, end)) = header_range {
            self.style_ranges.push((start, end, TextStyle::bold()));
        }

        for (row_idx, row) in rows.iter().enumerate() {
            for col in 0..columns {
                let Some(cell) = row.get(col) else { continue };
                let text = inlines_to_plain_text(cell);
                if text.is_empty() {
                    continue;
                }

                let index = table::cell_start_index(
                    table_start,
                    columns,
                    row_idx + 1,
                    col,
                ) + offset;

                offset += text.chars().count();
                self.table_ops
                    .push(Operation::InsertText { index, text });
            }
        }

        Ok(())
    }

    fn walk_inlines(&mut self, Inlines(inlines): &Inlines) -> Result<(), ConvertError> {
        for inline in inlines {
            self.walk_inline(inline)?;
        }
        Ok(())
    }

    fn walk_inline(&mut self, inline: &Inline) -> Result<(), ConvertError> {
        match inline {
            Inline::Text(text) => {
                self.append(text);
            },
            Inline::Emphasis(inlines) => {
                self.push_style(TextStyle::italic());
                self.walk_inlines(inlines)?;
                self.pop_style();
            },
            Inline::Strong(inlines) => {
                self.push_style(TextStyle::bold());
                self.walk_inlines(inlines)?;
                self.pop_style();
            },
            Inline::Strikethrough(inlines) => {
                self.push_style(TextStyle::strikethrough());
                self.walk_inlines(inlines)?;
                self.pop_style();
            },
            Inline::Code(code) => {
                let start = self.cursor;
                self.append(code);
                let end = self.cursor;
                self.record_range(start, end, TextStyle::code());
            },
            Inline::Link {
                link_type: _,
                dest_url,
                title: _,
                id: _,
                content_text,
            } => {
                self.push_style(TextStyle::link(dest_url.clone()));
                self.walk_inlines(content_text)?;
                self.pop_style();
            },
            Inline::Image {
                link_type: _,
                dest_url,
                title: _,
                id: _,
                image_description: _,
            } => {
                if is_supported_image_uri(dest_url) {
                    let index = self.adjusted(self.cursor);
                    self.image_ops.push(Operation::InsertInlineImage {
                        index,
                        uri: dest_url.clone(),
                    });
                    self.cursor += 1;
                } else {
                    tracing::warn!(
                        "skipping image with unsupported URI: {dest_url}"
                    );
                }
            },
            Inline::SoftBreak => {
                self.append(" ");
            },
            Inline::HardBreak => {
                self.append("\n");
            },
        }

        Ok(())
    }
}

fn is_supported_image_uri(uri: &str) -> bool {
    uri.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-')
    })
}

/// Flatten inline content to plain text, dropping styling. Used for table
/// cells: per-cell styled ranges are a known limitation (see crate-level
/// design notes).
fn inlines_to_plain_text(Inlines(inlines): &Inlines) -> String {
    let mut text = String::new();
    for inline in inlines {
        inlines_to_plain_text_(inline, &mut text);
    }
    text
}

fn inlines_to_plain_text_(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Text(s) | Inline::Code(s) => out.push_str(s),
        Inline::Emphasis(Inlines(inner))
        | Inline::Strong(Inlines(inner))
        | Inline::Strikethrough(Inlines(inner)) => {
            for inline in inner {
                inlines_to_plain_text_(inline, out);
            }
        },
        Inline::Link { content_text: Inlines(inner), .. } => {
            for inline in inner {
                inlines_to_plain_text_(inline, out);
            }
        },
        Inline::Image { .. } => {},
        Inline::SoftBreak => out.push(' '),
        Inline::HardBreak => out.push('\n'),
    }
}
