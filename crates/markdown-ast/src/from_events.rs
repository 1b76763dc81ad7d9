//! Convert from "unflattened" [`pulldown_cmark::Event`]s to AST [`Block`]s.

use pulldown_cmark::{Event, Tag};

use std::mem;

use crate::{
    error::MarkdownParseError, unflatten::UnflattenedEvent, Block,
    CodeBlockKind, Inline, Inlines, ListItem,
};

//======================================
// AST Builder
//======================================

pub(crate) fn ast_events_to_ast(
    events: Vec<UnflattenedEvent>,
) -> Result<Vec<Block>, MarkdownParseError> {
    let mut complete: Vec<Block> = vec![];

    let mut text_spans: Vec<Inline> = vec![];

    for event in events {
        if !is_inline(&event) {
            if !text_spans.is_empty() {
                complete.push(Block::Paragraph(Inlines(mem::replace(
                    &mut text_spans,
                    vec![],
                ))));
            }
        }

        match event {
            UnflattenedEvent::Event(event) => match event {
                Event::Start(_) | Event::End(_) => {
                    return Err(MarkdownParseError::UnexpectedNesting {
                        expected: "a non-Start/End event",
                        found: "Start/End".to_owned(),
                    })
                },
                Event::Text(text) => {
                    text_spans.push(Inline::Text(text.to_string()))
                },
                Event::Code(code) => {
                    text_spans.push(Inline::Code(code.to_string()))
                },
                Event::SoftBreak => text_spans.push(Inline::SoftBreak),
                Event::HardBreak => text_spans.push(Inline::HardBreak),
                Event::Rule => complete.push(Block::Rule),
                Event::TaskListMarker(_) => {
                    // Handled by the enclosing Tag::Item arm; reaching this
                    // point means a task marker appeared outside a list item.
                    tracing::warn!(
                        "ignoring task list marker outside of a list item"
                    );
                },
                Event::Html(html) | Event::InlineHtml(html) => {
                    tracing::warn!(
                        "raw HTML is not supported, falling back to plain text: {html}"
                    );
                    text_spans.push(Inline::Text(html.to_string()));
                },
                Event::FootnoteReference(label) => {
                    tracing::warn!(
                        "footnote references are not supported, falling back to plain text: {label}"
                    );
                    text_spans.push(Inline::Text(format!("[^{label}]")));
                },
                Event::InlineMath(math) => {
                    tracing::warn!(
                        "inline math is not supported, falling back to plain text"
                    );
                    text_spans.push(Inline::Text(format!("${math}$")));
                },
                Event::DisplayMath(math) => {
                    tracing::warn!(
                        "display math is not supported, falling back to plain text"
                    );
                    complete.push(Block::plain_text_paragraph(format!(
                        "$${math}$$"
                    )));
                },
            },
            UnflattenedEvent::Nested { tag, events } => {
                match tag {
                    //
                    // Inline content
                    //
                    Tag::Emphasis => {
                        text_spans
                            .push(Inline::Emphasis(unwrap_text(events)?));
                    },
                    Tag::Strong => {
                        text_spans.push(Inline::Strong(unwrap_text(events)?));
                    },
                    Tag::Strikethrough => {
                        text_spans.push(Inline::Strikethrough(unwrap_text(
                            events,
                        )?));
                    },

                    Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    } => {
                        let content_text = unwrap_text(events)?;

                        text_spans.push(Inline::Link {
                            link_type,
                            dest_url: dest_url.to_string(),
                            title: title.to_string(),
                            id: id.to_string(),
                            content_text,
                        })
                    },

                    //
                    // Block content
                    //
                    Tag::Heading {
                        level,
                        id: _,
                        classes: _,
                        attrs: _,
                    } => {
                        complete
                            .push(Block::Heading(level, unwrap_text(events)?));
                    },
                    Tag::Paragraph => {
                        text_spans.extend(unwrap_text(events)?)
                    },
                    // TODO: Include the list start number in the metadata
                    Tag::List(start) => {
                        let ordered = start.is_some();
                        let mut items: Vec<ListItem> = Vec::new();

                        for event in events {
                            if let UnflattenedEvent::Nested {
                                tag: Tag::Item,
                                events: item_events,
                            } = event
                            {
                                items.push(list_item_events_to_item(
                                    item_events,
                                )?);
                            } else {
                                return Err(
                                    MarkdownParseError::UnexpectedNesting {
                                        expected: "Tag::Item",
                                        found: format!("{event:?}"),
                                    },
                                );
                            }
                        }

                        complete.push(Block::List { ordered, items });
                    },
                    Tag::Item => {
                        // A bare Item outside of a List context (shouldn't
                        // normally occur, but fall back to treating its
                        // content as ordinary blocks rather than panicking).
                        complete.extend(ast_events_to_ast(events)?);
                    },
                    Tag::CodeBlock(kind) => {
                        let text_spans = unwrap_text(events)?;
                        let code_text = text_to_string(&text_spans);

                        let kind = CodeBlockKind::from_pulldown_cmark(kind);

                        complete.push(Block::CodeBlock {
                            kind,
                            code: code_text,
                        })
                    },
                    Tag::BlockQuote(kind) => {
                        let blocks = ast_events_to_ast(events)?;
                        complete.push(Block::BlockQuote { kind, blocks })
                    },
                    Tag::Table(alignments) => {
                        complete.push(table_events_to_block(
                            alignments, events,
                        )?);
                    },
                    _ => {
                        tracing::warn!(
                            "unsupported block element {tag:?}, dropping its structure and keeping plain text"
                        );
                        complete.extend(ast_events_to_ast(events)?);
                    },
                }
            },
        }
    }

    if !text_spans.is_empty() {
        complete.push(Block::paragraph(text_spans));
    }

    Ok(complete)
}

/// Convert the events inside a `Tag::Item` into a [`ListItem`], pulling out
/// a leading [`Event::TaskListMarker`] (if any) into [`ListItem::checked`].
fn list_item_events_to_item(
    mut events: Vec<UnflattenedEvent>,
) -> Result<ListItem, MarkdownParseError> {
    let checked = match events.first() {
        Some(UnflattenedEvent::Event(Event::TaskListMarker(checked))) => {
            let checked = *checked;
            events.remove(0);
            Some(checked)
        },
        _ => None,
    };

    let blocks = ast_events_to_ast(events)?;

    Ok(ListItem { blocks, checked })
}

fn table_events_to_block(
    alignments: Vec<pulldown_cmark::Alignment>,
    events: Vec<UnflattenedEvent>,
) -> Result<Block, MarkdownParseError> {
    let mut events = events.into_iter();

    let header_events = match events.next() {
        Some(UnflattenedEvent::Nested {
            tag: Tag::TableHead,
            events,
        }) => events,
        _ => return Err(MarkdownParseError::TableMissingHeader),
    };

    let mut headers = Vec::new();

    for table_cell in header_events {
        let table_cell_text =
            unwrap_text(unwrap_table_cell(table_cell)?)?;

        headers.push(table_cell_text);
    }

    let mut rows = Vec::new();

    for row_events in events {
        let row_events = match row_events {
            UnflattenedEvent::Nested {
                tag: Tag::TableRow,
                events,
            } => events,
            other => {
                return Err(MarkdownParseError::UnexpectedNesting {
                    expected: "Tag::TableRow",
                    found: format!("{other:?}"),
                })
            },
        };

        let mut row = Vec::new();

        for table_cell in row_events {
            let table_cell_text =
                unwrap_text(unwrap_table_cell(table_cell)?)?;

            row.push(table_cell_text);
        }

        rows.push(row);
    }

    Ok(Block::Table {
        alignments,
        headers,
        rows,
    })
}

/// Returns `true` if `event` contains content that can be added "inline" with text
/// content.
///
/// `event`'s that cannot be added inline will start a new [`Block`].
fn is_inline(event: &UnflattenedEvent) -> bool {
    match event {
        UnflattenedEvent::Event(event) => match event {
            Event::Start(_) | Event::End(_) => unreachable!(),
            Event::Text(_) => true,
            Event::Code(_) => true,
            Event::SoftBreak => true,
            Event::HardBreak => true,
            Event::Html(_) | Event::InlineHtml(_) => false,
            Event::Rule => false,
            Event::TaskListMarker(_) => false,
            Event::FootnoteReference(_) => true,
            Event::InlineMath(_) => true,
            Event::DisplayMath(_) => false,
        },
        UnflattenedEvent::Nested { tag, events: _ } => match tag {
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough => true,
            Tag::Heading { .. } => false,
            Tag::Paragraph => false,
            Tag::List(_) => false,
            Tag::Item => false,
            Tag::CodeBlock(_) => false,
            Tag::BlockQuote(_kind) => false,
            Tag::Table(_) => false,
            Tag::TableHead | Tag::TableRow => unreachable!(),
            Tag::Link { .. } => true,
            Tag::Image { .. } => true,
            _ => false,
        },
    }
}

fn unwrap_text(
    events: Vec<UnflattenedEvent>,
) -> Result<Inlines, MarkdownParseError> {
    let mut text_spans: Vec<Inline> = vec![];

    for event in events {
        match event {
            UnflattenedEvent::Event(event) => match event {
                Event::Start(_) | Event::End(_) => unreachable!(),
                Event::Text(text) => {
                    text_spans.push(Inline::Text(text.to_string()))
                },
                Event::Code(code) => {
                    text_spans.push(Inline::Code(code.to_string()))
                },
                Event::SoftBreak => text_spans.push(Inline::SoftBreak),
                Event::HardBreak => text_spans.push(Inline::HardBreak),
                Event::Html(html) | Event::InlineHtml(html) => {
                    tracing::warn!(
                        "raw HTML is not supported, falling back to plain text: {html}"
                    );
                    text_spans.push(Inline::Text(html.to_string()));
                },
                Event::FootnoteReference(label) => {
                    tracing::warn!(
                        "footnote references are not supported, falling back to plain text: {label}"
                    );
                    text_spans.push(Inline::Text(format!("[^{label}]")));
                },
                Event::InlineMath(math) => {
                    tracing::warn!(
                        "inline math is not supported, falling back to plain text"
                    );
                    text_spans.push(Inline::Text(format!("${math}$")));
                },
                Event::TaskListMarker(_) | Event::Rule | Event::DisplayMath(_) => {
                    return Err(MarkdownParseError::UnexpectedNesting {
                        expected: "inline content",
                        found: format!("{event:?}"),
                    })
                },
            },
            UnflattenedEvent::Nested { tag, events } => match tag {
                Tag::Emphasis => {
                    text_spans.push(Inline::Emphasis(unwrap_text(events)?));
                },
                Tag::Strong => {
                    text_spans.push(Inline::Strong(unwrap_text(events)?));
                },
                Tag::Strikethrough => {
                    text_spans
                        .push(Inline::Strikethrough(unwrap_text(events)?));
                },
                Tag::Paragraph => {
                    // If this is a separate paragraph, insert two hardbreaks
                    // (two newlines). Don't insert hardbreaks if there isn't
                    // any existing text content, to avoid leading empty lines.
                    if !text_spans.is_empty() {
                        text_spans.push(Inline::HardBreak);
                        text_spans.push(Inline::HardBreak);
                    }
                    text_spans.extend(unwrap_text(events)?)
                },
                Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                } => {
                    let content_text = unwrap_text(events)?;

                    text_spans.push(Inline::Link {
                        link_type,
                        dest_url: dest_url.to_string(),
                        title: title.to_string(),
                        id: id.to_string(),
                        content_text,
                    })
                },
                Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                } => {
                    let image_description = unwrap_text(events)?;

                    text_spans.push(Inline::Image {
                        link_type,
                        dest_url: dest_url.to_string(),
                        title: title.to_string(),
                        id: id.to_string(),
                        image_description,
                    })
                },

                //--------------------------
                // Illegal in inline content
                //--------------------------
                other => {
                    return Err(MarkdownParseError::UnexpectedNesting {
                        expected: "inline content",
                        found: format!("{other:?}"),
                    })
                },
            },
        }
    }

    Ok(Inlines(text_spans))
}

fn unwrap_table_cell(
    event: UnflattenedEvent,
) -> Result<Vec<UnflattenedEvent>, MarkdownParseError> {
    match event {
        UnflattenedEvent::Nested {
            tag: Tag::TableCell,
            events,
        } => Ok(events),
        other => Err(MarkdownParseError::UnexpectedNesting {
            expected: "Tag::TableCell",
            found: format!("{other:?}"),
        }),
    }
}

fn text_to_string(Inlines(text_spans): &Inlines) -> String {
    let mut string = String::new();

    for span in text_spans {
        match span {
            Inline::Text(text) => {
                string.push_str(text);
            },
            Inline::SoftBreak => {
                string.push(' ');
            },
            Inline::HardBreak => {
                string.push('\n');
            },
            other => {
                tracing::warn!(
                    "unsupported inline content inside code block, dropping: {other:?}"
                );
            },
        }
    }

    string
}
