//! Orders the raw components the [`crate::walker`] built up into the fixed
//! emission sequence the Docs `batchUpdate` API requires: the single body
//! `insertText`, then each table's own insert group, then style updates,
//! then bullet creation, then bullet deletion, then inline images.
//!
//! No index adjustment happens here: by the time a walk finishes, every
//! operation the walker recorded already carries its final, tab-adjusted
//! index (see `Walker::tab_debt`). This pass only orders them.

use crate::{model::Operation, walker::WalkResult};

pub(crate) fn assemble(result: WalkResult) -> Vec<Operation> {
    let WalkResult {
        start_index,
        buffer,
        style_ranges,
        paragraph_ops,
        bullet_ops,
        delete_bullet_ops,
        table_ops,
        image_ops,
    } = result;

    let mut ops = Vec::new();

    // Rule 3 (single-insert law): a zero-length body insert would be both
    // meaningless to the Docs API and a second no-op edit on top of any
    // table's own inserts, so it's suppressed rather than emitted.
    if !buffer.is_empty() {
        ops.push(Operation::InsertText {
            index: start_index,
            text: buffer,
        });
    }

    ops.extend(table_ops);

    for (start, end, style) in style_ranges {
        if start != end {
            ops.push(Operation::UpdateTextStyle { start, end, style });
        }
    }

    ops.extend(paragraph_ops);
    ops.extend(bullet_ops);
    ops.extend(delete_bullet_ops);
    ops.extend(image_ops);

    ops
}
