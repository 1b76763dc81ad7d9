use pulldown_cmark::{Event, Tag};

use crate::error::MarkdownParseError;

//======================================
// Representation
//======================================

#[derive(Debug)]
pub(crate) enum UnflattenedEvent<'a> {
    /// This [`Event`] can never be [`Event::Start`] or [`Event::End`]. Those
    /// events are represented by [`UnflattenedEvent::Nested`].
    Event(Event<'a>),
    Nested {
        tag: Tag<'a>,
        events: Vec<UnflattenedEvent<'a>>,
    },
}

//======================================
// Implementation
//======================================

pub(crate) fn parse_markdown_to_unflattened_events<'i>(
    event_stream: impl Iterator<Item = Event<'i>>,
) -> Result<Vec<UnflattenedEvent<'i>>, MarkdownParseError> {
    let mut unflattener = Unflattener {
        root: vec![],
        nested: vec![],
    };

    for event in event_stream {
        unflattener.handle_event(event)?;
    }

    unflattener.finish()
}

struct Unflattener<'a> {
    root: Vec<UnflattenedEvent<'a>>,
    nested: Vec<(Tag<'a>, Vec<UnflattenedEvent<'a>>)>,
}

impl<'a> Unflattener<'a> {
    fn handle_event(
        &mut self,
        event: Event<'a>,
    ) -> Result<(), MarkdownParseError> {
        match event {
            Event::Start(tag) => {
                self.nested.push((tag, vec![]));
            },
            Event::End(tag_end) => {
                let (tag, inner) = self.nested.pop().ok_or_else(|| {
                    MarkdownParseError::UnexpectedNesting {
                        expected: "open tag",
                        found: format!("{tag_end:?}"),
                    }
                })?;

                if tag.to_end() != tag_end {
                    return Err(MarkdownParseError::unbalanced(&tag));
                }

                self.seq().push(UnflattenedEvent::Nested {
                    tag,
                    events: inner,
                });
            },
            event => self.seq().push(UnflattenedEvent::Event(event)),
        }

        Ok(())
    }

    fn seq(&mut self) -> &mut Vec<UnflattenedEvent<'a>> {
        if let Some((_, seq)) = self.nested.last_mut() {
            seq
        } else {
            &mut self.root
        }
    }

    fn finish(self) -> Result<Vec<UnflattenedEvent<'a>>, MarkdownParseError> {
        let Unflattener { root, nested } = self;

        if let Some((tag, _)) = nested.into_iter().next() {
            return Err(MarkdownParseError::unbalanced(&tag));
        }

        Ok(root)
    }
}
