//! Replays parser events into a rowan green tree.

use std::mem;

use rowan::GreenNodeBuilder;

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    /// Next raw token to attach.
    next: usize,
    /// Open nodes.
    depth: usize,
    /// Scratch buffer for glued token text.
    glue: String,
}

impl<'t, 'input> Sink<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            next: 0,
            depth: 0,
            glue: String::new(),
        }
    }

    /// Build the tree the events describe.
    ///
    /// Raw tokens the events never consume are attached to the outermost
    /// node just before it closes, so the tree text is always the full input.
    pub fn build(mut self, mut events: Vec<Event>) -> SyntaxNode {
        let mut kinds = Vec::new();

        for i in 0..events.len() {
            match mem::replace(&mut events[i], Event::Tombstone) {
                Event::Open { kind, parent } => {
                    // Follow parent links; the last one found is outermost
                    kinds.push(kind);
                    let (mut at, mut link) = (i, parent);
                    while let Some(distance) = link {
                        at += distance.get() as usize;
                        match mem::replace(&mut events[at], Event::Tombstone) {
                            Event::Open { kind, parent } => {
                                kinds.push(kind);
                                link = parent;
                            }
                            _ => unreachable!("parent link must point at an Open"),
                        }
                    }
                    for kind in kinds.drain(..).rev() {
                        self.builder.start_node(kind.into());
                        self.depth += 1;
                    }
                }
                Event::Token { kind, len } => self.token(kind, len.get() as usize),
                Event::Close => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        self.attach_rest();
                    }
                    self.builder.finish_node();
                }
                Event::Tombstone => {}
            }
        }

        SyntaxNode::new_root(self.builder.finish())
    }

    fn token(&mut self, kind: SyntaxKind, len: usize) {
        let tokens = self.tokens;
        let end = (self.next + len).min(tokens.len());
        let raw = &tokens[self.next..end];
        self.next = end;

        match raw {
            [] => {}
            [single] => self.builder.token(kind.into(), single.text),
            _ => {
                self.glue.clear();
                self.glue.extend(raw.iter().map(|t| t.text));
                self.builder.token(kind.into(), &self.glue);
            }
        }
    }

    fn attach_rest(&mut self) {
        for t in &self.tokens[self.next..] {
            self.builder.token(t.kind.into(), t.text);
        }
        self.next = self.tokens.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroU32;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    fn child_tokens(node: &SyntaxNode) -> Vec<(SyntaxKind, String)> {
        node.children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect()
    }

    #[test]
    fn sink_builds_simple_tree() {
        let tokens = vec![token(SyntaxKind::TEXT, "hello")];

        let events = vec![
            Event::open(SyntaxKind::ROOT),
            Event::open(SyntaxKind::PARAGRAPH),
            Event::token(SyntaxKind::TEXT),
            Event::Close,
            Event::Close,
        ];

        let tree = Sink::new(&tokens).build(events);

        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 1);
        assert_eq!(tree.text().to_string(), "hello");
    }

    #[test]
    fn sink_glues_delimiter_runs() {
        let tokens = lex("**bold**");

        let events = vec![
            Event::open(SyntaxKind::ROOT),
            Event::open(SyntaxKind::BOLD),
            Event::glued(SyntaxKind::MARKER, 2).unwrap(),
            Event::token(SyntaxKind::CONTENT),
            Event::glued(SyntaxKind::MARKER, 2).unwrap(),
            Event::Close,
            Event::Close,
        ];

        let tree = Sink::new(&tokens).build(events);
        let bold = tree.children().next().unwrap();

        assert_eq!(
            child_tokens(&bold),
            vec![
                (SyntaxKind::MARKER, "**".to_string()),
                (SyntaxKind::CONTENT, "bold".to_string()),
                (SyntaxKind::MARKER, "**".to_string()),
            ]
        );
    }

    #[test]
    fn parent_links_wrap_finished_nodes() {
        let tokens = vec![
            token(SyntaxKind::TEXT, "a"),
            token(SyntaxKind::NEWLINE, "\n"),
        ];

        // A ROW finished first, then wrapped in a TABLE opened after it
        let events = vec![
            Event::open(SyntaxKind::ROOT),
            Event::Open {
                kind: SyntaxKind::TABLE_ROW,
                parent: NonZeroU32::new(3),
            },
            Event::token(SyntaxKind::TEXT),
            Event::Close,
            Event::open(SyntaxKind::TABLE),
            Event::token(SyntaxKind::NEWLINE),
            Event::Close,
            Event::Close,
        ];

        let tree = Sink::new(&tokens).build(events);
        let table = tree.children().next().unwrap();

        assert_eq!(table.kind(), SyntaxKind::TABLE);
        assert_eq!(table.children().next().unwrap().kind(), SyntaxKind::TABLE_ROW);
        assert_eq!(child_tokens(&table), vec![(SyntaxKind::NEWLINE, "\n".to_string())]);
    }

    #[test]
    fn unconsumed_tokens_stay_in_the_tree() {
        let tokens = lex("ab\ncd");
        assert!(tokens.len() > 1);

        let events = vec![
            Event::open(SyntaxKind::ROOT),
            Event::token(SyntaxKind::TEXT),
            Event::Close,
        ];

        let tree = Sink::new(&tokens).build(events);
        assert_eq!(tree.text().to_string(), "ab\ncd");
    }
}
