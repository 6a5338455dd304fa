/// Kind tag for every block and inline variant.
///
/// Collaborators that only need to branch on what a node is (smart-edit
/// rules, outline views, the render engine's slot choice) match on this
/// instead of destructuring the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Blocks
    Heading,
    SetextHeading,
    Paragraph,
    ThematicBreak,
    BlankLine,
    FencedCode,
    MathBlock,
    Blockquote,
    UnorderedListItem,
    OrderedListItem,
    Table,
    FootnoteDefinition,
    TableOfContents,

    // Inlines
    PlainText,
    Bold,
    Italic,
    BoldItalic,
    InlineCode,
    Strikethrough,
    Highlight,
    Subscript,
    Superscript,
    InlineMath,
    Link,
    Image,
    Autolink,
    FootnoteRef,
    Emoji,
    EscapedChar,
}

impl NodeKind {
    pub fn is_block(self) -> bool {
        (self as u8) <= (Self::TableOfContents as u8)
    }

    pub fn is_inline(self) -> bool {
        !self.is_block()
    }

    /// Block kinds whose body is parsed as inline content.
    pub fn has_inline_content(self) -> bool {
        matches!(
            self,
            Self::Heading
                | Self::SetextHeading
                | Self::Paragraph
                | Self::Blockquote
                | Self::UnorderedListItem
                | Self::OrderedListItem
                | Self::FootnoteDefinition
        )
    }

    pub fn is_list_item(self) -> bool {
        matches!(self, Self::UnorderedListItem | Self::OrderedListItem)
    }
}
