use super::kind::NodeKind;
use super::span::SourceSpan;

/// An inline node inside a block's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineNode {
    pub span: SourceSpan,
    pub inline: Inline,
}

impl InlineNode {
    pub fn kind(&self) -> NodeKind {
        self.inline.kind()
    }

    /// Child nodes of wrapping constructs; always a single PlainText node
    /// since wrapped content is not parsed again.
    pub fn children(&self) -> &[InlineNode] {
        match &self.inline {
            Inline::Bold { children, .. }
            | Inline::Italic { children, .. }
            | Inline::BoldItalic { children, .. }
            | Inline::Strikethrough { children }
            | Inline::Highlight { children }
            | Inline::Subscript { children }
            | Inline::Superscript { children } => children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    PlainText {
        text: String,
    },
    Bold {
        delimiter_text: String,
        children: Vec<InlineNode>,
    },
    Italic {
        delimiter_text: String,
        children: Vec<InlineNode>,
    },
    BoldItalic {
        delimiter_text: String,
        children: Vec<InlineNode>,
    },
    InlineCode {
        delimiter_text: String,
        code_text: String,
    },
    Strikethrough {
        children: Vec<InlineNode>,
    },
    Highlight {
        children: Vec<InlineNode>,
    },
    Subscript {
        children: Vec<InlineNode>,
    },
    Superscript {
        children: Vec<InlineNode>,
    },
    InlineMath {
        delimiter_text: String,
        tex: String,
    },
    Link {
        text: String,
        url: String,
        /// Title without its quotes.
        title: Option<String>,
    },
    Image {
        alt: String,
        url: String,
        title: Option<String>,
    },
    Autolink {
        url: String,
    },
    FootnoteRef {
        label: String,
    },
    Emoji {
        shortcode: String,
    },
    EscapedChar {
        ch: char,
    },
}

impl Inline {
    pub fn kind(&self) -> NodeKind {
        match self {
            Inline::PlainText { .. } => NodeKind::PlainText,
            Inline::Bold { .. } => NodeKind::Bold,
            Inline::Italic { .. } => NodeKind::Italic,
            Inline::BoldItalic { .. } => NodeKind::BoldItalic,
            Inline::InlineCode { .. } => NodeKind::InlineCode,
            Inline::Strikethrough { .. } => NodeKind::Strikethrough,
            Inline::Highlight { .. } => NodeKind::Highlight,
            Inline::Subscript { .. } => NodeKind::Subscript,
            Inline::Superscript { .. } => NodeKind::Superscript,
            Inline::InlineMath { .. } => NodeKind::InlineMath,
            Inline::Link { .. } => NodeKind::Link,
            Inline::Image { .. } => NodeKind::Image,
            Inline::Autolink { .. } => NodeKind::Autolink,
            Inline::FootnoteRef { .. } => NodeKind::FootnoteRef,
            Inline::Emoji { .. } => NodeKind::Emoji,
            Inline::EscapedChar { .. } => NodeKind::EscapedChar,
        }
    }
}

/// Glyph for a built-in emoji shortcode, for hosts that draw collapsed
/// shortcodes as pictures.
pub fn glyph(shortcode: &str) -> Option<&'static str> {
    let glyph = match shortcode {
        "smile" => "😄",
        "grin" => "😁",
        "joy" => "😂",
        "wink" => "😉",
        "heart" => "❤️",
        "thumbsup" | "+1" => "👍",
        "thumbsdown" | "-1" => "👎",
        "tada" => "🎉",
        "rocket" => "🚀",
        "fire" => "🔥",
        "star" => "⭐",
        "warning" => "⚠️",
        "white_check_mark" => "✅",
        "x" => "❌",
        "bulb" => "💡",
        "memo" => "📝",
        "eyes" => "👀",
        "thinking" => "🤔",
        "sparkles" => "✨",
        "bug" => "🐛",
        _ => return None,
    };
    Some(glyph)
}
