//! SyntaxKind enum for all tokens and nodes in the Markdown CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Markdown CST.
///
/// This enum represents both tokens (lexer output, plus the composite tokens
/// the grammar folds runs of raw tokens into) and composite nodes (parser
/// output). The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Raw tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending (LF or CRLF)
    NEWLINE,
    /// Run of plain text: no whitespace, digits or ASCII punctuation
    TEXT,
    /// Run of ASCII digits (ordered list numbers)
    DIGITS,
    /// `#`
    HASH,
    /// `>`
    GT,
    /// `<`
    LT,
    /// `-`
    DASH,
    /// `*`
    STAR,
    /// `+`
    PLUS,
    /// `_`
    UNDERSCORE,
    /// `` ` ``
    BACKTICK,
    /// `~`
    TILDE,
    /// `=`
    EQ,
    /// `^`
    CARET,
    /// `$`
    DOLLAR,
    /// `!`
    BANG,
    /// `[`
    LBRACKET,
    /// `]`
    RBRACKET,
    /// `(`
    LPAREN,
    /// `)`
    RPAREN,
    /// `|`
    PIPE,
    /// `\`
    BACKSLASH,
    /// `:`
    COLON,
    /// `.`
    DOT,
    /// Any other single ASCII punctuation character (`"`, `'`, `%`, ...)
    PUNCT,

    // === Composite tokens (several raw tokens folded by the grammar) ===
    /// Syntax that is hidden when the construct is collapsed (`**`, `# `, `](`)
    MARKER,
    /// Captured inner text of a wrapping or reference construct
    CONTENT,
    /// Link or image destination
    URL,
    /// Link or image title, including its quotes
    TITLE,
    /// Fenced code info string
    INFO_STRING,
    /// Verbatim body of a fenced code or math block
    CODE_TEXT,
    /// Leading indentation of a list item
    INDENT,
    /// Task list checkbox (`[ ]`, `[x]`)
    TASK,
    /// Footnote label
    LABEL,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Whitespace-only line
    BLANK_LINE,
    /// ATX heading (`# ...`)
    ATX_HEADING,
    /// Setext heading (text underlined with `===` or `---`)
    SETEXT_HEADING,
    /// Paragraph block
    PARAGRAPH,
    /// Thematic break (`---`, `***`, etc.)
    THEMATIC_BREAK,
    /// Fenced code block
    FENCED_CODE,
    /// `$$` display math block
    MATH_BLOCK,
    /// Pipe table
    TABLE,
    /// Header or body row of a table
    TABLE_ROW,
    /// `|---|:---:|` alignment row of a table
    TABLE_DELIMITER_ROW,
    /// Single-line blockquote (`> ...`)
    BLOCK_QUOTE,
    /// Bullet list item (`- `, `* `, `+ `)
    BULLET_LIST_ITEM,
    /// Ordered list item (`1. `, `1) `)
    ORDERED_LIST_ITEM,
    /// Footnote definition (`[^id]: text`)
    FOOTNOTE_DEFINITION,
    /// Table of contents marker line (`[TOC]`)
    TABLE_OF_CONTENTS,
    /// Inline content container of a block
    INLINE,
    /// `***text***`
    BOLD_ITALIC,
    /// `**text**`
    BOLD,
    /// `*text*`
    ITALIC,
    /// `~~text~~`
    STRIKETHROUGH,
    /// `==text==`
    HIGHLIGHT,
    /// `~text~`
    SUBSCRIPT,
    /// `^text^`
    SUPERSCRIPT,
    /// `$tex$`
    INLINE_MATH,
    /// Inline code span
    CODE_SPAN,
    /// `![alt](url)`
    IMAGE,
    /// `[^id]`
    FOOTNOTE_REF,
    /// Standard link `[text](url)`
    LINK,
    /// `<https://...>`
    AUTOLINK,
    /// `:shortcode:`
    EMOJI,
    /// Backslash escape (`\*`)
    ESCAPE,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output or composite token).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for single-character ASCII punctuation tokens, the
    /// characters a backslash may escape.
    pub fn is_punctuation(self) -> bool {
        (self as u16) >= (Self::HASH as u16) && (self as u16) <= (Self::PUNCT as u16)
    }

    /// Returns true for block-level node kinds (direct children of ROOT).
    pub fn is_block(self) -> bool {
        (self as u16) >= (Self::BLANK_LINE as u16)
            && (self as u16) <= (Self::TABLE_OF_CONTENTS as u16)
            && !matches!(self, Self::TABLE_ROW | Self::TABLE_DELIMITER_ROW)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ESCAPE as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;
