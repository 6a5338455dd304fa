//! Style slots and the configuration that fills them.

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One slot per construct the renderer styles, plus the two delimiter styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    Body,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Bold,
    Italic,
    BoldItalic,
    Code,
    CodeBlock,
    Strikethrough,
    Link,
    ImageAlt,
    Highlight,
    Subscript,
    Superscript,
    Math,
    FootnoteRef,
    Emoji,
    Blockquote,
    ListMarker,
    ThematicBreak,
    Table,
    DelimiterVisible,
    DelimiterSuppressed,
}

impl StyleSlot {
    /// Slot for a heading level; levels past 6 use `Heading6`.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            4 => Self::Heading4,
            5 => Self::Heading5,
            _ => Self::Heading6,
        }
    }

    pub fn is_delimiter(self) -> bool {
        matches!(self, Self::DelimiterVisible | Self::DelimiterSuppressed)
    }
}

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A resolved visual style. Hosts map this onto their own text attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub monospace: bool,
    /// Font size relative to body text.
    pub size_percent: u16,
    pub opacity_percent: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            monospace: false,
            size_percent: 100,
            opacity_percent: 100,
        }
    }
}

impl TextStyle {
    pub fn fg(mut self, color: Rgb) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    pub fn size(mut self, percent: u16) -> Self {
        self.size_percent = percent;
        self
    }

    pub fn opacity(mut self, percent: u8) -> Self {
        self.opacity_percent = percent;
        self
    }

    /// `over` drawn on top of `self`: set colours and flags win, a non-default
    /// size replaces the base size, and opacity takes the lower of the two.
    pub fn layered(&self, over: &TextStyle) -> TextStyle {
        TextStyle {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
            bold: self.bold || over.bold,
            italic: self.italic || over.italic,
            underline: self.underline || over.underline,
            strikethrough: self.strikethrough || over.strikethrough,
            monospace: self.monospace || over.monospace,
            size_percent: if over.size_percent == 100 {
                self.size_percent
            } else {
                over.size_percent
            },
            opacity_percent: self.opacity_percent.min(over.opacity_percent),
        }
    }
}

/// Named style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Light,
    Dark,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Light => "light",
            Preset::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "light" => Some(Preset::Light),
            "dark" => Some(Preset::Dark),
            _ => None,
        }
    }
}

/// One style per [`StyleSlot`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleConfig {
    pub body: TextStyle,
    pub heading1: TextStyle,
    pub heading2: TextStyle,
    pub heading3: TextStyle,
    pub heading4: TextStyle,
    pub heading5: TextStyle,
    pub heading6: TextStyle,
    pub bold: TextStyle,
    pub italic: TextStyle,
    pub bold_italic: TextStyle,
    pub code: TextStyle,
    pub code_block: TextStyle,
    pub strikethrough: TextStyle,
    pub link: TextStyle,
    pub image_alt: TextStyle,
    pub highlight: TextStyle,
    pub subscript: TextStyle,
    pub superscript: TextStyle,
    pub math: TextStyle,
    pub footnote_ref: TextStyle,
    pub emoji: TextStyle,
    pub blockquote: TextStyle,
    pub list_marker: TextStyle,
    pub thematic_break: TextStyle,
    pub table: TextStyle,
    pub delimiter_visible: TextStyle,
    pub delimiter_suppressed: TextStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

struct Palette {
    text: Rgb,
    muted: Rgb,
    accent: Rgb,
    math: Rgb,
    code_bg: Rgb,
    highlight_bg: Rgb,
}

impl StyleConfig {
    pub fn preset(preset: Preset) -> Self {
        let palette = match preset {
            Preset::Light => Palette {
                text: Rgb(0x24, 0x29, 0x2f),
                muted: Rgb(0x8c, 0x95, 0x9f),
                accent: Rgb(0x09, 0x69, 0xda),
                math: Rgb(0x82, 0x50, 0xdf),
                code_bg: Rgb(0xf0, 0xf2, 0xf4),
                highlight_bg: Rgb(0xff, 0xf1, 0x9e),
            },
            Preset::Dark => Palette {
                text: Rgb(0xe6, 0xed, 0xf3),
                muted: Rgb(0x7d, 0x85, 0x90),
                accent: Rgb(0x58, 0xa6, 0xff),
                math: Rgb(0xd2, 0xa8, 0xff),
                code_bg: Rgb(0x2d, 0x33, 0x3b),
                highlight_bg: Rgb(0x6b, 0x5a, 0x00),
            },
        };
        Self::from_palette(&palette)
    }

    fn from_palette(p: &Palette) -> Self {
        let text = TextStyle::default().fg(p.text);
        let heading = |size| text.clone().bold().size(size);
        let code = text.clone().monospace().bg(p.code_bg);

        Self {
            body: text.clone(),
            heading1: heading(200),
            heading2: heading(170),
            heading3: heading(145),
            heading4: heading(125),
            heading5: heading(110),
            heading6: heading(100).fg(p.muted),
            bold: text.clone().bold(),
            italic: text.clone().italic(),
            bold_italic: text.clone().bold().italic(),
            code: code.clone(),
            code_block: code,
            strikethrough: text.clone().strikethrough().fg(p.muted),
            link: text.clone().fg(p.accent).underline(),
            image_alt: text.clone().fg(p.accent).italic(),
            highlight: text.clone().bg(p.highlight_bg),
            subscript: text.clone().size(75),
            superscript: text.clone().size(75),
            math: text.clone().monospace().italic().fg(p.math),
            footnote_ref: text.clone().fg(p.accent).size(80),
            emoji: text.clone(),
            blockquote: text.clone().italic().fg(p.muted),
            list_marker: text.clone().bold().fg(p.muted),
            thematic_break: text.clone().fg(p.muted),
            table: text.monospace(),
            delimiter_visible: TextStyle::default().fg(p.muted).opacity(70),
            delimiter_suppressed: TextStyle::default().size(1).opacity(0),
        }
    }

    pub fn get(&self, slot: StyleSlot) -> &TextStyle {
        match slot {
            StyleSlot::Body => &self.body,
            StyleSlot::Heading1 => &self.heading1,
            StyleSlot::Heading2 => &self.heading2,
            StyleSlot::Heading3 => &self.heading3,
            StyleSlot::Heading4 => &self.heading4,
            StyleSlot::Heading5 => &self.heading5,
            StyleSlot::Heading6 => &self.heading6,
            StyleSlot::Bold => &self.bold,
            StyleSlot::Italic => &self.italic,
            StyleSlot::BoldItalic => &self.bold_italic,
            StyleSlot::Code => &self.code,
            StyleSlot::CodeBlock => &self.code_block,
            StyleSlot::Strikethrough => &self.strikethrough,
            StyleSlot::Link => &self.link,
            StyleSlot::ImageAlt => &self.image_alt,
            StyleSlot::Highlight => &self.highlight,
            StyleSlot::Subscript => &self.subscript,
            StyleSlot::Superscript => &self.superscript,
            StyleSlot::Math => &self.math,
            StyleSlot::FootnoteRef => &self.footnote_ref,
            StyleSlot::Emoji => &self.emoji,
            StyleSlot::Blockquote => &self.blockquote,
            StyleSlot::ListMarker => &self.list_marker,
            StyleSlot::ThematicBreak => &self.thematic_break,
            StyleSlot::Table => &self.table,
            StyleSlot::DelimiterVisible => &self.delimiter_visible,
            StyleSlot::DelimiterSuppressed => &self.delimiter_suppressed,
        }
    }

    /// Stable hash of every slot, used to key cached render output.
    pub fn identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_in_identity() {
        let light = StyleConfig::preset(Preset::Light);
        let dark = StyleConfig::preset(Preset::Dark);
        assert_ne!(light.identity(), dark.identity());
        assert_eq!(light.identity(), StyleConfig::default().identity());
    }

    #[test]
    fn identity_tracks_edits() {
        let base = StyleConfig::default();
        let mut edited = base.clone();
        edited.bold = edited.bold.underline();
        assert_ne!(base.identity(), edited.identity());
    }

    #[test]
    fn suppressed_delimiters_are_near_invisible() {
        let styles = StyleConfig::preset(Preset::Dark);
        let suppressed = styles.get(StyleSlot::DelimiterSuppressed);
        assert_eq!(suppressed.opacity_percent, 0);
        assert!(suppressed.size_percent < 5);
    }

    #[test]
    fn heading_slots_by_level() {
        assert_eq!(StyleSlot::heading(1), StyleSlot::Heading1);
        assert_eq!(StyleSlot::heading(6), StyleSlot::Heading6);
        assert_eq!(StyleSlot::heading(9), StyleSlot::Heading6);
    }

    #[test]
    fn layering_keeps_base_size_and_adds_flags() {
        let heading = TextStyle::default().bold().size(200);
        let link = TextStyle::default().underline().fg(Rgb(1, 2, 3));
        let layered = heading.layered(&link);
        assert!(layered.bold && layered.underline);
        assert_eq!(layered.size_percent, 200);
        assert_eq!(layered.fg, Some(Rgb(1, 2, 3)));
    }

    #[test]
    fn preset_names() {
        assert_eq!(Preset::from_name("DARK"), Some(Preset::Dark));
        assert_eq!(Preset::from_name("solarized"), None);
        assert_eq!(Preset::Light.name(), "light");
    }
}
