use std::time::{Duration, Instant};

use log::{debug, info, warn};
use markdown_reveal_syntax::Extensions;

use crate::document::Document;
use crate::render::{
    RenderedBlock, StyleConfig, StyledRun, active_block_for, mode_for, render_block, unstyled,
};

use super::cache::RenderCache;
use super::debounce::Debouncer;
use super::diff::changed_blocks;

/// Tuning for [`IncrementalEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Edits to a document with more blocks than this are debounced.
    pub debounce_threshold: usize,
    pub debounce_delay: Duration,
    /// Maximum number of rendered blocks kept in the cache.
    pub cache_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            debounce_threshold: 400,
            debounce_delay: Duration::from_millis(150),
            cache_capacity: 2048,
        }
    }
}

/// What one refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshStats {
    /// Blocks in the document after the refresh
    pub blocks: usize,
    /// Blocks in the changed window between the matched prefix and suffix
    pub changed: usize,
    /// Blocks whose output was recomputed or fetched from the cache
    pub rerendered: usize,
    /// How many of those came from the cache
    pub cache_hits: usize,
}

/// Current output of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput<'a> {
    /// One rendered block per document block.
    Styled(&'a [RenderedBlock]),
    /// A refresh is pending; the whole source as a single plain run.
    Deferred(StyledRun),
}

/// Keeps a styled rendering of an edited text up to date.
///
/// Every edit is a full reparse, but only the output of blocks whose raw
/// text or mode changed is recomputed, and those go through a
/// [`RenderCache`]. For large documents the reparse is debounced: the host
/// calls [`poll`](Self::poll) (typically from its event loop tick) and sees
/// [`RenderOutput::Deferred`] until the delay has passed without edits.
pub struct IncrementalEngine {
    options: EngineOptions,
    extensions: Extensions,
    styles: StyleConfig,
    style_identity: u64,
    source: String,
    /// Character index into `source`.
    cursor: Option<usize>,
    document: Document,
    active: Option<usize>,
    forest: Vec<RenderedBlock>,
    cache: RenderCache,
    debouncer: Debouncer,
    disposed: bool,
}

impl IncrementalEngine {
    pub fn new(options: EngineOptions, extensions: Extensions, styles: StyleConfig) -> Self {
        Self {
            style_identity: styles.identity(),
            styles,
            extensions,
            source: String::new(),
            cursor: None,
            document: Document::parse_with("", extensions),
            active: None,
            forest: Vec::new(),
            cache: RenderCache::new(options.cache_capacity),
            debouncer: Debouncer::new(options.debounce_delay),
            disposed: false,
            options,
        }
    }

    /// Replace the text. `cursor` is a character index into `text`.
    pub fn update(&mut self, text: &str, cursor: Option<usize>) -> Option<RefreshStats> {
        self.update_at(text, cursor, Instant::now())
    }

    /// Replace the text. Refreshes immediately and returns the stats, or
    /// returns `None` if the refresh was deferred.
    pub fn update_at(
        &mut self,
        text: &str,
        cursor: Option<usize>,
        now: Instant,
    ) -> Option<RefreshStats> {
        if self.disposed {
            warn!("update after dispose ignored");
            return None;
        }

        self.source.clear();
        self.source.push_str(text);
        self.cursor = cursor;

        let blocks = self.document.blocks().len();
        if blocks > self.options.debounce_threshold {
            debug!(
                "deferring refresh: {blocks} blocks over threshold {}",
                self.options.debounce_threshold
            );
            self.debouncer.schedule(now);
            return None;
        }

        self.debouncer.cancel();
        Some(self.refresh())
    }

    /// Move the cursor (a character index). Only the previously and newly active blocks are
    /// re-rendered. Returns `None` while a refresh is pending, in which case
    /// the cursor is picked up by that refresh.
    pub fn set_cursor(&mut self, cursor: Option<usize>) -> Option<RefreshStats> {
        self.cursor = cursor;
        if self.disposed || self.debouncer.is_pending() {
            return None;
        }

        let active = active_block_for(&self.document, cursor);
        let mut stats = RefreshStats {
            blocks: self.forest.len(),
            ..RefreshStats::default()
        };
        if active != self.active {
            for index in [self.active, active].into_iter().flatten() {
                self.rerender(index, active, &mut stats);
            }
            self.active = active;
        }
        Some(stats)
    }

    pub fn poll(&mut self) -> Option<RefreshStats> {
        self.poll_at(Instant::now())
    }

    /// Run the deferred refresh if its delay has passed.
    pub fn poll_at(&mut self, now: Instant) -> Option<RefreshStats> {
        if self.disposed || !self.debouncer.take_due(now) {
            return None;
        }
        let stats = self.refresh();
        info!(
            "deferred refresh: {} blocks, {} changed, {} re-rendered",
            stats.blocks, stats.changed, stats.rerendered
        );
        Some(stats)
    }

    /// Run a pending refresh now.
    pub fn flush(&mut self) -> Option<RefreshStats> {
        if self.disposed || !self.debouncer.is_pending() {
            return None;
        }
        self.debouncer.cancel();
        Some(self.refresh())
    }

    /// Swap the style configuration and re-render every block.
    pub fn set_styles(&mut self, styles: StyleConfig) -> Option<RefreshStats> {
        self.style_identity = styles.identity();
        self.styles = styles;
        self.forest.clear();
        if self.disposed || self.debouncer.is_pending() {
            return None;
        }
        Some(self.refresh())
    }

    pub fn output(&self) -> RenderOutput<'_> {
        if self.debouncer.is_pending() {
            RenderOutput::Deferred(unstyled(&self.source, &self.styles))
        } else {
            RenderOutput::Styled(&self.forest)
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending refresh becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// The document of the last refresh; lags [`source`](Self::source)
    /// while a refresh is pending.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn active_block(&self) -> Option<usize> {
        self.active
    }

    pub fn styles(&self) -> &StyleConfig {
        &self.styles
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Cancel pending work and release cached output. Later updates are ignored.
    pub fn dispose(&mut self) {
        self.debouncer.cancel();
        self.cache.clear();
        self.forest.clear();
        self.disposed = true;
    }

    fn rerender(&mut self, index: usize, active: Option<usize>, stats: &mut RefreshStats) {
        let mode = mode_for(index, active);
        let Some(block) = self.document.blocks().get(index) else {
            return;
        };
        if self.forest.get(index).is_some_and(|r| r.mode == mode) {
            return;
        }

        let styles = &self.styles;
        let (runs, hit) = self
            .cache
            .get_or_render(&block.span.raw_text, mode, self.style_identity, || {
                render_block(block, mode, styles)
            });
        stats.rerendered += 1;
        stats.cache_hits += usize::from(hit);

        if let Some(slot) = self.forest.get_mut(index) {
            *slot = RenderedBlock {
                block_index: index,
                mode,
                runs,
            };
        }
    }

    fn refresh(&mut self) -> RefreshStats {
        let document = Document::parse_with(&self.source, self.extensions);
        let changed = changed_blocks(&self.document, &document);
        let active = active_block_for(&document, self.cursor);
        let old_len = self.document.blocks().len();
        let new_len = document.blocks().len();
        debug!(
            "reparsed {} -> {} blocks, changed window {:?}",
            old_len, new_len, changed.range
        );

        let mut previous: Vec<Option<RenderedBlock>> = std::mem::take(&mut self.forest)
            .into_iter()
            .map(Some)
            .collect();
        let mut stats = RefreshStats {
            blocks: new_len,
            changed: changed.len(),
            ..RefreshStats::default()
        };

        let mut forest = Vec::with_capacity(new_len);
        for (index, block) in document.blocks().iter().enumerate() {
            let mode = mode_for(index, active);
            let reused = changed
                .old_index(index, old_len, new_len)
                .and_then(|old| previous.get_mut(old)?.take())
                .filter(|rendered| rendered.mode == mode);

            let runs = match reused {
                Some(rendered) => rendered.runs,
                None => {
                    let (runs, hit) = self.cache.get_or_render(
                        &block.span.raw_text,
                        mode,
                        self.style_identity,
                        || render_block(block, mode, &self.styles),
                    );
                    stats.rerendered += 1;
                    stats.cache_hits += usize::from(hit);
                    runs
                }
            };
            forest.push(RenderedBlock {
                block_index: index,
                mode,
                runs,
            });
        }

        self.document = document;
        self.forest = forest;
        self.active = active;
        stats
    }
}

impl Drop for IncrementalEngine {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}
