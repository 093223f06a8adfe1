//! Incremental change detection for Latte templates.
//!
//! The host calls [`ChangeDetector::parse_changed_parts`] once per edit
//! with the full current text of a file. The detector keeps the last text
//! it saw for each file and reports which byte ranges of the new text must
//! be re-lexed.
//!
//! A reported range never splits a macro tag, comment, HTML tag header or
//! `{syntax}` region. Under the default [`RangePolicy::WholeFile`] it is
//! simply the whole file. [`RangePolicy::Minimal`] reports the diff widened
//! to the lexer's restart points instead; see [`expand_to_constructs`].
//!
//! ```
//! use latte_incremental::ChangeDetector;
//! use latte_ir::{FileId, Span};
//!
//! let mut detector = ChangeDetector::new();
//! let file = FileId::new(1);
//! assert_eq!(detector.parse_changed_parts(file, "{if $x}A{/if}"), vec![Span::new(0, 13)]);
//! ```

pub mod boundary;
pub mod diff;

use latte_ir::{FileId, Span};
use latte_lexer::LatteVersion;
use rustc_hash::FxHashMap;

pub use boundary::expand_to_constructs;
pub use diff::compute_change;

/// Which ranges [`ChangeDetector::parse_changed_parts`] reports once a
/// baseline exists.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum RangePolicy {
    /// Always `[0, len)`, even when nothing changed.
    #[default]
    WholeFile,
    /// The changed region widened to whole constructs. Empty when the text
    /// is unchanged.
    Minimal,
}

/// Per-file baselines for change detection.
///
/// Each file has its own slot. The host serializes calls for one file;
/// calls for different files touch different entries.
#[derive(Clone, Debug, Default)]
pub struct ChangeDetector {
    baselines: FxHashMap<FileId, String>,
    policy: RangePolicy,
    /// Grammar used to find construct boundaries under
    /// [`RangePolicy::Minimal`].
    version: LatteVersion,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RangePolicy) -> Self {
        ChangeDetector {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: LatteVersion) -> Self {
        self.version = version;
        self
    }

    #[inline]
    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    #[inline]
    pub fn version(&self) -> LatteVersion {
        self.version
    }

    /// Ranges of `text` to re-lex since the last call for `file`, then
    /// remember `text` as the new baseline.
    ///
    /// The first call for a file (or the first after its baseline was
    /// cleared) always returns the whole text.
    #[tracing::instrument(level = "debug", skip(self, text), fields(len = text.len(), policy = ?self.policy))]
    pub fn parse_changed_parts(&mut self, file: FileId, text: &str) -> Vec<Span> {
        let whole = Span::whole(text.len());
        let Some(previous) = self.baselines.get_mut(&file) else {
            tracing::debug!("no baseline, whole file");
            self.baselines.insert(file, text.to_owned());
            return vec![whole];
        };

        let change = compute_change(previous.as_str(), text);
        if let Some(change) = change {
            tracing::debug!(
                removed = %change.old_span(),
                inserted = %change.new_span(),
                delta = change.delta(),
                "text changed"
            );
        }

        let ranges = match (self.policy, change) {
            (RangePolicy::WholeFile, _) => vec![whole],
            (RangePolicy::Minimal, None) => Vec::new(),
            (RangePolicy::Minimal, Some(change)) => {
                let span = expand_to_constructs(previous.as_str(), text, change, self.version);
                tracing::debug!(%span, "changed region");
                vec![span]
            }
        };

        previous.clear();
        previous.push_str(text);
        ranges
    }

    /// Forget the baseline of `file`. Returns whether one existed.
    pub fn clear_last_known_content(&mut self, file: FileId) -> bool {
        self.baselines.remove(&file).is_some()
    }

    /// Forget every baseline.
    pub fn clear_all_last_known_content(&mut self) {
        tracing::debug!(files = self.baselines.len(), "clearing all baselines");
        self.baselines.clear();
    }

    pub fn last_known_content(&self, file: FileId) -> Option<&str> {
        self.baselines.get(&file).map(String::as_str)
    }

    /// Files with a stored baseline, in no particular order.
    pub fn tracked_files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.baselines.keys().copied()
    }
}
