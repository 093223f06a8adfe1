//! Macro classification with a generation-stamped lookup cache.
//!
//! The root lexer asks one question per macro tag: is this a block macro
//! (one that expects a closing tag) under the active version? The answer
//! depends on the built-in table and on the user's custom macro settings,
//! which can change while the editor is running.
//!
//! Answers are cached per `(version, name)`. Each entry is stamped with the
//! generation it was computed in; changing the settings bumps the
//! generation, so stale entries are recomputed on their next lookup.

use std::sync::atomic::{AtomicU64, Ordering};

use latte_lexer_core::LatteVersion;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// How a macro behaves structurally.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MacroKind {
    /// Expects a matching `{/name}`.
    Block,
    /// Stands alone.
    Standalone,
}

/// Built-in macro with the version range it exists in (inclusive).
struct Builtin {
    name: &'static str,
    kind: MacroKind,
    since: LatteVersion,
    until: LatteVersion,
}

const fn always(name: &'static str, kind: MacroKind) -> Builtin {
    Builtin {
        name,
        kind,
        since: LatteVersion::V2x,
        until: LatteVersion::V4x,
    }
}

const fn since(name: &'static str, kind: MacroKind, version: LatteVersion) -> Builtin {
    Builtin {
        name,
        kind,
        since: version,
        until: LatteVersion::V4x,
    }
}

const fn until(name: &'static str, kind: MacroKind, version: LatteVersion) -> Builtin {
    Builtin {
        name,
        kind,
        since: LatteVersion::V2x,
        until: version,
    }
}

use MacroKind::{Block, Standalone};

const BUILTINS: &[Builtin] = &[
    // === Blocks ===
    always("block", Block),
    always("capture", Block),
    always("catch", Block),
    always("define", Block),
    always("embed", Block),
    always("first", Block),
    always("for", Block),
    always("foreach", Block),
    always("if", Block),
    always("ifchanged", Block),
    always("ifset", Block),
    always("last", Block),
    always("sep", Block),
    always("snippet", Block),
    always("snippetArea", Block),
    always("spaceless", Block),
    always("switch", Block),
    always("try", Block),
    always("while", Block),
    since("iterateWhile", Block, LatteVersion::V3x),
    since("translate", Block, LatteVersion::V3x),
    until("ifCurrent", Block, LatteVersion::V2x),
    // === Standalone ===
    always("=", Standalone),
    always("_", Standalone),
    always("breakIf", Standalone),
    always("case", Standalone),
    always("contentType", Standalone),
    always("continueIf", Standalone),
    always("debugbreak", Standalone),
    always("default", Standalone),
    always("do", Standalone),
    always("dump", Standalone),
    always("else", Standalone),
    always("elseif", Standalone),
    always("elseifset", Standalone),
    always("extends", Standalone),
    always("import", Standalone),
    always("include", Standalone),
    always("layout", Standalone),
    always("l", Standalone),
    always("r", Standalone),
    always("skipIf", Standalone),
    always("var", Standalone),
    since("parameters", Standalone, LatteVersion::V3x),
    since("templateType", Standalone, LatteVersion::V3x),
    since("varType", Standalone, LatteVersion::V3x),
    until("!", Standalone, LatteVersion::V2x),
    until("php", Standalone, LatteVersion::V2x),
];

#[derive(Copy, Clone, Debug)]
struct CacheEntry {
    kind: Option<MacroKind>,
    generation: u64,
}

/// Macro lookup table: built-ins plus configured custom macros.
///
/// # Thread Safety
/// Lookups take a read lock on the cache; misses and reconfiguration take
/// write locks. Share it behind a reference across lexer calls.
pub struct MacroRegistry {
    custom: RwLock<FxHashMap<Box<str>, MacroKind>>,
    cache: RwLock<FxHashMap<LatteVersion, FxHashMap<Box<str>, CacheEntry>>>,
    generation: AtomicU64,
}

impl MacroRegistry {
    /// Registry with the built-in macros only.
    pub fn new() -> Self {
        MacroRegistry {
            custom: RwLock::new(FxHashMap::default()),
            cache: RwLock::new(FxHashMap::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current cache generation. Bumped by every configuration change.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Classify `name` (without a leading `/`) under `version`.
    ///
    /// Custom macros shadow built-ins of the same name.
    pub fn lookup(&self, name: &str, version: LatteVersion) -> Option<MacroKind> {
        let generation = self.generation();
        {
            let cache = self.cache.read();
            if let Some(entry) = cache.get(&version).and_then(|names| names.get(name)) {
                if entry.generation == generation {
                    return entry.kind;
                }
            }
        }

        let kind = self.resolve(name, version);
        self.cache
            .write()
            .entry(version)
            .or_default()
            .insert(name.into(), CacheEntry { kind, generation });
        kind
    }

    #[inline]
    pub fn is_block(&self, name: &str, version: LatteVersion) -> bool {
        self.lookup(name, version) == Some(MacroKind::Block)
    }

    /// Replace the custom macro set.
    pub fn configure_custom_macros<I, S>(&self, macros: I)
    where
        I: IntoIterator<Item = (S, MacroKind)>,
        S: Into<Box<str>>,
    {
        let macros: FxHashMap<Box<str>, MacroKind> = macros
            .into_iter()
            .map(|(name, kind)| (name.into(), kind))
            .collect();
        tracing::debug!(count = macros.len(), "custom macros configured");
        *self.custom.write() = macros;
        self.bump();
    }

    /// Drop every cached answer.
    pub fn invalidate(&self) {
        self.cache.write().clear();
        self.bump();
    }

    fn bump(&self) {
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(generation = previous + 1, "macro registry invalidated");
    }

    fn resolve(&self, name: &str, version: LatteVersion) -> Option<MacroKind> {
        if let Some(&kind) = self.custom.read().get(name) {
            return Some(kind);
        }
        BUILTINS
            .iter()
            .find(|b| b.name == name && b.since <= version && version <= b.until)
            .map(|b| b.kind)
    }
}

impl Default for MacroRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("custom", &self.custom.read().len())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
