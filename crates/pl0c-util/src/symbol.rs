//! String interning.
//!
//! PL/0 identifiers are short and a single source file rarely declares more
//! than a few dozen of them, so a single-threaded, session-owned interner is
//! all that's needed here — no `DashMap`, no global `OnceLock`, no atomics.
//! The `Interner` is created once by the driver and threaded by reference
//! through the lexer, parser, and semantic analyzer.

use rustc_hash::FxHashMap;

/// An interned identifier.
///
/// Two symbols are equal iff the underlying text is equal; comparing them
/// is a `u32` comparison rather than a string comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns the canonical text for every interned [`Symbol`].
#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    /// Interns `text`, returning its existing symbol if seen before.
    ///
    /// Identifiers are case-sensitive (PL/0 keywords are matched
    /// case-insensitively by the lexer before this is ever called), so
    /// `counter` and `Counter` intern to distinct symbols.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    /// Resolves a symbol back to its text.
    ///
    /// # Panics
    /// Panics if `sym` was not produced by this interner.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_yields_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.intern("counter");
        let b = interner.intern("counter");
        assert_eq!(a, b);
    }

    #[test]
    fn interning_is_case_sensitive() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        let b = interner.intern("X");
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "x");
        assert_eq!(interner.resolve(b), "X");
    }

    #[test]
    fn distinct_text_yields_distinct_symbols() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "a");
        assert_eq!(interner.resolve(b), "b");
    }
}
