//! The compile-time scope stack.
//!
//! One [`Scope`] per nesting level (the outermost program block is level
//! 0; each procedure body is one level deeper than its enclosing block).
//! Entries are kept in declaration order via `IndexMap` so the suggestion
//! engine can break ties by "earliest declared" without a separate
//! bookkeeping pass.
//!
//! **Why parameters get negative offsets.** A call's arguments are
//! evaluated in the *caller's* frame (they may reference the caller's own
//! locals) and are already sitting on the stack by the time `CAL` runs.
//! `CAL` lays the callee's `SL`/`DL`/`RA` header immediately above them,
//! so relative to the callee's frame base the arguments land *below* it —
//! at offsets `-param_count..-1` rather than the `3..` locals use. The
//! generic `base(level) + offset` addressing used by `LOD`/`STO`/`RED`
//! doesn't care about the sign, so this costs nothing at the VM level;
//! see `pl0c-gen`'s call-site emission for the matching cleanup `INT`.
//! Locals, which the callee itself reserves via its own `INT`, keep the
//! ordinary `3..` numbering.

use indexmap::IndexMap;
use pl0c_par::ast::Resolution;
use pl0c_util::Symbol;

/// Slot layout: `[SL, DL, RA, params…, locals…]`, so the first local
/// variable sits at offset 3 (parameters are numbered separately; see the
/// module docs).
pub const FIRST_OFFSET: i64 = 3;

#[derive(Clone, Copy, Debug)]
pub enum Entry {
    Const(i64),
    Var { offset: i64 },
    Procedure { proc_id: u32, param_count: usize },
}

struct Scope {
    level: u32,
    next_offset: i64,
    entries: IndexMap<Symbol, Entry>,
}

pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn depth(&self) -> u32 {
        self.scopes.len() as u32 - 1
    }

    pub fn push_level(&mut self) {
        let level = self.scopes.len() as u32;
        self.scopes.push(Scope {
            level,
            next_offset: FIRST_OFFSET,
            entries: IndexMap::new(),
        });
    }

    pub fn pop_level(&mut self) {
        self.scopes.pop();
    }

    /// `true` if `name` is already declared in the *current* (innermost)
    /// scope — shadowing an outer declaration is fine, redeclaring inside
    /// the same block is not.
    pub fn is_declared_in_current_scope(&self, name: Symbol) -> bool {
        self.scopes
            .last()
            .map(|s| s.entries.contains_key(&name))
            .unwrap_or(false)
    }

    pub fn declare_const(&mut self, name: Symbol, value: i64) {
        self.current_mut().entries.insert(name, Entry::Const(value));
    }

    /// Declares a local variable, returning its frame offset.
    pub fn declare_var(&mut self, name: Symbol) -> i64 {
        let scope = self.current_mut();
        let offset = scope.next_offset;
        scope.next_offset += 1;
        scope.entries.insert(name, Entry::Var { offset });
        offset
    }

    /// Declares this block's value parameters, in left-to-right
    /// declaration order. See the module docs for why their offsets run
    /// negative instead of continuing the locals' `3..` numbering.
    pub fn declare_params(&mut self, names: &[Symbol]) {
        let count = names.len() as i64;
        let scope = self.current_mut();
        for (i, &name) in names.iter().enumerate() {
            let offset = i as i64 - count;
            scope.entries.insert(name, Entry::Var { offset });
        }
    }

    pub fn declare_procedure(&mut self, name: Symbol, proc_id: u32, param_count: usize) {
        self.current_mut()
            .entries
            .insert(name, Entry::Procedure { proc_id, param_count });
    }

    /// Resolves `name` against the scope chain, innermost first.
    pub fn resolve(&self, name: Symbol) -> Option<Resolution> {
        let current_level = self.depth();
        for scope in self.scopes.iter().rev() {
            if let Some(entry) = scope.entries.get(&name) {
                let level_diff = current_level - scope.level;
                return Some(match *entry {
                    Entry::Const(value) => Resolution::Const(value),
                    Entry::Var { offset } => Resolution::Var { level_diff, offset },
                    Entry::Procedure {
                        proc_id,
                        param_count,
                    } => Resolution::Procedure {
                        level_diff,
                        proc_id,
                        param_count,
                    },
                });
            }
        }
        None
    }

    /// All names visible from the current scope, innermost scope (and
    /// within it, earliest declaration) first — the priority order the
    /// suggestion engine breaks ties by.
    pub fn visible_names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.scopes.iter().rev().flat_map(|s| s.entries.keys().copied())
    }

    /// How many slots (header + locals, *not* parameters — see module
    /// docs) the current block needs; used to size its `INT`.
    pub fn frame_size(&self) -> i64 {
        self.scopes.last().map(|s| s.next_offset).unwrap_or(FIRST_OFFSET)
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is never empty while declaring")
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> Symbol {
        // Symbol has no public constructor outside the interner; tests in
        // this module only care about relative identity, so any two
        // interned symbols from a real Interner would do just as well.
        // We fabricate distinct ones via a throwaway interner instead.
        let mut interner = pl0c_util::Interner::new();
        interner.intern(&format!("sym{n}"))
    }

    #[test]
    fn shadowing_is_allowed_redeclaration_in_same_scope_is_detectable() {
        let mut stack = ScopeStack::new();
        stack.push_level();
        let x = sym(1);
        stack.declare_var(x);
        assert!(stack.is_declared_in_current_scope(x));
        stack.push_level();
        assert!(!stack.is_declared_in_current_scope(x));
    }

    #[test]
    fn resolve_prefers_innermost_scope() {
        let mut stack = ScopeStack::new();
        stack.push_level();
        let x = sym(1);
        stack.declare_const(x, 10);
        stack.push_level();
        stack.declare_var(x);
        match stack.resolve(x) {
            Some(Resolution::Var { level_diff, .. }) => assert_eq!(level_diff, 0),
            other => panic!("expected inner var, got {other:?}"),
        }
        stack.pop_level();
        match stack.resolve(x) {
            Some(Resolution::Const(10)) => {}
            other => panic!("expected outer const, got {other:?}"),
        }
    }

    #[test]
    fn level_diff_accounts_for_nesting_depth() {
        let mut stack = ScopeStack::new();
        stack.push_level();
        let x = sym(1);
        stack.declare_var(x);
        stack.push_level();
        stack.push_level();
        match stack.resolve(x) {
            Some(Resolution::Var { level_diff, .. }) => assert_eq!(level_diff, 2),
            other => panic!("expected level_diff 2, got {other:?}"),
        }
    }

    #[test]
    fn offsets_start_at_three_and_increment() {
        let mut stack = ScopeStack::new();
        stack.push_level();
        let a = stack.declare_var(sym(1));
        let b = stack.declare_var(sym(2));
        assert_eq!(a, FIRST_OFFSET);
        assert_eq!(b, FIRST_OFFSET + 1);
    }
}
