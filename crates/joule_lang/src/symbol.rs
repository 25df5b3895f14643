//! The symbol table: a tree of lexical scopes populated during semantic
//! analysis.
//!
//! Scopes are created on entry to a block or function body and retained
//! under their parent for the lifetime of the report, so a host can render
//! the whole tree after analysis finishes. Because a scope must go on
//! being mutated (new symbols declared, used/called flags flipped) long
//! after the traversal has descended past it, the tree is owned in a
//! [`joule_base::Arena`] indexed by insertion order; the traversal stack
//! only ever holds [`joule_base::arena::Id`] handles into that arena, never
//! owning references.

use crate::ty::Type;
use joule_base::{arena::Id, Arena, Span};

/// The closed set of symbol kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Parameter,
    Builtin,
}

/// A named entity bound in some scope: a variable, constant, function,
/// parameter, or built-in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    pub declared_at: Span,
    /// Parameter count for `Function` symbols; `None` otherwise.
    pub arity: Option<crate::ty::Arity>,
    pub used: bool,
    pub called: bool,
    pub mutable: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: Type, declared_at: Span) -> Self {
        let mutable = !matches!(kind, SymbolKind::Constant | SymbolKind::Builtin);
        Symbol { name: name.into(), kind, ty, declared_at, arity: None, used: false, called: false, mutable }
    }

    pub fn with_arity(mut self, arity: crate::ty::Arity) -> Self {
        self.arity = Some(arity);
        self
    }
}

/// What introduced a scope, used only to label it for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

/// A single lexical scope: a local name→symbol map plus links to its
/// parent and children in the retained scope tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<Id<Scope>>,
    pub children: Vec<Id<Scope>>,
    /// Symbols declared directly in this scope, in declaration order.
    names: Vec<String>,
    symbols: Vec<Symbol>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<Id<Scope>>) -> Self {
        Scope { kind, parent, children: Vec::new(), names: Vec::new(), symbols: Vec::new() }
    }

    fn local_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Symbols declared in this scope, in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Error returned by [`ScopeTree::declare`] when a name already exists in
/// the current scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Redeclaration;

/// Outcome of a successful declaration: whether it shadowed a binding in
/// an outer scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareOutcome {
    pub shadows: bool,
}

/// The tree of scopes built up during semantic analysis, plus a cursor
/// tracking which scope is "current" during traversal.
#[derive(Debug)]
pub struct ScopeTree {
    arena: Arena<Scope>,
    root: Id<Scope>,
    current: Id<Scope>,
}

impl ScopeTree {
    /// Creates a tree with a single root `Global` scope, pre-seeded with
    /// the built-in functions every Joule program sees: `print`, `input`,
    /// and `parseInt`.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.push(Scope::new(ScopeKind::Global, None));
        let mut tree = ScopeTree { arena, root, current: root };
        tree.seed_builtins();
        tree
    }

    fn seed_builtins(&mut self) {
        use crate::ty::Arity;
        let builtins = [
            ("print", Arity::Any, Type::Void),
            ("input", Arity::Exact(0), Type::String),
            ("parseInt", Arity::Exact(1), Type::Number),
        ];
        for (name, arity, return_type) in builtins {
            let ty = Type::function(arity, return_type);
            let symbol = Symbol::new(name, SymbolKind::Builtin, ty, Span::default())
                .with_arity(arity);
            let root = self.root;
            let scope = self.arena.get_mut(root).expect("root scope always exists");
            scope.names.push(name.to_string());
            scope.symbols.push(symbol);
        }
    }

    /// The root (`Global`) scope's handle.
    pub fn root(&self) -> Id<Scope> {
        self.root
    }

    /// The scope the traversal is currently inside.
    pub fn current(&self) -> Id<Scope> {
        self.current
    }

    pub fn get(&self, id: Id<Scope>) -> &Scope {
        self.arena.get(id).expect("scope handle from this tree is always valid")
    }

    /// Creates a child of the current scope and makes it current, returning
    /// its handle.
    pub fn push(&mut self, kind: ScopeKind) -> Id<Scope> {
        let child = self.arena.push(Scope::new(kind, Some(self.current)));
        self.arena.get_mut(self.current).expect("current scope is valid").children.push(child);
        self.current = child;
        child
    }

    /// Leaves the current scope, making its parent current. The scope
    /// itself remains in the tree under its parent.
    ///
    /// # Panics
    /// Panics if called while at the root scope.
    pub fn pop(&mut self) {
        let parent = self.get(self.current).parent.expect("cannot pop the root scope");
        self.current = parent;
    }

    /// Declares `symbol` in the current scope. Fails with [`Redeclaration`]
    /// if the name already exists *in the current scope only*; shadowing
    /// an outer binding is allowed and reported via the returned
    /// [`DeclareOutcome`].
    pub fn declare(&mut self, symbol: Symbol) -> Result<DeclareOutcome, Redeclaration> {
        let current = self.current;
        let name = symbol.name.clone();
        {
            let scope = self.arena.get(current).expect("current scope is valid");
            if scope.local_index(&name).is_some() {
                return Err(Redeclaration);
            }
        }
        let shadows = self.resolve_from(current, &name).is_some();
        let scope = self.arena.get_mut(current).expect("current scope is valid");
        scope.names.push(name);
        scope.symbols.push(symbol);
        Ok(DeclareOutcome { shadows })
    }

    /// Innermost-first lookup starting at the current scope.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.resolve_from(self.current, name)
    }

    fn resolve_from(&self, start: Id<Scope>, name: &str) -> Option<&Symbol> {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let scope = self.arena.get(id).expect("scope handle is valid");
            if let Some(index) = scope.local_index(name) {
                return Some(&scope.symbols[index]);
            }
            cursor = scope.parent;
        }
        None
    }

    /// Flips the `used` flag on the innermost binding of `name`, if any.
    pub fn mark_used(&mut self, name: &str) {
        self.mark(name, |symbol| symbol.used = true);
    }

    /// Flips the `called` flag on the innermost binding of `name`, if any.
    pub fn mark_called(&mut self, name: &str) {
        self.mark(name, |symbol| symbol.called = true);
    }

    /// Refines the declared type of the innermost binding of `name` to
    /// `ty`. Used when a `let` declared without an initializer (type
    /// `Unknown`) receives its first assignment.
    pub fn declare_refine(&mut self, name: &str, ty: Type) {
        self.mark(name, move |symbol| symbol.ty = ty.clone());
    }

    fn mark(&mut self, name: &str, f: impl Fn(&mut Symbol)) {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = self.arena.get_mut(id).expect("scope handle is valid");
            if let Some(index) = scope.local_index(name) {
                f(&mut scope.symbols[index]);
                return;
            }
            cursor = scope.parent;
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
