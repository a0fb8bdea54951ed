//! The BDD manager.
//!
//! All boolean functions live inside a single [`Bdd`] manager, which owns the
//! node table (hash-consed, so every function has exactly one representation
//! for the fixed variable order) and the computed table that memoizes ITE and
//! restriction results.
//!
//! Functions are handled through [`Ref`] handles with complement edges: `-f`
//! is the negation of `f` and costs nothing. Canonicity is kept by never
//! storing a complemented `high` edge.
//!
//! Variables are addressed by their 0-based index `0..num_vars()` in the public
//! API. Internally, variable ids are 1-based ([`Var`]) and id 0 marks the
//! terminal node. Smaller ids are closer to the root.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::error::{QueensError, Result};
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::Var;
use crate::utils::MyHash;

type Storage = Table<Node>;

/// Key of the computed table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
    Restrict(Ref, u32, bool),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match *self {
            OpKey::Ite(f, g, h) => {
                MyHash::hash(&(f.raw() as u64, g.raw() as u64, h.raw() as u64))
            }
            OpKey::Restrict(f, v, b) => {
                MyHash::hash(&(f.raw() as u64, ((v as u64) << 1) | b as u64))
            }
        }
    }
}

pub struct Bdd {
    storage: RefCell<Storage>,
    cache: RefCell<Cache<OpKey, Ref>>,
    num_vars: Cell<usize>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    /// Create a manager with `2^min(bits, 16)` unique-table buckets and
    /// computed-table slots.
    ///
    /// The node table itself grows on demand. The variable universe is empty
    /// until [`Bdd::set_num_vars`] is called.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let cache_bits = bits.min(16);

        let mut storage = Storage::new(bits, Node::terminal());

        // Allocate the terminal node:
        let one = storage.add(Node::terminal());
        assert_eq!(one, 1); // Make sure the terminal node is (1).
        let one = Ref::positive(one as u32);
        let zero = -one;

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(cache_bits)),
            num_vars: Cell::new(0),
            zero,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(20)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        let cache = self.cache.borrow();
        f.debug_struct("Bdd")
            .field("num_vars", &self.num_vars.get())
            .field("nodes", &storage.size())
            .field("buckets", &storage.num_buckets())
            .field("cache_hits", &cache.hits())
            .field("cache_misses", &cache.misses())
            .finish()
    }
}

impl Bdd {
    /// Make sure the variable universe holds at least `count` variables.
    ///
    /// The universe only grows: games sharing the manager keep every variable
    /// they were built over. Existing nodes stay valid.
    ///
    /// Fails if `count` is zero or does not fit the 32-bit variable ids.
    pub fn set_num_vars(&self, count: usize) -> Result<()> {
        if count == 0 || u32::try_from(count).is_err() {
            return Err(QueensError::InvalidVariableCount { count });
        }
        let num_vars = self.num_vars.get().max(count);
        debug!("set_num_vars(count = {}) -> {}", count, num_vars);
        self.num_vars.set(num_vars);
        Ok(())
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars.get()
    }

    /// Number of decision nodes ever created (the table never shrinks).
    pub fn num_nodes(&self) -> usize {
        // The terminal is stored too.
        self.storage.borrow().size() - 1
    }

    pub fn cache(&self) -> std::cell::Ref<'_, Cache<OpKey, Ref>> {
        self.cache.borrow()
    }

    pub fn variable(&self, index: usize) -> u32 {
        self.storage.borrow().value(index).variable
    }
    pub fn low(&self, index: usize) -> Ref {
        self.storage.borrow().value(index).low
    }
    pub fn high(&self, index: usize) -> Ref {
        self.storage.borrow().value(index).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn constant(&self, value: bool) -> Ref {
        if value {
            self.one
        } else {
            self.zero
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    pub fn mk_node(&self, v: Var, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        // Handle canonicity
        if high.is_negated() {
            debug!("mk: restoring canonicity");
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return low;
        }

        let i = self.storage.borrow_mut().put(Node::new(v.id(), low, high));
        Ref::positive(i as u32)
    }

    fn checked_var(&self, v: u32) -> Var {
        let n = self.num_vars.get();
        assert!(
            (v as usize) < n,
            "Variable {} is outside of the universe of {} variables",
            v,
            n
        );
        Var::from_index(v)
    }

    /// The function "variable `v` is true".
    ///
    /// # Panics
    ///
    /// Panics if `v >= num_vars()`.
    pub fn mk_var(&self, v: u32) -> Ref {
        let var = self.checked_var(v);
        self.mk_node(var, self.zero, self.one)
    }

    /// The function "variable `v` is false".
    ///
    /// # Panics
    ///
    /// Panics if `v >= num_vars()`.
    pub fn mk_not_var(&self, v: u32) -> Ref {
        -self.mk_var(v)
    }

    /// Cofactors of `node` with respect to the variable with id `v`,
    /// which must not be below the top variable of `node`.
    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        let i = node.index();
        if self.is_terminal(node) || v < self.variable(i) {
            return (node, node);
        }
        assert_eq!(v, self.variable(i));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // From now on, F is known not to be a constant

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        //   ite(F,1,~F) => 1
        //   ite(F,F,1) => 1
        //   ite(F,~F,0) => 0
        //   ite(F,0,F) => F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }
        if self.is_one(g) && h == -f {
            return self.one;
        }
        if g == f && self.is_one(h) {
            return self.one;
        }
        if g == -f && self.is_zero(h) {
            return self.zero;
        }
        if self.is_zero(g) && h == f {
            return f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        let i = self.variable(f.index());
        let j = self.variable(g.index());
        let k = self.variable(h.index());
        assert_ne!(i, 0);

        // Equivalent pairs (choose the one with the lowest variable on top):
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        if self.is_one(g) && k != 0 && k < i {
            return self.apply_ite(h, self.one, f);
        }
        if self.is_zero(h) && j != 0 && j < i {
            return self.apply_ite(g, f, self.zero);
        }
        if self.is_one(h) && j != 0 && j < i {
            return self.apply_ite(-g, -f, self.one);
        }
        if self.is_zero(g) && k != 0 && k < i {
            return self.apply_ite(-h, self.zero, -f);
        }
        if g == -h && j != 0 && j < i {
            return self.apply_ite(g, f, -f);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        // Determine the top variable:
        let mut m = i;
        if j != 0 {
            m = m.min(j);
        }
        if k != 0 {
            m = m.min(k);
        }
        debug!("min variable = {}", m);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(Var::new(m), e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        debug!("apply_and(u = {}, v = {})", u, v);
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        debug!("apply_or(u = {}, v = {})", u, v);
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Ref {
        debug!("apply_imply(u = {}, v = {})", u, v);
        self.apply_ite(u, v, self.one)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node);
            if self.is_one(res) {
                break;
            }
        }
        res
    }

    /// Restriction `f|v<-b`: the function obtained by fixing variable `v`
    /// (0-based) to `b` in `f`.
    pub fn restrict(&self, f: Ref, v: u32, b: bool) -> Ref {
        debug!("restrict(f = {}, v = {}, b = {})", f, v, b);
        let var = self.checked_var(v);
        self.restrict_(f, var.id(), b)
    }

    fn restrict_(&self, f: Ref, v: u32, b: bool) -> Ref {
        if self.is_terminal(f) {
            return f;
        }

        let i = self.variable(f.index());

        if v < i {
            // 'f' does not depend on 'v'
            return f;
        }

        if v == i {
            return if b {
                self.high_node(f)
            } else {
                self.low_node(f)
            };
        }

        // restrict(~f) == ~restrict(f)
        let n = f.is_negated();
        let f = f.regular();

        let key = OpKey::Restrict(f, v, b);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return if n { -res } else { res };
        }

        let low = self.restrict_(self.low(f.index()), v, b);
        let high = self.restrict_(self.high(f.index()), v, b);
        let res = self.mk_node(Var::new(i), low, high);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    /// Indices of all nodes reachable from `nodes`, including the terminal.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<usize> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Number of nodes in `f`, counting the terminal.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }
}
