//! Read/write ledgers for variables and the member chains hanging off them.
//!
//! Every variable owns a container. `t.x` and `t["x"]` get a child container
//! of `t`'s keyed by `x`, created on first use. Globals are members of the
//! global table, which is the root of every container walk.

use indexmap::IndexMap;

use super::{ContainerId, Semantics, VariableId};
use crate::syntax::NodePtr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerParent {
    /// The global table itself.
    Root,
    /// Top of a local variable's chain.
    Local,
    Member(ContainerId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Read {
    /// The read is a callee, a method receiver, or on the prefix chain of an assignment target.
    pub can_cause_mutation: bool,
    pub node: NodePtr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteValue {
    Expr(NodePtr),
    /// No value supplied: `local x`, or more targets than values.
    Nil,
    /// Not statically known: parameters, loop variables, extra results of a call.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    /// No conditional block, loop body or function boundary separates the
    /// write from the owning scope.
    pub unconditional: bool,
    pub node: NodePtr,
    pub value: WriteValue,
}

#[derive(Debug, Clone)]
pub struct ReadWriteContainer {
    pub(crate) key: String,
    pub(crate) variable: Option<VariableId>,
    pub(crate) parent: ContainerParent,
    pub(crate) children: IndexMap<String, ContainerId>,
    pub(crate) reads: Vec<Read>,
    pub(crate) writes: Vec<Write>,
}

impl ReadWriteContainer {
    pub(crate) fn new(key: impl Into<String>, variable: Option<VariableId>, parent: ContainerParent) -> Self {
        Self {
            key: key.into(),
            variable,
            parent,
            children: IndexMap::new(),
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Variable or member name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn variable(&self) -> Option<VariableId> {
        self.variable
    }

    pub fn parent(&self) -> ContainerParent {
        self.parent
    }

    pub fn member(&self, name: &str) -> Option<ContainerId> {
        self.children.get(name).copied()
    }

    pub fn members(&self) -> &IndexMap<String, ContainerId> {
        &self.children
    }

    pub fn reads(&self) -> &[Read] {
        &self.reads
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn has_conditional_writes(&self) -> bool {
        self.writes.iter().any(|w| !w.unconditional)
    }

    pub fn has_undefined_writes(&self) -> bool {
        self.writes
            .iter()
            .any(|w| matches!(w.value, WriteValue::Undefined))
    }
}

impl Semantics {
    pub(crate) fn new_container(
        &mut self,
        key: impl Into<String>,
        variable: Option<VariableId>,
        parent: ContainerParent,
    ) -> ContainerId {
        let id = ContainerId::from_index(self.containers.len());
        self.containers
            .push(ReadWriteContainer::new(key, variable, parent));
        id
    }

    /// Child container `name` of `parent`, created on first use.
    pub(crate) fn member_container(&mut self, parent: ContainerId, name: &str) -> ContainerId {
        if let Some(id) = self.container(parent).member(name) {
            return id;
        }
        let id = self.new_container(name, None, ContainerParent::Member(parent));
        self.containers[parent.index()]
            .children
            .insert(name.to_owned(), id);
        id
    }

    pub(crate) fn record_read(&mut self, container: ContainerId, read: Read) {
        self.containers[container.index()].reads.push(read);
    }

    pub(crate) fn record_write(&mut self, container: ContainerId, write: Write) {
        self.containers[container.index()].writes.push(write);
    }
}

/// Key of `t["x"]`: the contents of a short string without escapes.
pub(crate) fn constant_key(literal: &str) -> Option<&str> {
    let quote = literal.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let inner = literal.strip_prefix(quote)?.strip_suffix(quote)?;
    (!inner.contains(['\\', quote])).then_some(inner)
}

