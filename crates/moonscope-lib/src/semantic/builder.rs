//! Single forward walk building scopes, variables, labels and usage containers.
//!
//! Lua resolution order is followed exactly: values of `local x = x` are
//! walked before `x` is declared, `local function f` declares `f` before its
//! body, and a name declared later in the same scope never resolves an
//! earlier reference.

use indexmap::IndexMap;
use tracing::debug;

use super::invariants::{
    assert_scope_closed, ensure_current_scope, ensure_loop_frame, ensure_scope_stack_empty,
};
use super::usage::constant_key;
use super::{
    ContainerId, ContainerParent, GLOBAL_SCOPE, GLOBAL_TABLE, Read, Scope, ScopeId, ScopeKind,
    Semantics, Variable, VariableId, VariableKind, Write, WriteValue,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::script::SourceId;
use crate::syntax::ast::{self, Expr, Field, Stmt};
use crate::syntax::{NodePtr, SyntaxKind, SyntaxNode, SyntaxTree};

/// Names whose mutating reads also count against the global table.
const GLOBAL_TABLE_ALIASES: [&str; 2] = ["_G", "_ENV"];

pub(super) struct ScopeBuilder {
    pub(super) sem: Semantics,
    pub(super) source: SourceId,
    pub(super) stack: Vec<ScopeId>,
    /// Per scope: whether entering it does not guarantee execution.
    conditional: Vec<bool>,
    /// Enclosing loops, one frame per function.
    loop_depth: Vec<u32>,
    globals: IndexMap<String, VariableId>,
    pub(super) diagnostics: Diagnostics,
}

impl ScopeBuilder {
    pub(super) fn new() -> Self {
        let sem = Semantics {
            scopes: Vec::new(),
            variables: Vec::new(),
            labels: Vec::new(),
            containers: Vec::new(),
            scope_by_node: IndexMap::new(),
            variable_by_node: IndexMap::new(),
            diagnostics: Vec::new(),
        };
        Self {
            sem,
            source: SourceId::default(),
            stack: Vec::new(),
            conditional: Vec::new(),
            loop_depth: Vec::new(),
            globals: IndexMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub(super) fn build(mut self, trees: &[SyntaxTree]) -> Semantics {
        self.sem
            .scopes
            .push(Scope::new(ScopeKind::Global, None, None));
        self.conditional.push(false);
        let table = self.sem.new_container("_G", None, ContainerParent::Root);
        debug_assert_eq!(table, GLOBAL_TABLE);

        self.stack.push(GLOBAL_SCOPE);
        for (index, tree) in trees.iter().enumerate() {
            self.source = SourceId::from_index(index);
            self.file(&tree.syntax());
            let diagnostics = std::mem::take(&mut self.diagnostics);
            self.sem.diagnostics.push(diagnostics);
        }
        let popped = self.stack.pop();
        assert_scope_closed(GLOBAL_SCOPE, popped);
        ensure_scope_stack_empty(&self.stack);

        debug!(
            trees = trees.len(),
            scopes = self.sem.scopes.len(),
            variables = self.sem.variables.len(),
            globals = self.globals.len(),
            labels = self.sem.labels.len(),
            "built scopes"
        );
        self.sem
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    pub(super) fn ptr(&self, node: &SyntaxNode) -> NodePtr {
        NodePtr::new(self.source, node)
    }

    pub(super) fn current(&self) -> ScopeId {
        ensure_current_scope(self.stack.last())
    }

    fn open_scope(&mut self, kind: ScopeKind, node: &SyntaxNode, conditional: bool) -> ScopeId {
        let parent = self.current();
        let id = ScopeId::from_index(self.sem.scopes.len());
        let ptr = self.ptr(node);

        self.sem.scopes.push(Scope::new(kind, Some(ptr), Some(parent)));
        self.sem.scopes[parent.index()].children.push(id);
        self.sem.scope_by_node.insert(ptr, id);
        self.conditional.push(conditional);
        self.stack.push(id);
        id
    }

    fn close_scope(&mut self, id: ScopeId) {
        self.close_labels(id);
        let popped = self.stack.pop();
        assert_scope_closed(id, popped);
    }

    fn file(&mut self, root: &SyntaxNode) {
        let scope = self.open_scope(ScopeKind::File, root, false);
        self.loop_depth.push(0);
        if let Some(block) = ast::Root::cast(root.clone()).and_then(|r| r.block()) {
            self.stmts(&block);
        }
        self.loop_depth.pop();
        self.close_scope(scope);
    }

    /// Function scope owned by `owner`; parameters and body locals share it.
    fn function(&mut self, owner: &SyntaxNode, body: Option<ast::FunctionBody>, is_method: bool) {
        let scope = self.open_scope(ScopeKind::Function, owner, true);
        self.loop_depth.push(0);

        if is_method {
            self.declare(VariableKind::Parameter, "self", None);
        }
        if let Some(body) = body {
            for name in body.params().iter().flat_map(|p| p.names()) {
                self.declare_name(VariableKind::Parameter, &name, WriteValue::Undefined);
            }
            if let Some(block) = body.block() {
                self.stmts(&block);
            }
        }

        self.loop_depth.pop();
        self.close_scope(scope);
    }

    fn scoped_block(&mut self, block: Option<ast::Block>, conditional: bool) {
        let Some(block) = block else { return };
        let scope = self.open_scope(ScopeKind::Block, block.as_cst(), conditional);
        self.stmts(&block);
        self.close_scope(scope);
    }

    fn enter_loop(&mut self) {
        *ensure_loop_frame(self.loop_depth.last_mut()) += 1;
    }

    fn exit_loop(&mut self) {
        let depth = ensure_loop_frame(self.loop_depth.last_mut());
        *depth = depth.saturating_sub(1);
    }

    // ------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------

    fn declare(&mut self, kind: VariableKind, name: &str, declaration: Option<&SyntaxNode>) -> VariableId {
        let scope = self.current();
        let id = VariableId::from_index(self.sem.variables.len());
        let container = self
            .sem
            .new_container(name, Some(id), ContainerParent::Local);
        let declaration = declaration.map(|n| self.ptr(n));

        self.sem.variables.push(Variable {
            kind,
            scope,
            name: name.to_owned(),
            declaration,
            referenced_in: Default::default(),
            reads: Vec::new(),
            writes: Vec::new(),
            container,
        });
        self.sem.scopes[scope.index()].declared.push(id);
        if let Some(ptr) = declaration {
            self.sem.variable_by_node.insert(ptr, id);
        }
        id
    }

    /// Declare `name` in the current scope and record its initial value.
    fn declare_name(&mut self, kind: VariableKind, name: &ast::Name, value: WriteValue) {
        let Some(text) = name.text() else { return };
        let id = self.declare(kind, &text, Some(name.as_cst()));
        let container = self.sem.variable(id).container;
        let node = self.ptr(name.as_cst());
        self.sem.record_write(
            container,
            Write {
                unconditional: true,
                node,
                value,
            },
        );
    }

    fn global(&mut self, name: &str) -> VariableId {
        if let Some(id) = self.globals.get(name) {
            return *id;
        }
        let id = VariableId::from_index(self.sem.variables.len());
        let container = self.sem.member_container(GLOBAL_TABLE, name);
        self.sem.containers[container.index()].variable = Some(id);

        self.sem.variables.push(Variable {
            kind: VariableKind::Global,
            scope: GLOBAL_SCOPE,
            name: name.to_owned(),
            declaration: None,
            referenced_in: Default::default(),
            reads: Vec::new(),
            writes: Vec::new(),
            container,
        });
        self.sem.scopes[GLOBAL_SCOPE.index()].declared.push(id);
        self.globals.insert(name.to_owned(), id);
        id
    }

    /// Nearest declaration on the scope stack, or the global of that name.
    fn resolve(&mut self, name: &str) -> VariableId {
        let found = self.stack.iter().rev().find_map(|scope| {
            self.sem.scopes[scope.index()]
                .declared
                .iter()
                .rev()
                .copied()
                .find(|v| self.sem.variables[v.index()].name == name)
        });
        match found {
            Some(id) => id,
            None => self.global(name),
        }
    }

    /// Record a reference from the current scope.
    ///
    /// Every scope from the current one up to the owner (exclusive) references
    /// the variable; Function scopes on that path capture it.
    fn reference(&mut self, variable: VariableId) {
        let owner = self.sem.variables[variable.index()].scope;
        for (depth, scope) in self.stack.iter().rev().copied().enumerate() {
            if scope == owner && depth > 0 {
                break;
            }
            let entry = &mut self.sem.scopes[scope.index()];
            entry.referenced.insert(variable);
            if scope == owner {
                break;
            }
            if entry.kind == ScopeKind::Function {
                entry.captured.insert(variable);
            }
            self.sem.variables[variable.index()]
                .referenced_in
                .insert(scope);
        }
        if self.current() == owner {
            self.sem.variables[variable.index()]
                .referenced_in
                .insert(owner);
        }
    }

    /// Whether code in the current scope always runs when `owner` runs.
    fn is_unconditional(&self, owner: ScopeId) -> bool {
        for scope in self.stack.iter().rev().copied() {
            if scope == owner {
                return true;
            }
            if self.conditional[scope.index()]
                || self.sem.scopes[scope.index()].kind == ScopeKind::Function
            {
                return false;
            }
        }
        true
    }

    /// Scope owning the variable at the top of `container`'s member chain.
    fn container_owner(&self, mut container: ContainerId) -> ScopeId {
        loop {
            let entry = self.sem.container(container);
            if let Some(variable) = entry.variable {
                return self.sem.variable(variable).scope;
            }
            match entry.parent {
                ContainerParent::Member(parent) => container = parent,
                ContainerParent::Root | ContainerParent::Local => return GLOBAL_SCOPE,
            }
        }
    }

    fn read_name(&mut self, name_ref: &ast::NameRef, mutating: bool) -> Option<ContainerId> {
        let text = name_ref.text()?;
        let variable = self.resolve(&text);
        let node = self.ptr(name_ref.as_cst());

        self.sem.variable_by_node.insert(node, variable);
        self.sem.variables[variable.index()].reads.push(node);
        self.reference(variable);

        let read = Read {
            can_cause_mutation: mutating,
            node,
        };
        let entry = self.sem.variable(variable);
        let container = entry.container;
        let aliases_globals =
            entry.kind == VariableKind::Global && GLOBAL_TABLE_ALIASES.contains(&text.as_str());
        self.sem.record_read(container, read);
        if mutating && aliases_globals {
            self.sem.record_read(GLOBAL_TABLE, read);
        }
        Some(container)
    }

    fn write_name(&mut self, name_ref: &ast::NameRef, value: WriteValue) {
        let Some(text) = name_ref.text() else { return };
        let variable = self.resolve(&text);
        let node = self.ptr(name_ref.as_cst());

        self.sem.variable_by_node.insert(node, variable);
        self.sem.variables[variable.index()].writes.push(node);
        self.reference(variable);

        let entry = self.sem.variable(variable);
        let (owner, container) = (entry.scope, entry.container);
        let unconditional = self.is_unconditional(owner);
        self.sem.record_write(
            container,
            Write {
                unconditional,
                node,
                value,
            },
        );
    }

    fn read_member(&mut self, parent: ContainerId, key: &str, node: &SyntaxNode, mutating: bool) -> ContainerId {
        let member = self.sem.member_container(parent, key);
        let node = self.ptr(node);
        self.sem.record_read(
            member,
            Read {
                can_cause_mutation: mutating,
                node,
            },
        );
        member
    }

    fn write_member(&mut self, parent: ContainerId, key: &str, node: NodePtr, value: WriteValue) {
        let member = self.sem.member_container(parent, key);
        let unconditional = self.is_unconditional(self.container_owner(parent));
        self.sem.record_write(
            member,
            Write {
                unconditional,
                node,
                value,
            },
        );
    }

    /// Value assigned to each of `count` targets.
    ///
    /// A trailing call or `...` fills the remaining targets with unknown values.
    fn assigned_values(&self, values: &[Expr], count: usize) -> Vec<WriteValue> {
        let spread = values.last().is_some_and(Expr::is_multi_valued);
        (0..count)
            .map(|i| match values.get(i) {
                Some(expr) => WriteValue::Expr(self.ptr(expr.as_cst())),
                None if spread => WriteValue::Undefined,
                None => WriteValue::Nil,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn stmts(&mut self, block: &ast::Block) {
        for stmt in block.stmts() {
            self.stmt(&stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::LocalStmt(s) => self.local_stmt(s),
            Stmt::LocalFunctionStmt(s) => {
                if let Some(name) = s.name() {
                    let value = self.function_value(s.body());
                    self.declare_name(VariableKind::Local, &name, value);
                }
                self.function(s.as_cst(), s.body(), false);
            }
            Stmt::FunctionStmt(s) => self.function_stmt(s),
            Stmt::AssignStmt(s) => self.assign_stmt(s),
            Stmt::CompoundAssignStmt(s) => self.compound_assign_stmt(s),
            Stmt::CallStmt(s) => {
                if let Some(call) = s.call() {
                    self.expr(&call, false);
                }
            }
            Stmt::DoStmt(s) => self.scoped_block(s.block(), false),
            Stmt::WhileStmt(s) => {
                self.opt_expr(s.condition());
                self.enter_loop();
                self.scoped_block(s.block(), true);
                self.exit_loop();
            }
            Stmt::RepeatStmt(s) => {
                // `until` sees the body's locals.
                let Some(block) = s.block() else {
                    self.opt_expr(s.condition());
                    return;
                };
                let scope = self.open_scope(ScopeKind::Block, block.as_cst(), true);
                self.enter_loop();
                self.stmts(&block);
                self.exit_loop();
                self.opt_expr(s.condition());
                self.close_scope(scope);
            }
            Stmt::IfStmt(s) => {
                self.opt_expr(s.condition());
                self.scoped_block(s.block(), true);
                for clause in s.else_if_clauses() {
                    self.opt_expr(clause.condition());
                    self.scoped_block(clause.block(), true);
                }
                if let Some(clause) = s.else_clause() {
                    self.scoped_block(clause.block(), true);
                }
            }
            Stmt::NumericForStmt(s) => {
                for bound in s.bounds() {
                    self.expr(&bound, false);
                }
                let scope = self.open_scope(ScopeKind::Block, s.as_cst(), true);
                if let Some(name) = s.name() {
                    self.declare_name(VariableKind::Local, &name, WriteValue::Undefined);
                }
                self.loop_body(s.block());
                self.close_scope(scope);
            }
            Stmt::GenericForStmt(s) => {
                for value in s.values().iter().flat_map(|v| v.exprs()) {
                    self.expr(&value, false);
                }
                let scope = self.open_scope(ScopeKind::Block, s.as_cst(), true);
                for name in s.names() {
                    self.declare_name(VariableKind::Local, &name, WriteValue::Undefined);
                }
                self.loop_body(s.block());
                self.close_scope(scope);
            }
            Stmt::ReturnStmt(s) => {
                for value in s.values().iter().flat_map(|v| v.exprs()) {
                    self.expr(&value, false);
                }
            }
            Stmt::BreakStmt(s) => self.check_in_loop(s.as_cst(), "break"),
            Stmt::ContinueStmt(s) => self.check_in_loop(s.as_cst(), "continue"),
            Stmt::GotoStmt(s) => self.goto_stmt(s),
            Stmt::LabelStmt(s) => self.label_stmt(s),
            Stmt::EmptyStmt(_) => {}
            Stmt::Error(s) => {
                // Recovered fragments may still mention names.
                for expr in s.as_cst().children().filter_map(Expr::cast) {
                    self.expr(&expr, false);
                }
            }
        }
    }

    /// Body of a `for`: its statements live in the loop's own scope.
    fn loop_body(&mut self, block: Option<ast::Block>) {
        self.enter_loop();
        if let Some(block) = block {
            self.stmts(&block);
        }
        self.exit_loop();
    }

    fn check_in_loop(&mut self, node: &SyntaxNode, keyword: &str) {
        if self.loop_depth.last().copied().unwrap_or(0) > 0 {
            return;
        }
        self.diagnostics
            .report(DiagnosticKind::BreakOutsideLoop, node.text_range())
            .message(keyword)
            .emit();
    }

    fn function_value(&self, body: Option<ast::FunctionBody>) -> WriteValue {
        body.map_or(WriteValue::Undefined, |b| {
            WriteValue::Expr(self.ptr(b.as_cst()))
        })
    }

    fn local_stmt(&mut self, stmt: &ast::LocalStmt) {
        let values: Vec<Expr> = stmt
            .values()
            .map(|list| list.exprs().collect())
            .unwrap_or_default();
        for value in &values {
            self.expr(value, false);
        }

        let names: Vec<ast::Name> = stmt.names().filter_map(|n| n.name()).collect();
        let assigned = self.assigned_values(&values, names.len());
        for (name, value) in names.iter().zip(assigned) {
            self.declare_name(VariableKind::Local, name, value);
        }
    }

    /// `function a.b:c() end` writes `c` into `a.b`; `function f() end` writes `f`.
    fn function_stmt(&mut self, stmt: &ast::FunctionStmt) {
        let value = self.function_value(stmt.body());
        let name = stmt.name();
        let is_method = name.as_ref().is_some_and(|n| n.is_method());

        if let Some(name) = &name
            && let Some(base) = name.base()
        {
            let fields: Vec<_> = name.fields().collect();
            if fields.is_empty() {
                self.write_name(&base, value);
            } else {
                let node = self.ptr(name.as_cst());
                let mut container = self.read_name(&base, true);
                for (i, field) in fields.iter().enumerate() {
                    let Some(parent) = container else { break };
                    if i + 1 == fields.len() {
                        self.write_member(parent, field.text(), node, value);
                    } else {
                        container = Some(self.read_member(parent, field.text(), name.as_cst(), true));
                    }
                }
            }
        }

        self.function(stmt.as_cst(), stmt.body(), is_method);
    }

    fn assign_stmt(&mut self, stmt: &ast::AssignStmt) {
        let values: Vec<Expr> = stmt
            .values()
            .map(|list| list.exprs().collect())
            .unwrap_or_default();
        for value in &values {
            self.expr(value, false);
        }

        let targets: Vec<Expr> = stmt.targets().collect();
        let assigned = self.assigned_values(&values, targets.len());
        for (target, value) in targets.iter().zip(assigned) {
            match target {
                Expr::NameRef(name) => self.write_name(name, value),
                _ => {
                    if let Some((parent, key, node)) = self.target_slot(target) {
                        self.write_member(parent, &key, node, value);
                    }
                }
            }
        }
    }

    /// `x op= e` reads and writes the same target.
    fn compound_assign_stmt(&mut self, stmt: &ast::CompoundAssignStmt) {
        match stmt.target() {
            Some(Expr::NameRef(name)) => {
                self.read_name(&name, false);
                self.opt_expr(stmt.value());
                self.write_name(&name, WriteValue::Undefined);
            }
            Some(target) => {
                let slot = self.target_slot(&target);
                if let Some((parent, key, _)) = &slot {
                    self.read_member(*parent, key, target.as_cst(), false);
                }
                self.opt_expr(stmt.value());
                if let Some((parent, key, node)) = slot {
                    self.write_member(parent, &key, node, WriteValue::Undefined);
                }
            }
            None => self.opt_expr(stmt.value()),
        }
    }

    /// Walk the prefix of a member/index target; returns the table container and key.
    fn target_slot(&mut self, target: &Expr) -> Option<(ContainerId, String, NodePtr)> {
        let node = self.ptr(target.as_cst());
        match target {
            Expr::MemberExpr(m) => {
                let parent = m.base().and_then(|b| self.expr(&b, true));
                let key = m.member()?.text().to_owned();
                Some((parent?, key, node))
            }
            Expr::IndexExpr(ix) => {
                let parent = ix.base().and_then(|b| self.expr(&b, true));
                let key = ix.index().and_then(|index| {
                    self.expr(&index, false);
                    literal_key(&index)
                });
                Some((parent?, key?, node))
            }
            other => {
                self.expr(other, false);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn opt_expr(&mut self, expr: Option<Expr>) {
        if let Some(expr) = expr {
            self.expr(&expr, false);
        }
    }

    /// Walk `expr`; returns the container it denotes when it is a name or member chain.
    ///
    /// `mutating` marks every read on the chain as able to change the value.
    fn expr(&mut self, expr: &Expr, mutating: bool) -> Option<ContainerId> {
        match expr {
            Expr::NameRef(name) => self.read_name(name, mutating),
            Expr::LiteralExpr(_) | Expr::VarargExpr(_) => None,
            Expr::FunctionExpr(f) => {
                self.function(f.as_cst(), f.body(), false);
                None
            }
            Expr::TableExpr(table) => {
                for field in table.fields() {
                    self.field(&field);
                }
                None
            }
            Expr::ParenExpr(p) => p.inner().and_then(|inner| self.expr(&inner, mutating)),
            Expr::MemberExpr(m) => {
                let parent = m.base().and_then(|b| self.expr(&b, mutating))?;
                let key = m.member()?;
                Some(self.read_member(parent, key.text(), m.as_cst(), mutating))
            }
            Expr::IndexExpr(ix) => {
                let parent = ix.base().and_then(|b| self.expr(&b, mutating));
                let key = ix.index().and_then(|index| {
                    self.expr(&index, false);
                    literal_key(&index)
                });
                let (parent, key) = (parent?, key?);
                Some(self.read_member(parent, &key, ix.as_cst(), mutating))
            }
            Expr::CallExpr(call) => {
                if let Some(callee) = call.callee() {
                    self.expr(&callee, true);
                }
                self.call_args(call.args());
                None
            }
            Expr::MethodCallExpr(call) => {
                let receiver = call.receiver().and_then(|r| self.expr(&r, true));
                if let (Some(receiver), Some(method)) = (receiver, call.method()) {
                    self.read_member(receiver, method.text(), call.as_cst(), true);
                }
                self.call_args(call.args());
                None
            }
            Expr::BinaryExpr(b) => {
                self.opt_expr(b.lhs());
                self.opt_expr(b.rhs());
                None
            }
            Expr::UnaryExpr(u) => {
                self.opt_expr(u.operand());
                None
            }
        }
    }

    fn call_args(&mut self, args: Option<ast::CallArgs>) {
        for arg in args.iter().flat_map(|a| a.exprs()) {
            self.expr(&arg, false);
        }
    }

    fn field(&mut self, field: &Field) {
        match field {
            Field::ListField(f) => self.opt_expr(f.value()),
            Field::NamedField(f) => self.opt_expr(f.value()),
            Field::KeyedField(f) => {
                self.opt_expr(f.key());
                self.opt_expr(f.value());
            }
        }
    }
}

/// Member key of `t["x"]`.
fn literal_key(expr: &Expr) -> Option<String> {
    let Expr::LiteralExpr(lit) = expr else {
        return None;
    };
    let token = lit.as_cst().first_token()?;
    if token.kind() != SyntaxKind::String {
        return None;
    }
    constant_key(token.text()).map(str::to_owned)
}
