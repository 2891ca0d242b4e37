//! Splicing calls to cloned members into existing bodies.
//!
//! A [`Splicer`] walks a body once and produces a new one; the input is never
//! modified, so a failure part-way through leaves the destination untouched.

use mimic_model::{Body, CallExpr, Expr, MimicMode, Stmt};

use crate::error::TransformError;

/// Call site a splice is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<'a> {
    /// `super.<name>(..)`
    SuperCall(&'a str),
    /// Any call to `<name>(..)`, through `this` or `super`.
    NamedCall(&'a str),
}

impl Anchor<'_> {
    fn matches(&self, call: &CallExpr) -> bool {
        match *self {
            Anchor::SuperCall(name) => call.is_super_dispatch() && call.callee == name,
            Anchor::NamedCall(name) => call.callee == name,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match *self {
            Anchor::SuperCall(name) | Anchor::NamedCall(name) => name,
        }
    }
}

impl std::fmt::Display for Anchor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::SuperCall(name) => write!(f, "super.{name}(..)"),
            Anchor::NamedCall(name) => write!(f, "{name}(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Before,
    After,
    Replace,
}

#[derive(Debug, Clone, Copy)]
enum Rewrite<'a> {
    Prepend,
    Returns { replace_value: bool },
    CallSites {
        anchor: Anchor<'a>,
        placement: Placement,
    },
}

/// Result of a splice: the rewritten body and how many points were touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub body: Body,
    pub sites: usize,
    /// Calls to the anchor's name that were not `super` calls (super modes only).
    pub near_misses: usize,
}

pub struct Splicer<'a> {
    invocation: CallExpr,
    rewrite: Rewrite<'a>,
    sites: usize,
    near_misses: usize,
    temps: usize,
}

impl<'a> Splicer<'a> {
    /// Splicer for `mode`.
    ///
    /// The call-site modes fail with [`TransformError::MissingAnchor`] when
    /// `anchor` is `None`; the other modes ignore it. `replace_value` only
    /// matters for [`MimicMode::BeforeReturn`]: when set, every returned value
    /// is replaced by the invocation's result.
    pub fn for_mode(
        mode: MimicMode,
        invocation: CallExpr,
        anchor: Option<Anchor<'a>>,
        replace_value: bool,
    ) -> Result<Self, TransformError> {
        let call_sites = |placement| {
            anchor
                .map(|anchor| Rewrite::CallSites { anchor, placement })
                .ok_or(TransformError::MissingAnchor { mode })
        };
        let rewrite = match mode {
            MimicMode::AtBeginning => Rewrite::Prepend,
            MimicMode::BeforeReturn => Rewrite::Returns { replace_value },
            MimicMode::BeforeSuper | MimicMode::Before => call_sites(Placement::Before)?,
            MimicMode::AfterSuper | MimicMode::After => call_sites(Placement::After)?,
            MimicMode::ReplaceSuper => call_sites(Placement::Replace)?,
        };
        Ok(Self::new(invocation, rewrite))
    }

    /// Splicer appending the invocation at every exit of a `void` body.
    pub fn at_exits(invocation: CallExpr) -> Self {
        Self::new(invocation, Rewrite::Returns { replace_value: false })
    }

    fn new(invocation: CallExpr, rewrite: Rewrite<'a>) -> Self {
        Self {
            invocation,
            rewrite,
            sites: 0,
            near_misses: 0,
            temps: 0,
        }
    }

    pub fn splice(mut self, body: &Body) -> Result<Spliced, TransformError> {
        let stmts = match self.rewrite {
            Rewrite::Prepend => {
                self.sites = 1;
                let mut stmts = Vec::with_capacity(body.stmts.len() + 1);
                stmts.push(self.invocation_stmt());
                stmts.extend(body.stmts.iter().cloned());
                stmts
            }
            Rewrite::Returns { .. } => {
                let mut stmts = self.stmts(&body.stmts)?;
                if body.falls_through() {
                    self.sites += 1;
                    stmts.push(self.invocation_stmt());
                }
                stmts
            }
            Rewrite::CallSites { .. } => self.stmts(&body.stmts)?,
        };
        Ok(Spliced {
            body: Body::new(stmts),
            sites: self.sites,
            near_misses: self.near_misses,
        })
    }

    fn invocation_expr(&self) -> Expr {
        Expr::Call(self.invocation.clone())
    }

    fn invocation_stmt(&self) -> Stmt {
        Stmt::Expr(self.invocation_expr())
    }

    fn fresh_temp(&mut self) -> String {
        let name = format!("$mimic{}", self.temps);
        self.temps += 1;
        name
    }

    fn stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<Stmt>, TransformError> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            self.stmt(stmt, &mut out)?;
        }
        Ok(out)
    }

    fn stmt(&mut self, stmt: &Stmt, out: &mut Vec<Stmt>) -> Result<(), TransformError> {
        match (self.rewrite, stmt) {
            (Rewrite::Returns { replace_value }, Stmt::Return(value)) => {
                self.sites += 1;
                self.splice_return(replace_value, value.as_ref(), out)
            }
            // A matching call used as a statement splices as flat statements.
            (Rewrite::CallSites { anchor, placement }, Stmt::Expr(Expr::Call(call))) => {
                let call = self.call(call)?;
                if !self.is_site(anchor, &call) {
                    out.push(Stmt::Expr(Expr::Call(call)));
                    return Ok(());
                }
                match placement {
                    Placement::Before => {
                        out.push(self.invocation_stmt());
                        out.push(Stmt::Expr(Expr::Call(call)));
                    }
                    Placement::After => {
                        out.push(Stmt::Expr(Expr::Call(call)));
                        out.push(self.invocation_stmt());
                    }
                    Placement::Replace => out.push(self.invocation_stmt()),
                }
                Ok(())
            }
            (_, Stmt::Expr(expr)) => {
                out.push(Stmt::Expr(self.expr(expr)?));
                Ok(())
            }
            (_, Stmt::Let { name, init }) => {
                out.push(Stmt::Let {
                    name: name.clone(),
                    init: self.expr(init)?,
                });
                Ok(())
            }
            (_, Stmt::Return(value)) => {
                let value = value.as_ref().map(|v| self.expr(v)).transpose()?;
                out.push(Stmt::Return(value));
                Ok(())
            }
            (
                _,
                Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                },
            ) => {
                out.push(Stmt::If {
                    cond: self.expr(cond)?,
                    then_branch: self.stmts(then_branch)?,
                    else_branch: self.stmts(else_branch)?,
                });
                Ok(())
            }
        }
    }

    fn splice_return(
        &mut self,
        replace_value: bool,
        value: Option<&Expr>,
        out: &mut Vec<Stmt>,
    ) -> Result<(), TransformError> {
        match (replace_value, value) {
            (true, None) => Err(TransformError::ValuelessReturn),
            (true, Some(value)) => {
                // The original value is still computed for its side effects.
                if has_effects(value) {
                    out.push(Stmt::Expr(value.clone()));
                }
                out.push(Stmt::Return(Some(self.invocation_expr())));
                Ok(())
            }
            (false, None) => {
                out.push(self.invocation_stmt());
                out.push(Stmt::Return(None));
                Ok(())
            }
            (false, Some(Expr::Literal(literal))) => {
                out.push(self.invocation_stmt());
                out.push(Stmt::Return(Some(Expr::Literal(literal.clone()))));
                Ok(())
            }
            (false, Some(value)) => {
                let temp = self.fresh_temp();
                out.push(Stmt::Let {
                    name: temp.clone(),
                    init: value.clone(),
                });
                out.push(self.invocation_stmt());
                out.push(Stmt::Return(Some(Expr::Local(temp))));
                Ok(())
            }
        }
    }

    fn is_site(&mut self, anchor: Anchor<'_>, call: &CallExpr) -> bool {
        if anchor.matches(call) {
            self.sites += 1;
            return true;
        }
        if matches!(anchor, Anchor::SuperCall(name) if call.callee == name) {
            self.near_misses += 1;
        }
        false
    }

    /// Rewrites the arguments of `call`, innermost calls first.
    fn call(&mut self, call: &CallExpr) -> Result<CallExpr, TransformError> {
        let args = call
            .args
            .iter()
            .map(|arg| self.expr(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CallExpr {
            callee: call.callee.clone(),
            dispatch: call.dispatch,
            args,
        })
    }

    fn expr(&mut self, expr: &Expr) -> Result<Expr, TransformError> {
        let rewritten = match expr {
            Expr::Literal(_) | Expr::Local(_) | Expr::Field(_) => expr.clone(),
            Expr::Assign { target, op, value } => Expr::Assign {
                target: target.clone(),
                op: *op,
                value: Box::new(self.expr(value)?),
            },
            Expr::Binary { op, lhs, rhs } => Expr::Binary {
                op: *op,
                lhs: Box::new(self.expr(lhs)?),
                rhs: Box::new(self.expr(rhs)?),
            },
            Expr::Block { stmts, value } => Expr::Block {
                stmts: self.stmts(stmts)?,
                value: Box::new(self.expr(value)?),
            },
            Expr::Call(call) => {
                let call = self.call(call)?;
                let Rewrite::CallSites { anchor, placement } = self.rewrite else {
                    return Ok(Expr::Call(call));
                };
                if !self.is_site(anchor, &call) {
                    return Ok(Expr::Call(call));
                }
                match placement {
                    Placement::Before => Expr::Block {
                        stmts: vec![self.invocation_stmt()],
                        value: Box::new(Expr::Call(call)),
                    },
                    Placement::After => {
                        let temp = self.fresh_temp();
                        Expr::Block {
                            stmts: vec![
                                Stmt::Let {
                                    name: temp.clone(),
                                    init: Expr::Call(call),
                                },
                                self.invocation_stmt(),
                            ],
                            value: Box::new(Expr::Local(temp)),
                        }
                    }
                    Placement::Replace => self.invocation_expr(),
                }
            }
        };
        Ok(rewritten)
    }
}

fn has_effects(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) | Expr::Local(_) | Expr::Field(_) => false,
        Expr::Binary { lhs, rhs, .. } => has_effects(lhs) || has_effects(rhs),
        Expr::Assign { .. } | Expr::Call(_) | Expr::Block { .. } => true,
    }
}
