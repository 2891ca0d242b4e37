//! A tiny evaluator for [`Body`] trees.
//!
//! Tests use it to *run* composed types and observe behavior instead of only
//! comparing trees. It supports exactly what the model can express: field
//! slots on `this`, locals, arithmetic and comparisons, `if`, returns, virtual
//! calls through `this` and explicit `super` calls.

use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, bail, Context as _, Result};
use mimic_model::{
    BinaryOp, Body, CallExpr, Constructor, Dispatch, Expr, Literal, Method, Param, Place,
    PrimitiveType, Stmt, TypeDef, TypeRef,
};

const MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Void,
    Null,
    Int(i64),
    Bool(bool),
    Str(String),
}

impl Value {
    fn default_for(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Primitive(PrimitiveType::Boolean) => Value::Bool(false),
            TypeRef::Primitive(_) => Value::Int(0),
            TypeRef::Object(_) | TypeRef::Array(_) => Value::Null,
        }
    }

    fn fits(&self, ty: &TypeRef) -> bool {
        match (self, ty) {
            (Value::Bool(_), TypeRef::Primitive(PrimitiveType::Boolean)) => true,
            (Value::Bool(_), _) => false,
            (Value::Int(_), TypeRef::Primitive(prim)) => *prim != PrimitiveType::Boolean,
            (Value::Int(_), _) => false,
            (Value::Str(_), TypeRef::Object(_)) => true,
            (Value::Null, TypeRef::Object(_) | TypeRef::Array(_)) => true,
            _ => false,
        }
    }

    fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => bail!("expected a boolean, found {other}"),
        }
    }

    fn as_int(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            other => bail!("expected an int, found {other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Null => f.write_str("null"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// A live object: its runtime class and one slot per field of the class chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    class: String,
    fields: HashMap<String, Value>,
}

impl Instance {
    /// Integer value of field `name`; panics when absent or not an int.
    #[must_use]
    pub fn int(&self, name: &str) -> i64 {
        match self.fields.get(name) {
            Some(Value::Int(i)) => *i,
            other => panic!("field `{name}` of {} is not an int: {other:?}", self.class),
        }
    }
}

enum Flow {
    Normal,
    Return(Value),
}

struct Frame<'t> {
    /// Class declaring the running member; `super` dispatch starts above it.
    declaring: &'t str,
    scopes: Vec<HashMap<String, Value>>,
    depth: usize,
}

impl Frame<'_> {
    fn lookup(&self, name: &str) -> Result<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
            .ok_or_else(|| anyhow!("unknown local `{name}`"))
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        let slot = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| anyhow!("unknown local `{name}`"))?;
        *slot = value;
        Ok(())
    }

    fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Interpreter {
    types: HashMap<String, TypeDef>,
}

impl Interpreter {
    pub fn new(types: impl IntoIterator<Item = TypeDef>) -> Self {
        let mut interp = Self::default();
        for ty in types {
            interp.add_type(ty);
        }
        interp
    }

    pub fn add_type(&mut self, ty: TypeDef) {
        self.types.insert(ty.name.clone(), ty);
    }

    fn ty(&self, name: &str) -> Result<&TypeDef> {
        self.types
            .get(name)
            .ok_or_else(|| anyhow!("unknown type `{name}`"))
    }

    /// `class` followed by its ancestors, nearest first.
    fn chain(&self, class: &str) -> Result<Vec<&TypeDef>> {
        let mut chain = Vec::new();
        let mut next = Some(class);
        while let Some(name) = next {
            let ty = self.ty(name)?;
            if chain.iter().any(|t: &&TypeDef| t.name == ty.name) {
                bail!("cyclic superclass chain through `{name}`");
            }
            chain.push(ty);
            next = ty.superclass.as_deref();
        }
        Ok(chain)
    }

    /// Allocates an instance of `class` and runs its constructors.
    ///
    /// Every ancestor's no-arg constructor runs first, root to leaf, then the
    /// constructor of `class` selected by `args`.
    pub fn instantiate(&self, class: &str, args: Vec<Value>) -> Result<Instance> {
        let chain = self.chain(class)?;
        let mut this = Instance {
            class: class.to_string(),
            fields: HashMap::new(),
        };

        for ty in chain.iter().rev() {
            for field in &ty.fields {
                let value = match &field.initializer {
                    Some(init) => {
                        let mut frame = Frame {
                            declaring: &ty.name,
                            scopes: vec![HashMap::new()],
                            depth: 0,
                        };
                        self.eval(&mut this, &mut frame, init)
                            .with_context(|| format!("initializing {}.{}", ty.name, field.name))?
                    }
                    None => Value::default_for(&field.ty),
                };
                this.fields.insert(field.name.clone(), value);
            }
        }

        for ty in chain.iter().skip(1).rev() {
            if let Some(ctor) = ty.constructors.iter().find(|c| c.params.is_empty()) {
                self.run_constructor(&mut this, ty, ctor, Vec::new())?;
            }
        }

        let ty = chain[0];
        if ty.constructors.is_empty() && args.is_empty() {
            return Ok(this);
        }
        let ctor = ty
            .constructors
            .iter()
            .find(|c| params_accept(&c.params, &args))
            .ok_or_else(|| anyhow!("no constructor of `{class}` accepts {} argument(s)", args.len()))?;
        self.run_constructor(&mut this, ty, ctor, args)?;
        Ok(this)
    }

    /// Calls `method` on `this` with virtual dispatch.
    pub fn invoke(&self, this: &mut Instance, method: &str, args: Vec<Value>) -> Result<Value> {
        let class = this.class.clone();
        let (owner, target) = self.find_method(&class, method, &args)?;
        self.run_method(this, owner, target, args, 0)
    }

    fn find_method(
        &self,
        start: &str,
        name: &str,
        args: &[Value],
    ) -> Result<(&TypeDef, &Method)> {
        for ty in self.chain(start)? {
            if let Some(method) = ty
                .methods
                .iter()
                .find(|m| m.name == name && params_accept(&m.params, args))
            {
                return Ok((ty, method));
            }
        }
        bail!("no method `{name}` with {} argument(s) on `{start}`", args.len())
    }

    fn run_constructor(
        &self,
        this: &mut Instance,
        owner: &TypeDef,
        ctor: &Constructor,
        args: Vec<Value>,
    ) -> Result<()> {
        let mut frame = Frame {
            declaring: &owner.name,
            scopes: vec![bind_params(&ctor.params, args)],
            depth: 0,
        };
        self.exec_block(this, &mut frame, &ctor.body.stmts)
            .with_context(|| format!("running constructor of `{}`", owner.name))?;
        Ok(())
    }

    fn run_method(
        &self,
        this: &mut Instance,
        owner: &TypeDef,
        method: &Method,
        args: Vec<Value>,
        depth: usize,
    ) -> Result<Value> {
        if depth > MAX_CALL_DEPTH {
            bail!("call depth exceeded in `{}.{}`", owner.name, method.name);
        }
        let body: &Body = method
            .body
            .as_ref()
            .ok_or_else(|| anyhow!("`{}.{}` has no body", owner.name, method.name))?;
        let mut frame = Frame {
            declaring: &owner.name,
            scopes: vec![bind_params(&method.params, args)],
            depth,
        };
        tracing::trace!(class = %owner.name, method = %method.name, "invoke");
        match self.exec_block(this, &mut frame, &body.stmts)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Void),
        }
    }

    fn exec_block(&self, this: &mut Instance, frame: &mut Frame<'_>, stmts: &[Stmt]) -> Result<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec(this, frame, stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_scoped(&self, this: &mut Instance, frame: &mut Frame<'_>, stmts: &[Stmt]) -> Result<Flow> {
        frame.scopes.push(HashMap::new());
        let flow = self.exec_block(this, frame, stmts);
        frame.scopes.pop();
        flow
    }

    fn exec(&self, this: &mut Instance, frame: &mut Frame<'_>, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(this, frame, expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Let { name, init } => {
                let value = self.eval(this, frame, init)?;
                frame.define(name, value);
                Ok(Flow::Normal)
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(this, frame, expr)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(this, frame, cond)?.as_bool()? {
                    self.exec_scoped(this, frame, then_branch)
                } else {
                    self.exec_scoped(this, frame, else_branch)
                }
            }
        }
    }

    fn eval(&self, this: &mut Instance, frame: &mut Frame<'_>, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Int(i) => Value::Int(*i),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Null => Value::Null,
            }),
            Expr::Local(name) => frame.lookup(name),
            Expr::Field(name) => this
                .fields
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("`{}` has no field `{name}`", this.class)),
            Expr::Assign { target, op, value } => {
                let rhs = self.eval(this, frame, value)?;
                let new_value = match op.binary_op() {
                    None => rhs,
                    Some(bin) => {
                        let current = match target {
                            Place::Local(name) => frame.lookup(name)?,
                            Place::Field(name) => this
                                .fields
                                .get(name)
                                .cloned()
                                .ok_or_else(|| anyhow!("`{}` has no field `{name}`", this.class))?,
                        };
                        binary(bin, current, rhs)?
                    }
                };
                match target {
                    Place::Local(name) => frame.assign(name, new_value.clone())?,
                    Place::Field(name) => {
                        let slot = this
                            .fields
                            .get_mut(name)
                            .ok_or_else(|| anyhow!("`{}` has no field `{name}`", this.class))?;
                        *slot = new_value.clone();
                    }
                }
                Ok(new_value)
            }
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::And => {
                    if !self.eval(this, frame, lhs)?.as_bool()? {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(self.eval(this, frame, rhs)?.as_bool()?))
                }
                BinaryOp::Or => {
                    if self.eval(this, frame, lhs)?.as_bool()? {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(self.eval(this, frame, rhs)?.as_bool()?))
                }
                _ => {
                    let lhs = self.eval(this, frame, lhs)?;
                    let rhs = self.eval(this, frame, rhs)?;
                    binary(*op, lhs, rhs)
                }
            },
            Expr::Call(call) => self.call(this, frame, call),
            Expr::Block { stmts, value } => {
                frame.scopes.push(HashMap::new());
                let result = match self.exec_block(this, frame, stmts) {
                    Ok(Flow::Normal) => self.eval(this, frame, value),
                    Ok(Flow::Return(_)) => Err(anyhow!("`return` inside an expression block")),
                    Err(err) => Err(err),
                };
                frame.scopes.pop();
                result
            }
        }
    }

    fn call(&self, this: &mut Instance, frame: &mut Frame<'_>, call: &CallExpr) -> Result<Value> {
        let args = call
            .args
            .iter()
            .map(|arg| self.eval(this, frame, arg))
            .collect::<Result<Vec<_>>>()?;
        let start = match call.dispatch {
            Dispatch::This => this.class.clone(),
            Dispatch::Super => self
                .ty(frame.declaring)?
                .superclass
                .clone()
                .ok_or_else(|| anyhow!("`{}` has no superclass for super.{}", frame.declaring, call.callee))?,
        };
        let (owner, method) = self.find_method(&start, &call.callee, &args)?;
        self.run_method(this, owner, method, args, frame.depth + 1)
    }
}

fn params_accept(params: &[Param], args: &[Value]) -> bool {
    params.len() == args.len() && params.iter().zip(args).all(|(p, a)| a.fits(&p.ty))
}

fn bind_params(params: &[Param], args: Vec<Value>) -> HashMap<String, Value> {
    params
        .iter()
        .map(|p| p.name.clone())
        .zip(args)
        .collect()
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    Ok(match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Value::Str(a), b) => Value::Str(format!("{a}{}", display_plain(&b))),
            (a, Value::Str(b)) => Value::Str(format!("{}{b}", display_plain(&a))),
            (a, b) => Value::Int(a.as_int()?.wrapping_add(b.as_int()?)),
        },
        BinaryOp::Sub => Value::Int(lhs.as_int()?.wrapping_sub(rhs.as_int()?)),
        BinaryOp::Mul => Value::Int(lhs.as_int()?.wrapping_mul(rhs.as_int()?)),
        BinaryOp::Div => {
            let divisor = rhs.as_int()?;
            if divisor == 0 {
                bail!("division by zero");
            }
            Value::Int(lhs.as_int()?.wrapping_div(divisor))
        }
        BinaryOp::Eq => Value::Bool(lhs == rhs),
        BinaryOp::Ne => Value::Bool(lhs != rhs),
        BinaryOp::Lt => Value::Bool(lhs.as_int()? < rhs.as_int()?),
        BinaryOp::Gt => Value::Bool(lhs.as_int()? > rhs.as_int()?),
        BinaryOp::And => Value::Bool(lhs.as_bool()? && rhs.as_bool()?),
        BinaryOp::Or => Value::Bool(lhs.as_bool()? || rhs.as_bool()?),
    })
}

fn display_plain(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
