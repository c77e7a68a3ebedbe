use std::{collections::HashMap, fmt, mem, rc::Rc};

use thiserror::Error;

use crate::host::Expr;

/// Default bound on the number of calls one evaluation may perform.
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// Errors raised while running a host tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Unbound name '{0}'")]
    UnboundName(String),
    #[error("{0} is not callable")]
    NotCallable(String),
    #[error("{callee} expects {expected} argument(s) but got {found}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    /// Evaluation performed more calls than allowed; the term probably
    /// diverges.
    #[error("Step limit of {0} calls exceeded")]
    StepLimitExceeded(usize),
}

type Result<T> = std::result::Result<T, RuntimeError>;

type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A function implemented in Rust and exposed to host code by name.
pub struct Native {
    name: String,
    arity: usize,
    func: Box<NativeFn>,
}

impl Native {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Box::new(func),
        }
    }
}

/// Runtime value of the host language.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Closure(Rc<Closure>),
    /// A native function and the arguments it has received so far. Natives
    /// accept their arguments one call at a time, so curried call chains
    /// produced by the reverse compiler can use them.
    Native(Rc<Native>, Vec<Value>),
}

pub struct Closure {
    function: Rc<Function>,
    env: Env,
}

impl Value {
    pub fn native(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self::Native(Rc::new(Native::new(name, arity, func)), Vec::new())
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the integer inside, or a `TypeMismatch`.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeMismatch` for anything but an integer.
    pub fn to_int(&self) -> Result<i64> {
        self.as_int().ok_or_else(|| RuntimeError::TypeMismatch {
            expected: "integer",
            found: self.to_string(),
        })
    }

    #[must_use]
    pub const fn is_callable(&self) -> bool {
        !matches!(self, Self::Int(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Closure(closure) => {
                write!(f, "<lambda {}>", closure.function.params.join(", "))
            }
            Self::Native(native, args) => {
                write!(f, "<native {}", native.name)?;
                if !args.is_empty() {
                    write!(f, " applied to {}", args.len())?;
                }
                f.write_str(">")
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({self})")
    }
}

/// Host tree lowered for evaluation. Children are shared, so closures and
/// pending frames hold on to code without copying it.
#[derive(Clone)]
enum Code {
    Int(i64),
    Name(Rc<str>),
    Lambda(Rc<Function>),
    Call(Rc<Code>, Rc<[Code]>),
}

struct Function {
    params: Vec<String>,
    body: Code,
}

impl Code {
    fn lower(expr: &Expr) -> Self {
        match expr {
            Expr::Int(n) => Self::Int(*n),
            Expr::Name(name) => Self::Name(Rc::from(name.as_str())),
            Expr::Lambda { params, body } => Self::Lambda(Rc::new(Function {
                params: params.clone(),
                body: Self::lower(body),
            })),
            Expr::Call { callee, args } => Self::Call(
                Rc::new(Self::lower(callee)),
                args.iter().map(Self::lower).collect(),
            ),
        }
    }
}

/// Lexical environment: a persistent linked list of bindings, innermost
/// first.
#[derive(Clone, Default)]
struct Env(Option<Rc<Binding>>);

struct Binding {
    name: String,
    value: Value,
    next: Env,
}

impl Env {
    fn bind(&self, name: String, value: Value) -> Self {
        Self(Some(Rc::new(Binding {
            name,
            value,
            next: self.clone(),
        })))
    }

    fn get(&self, name: &str) -> Option<&Value> {
        let mut env = self;
        while let Some(binding) = &env.0 {
            if binding.name == name {
                return Some(&binding.value);
            }
            env = &binding.next;
        }
        None
    }
}

impl Drop for Env {
    // A Church numeral n is a chain of n closures, each captured in the
    // environment of the next; free it iteratively.
    fn drop(&mut self) {
        let mut pending: Vec<Rc<Binding>> = self.0.take().into_iter().collect();
        while let Some(binding) = pending.pop() {
            let Ok(mut binding) = Rc::try_unwrap(binding) else {
                continue;
            };
            pending.extend(binding.next.0.take());
            if let Value::Closure(closure) = mem::replace(&mut binding.value, Value::Int(0)) {
                if let Ok(mut closure) = Rc::try_unwrap(closure) {
                    pending.extend(closure.env.0.take());
                }
            }
        }
    }
}

/// Call-by-value evaluator for host trees.
///
/// This is the host side of the pipeline: a term is reverse compiled into a
/// host tree and run here. Names that no lambda binds are looked up among the
/// runtime's globals, which is how opaque free names get their meaning.
///
/// Pending calls live on a heap stack rather than the Rust call stack, so
/// nesting depth is bounded by memory and the step limit alone.
///
/// # Examples
/// ```
/// use lambdac::{Runtime, Parser};
///
/// let runtime = Runtime::with_prelude();
/// let two = Parser::parse("f -> x -> f(f(x))").unwrap();
/// let value = runtime.evaluate(&two).unwrap();
/// assert_eq!(runtime.church_to_int(&value).unwrap(), 2);
/// ```
pub struct Runtime {
    globals: HashMap<String, Value>,
    step_limit: usize,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            globals: HashMap::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// A runtime with the integer helpers `inc`, `dec`, `add`, `mul` and
    /// `is_zero` defined.
    #[must_use]
    pub fn with_prelude() -> Self {
        let mut runtime = Self::new();
        runtime.define("inc", Value::native("inc", 1, |args| {
            Ok(Value::Int(args[0].to_int()?.wrapping_add(1)))
        }));
        runtime.define("dec", Value::native("dec", 1, |args| {
            Ok(Value::Int(args[0].to_int()?.wrapping_sub(1)))
        }));
        runtime.define("add", Value::native("add", 2, |args| {
            Ok(Value::Int(args[0].to_int()?.wrapping_add(args[1].to_int()?)))
        }));
        runtime.define("mul", Value::native("mul", 2, |args| {
            Ok(Value::Int(args[0].to_int()?.wrapping_mul(args[1].to_int()?)))
        }));
        runtime.define("is_zero", Value::native("is_zero", 1, |args| {
            Ok(Value::Int(i64::from(args[0].to_int()? == 0)))
        }));
        runtime
    }

    #[must_use]
    pub const fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Defines or replaces a global.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    /// Evaluates a host expression.
    ///
    /// # Errors
    /// Any `RuntimeError`; `StepLimitExceeded` when more than the configured
    /// number of calls is needed.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value> {
        self.machine().eval(Code::lower(expr))
    }

    /// Calls `callee` with `args` as a single host call.
    ///
    /// # Errors
    /// Any `RuntimeError` raised by the call.
    pub fn apply(&self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        self.machine().call(callee.clone(), args)
    }

    /// Reads a Church numeral back as an integer by applying it to `inc`
    /// and then `0`.
    ///
    /// # Errors
    /// Fails if `value` does not behave like a Church numeral.
    pub fn church_to_int(&self, value: &Value) -> Result<i64> {
        let inc = Value::native("inc", 1, |args| {
            Ok(Value::Int(args[0].to_int()?.wrapping_add(1)))
        });
        let mut machine = self.machine();
        let applied = machine.call(value.clone(), vec![inc])?;
        machine.call(applied, vec![Value::Int(0)])?.to_int()
    }

    /// Reads a Church boolean back by applying it to `1` and then `0`.
    ///
    /// # Errors
    /// Fails if `value` does not select one of its two arguments.
    pub fn church_to_bool(&self, value: &Value) -> Result<bool> {
        let mut machine = self.machine();
        let applied = machine.call(value.clone(), vec![Value::Int(1)])?;
        match machine.call(applied, vec![Value::Int(0)])?.to_int()? {
            1 => Ok(true),
            0 => Ok(false),
            n => Err(RuntimeError::TypeMismatch {
                expected: "Church boolean",
                found: n.to_string(),
            }),
        }
    }

    fn machine(&self) -> Machine<'_> {
        Machine {
            globals: &self.globals,
            steps: 0,
            step_limit: self.step_limit,
            frames: Vec::new(),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

enum Control {
    Eval(Code, Env),
    Return(Value),
}

/// Work left to do once the value being computed is known.
enum Frame {
    /// The value is the callee of a call whose arguments are still to come.
    Callee { args: Rc<[Code]>, env: Env },
    /// The value is the next argument of a call.
    Argument {
        callee: Value,
        args: Rc<[Code]>,
        env: Env,
        values: Vec<Value>,
    },
    /// The value is a native's result and takes the arguments it left over.
    Apply(Vec<Value>),
}

struct Machine<'a> {
    globals: &'a HashMap<String, Value>,
    steps: usize,
    step_limit: usize,
    frames: Vec<Frame>,
}

impl Machine<'_> {
    fn eval(&mut self, code: Code) -> Result<Value> {
        self.frames.clear();
        self.run(Control::Eval(code, Env::default()))
    }

    fn call(&mut self, callee: Value, args: Vec<Value>) -> Result<Value> {
        self.frames.clear();
        let control = self.apply(callee, args)?;
        self.run(control)
    }

    fn run(&mut self, mut control: Control) -> Result<Value> {
        loop {
            control = match control {
                Control::Eval(code, env) => self.step(code, env)?,
                Control::Return(value) => match self.frames.pop() {
                    None => return Ok(value),
                    Some(Frame::Callee { args, env }) => {
                        self.next_argument(value, args, env, Vec::new())?
                    }
                    Some(Frame::Argument {
                        callee,
                        args,
                        env,
                        mut values,
                    }) => {
                        values.push(value);
                        self.next_argument(callee, args, env, values)?
                    }
                    Some(Frame::Apply(args)) => self.apply(value, args)?,
                },
            };
        }
    }

    fn step(&mut self, code: Code, env: Env) -> Result<Control> {
        match code {
            Code::Int(n) => Ok(Control::Return(Value::Int(n))),
            Code::Name(name) => env
                .get(&name)
                .or_else(|| self.globals.get(&*name))
                .cloned()
                .map(Control::Return)
                .ok_or_else(|| RuntimeError::UnboundName(name.to_string())),
            Code::Lambda(function) => Ok(Control::Return(Value::Closure(Rc::new(Closure {
                function,
                env,
            })))),
            Code::Call(callee, args) => {
                self.frames.push(Frame::Callee {
                    args,
                    env: env.clone(),
                });
                Ok(Control::Eval(Code::clone(&callee), env))
            }
        }
    }

    fn next_argument(
        &mut self,
        callee: Value,
        args: Rc<[Code]>,
        env: Env,
        values: Vec<Value>,
    ) -> Result<Control> {
        match args.get(values.len()).cloned() {
            Some(arg) => {
                self.frames.push(Frame::Argument {
                    callee,
                    args,
                    env: env.clone(),
                    values,
                });
                Ok(Control::Eval(arg, env))
            }
            None => self.apply(callee, values),
        }
    }

    fn apply(&mut self, callee: Value, args: Vec<Value>) -> Result<Control> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(RuntimeError::StepLimitExceeded(self.step_limit));
        }

        match &callee {
            Value::Int(_) => Err(RuntimeError::NotCallable(callee.to_string())),
            Value::Closure(closure) => {
                let params = &closure.function.params;
                if params.len() != args.len() {
                    return Err(RuntimeError::ArityMismatch {
                        callee: callee.to_string(),
                        expected: params.len(),
                        found: args.len(),
                    });
                }
                let env = params
                    .iter()
                    .zip(args)
                    .fold(closure.env.clone(), |env, (param, arg)| {
                        env.bind(param.clone(), arg)
                    });
                Ok(Control::Eval(closure.function.body.clone(), env))
            }
            Value::Native(native, received) => {
                if args.is_empty() {
                    return Err(RuntimeError::ArityMismatch {
                        callee: callee.to_string(),
                        expected: native.arity - received.len(),
                        found: 0,
                    });
                }
                let mut all = received.clone();
                all.extend(args);
                if all.len() < native.arity {
                    return Ok(Control::Return(Value::Native(Rc::clone(native), all)));
                }
                let rest = all.split_off(native.arity);
                let result = (native.func)(&all)?;
                if !rest.is_empty() {
                    self.frames.push(Frame::Apply(rest));
                }
                Ok(Control::Return(result))
            }
        }
    }
}
