use std::fmt;

/// Host-language expression tree.
///
/// This is both what the forward compiler reads and what the reverse
/// compiler produces. The host language is a small language of function
/// literals and calls, with integer literals as its only other value.
///
/// # Examples
/// ```
/// use lambdac::host::Expr;
///
/// let f = Expr::lambda(["x", "y"], Expr::call(Expr::name("x"), [Expr::name("y")]));
/// assert_eq!(f.to_string(), "(x, y) -> x(y)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Function literal: parameter names and a body.
    Lambda { params: Vec<String>, body: Box<Expr> },
    /// Reference to a name.
    Name(String),
    /// Call expression: callee and arguments.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// Integer literal.
    Int(i64),
}

impl Expr {
    #[must_use]
    pub fn lambda<S: Into<String>>(params: impl IntoIterator<Item = S>, body: Self) -> Self {
        Self::Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    #[must_use]
    pub fn call(callee: Self, args: impl IntoIterator<Item = Self>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args: args.into_iter().collect(),
        }
    }

    /// True if every lambda takes exactly one parameter and every call
    /// passes exactly one argument, i.e. the tree is fully curried.
    #[must_use]
    pub fn is_curried(&self) -> bool {
        match self {
            Self::Lambda { params, body } => params.len() == 1 && body.is_curried(),
            Self::Call { callee, args } => {
                args.len() == 1 && callee.is_curried() && args.iter().all(Self::is_curried)
            }
            Self::Name(_) | Self::Int(_) => true,
        }
    }
}

/// Source form in arrow notation: `x -> y -> x(y)`, `(a, b) -> a(b)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lambda { params, body } => {
                if let [param] = params.as_slice() {
                    write!(f, "{param} -> {body}")
                } else {
                    write!(f, "({}) -> {body}", params.join(", "))
                }
            }
            Self::Name(name) => f.write_str(name),
            Self::Call { callee, args } => {
                if matches!(callee.as_ref(), Self::Lambda { .. }) {
                    write!(f, "({callee})")?;
                } else {
                    write!(f, "{callee}")?;
                }
                f.write_str("(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}
