pub mod compiler;
pub mod error;
pub mod host;
pub mod ident;
pub mod lexer;
pub mod parser;
pub mod reverse;
pub mod runtime;
pub mod scope;
pub mod term;
pub mod unparse;

use anyhow::Result;
// Re-export main types and functions for convenient use
pub use compiler::{CompileOptions, Compiled, Compiler, FreeNames, compile, compile_with};
pub use error::CompileError;
pub use host::Expr;
pub use ident::{Allocator, Identifier};
pub use lexer::{Lexer, Token};
pub use parser::{ParseError, Parser};
pub use reverse::{reverse, reverse_then_recompile};
pub use runtime::{Runtime, RuntimeError, Value};
pub use scope::ScopeChain;
pub use term::{Reference, Term};
pub use unparse::render;

/// Parse host source and compile it into a lambda term.
///
/// # Errors
/// Returns an error if the source does not parse or does not compile.
///
/// # Examples
/// ```
/// use lambdac::compile_source;
///
/// let term = compile_source("lambda x, y, z: x(y, z)").unwrap();
/// assert_eq!(term.to_string(), "λx0.(λx1.(λx2.(x0(x1)(x2))))");
/// ```
pub fn compile_source(src: &str) -> Result<Term> {
    let expr = Parser::parse(src)?;
    Ok(compile(&expr)?.term)
}

/// Parse host source, compile it and render the canonical term.
///
/// # Errors
/// Returns an error if the source does not parse or does not compile.
///
/// # Examples
/// ```
/// use lambdac::render_source;
///
/// assert_eq!(render_source("x -> y -> x(y)").unwrap(), "λx0.(λx1.(x0(x1)))");
/// ```
pub fn render_source(src: &str) -> Result<String> {
    Ok(render(&compile_source(src)?))
}

/// Compile host source to a term, reverse compile it and run the result.
///
/// Free names in the source are resolved from `runtime`'s globals.
///
/// # Errors
/// Returns an error if any stage fails.
///
/// # Examples
/// ```
/// use lambdac::{Runtime, run_source};
///
/// let runtime = Runtime::with_prelude();
/// let value = run_source("(f, x) -> f(f(x))", &runtime).unwrap();
/// assert_eq!(runtime.church_to_int(&value).unwrap(), 2);
/// ```
pub fn run_source(src: &str, runtime: &Runtime) -> Result<Value> {
    let term = compile_source(src)?;
    let tree = reverse(&term)?;
    Ok(runtime.evaluate(&tree)?)
}
