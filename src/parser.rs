use crate::{
    host::Expr,
    lexer::{Lexer, Token},
};

static EOF: Token = Token::Eof;

/// Recursive-descent parser for the host surface syntax.
///
/// ```text
/// expr    := lambda | postfix
/// lambda  := "lambda" params? ":" expr
///          | IDENT "->" expr
///          | "(" params? ")" "->" expr
/// params  := IDENT ("," IDENT)*
/// postfix := atom ( "(" args? ")" )*
/// args    := expr ("," expr)*
/// atom    := IDENT | INTEGER | "(" expr ")"
/// ```
///
/// The parser follows the host language, not the lambda calculus: it accepts
/// parameterless lambdas, argumentless calls and integer literals, and leaves
/// it to the compiler to reject them.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: Token,
        position: usize,
    },
    InvalidInput {
        message: String,
    },
    EmptyExpression {
        position: usize,
    },
    TrailingInput {
        found: Token,
        position: usize,
    },
}

impl Parser {
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse a host expression from a string.
    ///
    /// # Errors
    /// Returns a `ParseError` if the input cannot be tokenized or parsed, or
    /// if tokens remain after a complete expression.
    pub fn parse(input: &str) -> Result<Expr, ParseError> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer
            .tokenize()
            .map_err(|message| ParseError::InvalidInput { message })?;

        let mut parser = Self::new(tokens);
        if parser.is_at_end() {
            return Err(ParseError::EmptyExpression { position: 0 });
        }
        let expr = parser.parse_expression()?;
        if !parser.is_at_end() {
            return Err(ParseError::TrailingInput {
                found: parser.peek().clone(),
                position: parser.current,
            });
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        match (self.peek(), self.peek_nth(1)) {
            (Token::Lambda, _) => self.parse_keyword_lambda(),
            (Token::Ident(_), Token::Arrow) => self.parse_arrow_lambda(),
            (Token::LParen, _) if self.at_parameter_list() => self.parse_arrow_lambda(),
            (Token::Eof, _) => Err(ParseError::EmptyExpression {
                position: self.current,
            }),
            _ => self.parse_postfix(),
        }
    }

    fn parse_keyword_lambda(&mut self) -> Result<Expr, ParseError> {
        // lambda x, y: body
        self.advance();
        let params = if matches!(self.peek(), Token::Colon) {
            Vec::new()
        } else {
            self.parse_params()?
        };
        self.expect(&Token::Colon, "':'")?;
        let body = self.parse_expression()?;
        Ok(Expr::lambda(params, body))
    }

    fn parse_arrow_lambda(&mut self) -> Result<Expr, ParseError> {
        // x -> body, or (x, y) -> body
        let params = if matches!(self.peek(), Token::LParen) {
            self.advance();
            let params = if matches!(self.peek(), Token::RParen) {
                Vec::new()
            } else {
                self.parse_params()?
            };
            self.expect(&Token::RParen, "')'")?;
            params
        } else {
            vec![self.expect_ident()?]
        };
        self.expect(&Token::Arrow, "'->'")?;
        let body = self.parse_expression()?;
        Ok(Expr::lambda(params, body))
    }

    fn parse_params(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = vec![self.expect_ident()?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            params.push(self.expect_ident()?);
        }
        Ok(params)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        // Calls chain to the left: f(a)(b) = (f(a))(b)
        let mut expr = self.parse_atom()?;
        while matches!(self.peek(), Token::LParen) {
            self.advance();
            let mut args = Vec::new();
            if !matches!(self.peek(), Token::RParen) {
                args.push(self.parse_expression()?);
                while matches!(self.peek(), Token::Comma) {
                    self.advance();
                    args.push(self.parse_expression()?);
                }
            }
            self.expect(&Token::RParen, "')' or ','")?;
            expr = Expr::call(expr, args);
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Name(name))
            }
            Token::Int(n) => {
                self.advance();
                Ok(Expr::Int(n))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            token => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: token,
                position: self.current,
            }),
        }
    }

    /// Looks ahead for `( [IDENT {, IDENT}] ) ->` without consuming anything.
    fn at_parameter_list(&self) -> bool {
        let mut offset = 1;
        if matches!(self.peek_nth(offset), Token::Ident(_)) {
            offset += 1;
            while matches!(self.peek_nth(offset), Token::Comma)
                && matches!(self.peek_nth(offset + 1), Token::Ident(_))
            {
                offset += 2;
            }
        }
        matches!(self.peek_nth(offset), Token::RParen)
            && matches!(self.peek_nth(offset + 1), Token::Arrow)
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<(), ParseError> {
        if self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.peek().clone(),
                position: self.current,
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "parameter name".to_string(),
                found: self.peek().clone(),
                position: self.current,
            })
        }
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, offset: usize) -> &Token {
        self.tokens.get(self.current + offset).unwrap_or(&EOF)
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(
                    f,
                    "Expected {expected} but found {found:?} at position {position}"
                )
            }
            Self::InvalidInput { message } => write!(f, "Invalid input: {message}"),
            Self::EmptyExpression { position } => {
                write!(f, "Empty expression at position {position}")
            }
            Self::TrailingInput { found, position } => {
                write!(f, "Unexpected {found:?} after expression at position {position}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
