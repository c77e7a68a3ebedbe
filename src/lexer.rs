#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `lambda`, `λ`, `\`
    Lambda,
    /// ->
    Arrow,
    /// :
    Colon,
    /// ,
    Comma,
    /// (
    LParen,
    /// )
    RParen,
    /// Names
    Ident(String),
    /// Integer literals
    Int(i64),
    /// End of input
    Eof,
}

/// True if `name` lexes as a single [`Token::Ident`].
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && name != "lambda"
}

pub struct Lexer<'input> {
    chars: std::iter::Peekable<std::str::Chars<'input>>,
    current_char: Option<char>,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        let mut chars = input.chars().peekable();
        let current_char = chars.next();
        Lexer {
            chars,
            current_char,
        }
    }

    /// Tokenizes the input string into a vector of tokens.
    ///
    /// # Errors
    /// Returns an error if an unexpected character is encountered.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current_char {
            match ch {
                'λ' | '\\' => {
                    tokens.push(Token::Lambda);
                    self.advance();
                }
                ':' => {
                    tokens.push(Token::Colon);
                    self.advance();
                }
                ',' => {
                    tokens.push(Token::Comma);
                    self.advance();
                }
                '(' => {
                    tokens.push(Token::LParen);
                    self.advance();
                }
                ')' => {
                    tokens.push(Token::RParen);
                    self.advance();
                }
                '-' => match self.chars.peek().copied() {
                    Some('>') => {
                        self.advance();
                        self.advance();
                        tokens.push(Token::Arrow);
                    }
                    Some(next) if next.is_ascii_digit() => {
                        self.advance();
                        let number = self.read_number(true)?;
                        tokens.push(Token::Int(number));
                    }
                    _ => return Err("Unexpected character: '-'".to_string()),
                },
                '0'..='9' => {
                    let number = self.read_number(false)?;
                    tokens.push(Token::Int(number));
                }
                'a'..='z' | 'A'..='Z' | '_' => {
                    let ident = self.read_identifier();
                    if ident == "lambda" {
                        tokens.push(Token::Lambda);
                    } else {
                        tokens.push(Token::Ident(ident));
                    }
                }
                '#' => self.skip_comment(),
                c if c.is_whitespace() => self.advance(),
                _ => return Err(format!("Unexpected character: '{ch}'")),
            }
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    fn advance(&mut self) {
        self.current_char = self.chars.next();
    }

    fn read_number(&mut self, negative: bool) -> Result<i64, String> {
        let mut number_str = String::new();
        if negative {
            number_str.push('-');
        }
        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number_str
            .parse()
            .map_err(|_| format!("Invalid number: {number_str}"))
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(ch) = self.current_char {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }
}
