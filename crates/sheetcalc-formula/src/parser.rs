//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator
//! precedence. The input is the expression text without the leading `=`.
//!
//! Both the AST and the parser's own recursion are limited to
//! [`MAX_DEPTH`] levels, so every later walk over the tree stays shallow.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use sheetcalc_core::Position;

/// Deepest AST (and parenthesis or sign nesting) a formula may have
pub const MAX_DEPTH: usize = 512;

/// Parsed subexpression and the depth of its tree
type Parsed = (FormulaExpr, usize);

/// Parse an expression string into an AST
///
/// # Example
/// ```rust
/// use sheetcalc_formula::{parse_expression, FormulaExpr};
///
/// let ast = parse_expression("42").unwrap();
/// assert_eq!(ast, FormulaExpr::Number(42.0));
///
/// assert!(parse_expression("1+").is_err());
/// ```
pub fn parse_expression(expression: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(expression)?;
    let (expr, _) = parser.parse_expression()?;

    // Make sure we consumed all input
    if parser.current_token() != &Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(String),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    /// Active unary and parenthesis recursion
    nesting: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                return Err(FormulaError::InvalidNumber(
                    self.input[start..self.pos].to_string(),
                ));
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::InvalidNumber(num_str.to_string()))
    }

    fn scan_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        if Self::is_cell_reference(text) {
            Ok(Token::CellRef(text.to_string()))
        } else {
            Err(FormulaError::Parse(format!("Unknown identifier '{}'", text)))
        }
    }

    /// Uppercase letters followed by digits, nothing else
    fn is_cell_reference(text: &str) -> bool {
        let letters = text.bytes().take_while(u8::is_ascii_uppercase).count();
        let digits = &text.as_bytes()[letters..];
        letters > 0 && !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Parsed> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<Parsed> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Parsed> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Parsed> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        let (operand, depth) = self.nested(Self::parse_unary)?;
        let depth = check_depth(depth + 1)?;
        Ok((
            FormulaExpr::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            depth,
        ))
    }

    fn parse_primary(&mut self) -> FormulaResult<Parsed> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok((FormulaExpr::Number(n), 1))
            }

            Token::CellRef(ref_str) => {
                self.consume()?;
                Ok((FormulaExpr::CellRef(Position::parse(&ref_str)), 1))
            }

            Token::LeftParen => {
                self.consume()?;
                let expr = self.nested(Self::parse_expression)?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            token => Err(FormulaError::Parse(format!("Unexpected token: {:?}", token))),
        }
    }

    /// Run `parse` one recursion level deeper
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> FormulaResult<Parsed>,
    ) -> FormulaResult<Parsed> {
        if self.nesting >= MAX_DEPTH {
            return Err(FormulaError::TooDeep(MAX_DEPTH));
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }
}

fn binary(op: BinaryOperator, left: Parsed, right: Parsed) -> FormulaResult<Parsed> {
    let depth = check_depth(left.1.max(right.1) + 1)?;
    Ok((
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left.0),
            right: Box::new(right.0),
        },
        depth,
    ))
}

fn check_depth(depth: usize) -> FormulaResult<usize> {
    if depth > MAX_DEPTH {
        Err(FormulaError::TooDeep(MAX_DEPTH))
    } else {
        Ok(depth)
    }
}
