//! Arithmetic expression evaluator tool.
//!
//! Recursive-descent evaluation of `+ - * /` with parentheses and unary
//! minus over f64. Stands in for the code-execution tool of interactive
//! agent demos without embedding an interpreter.

use reagent_core::{ExecutionResult, FailureReason, Tool};

/// Evaluates an arithmetic expression and returns the numeric result.
pub struct CalcTool;

impl Tool for CalcTool {
    fn name(&self) -> &str {
        "calc"
    }

    fn description(&self) -> &str {
        "Evaluates an arithmetic expression, e.g. '2 * (3 + 4)'"
    }

    fn call(&self, input: String) -> ExecutionResult {
        match eval(&input) {
            Ok(value) => {
                // Render integers without a trailing ".0".
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    ExecutionResult::success(format!("{}", value as i64))
                } else {
                    ExecutionResult::success(format!("{value}"))
                }
            }
            Err(message) => ExecutionResult::failed(FailureReason::InvalidInput { message }),
        }
    }
}

fn eval(input: &str) -> Result<f64, String> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("unexpected token at position {}", parser.pos));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{literal}'"))?;
                tokens.push(Token::Number(value));
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.next();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.next();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.next();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.next();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err("missing closing parenthesis".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected token {token:?}")),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
