//! Calculator tool — arithmetic expression evaluation
//!
//! A small recursive-descent evaluator. Supports + - * / parentheses,
//! unary minus, and exponentiation (both `^` and `**`). No names, no
//! calls, nothing that could reach outside the expression.

use crate::registry::Tool;
use planrun_core::{Error, JsonMap, Result};
use serde_json::{json, Value};
use tracing::debug;

pub struct Calculator;

#[async_trait::async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn description(&self) -> &str {
        "Evaluates arithmetic expressions like '(41*7)+13'. \
         Supports +, -, *, /, ^ (power), and parentheses."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Arithmetic expression to evaluate"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, input: &JsonMap) -> Result<JsonMap> {
        let expression = match input.get("expression").and_then(|v| v.as_str()) {
            Some(e) => e.trim(),
            None => {
                return Err(Error::tool_execution(
                    self.name(),
                    "missing required parameter: expression",
                ))
            }
        };

        if expression.is_empty() {
            return Err(Error::tool_execution(self.name(), "expression cannot be empty"));
        }

        let result = evaluate(expression)
            .map_err(|message| Error::tool_execution(self.name(), message))?;
        debug!("calculator: {} = {}", expression, result);

        let mut output = JsonMap::new();
        output.insert("expression".into(), json!(expression));
        output.insert("result".into(), json!(result));
        Ok(output)
    }
}

fn evaluate(expression: &str) -> std::result::Result<f64, String> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!("unexpected trailing input at position {}", parser.pos));
    }
    if !value.is_finite() {
        return Err("result is not a finite number (division by zero?)".to_string());
    }
    Ok(value)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(expression: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expression.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                // `**` is power, `*` is multiply
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let n = literal
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number: {}", literal))?;
                tokens.push(Token::Number(n));
            }
            _ => return Err(format!("invalid character in expression: '{}'", c)),
        }
    }
    if tokens.is_empty() {
        return Err("expression contains no tokens".to_string());
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.peek();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expr(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
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

    fn term(&mut self) -> std::result::Result<f64, String> {
        let mut value = self.power()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.next();
                    value *= self.power()?;
                }
                Token::Slash => {
                    self.next();
                    let rhs = self.power()?;
                    if rhs == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= rhs;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // Right-associative: 2^3^2 = 2^(3^2)
    fn power(&mut self) -> std::result::Result<f64, String> {
        let base = self.unary()?;
        if self.peek() == Some(Token::Caret) {
            self.next();
            let exponent = self.power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> std::result::Result<f64, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.next();
                self.unary()
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> std::result::Result<f64, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err("unclosed parenthesis".to_string()),
                }
            }
            Some(t) => Err(format!("unexpected token: {:?}", t)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
