//! Geometry formulas.
//!
//! A formula is a small arithmetic expression over the four screen metrics,
//! e.g. `screenOriginX + 2*screenSizeX/3`. It is parsed once when the
//! configuration is loaded and evaluated every time an operation fires, so a
//! preset follows resolution and display changes without being redeclared.

use crate::error::{ConfigError, EvalError};
use crate::ScreenMetrics;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    OriginX,
    OriginY,
    SizeX,
    SizeY,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::OriginX,
        Metric::OriginY,
        Metric::SizeX,
        Metric::SizeY,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OriginX => "screenOriginX",
            Self::OriginY => "screenOriginY",
            Self::SizeX => "screenSizeX",
            Self::SizeY => "screenSizeY",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    fn value(&self, screen: &ScreenMetrics) -> f64 {
        match self {
            Self::OriginX => screen.origin_x,
            Self::OriginY => screen.origin_y,
            Self::SizeX => screen.size_x,
            Self::SizeY => screen.size_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(Metric),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Returns `None` on division by zero.
    fn eval(&self, screen: &ScreenMetrics) -> Option<f64> {
        match self {
            Self::Const(value) => Some(*value),
            Self::Var(metric) => Some(metric.value(screen)),
            Self::Neg(inner) => inner.eval(screen).map(|v| -v),
            Self::Binary(op, lhs, rhs) => {
                let lhs = lhs.eval(screen)?;
                let rhs = rhs.eval(screen)?;
                match op {
                    BinOp::Add => Some(lhs + rhs),
                    BinOp::Sub => Some(lhs - rhs),
                    BinOp::Mul => Some(lhs * rhs),
                    BinOp::Div if rhs == 0.0 => None,
                    BinOp::Div => Some(lhs / rhs),
                }
            }
        }
    }

    fn collect_metrics(&self, out: &mut Vec<Metric>) {
        match self {
            Self::Const(_) => {}
            Self::Var(metric) => {
                if !out.contains(metric) {
                    out.push(*metric);
                }
            }
            Self::Neg(inner) => inner.collect_metrics(out),
            Self::Binary(_, lhs, rhs) => {
                lhs.collect_metrics(out);
                rhs.collect_metrics(out);
            }
        }
    }
}

/// A parsed formula together with the text it was written as.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let expr = Parser::new(source).parse()?;
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    pub fn metric(metric: Metric) -> Self {
        Self {
            source: metric.name().to_string(),
            expr: Expr::Var(metric),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Screen metrics referenced by this formula, in order of first use.
    pub fn metrics(&self) -> Vec<Metric> {
        let mut out = Vec::new();
        self.expr.collect_metrics(&mut out);
        out
    }

    pub fn eval(&self, screen: &ScreenMetrics) -> Result<f64, EvalError> {
        let value = self
            .expr
            .eval(screen)
            .ok_or_else(|| EvalError::DivisionByZero(self.source.clone()))?;
        if !value.is_finite() {
            return Err(EvalError::NonFinite(self.source.clone()));
        }
        Ok(value)
    }
}

impl FromStr for Formula {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

// Recursive descent over:
//   sum     := product (('+' | '-') product)*
//   product := unary (('*' | '/') unary)*
//   unary   := '-' unary | primary
//   primary := number | metric | '(' sum ')'
struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, ConfigError> {
        self.tokens = self.tokenize()?;
        if self.tokens.is_empty() {
            return Err(self.error(0, "empty formula"));
        }

        let expr = self.sum()?;
        if let Some((offset, token)) = self.tokens.get(self.pos) {
            return Err(self.error(*offset, &format!("unexpected {:?}", token)));
        }
        Ok(expr)
    }

    fn tokenize(&self) -> Result<Vec<(usize, Token)>, ConfigError> {
        let mut tokens = Vec::new();
        let mut chars = self.source.char_indices().peekable();

        while let Some(&(offset, ch)) = chars.peek() {
            let token = match ch {
                c if c.is_whitespace() => {
                    chars.next();
                    continue;
                }
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '(' => Token::LParen,
                ')' => Token::RParen,
                c if c.is_ascii_digit() || c == '.' => {
                    let mut end = offset;
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_ascii_digit() || c == '.' {
                            end = i + c.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let text = &self.source[offset..end];
                    let value = text
                        .parse::<f64>()
                        .map_err(|_| self.error(offset, &format!("bad number {:?}", text)))?;
                    tokens.push((offset, Token::Number(value)));
                    continue;
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let mut end = offset;
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_ascii_alphanumeric() || c == '_' {
                            end = i + c.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    tokens.push((offset, Token::Ident(self.source[offset..end].to_string())));
                    continue;
                }
                other => {
                    return Err(self.error(offset, &format!("unexpected character {:?}", other)))
                }
            };
            chars.next();
            tokens.push((offset, token));
        }

        Ok(tokens)
    }

    fn sum(&mut self) -> Result<Expr, ConfigError> {
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.product()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn product(&mut self) -> Result<Expr, ConfigError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ConfigError> {
        if let Some(Token::Minus) = self.peek() {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ConfigError> {
        let (offset, token) = match self.tokens.get(self.pos) {
            Some((offset, token)) => (*offset, token.clone()),
            None => return Err(self.error(self.source.len(), "unexpected end of formula")),
        };
        self.pos += 1;

        match token {
            Token::Number(value) => Ok(Expr::Const(value)),
            Token::Ident(name) => Metric::from_name(&name)
                .map(Expr::Var)
                .ok_or_else(|| self.error(offset, &format!("unknown variable {:?}", name))),
            Token::LParen => {
                let inner = self.sum()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(self.error(offset, "unclosed parenthesis")),
                }
            }
            other => Err(self.error(offset, &format!("unexpected {:?}", other))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn error(&self, offset: usize, reason: &str) -> ConfigError {
        ConfigError::Formula {
            formula: self.source.to_string(),
            offset,
            reason: reason.to_string(),
        }
    }
}
