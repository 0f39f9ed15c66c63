use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhenotypeError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, usize),

    #[error("Unexpected token {0} in phenotype")]
    UnexpectedToken(String),

    #[error("Phenotype ended unexpectedly")]
    UnexpectedEnd,

    #[error("Unknown function {0}")]
    UnknownFunction(String),

    #[error("Invalid numeric literal {0}")]
    InvalidNumber(String),
}

/// A fault raised while evaluating a phenotype at one point.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NumericFault {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Math domain error: {0}({1})")]
    Domain(Func, f64),

    #[error("Overflow in {0}({1})")]
    Overflow(Func, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Exp,
    Log,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "exp" => Some(Func::Exp),
            "log" => Some(Func::Log),
            _ => None,
        }
    }

    fn apply(self, v: f64) -> Result<f64, NumericFault> {
        match self {
            Func::Sin | Func::Cos if v.is_infinite() => Err(NumericFault::Domain(self, v)),
            Func::Sin => Ok(v.sin()),
            Func::Cos => Ok(v.cos()),
            Func::Exp => {
                let r = v.exp();
                if r.is_infinite() && v.is_finite() {
                    Err(NumericFault::Overflow(self, v))
                } else {
                    Ok(r)
                }
            }
            Func::Log if v <= 0.0 => Err(NumericFault::Domain(self, v)),
            Func::Log => Ok(v.ln()),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Exp => "exp",
            Func::Log => "log",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn apply(self, a: f64, b: f64) -> Result<f64, NumericFault> {
        match self {
            BinOp::Add => Ok(a + b),
            BinOp::Sub => Ok(a - b),
            BinOp::Mul => Ok(a * b),
            BinOp::Div if b == 0.0 => Err(NumericFault::DivisionByZero),
            BinOp::Div => Ok(a / b),
        }
    }
}

/// Expression tree of a decoded phenotype
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var,
    Const(f64),
    Call(Func, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self, x: f64) -> Result<f64, NumericFault> {
        match self {
            Expr::Var => Ok(x),
            Expr::Const(c) => Ok(*c),
            Expr::Call(func, arg) => func.apply(arg.eval(x)?),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x)?;
                let b = rhs.eval(x)?;
                op.apply(a, b)
            }
        }
    }
}

/// A parsed phenotype, ready to be sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype {
    text: String,
    root: Expr,
}

impl Phenotype {
    pub fn parse(text: &str) -> Result<Self, PhenotypeError> {
        let tokens = tokenize(text)?;
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.expr()?;
        if let Some(token) = parser.peek() {
            return Err(PhenotypeError::UnexpectedToken(format!("{:?}", token)));
        }
        Ok(Self {
            text: text.to_string(),
            root,
        })
    }

    pub fn eval(&self, x: f64) -> Result<f64, NumericFault> {
        self.root.eval(x)
    }

    /// Forward-difference derivative `(F(x + h) - F(x)) / h`.
    pub fn forward_derivative(&self, x: f64, h: f64) -> Result<f64, NumericFault> {
        let fx = self.eval(x)?;
        let fx_plus_h = self.eval(x + h)?;
        Ok((fx_plus_h - fx) / h)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(BinOp),
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Result<Vec<Token>, PhenotypeError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' => {
                i += 1;
            }
            '+' | '-' | '*' | '/' => {
                let op = match c {
                    '+' => BinOp::Add,
                    '-' => BinOp::Sub,
                    '*' => BinOp::Mul,
                    _ => BinOp::Div,
                };
                tokens.push(Token::Op(op));
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
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| PhenotypeError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(PhenotypeError::UnexpectedChar(other, i)),
        }
    }

    Ok(tokens)
}

/// Recursive descent over `+ -` (lowest), `* /`, then atoms. Binary
/// operators associate to the left.
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
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Expr, PhenotypeError> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ (BinOp::Add | BinOp::Sub))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, PhenotypeError> {
        let mut lhs = self.atom()?;
        while let Some(Token::Op(op @ (BinOp::Mul | BinOp::Div))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.atom()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn atom(&mut self) -> Result<Expr, PhenotypeError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(Expr::Const(value)),
            Some(Token::Ident(name)) if name == "x" => Ok(Expr::Var),
            Some(Token::Ident(name)) => {
                let func = Func::from_name(&name).ok_or(PhenotypeError::UnknownFunction(name))?;
                self.expect_lparen()?;
                let arg = self.expr()?;
                self.expect_rparen()?;
                Ok(Expr::Call(func, Box::new(arg)))
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Some(token) => Err(PhenotypeError::UnexpectedToken(format!("{:?}", token))),
            None => Err(PhenotypeError::UnexpectedEnd),
        }
    }

    fn expect_lparen(&mut self) -> Result<(), PhenotypeError> {
        match self.next() {
            Some(Token::LParen) => Ok(()),
            Some(token) => Err(PhenotypeError::UnexpectedToken(format!("{:?}", token))),
            None => Err(PhenotypeError::UnexpectedEnd),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), PhenotypeError> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            Some(token) => Err(PhenotypeError::UnexpectedToken(format!("{:?}", token))),
            None => Err(PhenotypeError::UnexpectedEnd),
        }
    }
}
