//! Path expressions: tiny formulas `y = f(x)` for path-following particles.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | 'x' | constant | func '(' args ')' | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! Constants are `e`/`E` and `pi`/`PI`. Functions are `pow`, `sqrt`, `abs`,
//! `floor`, `round`, `ceil`, `sin`, `cos`, `tan`, `asin`, `acos`, `atan`,
//! `atan2` and `log`. Any other character or identifier rejects the whole
//! expression before parsing starts.
//!
//! ```
//! use spritefx::expression::PathExpr;
//!
//! let wave: PathExpr = "sin(x / 20) * 15".parse().unwrap();
//! assert!((wave.eval(0.0)).abs() < 1e-6);
//! assert!("x; drop()".parse::<PathExpr>().is_err());
//! ```

use crate::error::PathError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    X,
    Const(f64),
    Func(Func),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "number {n}"),
            Token::X => f.write_str("'x'"),
            Token::Const(_) => f.write_str("constant"),
            Token::Func(func) => write!(f, "function {}", func.name()),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
        }
    }
}

/// Whitelisted math functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Pow,
    Sqrt,
    Abs,
    Floor,
    Round,
    Ceil,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Log,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "pow" => Func::Pow,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            "floor" => Func::Floor,
            "round" => Func::Round,
            "ceil" => Func::Ceil,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" => Func::Asin,
            "acos" => Func::Acos,
            "atan" => Func::Atan,
            "atan2" => Func::Atan2,
            "log" => Func::Log,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Func::Pow => "pow",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Floor => "floor",
            Func::Round => "round",
            Func::Ceil => "ceil",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Atan2 => "atan2",
            Func::Log => "log",
        }
    }

    fn arity(self) -> usize {
        match self {
            Func::Pow | Func::Atan2 => 2,
            _ => 1,
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Func::Pow => a.powf(b),
            Func::Sqrt => a.sqrt(),
            Func::Abs => a.abs(),
            Func::Floor => a.floor(),
            // Half-way values round toward +infinity.
            Func::Round => (a + 0.5).floor(),
            Func::Ceil => a.ceil(),
            Func::Sin => a.sin(),
            Func::Cos => a.cos(),
            Func::Tan => a.tan(),
            Func::Asin => a.asin(),
            Func::Acos => a.acos(),
            Func::Atan => a.atan(),
            Func::Atan2 => a.atan2(b),
            Func::Log => a.ln(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Num(f64),
    X,
    Neg(Box<Node>),
    Bin(BinOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>, Option<Box<Node>>),
}

impl Node {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Node::Num(n) => *n,
            Node::X => x,
            Node::Neg(a) => -a.eval(x),
            Node::Bin(op, a, b) => {
                let (a, b) = (a.eval(x), b.eval(x));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                }
            }
            Node::Call(func, a, b) => {
                let b = b.as_ref().map_or(0.0, |b| b.eval(x));
                func.apply(a.eval(x), b)
            }
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<Token>, PathError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &src[offset..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| PathError::BadNumber(text.to_string()))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &src[offset..end];
                let token = match word {
                    "x" => Token::X,
                    "e" | "E" => Token::Const(std::f64::consts::E),
                    "pi" | "PI" => Token::Const(std::f64::consts::PI),
                    _ => Func::lookup(word)
                        .map(Token::Func)
                        .ok_or_else(|| PathError::UnknownIdentifier(word.to_string()))?,
                };
                tokens.push(token);
            }
            _ => {
                let token = match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    _ => return Err(PathError::DisallowedChar { ch, offset }),
                };
                tokens.push(token);
                chars.next();
            }
        }
    }

    if tokens.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(tokens)
}

/// Deepest nesting of parentheses, calls and unary signs.
pub const MAX_DEPTH: usize = 256;
/// Longest accepted expression, in tokens. Bounds the tree depth for `eval`.
pub const MAX_TOKENS: usize = 1024;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, PathError>) -> Result<T, PathError> {
        if self.depth >= MAX_DEPTH {
            return Err(PathError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<Token, PathError> {
        let token = self.peek().ok_or(PathError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn unexpected(&self, token: Token) -> PathError {
        PathError::Unexpected {
            found: token.to_string(),
            position: self.pos.saturating_sub(1),
        }
    }

    fn expect(&mut self, want: Token) -> Result<(), PathError> {
        let token = self.next()?;
        if token == want {
            Ok(())
        } else {
            Err(self.unexpected(token))
        }
    }

    fn expr(&mut self) -> Result<Node, PathError> {
        let mut lhs = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            let op = if op == Token::Plus { BinOp::Add } else { BinOp::Sub };
            lhs = Node::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Node, PathError> {
        let mut lhs = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            let op = if op == Token::Star { BinOp::Mul } else { BinOp::Div };
            lhs = Node::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Node, PathError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Node::Neg(Box::new(self.nested(Self::unary)?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Node, PathError> {
        match self.next()? {
            Token::Num(n) | Token::Const(n) => Ok(Node::Num(n)),
            Token::X => Ok(Node::X),
            Token::LParen => {
                let inner = self.nested(Self::expr)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Func(func) => self.nested(|p| p.call(func)),
            other => Err(self.unexpected(other)),
        }
    }

    fn call(&mut self, func: Func) -> Result<Node, PathError> {
        self.expect(Token::LParen)?;
        let mut args = vec![self.expr()?];
        while self.peek() == Some(Token::Comma) {
            self.pos += 1;
            args.push(self.expr()?);
        }
        self.expect(Token::RParen)?;

        if args.len() != func.arity() {
            return Err(PathError::Arity {
                name: func.name(),
                expected: func.arity(),
                found: args.len(),
            });
        }
        let mut args = args.into_iter();
        let a = args.next().map(Box::new).ok_or(PathError::UnexpectedEnd)?;
        let b = args.next().map(Box::new);
        Ok(Node::Call(func, a, b))
    }
}

/// A compiled path expression, `x ↦ y`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    source: String,
    root: Node,
}

impl PathExpr {
    /// Validate and compile `source`.
    pub fn parse(source: &str) -> Result<Self, PathError> {
        let tokens = tokenize(source)?;
        if tokens.len() > MAX_TOKENS {
            return Err(PathError::TooLong {
                tokens: tokens.len(),
                limit: MAX_TOKENS,
            });
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let root = parser.expr()?;
        if let Some(extra) = parser.peek() {
            parser.pos += 1;
            return Err(parser.unexpected(extra));
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate at `x`.
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        self.root.eval(x as f64) as f32
    }
}

impl FromStr for PathExpr {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str, x: f32) -> f32 {
        PathExpr::parse(src).unwrap().eval(x)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3", 0.0), 7.0);
        assert_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
        assert_eq!(eval("10 - 4 - 3", 0.0), 3.0);
        assert_eq!(eval("8 / 4 / 2", 0.0), 1.0);
        assert_eq!(eval("-x * 2", 3.0), -6.0);
        assert_eq!(eval("2 * -x", 3.0), -6.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert!((eval("sin(pi / 2)", 0.0) - 1.0).abs() < 1e-6);
        assert!((eval("pow(x, 2) + sqrt(16)", 3.0) - 13.0).abs() < 1e-6);
        assert!((eval("atan2(1, 1)", 0.0) - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert!((eval("log(E)", 0.0) - 1.0).abs() < 1e-6);
        assert_eq!(eval("round(2.5) + floor(1.9) + ceil(0.1) + abs(-1)", 0.0), 6.0);
    }

    #[test]
    fn test_rejects_outside_whitelist() {
        assert!(matches!(
            PathExpr::parse("x; 1"),
            Err(PathError::DisallowedChar { ch: ';', offset: 1 })
        ));
        assert!(matches!(
            PathExpr::parse("exp(x)"),
            Err(PathError::UnknownIdentifier(name)) if name == "exp"
        ));
        assert!(matches!(PathExpr::parse("y"), Err(PathError::UnknownIdentifier(_))));
        assert!(PathExpr::parse("x ** 2").is_err());
        assert!(PathExpr::parse("x = 1").is_err());
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(PathExpr::parse("   "), Err(PathError::Empty));
        assert_eq!(PathExpr::parse("(x + 1"), Err(PathError::UnexpectedEnd));
        assert!(matches!(PathExpr::parse("x 2"), Err(PathError::Unexpected { .. })));
        assert!(matches!(PathExpr::parse("1.2.3"), Err(PathError::BadNumber(_))));
        assert!(matches!(
            PathExpr::parse("pow(x)"),
            Err(PathError::Arity { name: "pow", expected: 2, found: 1 })
        ));
        assert!(matches!(PathExpr::parse("sin x"), Err(PathError::Unexpected { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |n: usize| format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(eval(&nested(MAX_DEPTH), 2.0), 2.0);
        assert_eq!(
            PathExpr::parse(&nested(MAX_DEPTH + 1)),
            Err(PathError::TooDeep { limit: MAX_DEPTH })
        );

        let signs = format!("{}x", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(PathExpr::parse(&signs), Err(PathError::TooDeep { limit: MAX_DEPTH }));

        let calls = format!("{}x{}", "abs(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(PathExpr::parse(&calls), Err(PathError::TooDeep { limit: MAX_DEPTH }));
    }

    #[test]
    fn test_huge_nesting_is_rejected_not_fatal() {
        let n = 200_000;
        let src = format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert!(matches!(PathExpr::parse(&src), Err(PathError::TooLong { .. })));

        let chain = vec!["x"; MAX_TOKENS].join("+");
        assert!(matches!(PathExpr::parse(&chain), Err(PathError::TooLong { limit: MAX_TOKENS, .. })));
        let chain = vec!["x"; MAX_TOKENS / 2].join("+");
        assert_eq!(eval(&chain, 1.0), (MAX_TOKENS / 2) as f32);
    }
}
