//! `calculator`: arithmetic expression evaluator.
//!
//! Grammar (usual precedence, `^` right-associative):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := power (('*' | '/' | '%') power)*
//! power  := unary ('^' power)?
//! unary  := '-' unary | '+' unary | atom
//! atom   := number | '(' expr ')'
//! ```
//!
//! Nesting deeper than `MAX_DEPTH` levels is an error.

use crate::tools::registry::Tool;
use agency_domain::{ToolArguments, ToolDefinition, ToolParameter};

pub const CALCULATOR: &str = "calculator";

/// Deepest nesting of parentheses, signs and exponents accepted
const MAX_DEPTH: usize = 256;

pub fn calculator_tool() -> Tool {
    Tool::new(
        ToolDefinition::new(
            CALCULATOR,
            "Evaluate an arithmetic expression with + - * / % ^ and parentheses",
        )
        .with_parameter(ToolParameter::new(
            "expression",
            "Expression to evaluate, e.g. (2 + 3) * 4",
            true,
        )),
        execute_calculator,
    )
}

fn execute_calculator(arguments: &ToolArguments) -> Result<String, String> {
    let expression = arguments
        .get("expression")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "expression must be a string".to_string())?;
    evaluate(expression).map(format_number)
}

/// Evaluate `input` to a finite number
pub fn evaluate(input: &str) -> Result<f64, String> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err("Empty expression".to_string());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(format!("Unexpected '{}'", token));
    }
    if !value.is_finite() {
        return Err("Result is not a finite number".to_string());
    }
    Ok(value)
}

/// Integral results print without a fractional part
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(char),
    Open,
    Close,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{}", n),
            Token::Op(c) => write!(f, "{}", c),
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
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
                    .map_err(|_| format!("Invalid number '{}'", literal))?;
                tokens.push(Token::Num(value));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            other => return Err(format!("Unexpected character '{}'", other)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn eat_op(&mut self, ops: &[char]) -> Option<char> {
        match self.peek() {
            Some(Token::Op(c)) if ops.contains(&c) => {
                self.pos += 1;
                Some(c)
            }
            _ => None,
        }
    }

    /// Run one recursive step, bounded by [`MAX_DEPTH`]
    fn nested(&mut self, step: fn(&mut Self) -> Result<f64, String>) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err("Expression nested too deeply".to_string());
        }
        self.depth += 1;
        let value = step(self);
        self.depth -= 1;
        value
    }

    fn expr(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        while let Some(op) = self.eat_op(&['+', '-']) {
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.power()?;
        while let Some(op) = self.eat_op(&['*', '/', '%']) {
            let rhs = self.power()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return Err("Division by zero".to_string()),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn power(&mut self) -> Result<f64, String> {
        let base = self.unary()?;
        if self.eat_op(&['^']).is_some() {
            let exponent = self.nested(Self::power)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<f64, String> {
        match self.eat_op(&['-', '+']) {
            Some('-') => Ok(-self.nested(Self::unary)?),
            Some(_) => self.nested(Self::unary),
            None => self.atom(),
        }
    }

    fn atom(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Open) => {
                let value = self.nested(Self::expr)?;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    _ => Err("Missing closing parenthesis".to_string()),
                }
            }
            Some(token) => Err(format!("Unexpected '{}'", token)),
            None => Err("Unexpected end of expression".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(evaluate("2+2").unwrap(), 4.0);
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("7 % 4").unwrap(), 3.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-12.0), "-12");
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1/0").unwrap_err(), "Division by zero");
        assert!(evaluate("").is_err());
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(1 + 2").unwrap_err().contains("parenthesis"));
        assert!(evaluate("2 $ 3").unwrap_err().contains("'$'"));
        assert!(evaluate("1 2").is_err());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let signs = format!("{}1", "-".repeat(500_000));
        assert_eq!(evaluate(&signs).unwrap_err(), "Expression nested too deeply");

        let parens = format!("{}1{}", "(".repeat(500_000), ")".repeat(500_000));
        assert_eq!(evaluate(&parens).unwrap_err(), "Expression nested too deeply");

        let powers = format!("{}1", "1^".repeat(500_000));
        assert_eq!(evaluate(&powers).unwrap_err(), "Expression nested too deeply");

        // Moderate nesting still evaluates
        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate(&shallow).unwrap(), 1.0);
        assert_eq!(evaluate("--1").unwrap(), 1.0);
    }
}
