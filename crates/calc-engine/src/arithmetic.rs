//! Arithmetic over canonical numeric-expression strings.
//!
//! A three-stage pipeline: [`tokenize`] turns the string into [`Token`]s,
//! [`to_postfix`] reorders them with the shunting-yard algorithm, and
//! [`eval_postfix`] reduces the postfix sequence on a single operand stack.
//! [`evaluate`] runs all three and rejects non-finite results, so callers
//! only ever see a finite `f64` or nothing.
//!
//! # Grammar
//!
//! Numbers are `digits[.digits]`. Operators are `+ - * / ^` plus unary
//! minus. The function markers `sqrt`, `cbrt` and `pow(a,b)` come from the
//! normalizer. Whitespace is ignored; any other character is rejected.
//!
//! # Associativity
//!
//! Every binary operator, `^` included, pops the operator stack while the
//! top has precedence greater than or equal to the incoming one. That makes
//! `^` left-associative: `2 ^ 3 ^ 2` is `(2 ^ 3) ^ 2 = 64`.

use crate::error::{CalcError, Result};

/// A binary or unary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Unary minus.
    Neg,
}

impl Operator {
    /// Precedence rank: `^` = 4, `*` `/` and unary minus = 3, `+` `-` = 2.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 2,
            Operator::Mul | Operator::Div | Operator::Neg => 3,
            Operator::Pow => 4,
        }
    }

    fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    /// Apply a binary operator. Division by zero yields an infinity, which
    /// is rejected at the [`evaluate`] boundary rather than here.
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a / b,
            Operator::Pow => a.powf(b),
            Operator::Neg => -b,
        }
    }
}

/// A function marker produced by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Cbrt,
    Pow,
}

impl Function {
    const NAMES: [(&'static str, Function); 3] = [
        ("sqrt", Function::Sqrt),
        ("cbrt", Function::Cbrt),
        ("pow", Function::Pow),
    ];

    /// Strip one function name off the front of an identifier run.
    fn split_name(run: &str) -> Option<(Function, &str)> {
        Function::NAMES
            .iter()
            .find_map(|&(name, function)| run.strip_prefix(name).map(|rest| (function, rest)))
    }

    fn arity(self) -> usize {
        match self {
            Function::Sqrt | Function::Cbrt => 1,
            Function::Pow => 2,
        }
    }
}

/// A lexical unit of a canonical expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    Function(Function),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Whether this token makes an expression a calculation rather than a
    /// bare number.
    fn is_operation(&self) -> bool {
        matches!(self, Token::Operator(_) | Token::Function(_))
    }
}

// ── evaluate ────────────────────────────────────────────────────────────────

/// Evaluate a canonical expression, returning `None` on any failure.
///
/// # Examples
///
/// ```
/// use calc_engine::arithmetic::evaluate;
///
/// assert_eq!(evaluate("3 + 4 * 2"), Some(11.0));
/// assert_eq!(evaluate("5 / 0"), None);
/// ```
pub fn evaluate(expr: &str) -> Option<f64> {
    try_evaluate(expr).ok()
}

/// Evaluate a canonical expression.
///
/// # Errors
///
/// Returns [`CalcError::MalformedExpression`] if the string cannot be
/// tokenized or does not form a valid postfix sequence, and
/// [`CalcError::NonFiniteResult`] if the value is infinite or NaN.
pub fn try_evaluate(expr: &str) -> Result<f64> {
    let tokens = tokenize(expr)?;
    evaluate_tokens(&tokens)
}

/// Evaluate an already tokenized expression.
pub fn evaluate_tokens(tokens: &[Token]) -> Result<f64> {
    let postfix = to_postfix(tokens)?;
    let value = eval_postfix(&postfix)?;
    if !value.is_finite() {
        return Err(CalcError::NonFiniteResult(value));
    }
    Ok(value)
}

/// True if the tokens contain at least one operator or function.
pub fn is_calculation(tokens: &[Token]) -> bool {
    tokens.iter().any(Token::is_operation)
}

// ── tokenize ────────────────────────────────────────────────────────────────

/// Split a canonical expression into tokens.
///
/// `-` is unary when it starts the expression or follows an operator,
/// function, `(` or `,`; a `+` in the same position is dropped.
///
/// # Errors
///
/// Returns [`CalcError::MalformedExpression`] on the first character that is
/// not part of a number, operator, parenthesis, comma or function name.
pub fn tokenize(expr: &str) -> Result<Vec<Token>> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut chars = compact.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch.is_ascii_digit() {
            let mut end = start + 1;
            let mut seen_dot = false;
            while let Some(&(i, next)) = chars.peek() {
                if next.is_ascii_digit() {
                    end = i + 1;
                    chars.next();
                } else if next == '.' && !seen_dot {
                    // Only a dot followed by a digit belongs to the number
                    match compact[i + 1..].chars().next() {
                        Some(d) if d.is_ascii_digit() => {
                            seen_dot = true;
                            end = i + 1;
                            chars.next();
                        }
                        _ => break,
                    }
                } else {
                    break;
                }
            }
            let literal = &compact[start..end];
            let value = literal.parse::<f64>().map_err(|e| {
                CalcError::MalformedExpression(format!("invalid number '{literal}': {e}"))
            })?;
            tokens.push(Token::Number(value));
            continue;
        }

        if ch.is_ascii_alphabetic() {
            let mut end = start + 1;
            while let Some(&(i, next)) = chars.peek() {
                if !next.is_ascii_alphabetic() {
                    break;
                }
                end = i + 1;
                chars.next();
            }
            // Whitespace is already gone, so "sqrt pow(2,4)" arrives as one
            // run and is split into consecutive function names.
            let run = &compact[start..end];
            let mut rest = run;
            while !rest.is_empty() {
                let (function, tail) = Function::split_name(rest).ok_or_else(|| {
                    CalcError::MalformedExpression(format!("unknown identifier '{run}'"))
                })?;
                tokens.push(Token::Function(function));
                rest = tail;
            }
            continue;
        }

        let unary_position = matches!(
            tokens.last(),
            None | Some(Token::Operator(_))
                | Some(Token::Function(_))
                | Some(Token::LeftParen)
                | Some(Token::Comma)
        );

        match ch {
            '(' => tokens.push(Token::LeftParen),
            ')' => tokens.push(Token::RightParen),
            ',' => tokens.push(Token::Comma),
            '-' if unary_position => tokens.push(Token::Operator(Operator::Neg)),
            '+' if unary_position => {}
            _ => {
                let op = Operator::from_char(ch).ok_or_else(|| {
                    CalcError::MalformedExpression(format!(
                        "unexpected character '{ch}' at position {start}"
                    ))
                })?;
                tokens.push(Token::Operator(op));
            }
        }
    }

    Ok(tokens)
}

// ── to_postfix ──────────────────────────────────────────────────────────────

/// Reorder infix tokens into postfix order (shunting-yard).
///
/// # Errors
///
/// Returns [`CalcError::MalformedExpression`] for unbalanced parentheses or
/// a comma outside a function call.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for &token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Function(_) | Token::Operator(Operator::Neg) | Token::LeftParen => {
                stack.push(token)
            }
            Token::Operator(incoming) => {
                while let Some(&top) = stack.last() {
                    let pops = match top {
                        Token::Operator(op) => op.precedence() >= incoming.precedence(),
                        Token::Function(_) => true,
                        _ => false,
                    };
                    if !pops {
                        break;
                    }
                    output.push(top);
                    stack.pop();
                }
                stack.push(token);
            }
            Token::Comma => {
                if !drain_to_left_paren(&mut stack, &mut output) {
                    return Err(CalcError::MalformedExpression(
                        "comma outside of a function call".to_string(),
                    ));
                }
            }
            Token::RightParen => {
                if !drain_to_left_paren(&mut stack, &mut output) {
                    return Err(CalcError::MalformedExpression(
                        "unbalanced parentheses: unexpected ')'".to_string(),
                    ));
                }
                stack.pop();
                if let Some(&Token::Function(_)) = stack.last() {
                    if let Some(function) = stack.pop() {
                        output.push(function);
                    }
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::LeftParen {
            return Err(CalcError::MalformedExpression(
                "unbalanced parentheses: missing ')'".to_string(),
            ));
        }
        output.push(top);
    }

    Ok(output)
}

/// Pop operators into `output` until a `(` is on top. Leaves the `(` in
/// place and returns `false` if the stack runs out first.
fn drain_to_left_paren(stack: &mut Vec<Token>, output: &mut Vec<Token>) -> bool {
    while let Some(&top) = stack.last() {
        if top == Token::LeftParen {
            return true;
        }
        output.push(top);
        stack.pop();
    }
    false
}

// ── eval_postfix ────────────────────────────────────────────────────────────

/// Reduce a postfix sequence to a single value.
///
/// # Errors
///
/// Returns [`CalcError::MalformedExpression`] on operand-stack underflow,
/// on leftover operands, or on a token that cannot appear in postfix form.
pub fn eval_postfix(postfix: &[Token]) -> Result<f64> {
    let mut operands: Vec<f64> = Vec::new();

    for &token in postfix {
        match token {
            Token::Number(n) => operands.push(n),
            Token::Operator(Operator::Neg) => {
                let a = pop_operand(&mut operands)?;
                operands.push(-a);
            }
            Token::Operator(op) => {
                let b = pop_operand(&mut operands)?;
                let a = pop_operand(&mut operands)?;
                operands.push(op.apply(a, b));
            }
            Token::Function(function) => {
                let value = match function.arity() {
                    1 => {
                        let a = pop_operand(&mut operands)?;
                        match function {
                            Function::Sqrt => a.sqrt(),
                            _ => a.cbrt(),
                        }
                    }
                    _ => {
                        let exponent = pop_operand(&mut operands)?;
                        let base = pop_operand(&mut operands)?;
                        base.powf(exponent)
                    }
                };
                operands.push(value);
            }
            Token::LeftParen | Token::RightParen | Token::Comma => {
                return Err(CalcError::MalformedExpression(format!(
                    "unexpected {token:?} in postfix sequence"
                )));
            }
        }
    }

    match operands.as_slice() {
        [value] => Ok(*value),
        [] => Err(CalcError::MalformedExpression(
            "empty expression".to_string(),
        )),
        _ => Err(CalcError::MalformedExpression(format!(
            "{} operands left without an operator",
            operands.len()
        ))),
    }
}

fn pop_operand(operands: &mut Vec<f64>) -> Result<f64> {
    operands.pop().ok_or_else(|| {
        CalcError::MalformedExpression("operator is missing an operand".to_string())
    })
}

// ── format_number ───────────────────────────────────────────────────────────

/// Format a result for display: integral values without a fraction,
/// everything else with up to 10 decimals and trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if value % 1.0 == 0.0 {
        // Adding 0.0 turns -0.0 into 0.0
        return format!("{:.0}", value + 0.0);
    }
    let fixed = format!("{value:.10}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
