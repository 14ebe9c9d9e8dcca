//! Text and arithmetic commands: print, calc.

use conch_shell::{Command, CommandResult, Environment};
use conch_types::{ConchError, Result};

// ---------------------------------------------------------------------------
// print
// ---------------------------------------------------------------------------

struct PrintCmd;
impl Command for PrintCmd {
    fn name(&self) -> &str {
        "print"
    }
    fn aliases(&self) -> &[&str] {
        &["echo"]
    }
    fn description(&self) -> &str {
        "Print text to the output"
    }
    fn usage(&self) -> &str {
        "print <text...>"
    }
    fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::success(args.join(" ")))
    }
}

// ---------------------------------------------------------------------------
// calc
// ---------------------------------------------------------------------------

struct CalcCmd;
impl Command for CalcCmd {
    fn name(&self) -> &str {
        "calc"
    }
    fn description(&self) -> &str {
        "Evaluate an arithmetic expression"
    }
    fn usage(&self) -> &str {
        "calc <expression>"
    }
    fn execute(&self, args: &[String], _env: &mut Environment<'_>) -> Result<CommandResult> {
        if args.is_empty() {
            return Err(ConchError::Command("usage: calc <expression>".to_string()));
        }
        let expr = args.join(" ");
        let value = evaluate(&expr)?;
        Ok(CommandResult::success(format_number(value)))
    }
}

fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        _ => 0,
    }
}

fn apply(values: &mut Vec<f64>, op: char) -> Result<()> {
    let (Some(b), Some(a)) = (values.pop(), values.pop()) else {
        return Err(ConchError::Command(format!(
            "malformed expression near '{op}'"
        )));
    };
    let result = match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => {
            if b == 0.0 {
                return Err(ConchError::Command("division by zero".to_string()));
            }
            a / b
        },
        _ => {
            return Err(ConchError::Command(format!("unsupported operator '{op}'")));
        },
    };
    values.push(result);
    Ok(())
}

/// Two-stack infix evaluator over `+ - * /` and parentheses.
///
/// A `-` in value position (expression start, after an operator, after `(`)
/// is a sign, not a subtraction.
fn evaluate(expr: &str) -> Result<f64> {
    let chars: Vec<char> = expr.chars().collect();
    let mut values: Vec<f64> = Vec::new();
    let mut ops: Vec<char> = Vec::new();
    let mut expect_value = true;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if ch.is_ascii_digit() || ch == '.' || (ch == '-' && expect_value) {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            let number: f64 = literal
                .parse()
                .map_err(|_| ConchError::Command(format!("invalid number '{literal}'")))?;
            values.push(number);
            expect_value = false;
            continue;
        }
        match ch {
            '(' => {
                ops.push(ch);
                expect_value = true;
            },
            ')' => {
                loop {
                    match ops.pop() {
                        Some('(') => break,
                        Some(op) => apply(&mut values, op)?,
                        None => {
                            return Err(ConchError::Command(
                                "unbalanced parentheses".to_string(),
                            ));
                        },
                    }
                }
                expect_value = false;
            },
            '+' | '-' | '*' | '/' => {
                while let Some(&top) = ops.last()
                    && top != '('
                    && precedence(top) >= precedence(ch)
                {
                    ops.pop();
                    apply(&mut values, top)?;
                }
                ops.push(ch);
                expect_value = true;
            },
            _ => {
                return Err(ConchError::Command(format!(
                    "unexpected character '{ch}' in expression"
                )));
            },
        }
        i += 1;
    }

    while let Some(op) = ops.pop() {
        if op == '(' {
            return Err(ConchError::Command("unbalanced parentheses".to_string()));
        }
        apply(&mut values, op)?;
    }

    match (values.pop(), values.is_empty()) {
        (Some(result), true) => Ok(result),
        _ => Err(ConchError::Command("malformed expression".to_string())),
    }
}

/// Integral results print without a trailing `.0` fraction.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

pub fn register_text_commands(reg: &mut conch_shell::CommandRegistry) {
    reg.register(Box::new(PrintCmd));
    reg.register(Box::new(CalcCmd));
}
