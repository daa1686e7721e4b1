//! Random-expression generator for the `t` self-test command.
//!
//! Produces small arithmetic expressions over decimal literals, the
//! four binary operators and parentheses. Division by a zero subterm
//! is a legal outcome; the evaluator reports it as a failure.

use rand::rngs::ThreadRng;
use rand::Rng;

const MAX_DEPTH: usize = 5;
const MAX_LEN: usize = 256;

/// Generates one random expression.
pub fn random_expr() -> String {
    let mut rng = rand::thread_rng();
    let mut buf = String::new();
    gen_expr(&mut rng, &mut buf, 0);
    buf
}

fn gen_expr(rng: &mut ThreadRng, buf: &mut String, depth: usize) {
    if depth >= MAX_DEPTH || buf.len() >= MAX_LEN {
        gen_num(rng, buf);
        return;
    }
    match rng.gen_range(0..3) {
        0 => gen_num(rng, buf),
        1 => {
            buf.push('(');
            gen_expr(rng, buf, depth + 1);
            buf.push(')');
        }
        _ => {
            gen_expr(rng, buf, depth + 1);
            gen_op(rng, buf);
            gen_expr(rng, buf, depth + 1);
        }
    }
}

fn gen_num(rng: &mut ThreadRng, buf: &mut String) {
    buf.push_str(&rng.gen_range(0..100u32).to_string());
}

fn gen_op(rng: &mut ThreadRng, buf: &mut String) {
    let op = ['+', '-', '*', '/'][rng.gen_range(0..4)];
    buf.push(' ');
    buf.push(op);
    buf.push(' ');
}
