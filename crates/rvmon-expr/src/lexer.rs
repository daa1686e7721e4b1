//! Scanner for debugger expressions.
//!
//! Direct-coded scanner dispatching on the current byte; all valid
//! syntax is ASCII. Rule order matters in two places and is preserved
//! from the grammar: two-character operators win over their one-byte
//! prefixes (`!=` before `!`), and a `0x` prefix is only a hex literal
//! when at least one hex digit follows, otherwise the `0` lexes as a
//! decimal literal and the stray `x` is rejected.

use crate::error::{ExprError, Result};
use crate::token::{Token, TokenKind, MAX_LEXEME, MAX_TOKENS};

/// Scans `input` into a token sequence. Whitespace (space only) is
/// discarded; anything unrecognized fails the whole scan.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let token = match bytes[pos] {
            b' ' => {
                pos += 1;
                continue;
            }
            b'+' => one(&mut pos, TokenKind::Plus),
            b'-' => one(&mut pos, TokenKind::Minus),
            b'*' => one(&mut pos, TokenKind::Star),
            b'/' => one(&mut pos, TokenKind::Slash),
            b'(' => one(&mut pos, TokenKind::LParen),
            b')' => one(&mut pos, TokenKind::RParen),
            b'=' if bytes.get(pos + 1) == Some(&b'=') => two(&mut pos, TokenKind::Eq),
            b'!' if bytes.get(pos + 1) == Some(&b'=') => two(&mut pos, TokenKind::NotEq),
            b'<' if bytes.get(pos + 1) == Some(&b'=') => two(&mut pos, TokenKind::Leq),
            b'>' if bytes.get(pos + 1) == Some(&b'=') => two(&mut pos, TokenKind::Geq),
            b'|' if bytes.get(pos + 1) == Some(&b'|') => two(&mut pos, TokenKind::Or),
            b'&' if bytes.get(pos + 1) == Some(&b'&') => two(&mut pos, TokenKind::And),
            b'!' => one(&mut pos, TokenKind::Not),
            b'0'..=b'9' => {
                let (kind, end) = scan_number(bytes, pos);
                pos = end;
                literal(input, kind, start, end)?
            }
            b'$' => {
                let end = scan_register(bytes, pos).ok_or_else(|| unexpected(input, pos))?;
                pos = end;
                literal(input, TokenKind::Reg, start, end)?
            }
            _ => return Err(unexpected(input, pos)),
        };

        if tokens.len() >= MAX_TOKENS {
            return Err(ExprError::TooManyTokens { max: MAX_TOKENS });
        }
        tokens.push(token);
    }

    tracing::trace!(n = tokens.len(), "scanned expression");
    Ok(tokens)
}

/// Retags `*` and `-` as their unary forms wherever the previous token
/// cannot end an operand. Runs once, before evaluation; tokens are
/// never mutated afterwards.
pub(crate) fn mark_unary(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        let unary = i == 0 || !tokens[i - 1].kind.ends_operand();
        match tokens[i].kind {
            TokenKind::Star if unary => tokens[i].kind = TokenKind::Deref,
            TokenKind::Minus if unary => tokens[i].kind = TokenKind::Neg,
            _ => {}
        }
    }
}

fn one(pos: &mut usize, kind: TokenKind) -> Token {
    *pos += 1;
    Token::op(kind)
}

fn two(pos: &mut usize, kind: TokenKind) -> Token {
    *pos += 2;
    Token::op(kind)
}

fn literal(input: &str, kind: TokenKind, start: usize, end: usize) -> Result<Token> {
    if end - start > MAX_LEXEME {
        return Err(ExprError::LexemeTooLong {
            pos: start,
            max: MAX_LEXEME,
        });
    }
    Ok(Token::literal(kind, &input[start..end]))
}

fn unexpected(input: &str, pos: usize) -> ExprError {
    let ch = input[pos..].chars().next().unwrap_or('\0');
    ExprError::UnexpectedChar { ch, pos }
}

/// Scans a numeric literal starting at `pos`. `0x`/`0X` followed by at
/// least one hex digit is a hex literal; everything else is a run of
/// decimal digits.
fn scan_number(bytes: &[u8], pos: usize) -> (TokenKind, usize) {
    if bytes[pos] == b'0'
        && matches!(bytes.get(pos + 1), Some(b'x') | Some(b'X'))
        && bytes.get(pos + 2).is_some_and(|b| b.is_ascii_hexdigit())
    {
        let mut end = pos + 2;
        while end < bytes.len() && bytes[end].is_ascii_hexdigit() {
            end += 1;
        }
        return (TokenKind::Hex, end);
    }

    let mut end = pos;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    (TokenKind::Num, end)
}

/// Scans a register reference: `$` or `$$` followed by one or more
/// alphanumerics. Returns `None` when no name follows the sigil.
fn scan_register(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut end = pos + 1;
    if bytes.get(end) == Some(&b'$') {
        end += 1;
    }
    let name_start = end;
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }
    (end > name_start).then_some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    fn refined(input: &str) -> Vec<TokenKind> {
        let mut tokens = tokenize(input).unwrap();
        mark_unary(&mut tokens);
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_char_operators() {
        use TokenKind::*;
        assert_eq!(kinds("+-*/()"), vec![Plus, Minus, Star, Slash, LParen, RParen]);
    }

    #[test]
    fn test_two_char_operators_win_over_prefixes() {
        use TokenKind::*;
        assert_eq!(kinds("== != <= >= || && !"), vec![Eq, NotEq, Leq, Geq, Or, And, Not]);
        assert_eq!(kinds("!!="), vec![Not, NotEq]);
    }

    #[test]
    fn test_whitespace_is_elided() {
        assert_eq!(kinds("  1   +  2 "), vec![TokenKind::Num, TokenKind::Plus, TokenKind::Num]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_only_plain_spaces_are_whitespace() {
        assert_eq!(
            tokenize("1\t2"),
            Err(ExprError::UnexpectedChar { ch: '\t', pos: 1 })
        );
    }

    #[test]
    fn test_literals_keep_their_lexemes() {
        let tokens = tokenize("123 0xFF 0Xab").unwrap();
        assert_eq!(tokens[0], Token::literal(TokenKind::Num, "123"));
        assert_eq!(tokens[1], Token::literal(TokenKind::Hex, "0xFF"));
        assert_eq!(tokens[2], Token::literal(TokenKind::Hex, "0Xab"));
    }

    #[test]
    fn test_hex_prefix_without_digits_is_rejected() {
        // "0x" lexes as the decimal 0; the stray x then fails the scan
        assert_eq!(
            tokenize("0x + 1"),
            Err(ExprError::UnexpectedChar { ch: 'x', pos: 1 })
        );
    }

    #[test]
    fn test_register_lexemes_keep_their_sigils() {
        let tokens = tokenize("$pc $$0 $a0").unwrap();
        assert_eq!(tokens[0], Token::literal(TokenKind::Reg, "$pc"));
        assert_eq!(tokens[1], Token::literal(TokenKind::Reg, "$$0"));
        assert_eq!(tokens[2], Token::literal(TokenKind::Reg, "$a0"));
    }

    #[test]
    fn test_bare_sigil_is_rejected() {
        assert_eq!(
            tokenize("$ + 1"),
            Err(ExprError::UnexpectedChar { ch: '$', pos: 0 })
        );
    }

    #[test]
    fn test_lone_two_char_prefixes_are_rejected() {
        for (input, ch) in [("1 = 2", '='), ("1 < 2", '<'), ("1 > 2", '>'), ("1 | 2", '|'), ("1 & 2", '&')] {
            assert_eq!(
                tokenize(input),
                Err(ExprError::UnexpectedChar { ch, pos: 2 }),
                "{input}"
            );
        }
    }

    #[test]
    fn test_lexeme_length_bound() {
        let long = "1".repeat(MAX_LEXEME + 1);
        assert_eq!(
            tokenize(&long),
            Err(ExprError::LexemeTooLong { pos: 0, max: MAX_LEXEME })
        );
        assert!(tokenize(&"1".repeat(MAX_LEXEME)).is_ok());
    }

    #[test]
    fn test_token_count_bound() {
        let ok = vec!["1"; MAX_TOKENS].join(" ");
        assert_eq!(tokenize(&ok).unwrap().len(), MAX_TOKENS);
        let over = vec!["1"; MAX_TOKENS + 1].join(" ");
        assert_eq!(tokenize(&over), Err(ExprError::TooManyTokens { max: MAX_TOKENS }));
    }

    #[test]
    fn test_leading_star_and_minus_become_unary() {
        use TokenKind::*;
        assert_eq!(refined("*0x100"), vec![Deref, Hex]);
        assert_eq!(refined("-1"), vec![Neg, Num]);
    }

    #[test]
    fn test_star_and_minus_after_operand_stay_binary() {
        use TokenKind::*;
        assert_eq!(refined("1*2"), vec![Num, Star, Num]);
        assert_eq!(refined("(1)-2"), vec![LParen, Num, RParen, Minus, Num]);
        assert_eq!(refined("$a0*2"), vec![Reg, Star, Num]);
        assert_eq!(refined("0xf-2"), vec![Hex, Minus, Num]);
    }

    #[test]
    fn test_star_and_minus_after_operator_become_unary() {
        use TokenKind::*;
        assert_eq!(refined("1+-2"), vec![Num, Plus, Neg, Num]);
        assert_eq!(refined("1**0x10"), vec![Num, Star, Deref, Hex]);
        assert_eq!(refined("(-1)"), vec![LParen, Neg, Num, RParen]);
        assert_eq!(refined("--1"), vec![Neg, Neg, Num]);
    }
}
