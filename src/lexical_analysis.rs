//! Lexer that splits a single lambda-calculus expression into tokens.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// The different classes of tokens that compose the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenClass {
    Identifier,
    Lambda,
    Dot,
    OpenParen,
    CloseParen,
    Whitespace,
}

/// Represents a single token of the language.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
    /// Character offset of the first character of the token.
    pub position: usize,
}

/// Raised when a character does not belong to the token alphabet.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized character {character:?} at position {position}")]
    UnrecognizedCharacter { character: char, position: usize },
}

// Represents how to recognize a token class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// Vector of regex patterns that correspond to each token class. Every pattern
// is anchored so it can only match at the start of the remaining input.
lazy_static! {
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Identifier,
            regex: Regex::new(r"^[A-Za-z0-9_']+").expect("Unable to compile Identifier rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Lambda,
            regex: Regex::new(r"^(λ|\\)").expect("Unable to compile Lambda rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Dot,
            regex: Regex::new(r"^\.").expect("Unable to compile Dot rule regex."),
        },
        TokenRule {
            token_class: TokenClass::OpenParen,
            regex: Regex::new(r"^\(").expect("Unable to compile OpenParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::CloseParen,
            regex: Regex::new(r"^\)").expect("Unable to compile CloseParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Whitespace,
            regex: Regex::new(r"^\s+").expect("Unable to compile Whitespace rule regex."),
        },
    ];
}

// Finds the rule that matches the most bytes from the start of the input
// string, if any rule matches at all.
fn get_longest_matching_rule(input_str: &str) -> Option<(&'static TokenRule, usize)> {
    let mut longest: Option<(&'static TokenRule, usize)> = None;

    for token_rule in TOKEN_RULES.iter() {
        let Some(match_obj) = token_rule.regex.find(input_str) else {
            continue;
        };

        let longest_len = longest.map_or(0, |(_, len)| len);
        if match_obj.start() == 0 && match_obj.len() > longest_len {
            longest = Some((token_rule, match_obj.len()));
        }
    }

    longest
}

/// Given a string, returns the vector of tokens that comprise it. Whitespace
/// is discarded. Fails on the first character outside the token alphabet.
pub fn run_lexical_analysis(program_str: &str) -> Result<Vec<Token>, LexError> {
    let mut curr_idx: usize = 0;
    let mut curr_position: usize = 0;
    let mut out = Vec::new();

    while curr_idx < program_str.len() {
        let remaining = &program_str[curr_idx..];

        let Some((token_rule, match_len)) = get_longest_matching_rule(remaining) else {
            // `remaining` is non-empty here, so there is always a next char.
            let character = remaining.chars().next().unwrap_or_default();
            return Err(LexError::UnrecognizedCharacter {
                character,
                position: curr_position,
            });
        };

        let token_text = &remaining[..match_len];

        if token_rule.token_class != TokenClass::Whitespace {
            out.push(Token {
                token_class: token_rule.token_class,
                token_text: String::from(token_text),
                position: curr_position,
            });
        }

        curr_idx += match_len;
        curr_position += token_text.chars().count();
    }

    Ok(out)
}

/// Extracts the raw text of each token, in order.
pub fn token_texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|token| token.token_text.as_str()).collect()
}
