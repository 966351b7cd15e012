//! Recursive descent parser that constructs lambda-calculus terms in the
//! box-tree representation given a vector of tokens.
//!
//! Grammar:
//!
//! ```text
//! expr := LAMBDA IDENT '.' expr
//!       | atom atom*
//! atom := '(' expr ')'
//!       | IDENT
//! ```

use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::Term;
use crate::lexical_analysis::{run_lexical_analysis, LexError, Token, TokenClass};

/// Represents a parsing error.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    #[error("unexpected token {found:?} at position {position} after a complete expression")]
    TrailingTokens { found: String, position: usize },
}

/// Any failure to turn source text into a term.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

// Names a token class for error messages.
fn describe_token_class(token_class: TokenClass) -> &'static str {
    match token_class {
        TokenClass::Identifier => "an identifier",
        TokenClass::Lambda => "'λ'",
        TokenClass::Dot => "'.'",
        TokenClass::OpenParen => "'('",
        TokenClass::CloseParen => "')'",
        TokenClass::Whitespace => "whitespace",
    }
}

/// Parser state: the token slice and the index of the next unconsumed token.
pub struct RecursiveDescentParser<'a> {
    tokens: &'a [Token],
    curr_idx: usize,
}

impl<'a> RecursiveDescentParser<'a> {
    /// Assumes whitespace has already been discarded, as
    /// `run_lexical_analysis` does.
    pub fn new(tokens: &'a [Token]) -> Self {
        RecursiveDescentParser {
            tokens,
            curr_idx: 0,
        }
    }

    /// Returns the next unconsumed token without advancing.
    pub fn peek_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.curr_idx)
    }

    /// Consumes the next token. If `expected_text` is given, the token's text
    /// must match it exactly.
    pub fn consume_token(&mut self, expected_text: Option<&str>) -> Result<&'a Token, ParseError> {
        let expected = || match expected_text {
            Some(text) => format!("{:?}", text),
            None => String::from("any token"),
        };

        let token = self
            .peek_token()
            .ok_or_else(|| ParseError::UnexpectedEndOfInput {
                expected: expected(),
            })?;

        if let Some(text) = expected_text {
            if token.token_text != text {
                return Err(ParseError::UnexpectedToken {
                    expected: expected(),
                    found: token.token_text.clone(),
                    position: token.position,
                });
            }
        }

        self.curr_idx += 1;
        Ok(token)
    }

    // Consumes the next token, requiring it to be of the given class.
    fn consume_token_class(&mut self, token_class: TokenClass) -> Result<&'a Token, ParseError> {
        let expected = describe_token_class(token_class);

        match self.peek_token() {
            None => Err(ParseError::UnexpectedEndOfInput {
                expected: String::from(expected),
            }),
            Some(token) if token.token_class != token_class => Err(ParseError::UnexpectedToken {
                expected: String::from(expected),
                found: token.token_text.clone(),
                position: token.position,
            }),
            Some(_) => self.consume_token(None),
        }
    }

    // True if the next token can start an atom.
    fn at_atom_start(&self) -> bool {
        matches!(
            self.peek_token().map(|token| token.token_class),
            Some(TokenClass::Identifier) | Some(TokenClass::OpenParen)
        )
    }

    /// Parses an expression that looks like `λ[IDENTIFIER].[EXPR]`. The body
    /// extends as far right as possible.
    fn try_lambda_rule(&mut self) -> Result<Term, ParseError> {
        self.consume_token_class(TokenClass::Lambda)?;
        let param_token = self.consume_token_class(TokenClass::Identifier)?;
        self.consume_token(Some("."))?;
        let body = self.parse_expr()?;

        Ok(Term::abstraction(param_token.token_text.as_str(), body))
    }

    /// Parses according to the production `atom -> (e) | v`.
    fn try_atom_rule(&mut self) -> Result<Term, ParseError> {
        match self.peek_token() {
            Some(token) if token.token_class == TokenClass::OpenParen => {
                self.consume_token(Some("("))?;
                let inner = self.parse_expr()?;
                self.consume_token(Some(")"))?;
                Ok(inner)
            }
            _ => {
                let var_token = self.consume_token_class(TokenClass::Identifier)?;
                Ok(Term::variable(var_token.token_text.as_str()))
            }
        }
    }

    /// Parses a chain of juxtaposed atoms, folding them into left-associative
    /// applications.
    fn try_application_rule(&mut self) -> Result<Term, ParseError> {
        let mut out_term = self.try_atom_rule()?;

        while self.at_atom_start() {
            let next_atom = self.try_atom_rule()?;
            out_term = Term::application(out_term, next_atom);
        }

        Ok(out_term)
    }

    /// Parses according to the production `e -> lambda | application`.
    pub fn parse_expr(&mut self) -> Result<Term, ParseError> {
        match self.peek_token() {
            Some(token) if token.token_class == TokenClass::Lambda => self.try_lambda_rule(),
            _ => self.try_application_rule(),
        }
    }

    /// Parses exactly one expression and requires all tokens to be consumed.
    pub fn parse_complete(&mut self) -> Result<Term, ParseError> {
        let term = self.parse_expr()?;

        match self.peek_token() {
            Some(token) => Err(ParseError::TrailingTokens {
                found: token.token_text.clone(),
                position: token.position,
            }),
            None => Ok(term),
        }
    }
}

/// Uses recursive descent to parse the given tokens into exactly one `Term`.
pub fn parse_recursive_descent(tokens: &[Token]) -> Result<Term, ParseError> {
    RecursiveDescentParser::new(tokens).parse_complete()
}

/// Lexes and parses a single expression.
pub fn parse_expression(source: &str) -> Result<Term, SyntaxError> {
    let tokens = run_lexical_analysis(source)?;
    Ok(parse_recursive_descent(&tokens)?)
}
