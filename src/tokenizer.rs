use crate::error::SyntaxError;

/// Upper bound on tokens per input line.
pub const MAX_TOKENS: usize = 1000;

/// Split one input line on spaces, tabs and commas into owned tokens.
/// Separators such as `|` are ordinary tokens here and must be delimited
/// by whitespace themselves.
pub fn tokenize(line: &str) -> Result<Vec<String>, SyntaxError> {
    let tokens: Vec<String> = line
        .split([' ', '\t', ','])
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.len() > MAX_TOKENS {
        return Err(SyntaxError::TooManyTokens);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        let tokens = tokenize("ls -l  /tmp").unwrap();
        assert_eq!(tokens, vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn splits_on_tab_and_comma() {
        let tokens = tokenize("echo\ta,b").unwrap();
        assert_eq!(tokens, vec!["echo", "a", "b"]);
    }

    #[test]
    fn operators_need_their_own_token() {
        // A glued operator stays part of the word.
        let tokens = tokenize("ls|wc").unwrap();
        assert_eq!(tokens, vec!["ls|wc"]);
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t ").unwrap().is_empty());
    }

    #[test]
    fn token_bound_is_enforced() {
        let line = "a ".repeat(MAX_TOKENS + 1);
        assert_eq!(tokenize(&line), Err(SyntaxError::TooManyTokens));
    }
}
