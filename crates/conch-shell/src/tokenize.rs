//! Tokenizer: whitespace-delimited tokens with quoting and escapes.

/// Tokenize an input line.
///
/// - `\` followed by `"`, `'`, `\`, or a space emits the escaped character
///   literally, inside or outside quotes. Any other `\` is a plain character.
/// - An unescaped `'` or `"` opens a quoted span; only the same character
///   closes it. The other quote character is literal inside the span.
/// - An unescaped space outside quotes ends the current token. Empty tokens
///   are never emitted.
///
/// An unterminated quote is not an error; the span simply runs to the end of
/// the input as part of the current token.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if ch == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, '"' | '\'' | '\\' | ' ')
        {
            current.push(next);
            chars.next();
            continue;
        }

        if ch == '"' || ch == '\'' {
            match quote {
                Some(open) if open == ch => quote = None,
                Some(_) => current.push(ch),
                None => quote = Some(ch),
            }
            continue;
        }

        if ch == ' ' && quote.is_none() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_on_spaces() {
        assert_eq!(tokenize("print hello world"), ["print", "hello", "world"]);
    }

    #[test]
    fn collapses_repeated_spaces() {
        assert_eq!(tokenize("  a   b  "), ["a", "b"]);
    }

    #[test]
    fn double_quotes_group_words() {
        assert_eq!(tokenize("print \"a b\" c"), ["print", "a b", "c"]);
    }

    #[test]
    fn single_quotes_group_words() {
        assert_eq!(tokenize("print 'a b' c"), ["print", "a b", "c"]);
    }

    #[test]
    fn escaped_space_stays_in_token() {
        assert_eq!(tokenize("echo a\\ b"), ["echo", "a b"]);
    }

    #[test]
    fn escaped_quote_is_literal() {
        assert_eq!(tokenize("print \\\"hi\\\""), ["print", "\"hi\""]);
    }

    #[test]
    fn escaped_backslash_is_literal() {
        assert_eq!(tokenize("print a\\\\b"), ["print", "a\\b"]);
    }

    #[test]
    fn other_backslash_is_plain_character() {
        assert_eq!(tokenize("print a\\nb"), ["print", "a\\nb"]);
    }

    #[test]
    fn trailing_backslash_is_kept() {
        assert_eq!(tokenize("print x\\"), ["print", "x\\"]);
    }

    #[test]
    fn mismatched_quote_inside_span_is_literal() {
        assert_eq!(tokenize("print \"it's fine\""), ["print", "it's fine"]);
        assert_eq!(tokenize("print 'say \"hi\"'"), ["print", "say \"hi\""]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(tokenize("print \"a b c"), ["print", "a b c"]);
    }

    #[test]
    fn adjacent_quotes_join_into_one_token() {
        assert_eq!(tokenize("a\"b c\"d"), ["ab cd"]);
    }

    #[test]
    fn empty_quotes_produce_no_token() {
        assert_eq!(tokenize("\"\""), Vec::<String>::new());
        assert_eq!(tokenize("a \"\" b"), ["a", "b"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(tokenize(""), Vec::<String>::new());
        assert_eq!(tokenize("   "), Vec::<String>::new());
    }

    proptest! {
        #[test]
        fn never_emits_empty_tokens(input in ".*") {
            for token in tokenize(&input) {
                prop_assert!(!token.is_empty());
            }
        }

        #[test]
        fn plain_words_roundtrip(words in proptest::collection::vec("[a-z0-9]{1,8}", 0..6)) {
            let line = words.join(" ");
            prop_assert_eq!(tokenize(&line), words);
        }
    }
}
