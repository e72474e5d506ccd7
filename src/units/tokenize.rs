//! Splits run text into comparable word tokens.
//!
//! Tokenization happens per run, so a formatting boundary always forces a
//! token boundary even between identically styled runs. Words are maximal
//! alphanumeric spans; every other non-whitespace character is a token of its
//! own. Whitespace never forms a token — it rides on the preceding token's
//! original text (or the following one's, at the start of a run) so that
//! re-serialized output reproduces the exact source text.

/// One tokenized span of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WordToken {
    /// The source text including any adjacent whitespace.
    pub original: String,
    /// The comparison form: no attached whitespace, case-folded when the
    /// comparison is case-insensitive.
    pub normalized: String,
    /// Whether the token is an alphanumeric word (punctuation and
    /// whitespace-only tokens are excluded from move-detection word sets).
    pub is_word: bool,
}

pub(crate) fn tokenize_run(text: &str, case_insensitive: bool) -> Vec<WordToken> {
    let mut tokens: Vec<WordToken> = Vec::new();
    let mut leading = String::new();
    // Whether the last token still accepts word characters; whitespace and
    // punctuation close it.
    let mut last_open = false;

    for c in text.chars() {
        if c.is_whitespace() {
            match tokens.last_mut() {
                Some(last) => last.original.push(c),
                None => leading.push(c),
            }
            last_open = false;
        } else if c.is_alphanumeric() {
            match tokens.last_mut() {
                Some(last) if last_open && last.is_word => {
                    last.original.push(c);
                    push_normalized(&mut last.normalized, c, case_insensitive);
                }
                _ => {
                    let mut normalized = String::new();
                    push_normalized(&mut normalized, c, case_insensitive);
                    tokens.push(WordToken {
                        original: c.to_string(),
                        normalized,
                        is_word: true,
                    });
                    last_open = true;
                }
            }
        } else {
            tokens.push(WordToken {
                original: c.to_string(),
                normalized: c.to_string(),
                is_word: false,
            });
            last_open = false;
        }
    }

    if let Some(first) = tokens.first_mut() {
        if !leading.is_empty() {
            first.original.insert_str(0, &leading);
        }
    } else if !leading.is_empty() {
        // A run of pure whitespace still has to survive the round trip.
        tokens.push(WordToken {
            original: leading,
            normalized: " ".to_owned(),
            is_word: false,
        });
    }

    tokens
}

fn push_normalized(normalized: &mut String, c: char, case_insensitive: bool) {
    if case_insensitive {
        normalized.extend(c.to_lowercase());
    } else {
        normalized.push(c);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn originals(text: &str) -> Vec<String> {
        tokenize_run(text, false)
            .into_iter()
            .map(|token| token.original)
            .collect()
    }

    #[test]
    fn test_words_keep_their_trailing_whitespace() {
        assert_eq!(originals("Hi there!"), vec!["Hi ", "there", "!"]);
    }

    #[test]
    fn test_leading_whitespace_attaches_to_the_first_token() {
        assert_eq!(originals("  what? "), vec!["  what", "? "]);
    }

    #[test]
    fn test_round_trip_preserves_the_source_text() {
        let text = " hello, \nwhere are you?";
        assert_eq!(originals(text).concat(), text);
    }

    #[test_case("", 0; "empty run")]
    #[test_case("   ", 1; "whitespace only run")]
    #[test_case("a,b", 3; "punctuation splits words")]
    fn test_token_counts(text: &str, expected: usize) {
        assert_eq!(tokenize_run(text, false).len(), expected);
    }

    #[test]
    fn test_case_folding_only_touches_the_normalized_form() {
        let tokens = tokenize_run("Hello", true);
        assert_eq!(tokens[0].original, "Hello");
        assert_eq!(tokens[0].normalized, "hello");
    }

    #[test]
    fn test_punctuation_is_not_a_word() {
        let tokens = tokenize_run("end.", false);
        assert!(tokens[0].is_word);
        assert!(!tokens[1].is_word);
    }

    #[test]
    fn test_utf8_words() {
        let tokens = tokenize_run("grüße Ärger", true);
        assert_eq!(tokens[0].normalized, "grüße");
        assert_eq!(tokens[1].normalized, "ärger");
    }
}
