//! Token scanner for free-text date strings.
//!
//! Splits input into runs of digits, runs of letters, and single
//! non-whitespace separator characters. Whitespace is dropped; it only
//! delimits tokens.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    /// Run of ASCII digits; the text is kept so token width can
    /// disambiguate years ("03" vs "2003").
    Number(String),
    /// Run of alphabetic characters.
    Word(String),
    /// Any other single non-whitespace character.
    Sep(char),
}

pub(super) fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut text = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                text.push(d);
                chars.next();
            }
            tokens.push(Token::Number(text));
        } else if c.is_alphabetic() {
            let mut text = String::new();
            while let Some(&a) = chars.peek() {
                if !a.is_alphabetic() {
                    break;
                }
                text.push(a);
                chars.next();
            }
            tokens.push(Token::Word(text));
        } else {
            chars.next();
            if !c.is_whitespace() {
                tokens.push(Token::Sep(c));
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_digits_letters_and_separators() {
        assert_eq!(
            tokenize("1st october 2009"),
            vec![
                Token::Number("1".into()),
                Token::Word("st".into()),
                Token::Word("october".into()),
                Token::Number("2009".into()),
            ]
        );
        assert_eq!(
            tokenize("1/2/2020"),
            vec![
                Token::Number("1".into()),
                Token::Sep('/'),
                Token::Number("2".into()),
                Token::Sep('/'),
                Token::Number("2020".into()),
            ]
        );
    }

    #[test]
    fn iso_timestamp_keeps_the_t_as_a_word() {
        assert_eq!(
            tokenize("2020-01-01T10:30"),
            vec![
                Token::Number("2020".into()),
                Token::Sep('-'),
                Token::Number("01".into()),
                Token::Sep('-'),
                Token::Number("01".into()),
                Token::Word("T".into()),
                Token::Number("10".into()),
                Token::Sep(':'),
                Token::Number("30".into()),
            ]
        );
    }

    #[test]
    fn whitespace_is_dropped() {
        assert_eq!(tokenize("   "), vec![]);
        assert_eq!(
            tokenize("jan 10, 2020"),
            vec![
                Token::Word("jan".into()),
                Token::Number("10".into()),
                Token::Sep(','),
                Token::Number("2020".into()),
            ]
        );
    }
}
