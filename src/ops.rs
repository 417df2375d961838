use std::fmt::Display;

/// The three binary string operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `&`
    Concat,
    /// `||`
    Interleave,
    /// `#`
    Splice,
}

impl Operator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "&" => Some(Operator::Concat),
            "||" => Some(Operator::Interleave),
            "#" => Some(Operator::Splice),
            _ => None,
        }
    }

    pub fn apply(self, lhs: &str, rhs: &str) -> String {
        match self {
            Operator::Concat => concatenate(lhs, rhs),
            Operator::Interleave => interleave(lhs, rhs),
            Operator::Splice => splice(lhs, rhs),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Concat => write!(f, "&"),
            Operator::Interleave => write!(f, "||"),
            Operator::Splice => write!(f, "#"),
        }
    }
}

/// Concatenates `lhs` and `rhs`, then collapses every run of equal adjacent
/// characters into one, across the seam as well.
pub fn concatenate(lhs: &str, rhs: &str) -> String {
    let mut value = String::with_capacity(lhs.len() + rhs.len());
    let mut last = None;
    for c in lhs.chars().chain(rhs.chars()) {
        if last != Some(c) {
            value.push(c);
            last = Some(c);
        }
    }
    value
}

/// Alternates characters of `lhs` and `rhs`, starting with `lhs`. The
/// remainder of the longer operand is appended as is.
pub fn interleave(lhs: &str, rhs: &str) -> String {
    let mut value = String::with_capacity(lhs.len() + rhs.len());
    let mut lhs = lhs.chars();
    let mut rhs = rhs.chars();
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => break,
            (l, r) => {
                value.extend(l);
                value.extend(r);
            }
        }
    }
    value
}

/// Inserts `lhs` into the middle of `rhs`. For odd lengths the left half of
/// `rhs` is the shorter one.
pub fn splice(lhs: &str, rhs: &str) -> String {
    let mid = rhs.chars().count() / 2;
    let at = rhs.char_indices().nth(mid).map_or(rhs.len(), |(i, _)| i);
    let (left, right) = rhs.split_at(at);
    let mut value = String::with_capacity(lhs.len() + rhs.len());
    value.push_str(left);
    value.push_str(lhs);
    value.push_str(right);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn concatenate_collapses_runs_across_the_seam() {
        assert_eq!(concatenate("--", "-*"), "-*");
        assert_eq!(concatenate("-*?", "-*"), "-*?-*");
        assert_eq!(concatenate("**??", "??--"), "*?-");
        assert_eq!(concatenate("-", "-"), "-");
        assert_eq!(concatenate("", ""), "");
    }

    #[test]
    fn interleave_appends_the_longer_tail() {
        assert_eq!(interleave("abc", "12"), "a1b2c");
        assert_eq!(interleave("a", "1234"), "a1234");
        assert_eq!(interleave("-*", "??"), "-?*?");
        assert_eq!(interleave("", "-*"), "-*");
        assert_eq!(interleave("-*", ""), "-*");
    }

    #[test]
    fn splice_inserts_in_the_middle() {
        assert_eq!(splice("X", "abcd"), "abXcd");
        assert_eq!(splice("X", "abc"), "aXbc");
        assert_eq!(splice("X", "a"), "Xa");
        assert_eq!(splice("**", ""), "**");
        assert_eq!(splice("?", "--"), "-?-");
    }

    #[test]
    fn operators_round_trip_their_symbols() {
        for symbol in ["&", "||", "#"] {
            let op = Operator::from_token(symbol).unwrap();
            assert_eq!(op.to_string(), symbol);
        }
        assert_eq!(Operator::from_token("|"), None);
        assert_eq!(Operator::from_token("&&"), None);
        assert_eq!(Operator::from_token(""), None);
    }

    #[test]
    fn apply_dispatches_on_the_operator() {
        assert_eq!(Operator::Concat.apply("-", "*"), "-*");
        assert_eq!(Operator::Interleave.apply("--", "**"), "-*-*");
        assert_eq!(Operator::Splice.apply("?", "-*"), "-?*");
    }

    fn literal() -> impl Strategy<Value = String> {
        prop::string::string_regex("[-*?]{1,64}").expect("valid regex")
    }

    proptest! {
        #[test]
        fn splice_keeps_rhs_around_lhs(a in literal(), b in literal()) {
            let spliced = splice(&a, &b);
            prop_assert_eq!(spliced.len(), a.len() + b.len());

            let mid = b.len() / 2;
            prop_assert_eq!(&spliced[mid..mid + a.len()], a.as_str());
            let outer = format!("{}{}", &spliced[..mid], &spliced[mid + a.len()..]);
            prop_assert_eq!(outer, b);
        }

        #[test]
        fn interleave_can_be_taken_apart(a in literal(), b in literal()) {
            let mixed = interleave(&a, &b);
            prop_assert_eq!(mixed.len(), a.len() + b.len());

            let shared = a.len().min(b.len());
            let bytes = mixed.as_bytes();
            let mut lhs = String::new();
            let mut rhs = String::new();
            for i in 0..shared {
                lhs.push(bytes[2 * i] as char);
                rhs.push(bytes[2 * i + 1] as char);
            }
            let tail = &mixed[2 * shared..];
            if a.len() > shared {
                lhs.push_str(tail);
            } else {
                rhs.push_str(tail);
            }
            prop_assert_eq!(lhs, a);
            prop_assert_eq!(rhs, b);
        }

        #[test]
        fn concatenate_has_no_adjacent_duplicates(a in literal(), b in literal()) {
            let joined = concatenate(&a, &b);
            prop_assert!(joined.as_bytes().windows(2).all(|w| w[0] != w[1]));
            prop_assert_eq!(concatenate(&joined, ""), joined.clone());
        }

        #[test]
        fn concatenate_with_itself_is_dedup_of_the_doubled_string(a in literal()) {
            let doubled = format!("{a}{a}");
            prop_assert_eq!(concatenate(&a, &a), concatenate(&doubled, ""));
        }
    }
}
