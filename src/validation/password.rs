use lazy_static::lazy_static;
use regex::Regex;

const MIN_LENGTH: usize = 8;

lazy_static! {
    static ref UPPER_RE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWER_RE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref DIGIT_RE: Regex = Regex::new(r"\d").unwrap();
    static ref SPECIAL_RE: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Password policy: at least 8 characters with an uppercase letter, a
/// lowercase letter, a digit and a symbol (neither word char nor whitespace).
pub fn is_strong(pw: &str) -> bool {
    pw.chars().count() >= MIN_LENGTH
        && UPPER_RE.is_match(pw)
        && LOWER_RE.is_match(pw)
        && DIGIT_RE.is_match(pw)
        && SPECIAL_RE.is_match(pw)
}

/// Heuristic 0..=100 score shown next to the signup form.
pub fn strength_score(pw: &str) -> u8 {
    if pw.is_empty() {
        return 0;
    }
    let len = pw.chars().count();
    let mut score = (len.min(10) * 5) as i32;

    let groups = [&*LOWER_RE, &*UPPER_RE, &*DIGIT_RE, &*SPECIAL_RE]
        .iter()
        .filter(|re| re.is_match(pw))
        .count() as i32;
    score += (groups - 1) * 15;

    if !has_triple_repeat(pw) {
        score += 5;
    }
    score.clamp(0, 100) as u8
}

fn has_triple_repeat(pw: &str) -> bool {
    let chars: Vec<char> = pw.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Ok,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=19 => Self::VeryWeak,
            20..=39 => Self::Weak,
            40..=59 => Self::Ok,
            60..=79 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Ok => "ok",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_examples() {
        assert!(is_strong("Abcdefg1!"));
        assert!(!is_strong("abcdefg1!"), "no uppercase");
        assert!(!is_strong("ABCDEFG1!"), "no lowercase");
        assert!(!is_strong("Abcdefgh!"), "no digit");
        assert!(!is_strong("Abcdefg12"), "no special char");
        assert!(!is_strong("Ab1!"), "too short");
    }

    #[test]
    fn whitespace_and_underscore_are_not_symbols() {
        assert!(!is_strong("Abcdefg1 "));
        assert!(!is_strong("Abcdefg1_"));
    }

    #[test]
    fn score_bounds() {
        assert_eq!(strength_score(""), 0);
        // 1 char * 5 + 0 groups bonus + 5 no-repeat
        assert_eq!(strength_score("a"), 10);
        // 50 length + 45 groups + 5 no-repeat
        assert_eq!(strength_score("Abcdefg1!xyz"), 100);
    }

    #[test]
    fn repeats_lose_the_bonus() {
        assert_eq!(strength_score("aaab"), 20);
        assert_eq!(strength_score("aabb"), 25);
    }

    #[test]
    fn labels() {
        assert_eq!(StrengthLabel::for_score(0), StrengthLabel::VeryWeak);
        assert_eq!(StrengthLabel::for_score(20), StrengthLabel::Weak);
        assert_eq!(StrengthLabel::for_score(59), StrengthLabel::Ok);
        assert_eq!(StrengthLabel::for_score(60), StrengthLabel::Strong);
        assert_eq!(StrengthLabel::for_score(100).as_str(), "very strong");
    }
}
