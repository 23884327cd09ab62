use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Wrong guesses allowed before the round is lost
pub const DEFAULT_MAX_WRONG_GUESSES: u32 = 6;

/// Score awarded for a won round
pub const DEFAULT_WIN_REWARD: u32 = 10;

/// Shown in place of characters that have not been guessed yet
pub const PLACEHOLDER: char = '_';

/// Per-round policy values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRules {
    pub max_wrong_guesses: u32,
    pub win_reward: u32,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            max_wrong_guesses: DEFAULT_MAX_WRONG_GUESSES,
            win_reward: DEFAULT_WIN_REWARD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Playing,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, RoundStatus::Playing)
    }
}

/// What a single accepted guess did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter occurs in the answer; `positions` counts every occurrence,
    /// including ones that were already revealed
    Correct { letter: char, positions: usize },
    Wrong { letter: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("the answer must not be empty")]
    EmptyAnswer,
    #[error("at least one wrong guess must be allowed")]
    NoGuessesAllowed,
    #[error("Please enter a single letter.")]
    InvalidGuess { input: String },
    #[error("the round is already over")]
    RoundOver,
    #[error("inconsistent round state: {0}")]
    InvalidState(&'static str),
}

/// One play-through from answer selection to win or loss.
///
/// The answer is kept exactly as supplied so revealed positions show the
/// original casing; matching folds both sides to lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RoundState")]
pub struct Round {
    answer: Vec<char>,
    revealed: Vec<bool>,
    wrong_guesses: u32,
    rules: RoundRules,
    status: RoundStatus,
}

/// Unchecked wire form of [`Round`]
#[derive(Deserialize)]
struct RoundState {
    answer: Vec<char>,
    revealed: Vec<bool>,
    wrong_guesses: u32,
    rules: RoundRules,
    status: RoundStatus,
}

impl TryFrom<RoundState> for Round {
    type Error = RoundError;

    fn try_from(s: RoundState) -> Result<Self, Self::Error> {
        if s.answer.is_empty() {
            return Err(RoundError::EmptyAnswer);
        }
        if s.rules.max_wrong_guesses < 1 {
            return Err(RoundError::NoGuessesAllowed);
        }
        if s.revealed.len() != s.answer.len() {
            return Err(RoundError::InvalidState("reveal mask length differs from answer"));
        }
        if s.wrong_guesses > s.rules.max_wrong_guesses {
            return Err(RoundError::InvalidState("more wrong guesses than allowed"));
        }

        let all_revealed = s.revealed.iter().all(|shown| *shown);
        let expected = if all_revealed {
            RoundStatus::Won
        } else if s.wrong_guesses == s.rules.max_wrong_guesses {
            RoundStatus::Lost
        } else {
            RoundStatus::Playing
        };
        if s.status != expected {
            return Err(RoundError::InvalidState("status does not match mask and counter"));
        }

        Ok(Self {
            answer: s.answer,
            revealed: s.revealed,
            wrong_guesses: s.wrong_guesses,
            rules: s.rules,
            status: s.status,
        })
    }
}

impl Round {
    /// Starts a round with the default win reward.
    pub fn start(answer: &str, max_wrong_guesses: u32) -> Result<Self, RoundError> {
        Self::start_with_rules(
            answer,
            RoundRules {
                max_wrong_guesses,
                ..RoundRules::default()
            },
        )
    }

    pub fn start_with_rules(answer: &str, rules: RoundRules) -> Result<Self, RoundError> {
        if answer.is_empty() {
            return Err(RoundError::EmptyAnswer);
        }
        if rules.max_wrong_guesses < 1 {
            return Err(RoundError::NoGuessesAllowed);
        }

        let answer: Vec<char> = answer.chars().collect();
        let revealed = vec![false; answer.len()];

        Ok(Self {
            answer,
            revealed,
            wrong_guesses: 0,
            rules,
            status: RoundStatus::Playing,
        })
    }

    /// Applies a guess given as raw player input, which must be exactly one
    /// character long.
    pub fn guess(&mut self, input: &str) -> Result<GuessOutcome, RoundError> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => self.guess_char(letter),
            _ => Err(RoundError::InvalidGuess {
                input: input.to_string(),
            }),
        }
    }

    pub fn guess_char(&mut self, letter: char) -> Result<GuessOutcome, RoundError> {
        if self.status.is_over() {
            return Err(RoundError::RoundOver);
        }

        let letter = fold(letter);
        let mut positions = 0;
        for (c, shown) in self.answer.iter().zip(self.revealed.iter_mut()) {
            if fold(*c) == letter {
                *shown = true;
                positions += 1;
            }
        }

        let outcome = if positions > 0 {
            GuessOutcome::Correct { letter, positions }
        } else {
            self.wrong_guesses += 1;
            GuessOutcome::Wrong { letter }
        };

        if self.revealed.iter().all(|shown| *shown) {
            self.status = RoundStatus::Won;
        } else if self.wrong_guesses >= self.rules.max_wrong_guesses {
            self.status = RoundStatus::Lost;
        }

        debug!(?outcome, status = ?self.status, wrong = self.wrong_guesses, "guess applied");
        Ok(outcome)
    }

    /// The answer with unrevealed characters replaced by [`PLACEHOLDER`].
    pub fn render_mask(&self) -> String {
        self.answer
            .iter()
            .zip(&self.revealed)
            .map(|(c, shown)| if *shown { *c } else { PLACEHOLDER })
            .collect()
    }

    pub fn reveal_mask(&self) -> &[bool] {
        &self.revealed
    }

    pub fn answer(&self) -> String {
        self.answer.iter().collect()
    }

    pub fn answer_len(&self) -> usize {
        self.answer.len()
    }

    pub fn letters_remaining(&self) -> usize {
        self.revealed.iter().filter(|shown| !**shown).count()
    }

    pub fn wrong_guesses(&self) -> u32 {
        self.wrong_guesses
    }

    pub fn max_wrong_guesses(&self) -> u32 {
        self.rules.max_wrong_guesses
    }

    pub fn rules(&self) -> RoundRules {
        self.rules
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// `None` while the round is still being played.
    pub fn score(&self) -> Option<u32> {
        match self.status {
            RoundStatus::Playing => None,
            RoundStatus::Won => Some(self.rules.win_reward),
            RoundStatus::Lost => Some(0),
        }
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn play(round: &mut Round, letters: &str) {
        for c in letters.chars() {
            round.guess_char(c).unwrap();
        }
    }

    #[test]
    fn test_loop_is_won_in_three_guesses() {
        let mut round = Round::start("loop", 6).unwrap();

        round.guess("l").unwrap();
        assert_eq!(round.render_mask(), "l___");

        let outcome = round.guess("o").unwrap();
        assert_eq!(outcome, GuessOutcome::Correct { letter: 'o', positions: 2 });
        assert_eq!(round.render_mask(), "loo_");
        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.score(), None);

        round.guess("p").unwrap();
        assert_eq!(round.render_mask(), "loop");
        assert_eq!(round.status(), RoundStatus::Won);
        assert_eq!(round.score(), Some(10));
    }

    #[test]
    fn test_array_is_lost_after_two_misses() {
        let mut round = Round::start("array", 2).unwrap();

        assert_eq!(round.guess("z").unwrap(), GuessOutcome::Wrong { letter: 'z' });
        assert_eq!(round.wrong_guesses(), 1);
        assert_eq!(round.status(), RoundStatus::Playing);

        round.guess("q").unwrap();
        assert_eq!(round.wrong_guesses(), 2);
        assert_eq!(round.status(), RoundStatus::Lost);
        assert_eq!(round.score(), Some(0));
    }

    #[test]
    fn test_empty_answer_is_rejected() {
        assert_eq!(Round::start("", 6).unwrap_err(), RoundError::EmptyAnswer);
    }

    #[test]
    fn test_zero_max_wrong_guesses_is_rejected() {
        assert_eq!(Round::start("loop", 0).unwrap_err(), RoundError::NoGuessesAllowed);
    }

    #[test]
    fn test_guess_must_be_one_character() {
        let mut round = Round::start("loop", 6).unwrap();

        for input in ["", "lo", "xyz"] {
            let err = round.guess(input).unwrap_err();
            assert_eq!(err, RoundError::InvalidGuess { input: input.to_string() });
        }
        assert_eq!(round.wrong_guesses(), 0);
        assert_eq!(round.render_mask(), "____");
    }

    #[test]
    fn test_matching_ignores_case_and_keeps_answer_casing() {
        let mut round = Round::start("forEach", 6).unwrap();

        round.guess("E").unwrap();
        round.guess("f").unwrap();
        assert_eq!(round.render_mask(), "f__E___");
    }

    #[test]
    fn test_repeated_wrong_guess_counts_again() {
        let mut round = Round::start("map", 6).unwrap();

        play(&mut round, "zz");
        assert_eq!(round.wrong_guesses(), 2);
    }

    #[test]
    fn test_repeated_correct_guess_is_still_correct() {
        let mut round = Round::start("map", 6).unwrap();

        play(&mut round, "mm");
        assert_eq!(round.wrong_guesses(), 0);
        assert_eq!(round.render_mask(), "m__");
    }

    #[test]
    fn test_finished_round_rejects_guesses() {
        let mut round = Round::start("a", 6).unwrap();
        round.guess("a").unwrap();
        assert_eq!(round.status(), RoundStatus::Won);

        assert_eq!(round.guess("b").unwrap_err(), RoundError::RoundOver);
        assert_eq!(round.wrong_guesses(), 0);
        assert_eq!(round.status(), RoundStatus::Won);
    }

    #[test]
    fn test_custom_reward() {
        let rules = RoundRules { max_wrong_guesses: 3, win_reward: 25 };
        let mut round = Round::start_with_rules("if", rules).unwrap();
        play(&mut round, "if");
        assert_eq!(round.score(), Some(25));
    }

    #[test]
    fn test_letters_remaining() {
        let mut round = Round::start("class", 6).unwrap();
        assert_eq!(round.letters_remaining(), 5);
        round.guess("s").unwrap();
        assert_eq!(round.letters_remaining(), 3);
    }

    #[test]
    fn test_saved_round_resumes() {
        let mut round = Round::start("loop", 6).unwrap();
        play(&mut round, "oz");

        let json = serde_json::to_string(&round).unwrap();
        let mut restored: Round = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.render_mask(), "_oo_");
        assert_eq!(restored.wrong_guesses(), 1);

        play(&mut restored, "lp");
        assert_eq!(restored.status(), RoundStatus::Won);
    }

    #[test]
    fn test_inconsistent_saved_round_is_rejected() {
        let rules = r#""rules":{"max_wrong_guesses":6,"win_reward":10}"#;
        let cases = [
            // empty answer
            format!(r#"{{"answer":[],"revealed":[],"wrong_guesses":0,{rules},"status":"Playing"}}"#),
            // no wrong guesses allowed
            r#"{"answer":["a"],"revealed":[false],"wrong_guesses":0,"rules":{"max_wrong_guesses":0,"win_reward":10},"status":"Playing"}"#.to_string(),
            // mask shorter than answer
            format!(r#"{{"answer":["a","b"],"revealed":[true],"wrong_guesses":0,{rules},"status":"Playing"}}"#),
            // counter past the limit
            format!(r#"{{"answer":["a"],"revealed":[false],"wrong_guesses":7,{rules},"status":"Lost"}}"#),
            // won without every position revealed
            format!(r#"{{"answer":["a","b"],"revealed":[true,false],"wrong_guesses":0,{rules},"status":"Won"}}"#),
            // fully revealed but still playing
            format!(r#"{{"answer":["a"],"revealed":[true],"wrong_guesses":0,{rules},"status":"Playing"}}"#),
        ];

        for json in &cases {
            assert!(serde_json::from_str::<Round>(json).is_err(), "accepted {json}");
        }
    }

    proptest! {
        #[test]
        fn prop_guessing_every_letter_wins(answer in "[a-zA-Z]{1,12}") {
            let mut round = Round::start(&answer, 6).unwrap();
            let mut distinct: Vec<char> = answer.to_lowercase().chars().collect();
            distinct.sort_unstable();
            distinct.dedup();

            for c in distinct {
                round.guess_char(c).unwrap();
            }

            prop_assert_eq!(round.status(), RoundStatus::Won);
            prop_assert_eq!(round.score(), Some(DEFAULT_WIN_REWARD));
            prop_assert_eq!(round.render_mask(), answer);
        }

        #[test]
        fn prop_only_absent_letters_lose(answer in "[a-m]{1,12}", max in 1u32..10) {
            let mut round = Round::start(&answer, max).unwrap();
            let misses = ['n', 'o', 'p', 'q', 'r'];

            let mut i = 0;
            while round.status() == RoundStatus::Playing {
                round.guess_char(misses[i % misses.len()]).unwrap();
                i += 1;
            }

            prop_assert_eq!(round.status(), RoundStatus::Lost);
            prop_assert_eq!(round.score(), Some(0));
            prop_assert_eq!(round.wrong_guesses(), max);
            prop_assert_eq!(i as u32, max);
        }

        #[test]
        fn prop_mask_only_shows_placeholders_or_answer(
            answer in "[a-z]{1,12}",
            guesses in proptest::collection::vec(proptest::char::range('a', 'z'), 0..20),
        ) {
            let mut round = Round::start(&answer, 30).unwrap();
            for c in guesses {
                if round.status().is_over() {
                    let before = round.render_mask();
                    prop_assert!(round.guess_char(c).is_err());
                    prop_assert_eq!(round.render_mask(), before);
                } else {
                    round.guess_char(c).unwrap();
                }
            }

            let mask: Vec<char> = round.render_mask().chars().collect();
            let expected: Vec<char> = answer.chars().collect();
            prop_assert_eq!(mask.len(), expected.len());
            prop_assert_eq!(round.reveal_mask().len(), expected.len());
            for (i, c) in mask.iter().enumerate() {
                if round.reveal_mask()[i] {
                    prop_assert_eq!(*c, expected[i]);
                } else {
                    prop_assert_eq!(*c, PLACEHOLDER);
                }
            }
        }
    }
}
