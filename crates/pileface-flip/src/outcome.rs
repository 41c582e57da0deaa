//! Coin outcomes and the result of one flip.

use std::fmt;

use pileface_hal::{Counts, HalError};

/// Face a coin landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Measured bit `0`.
    Heads,
    /// Measured bit `1`.
    Tails,
}

impl Outcome {
    /// Map a measured bit to a face: `0` is heads, `1` is tails.
    pub fn from_bit(bit: bool) -> Self {
        if bit { Outcome::Tails } else { Outcome::Heads }
    }

    /// Map a bitstring character, `'0'` or `'1'`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Outcome::Heads),
            '1' => Some(Outcome::Tails),
            _ => None,
        }
    }

    /// The measured bit for this face.
    pub fn bit(self) -> bool {
        self == Outcome::Tails
    }

    /// Upper-case label, `HEADS` or `TAILS`.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Heads => "HEADS",
            Outcome::Tails => "TAILS",
        }
    }

    /// Letter printed on the coin face.
    pub fn letter(self) -> char {
        match self {
            Outcome::Heads => 'H',
            Outcome::Tails => 'T',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcomes of one coin-flip run, one per coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinFlipResult {
    outcomes: Vec<Outcome>,
    bitstring: String,
    backend: String,
}

impl CoinFlipResult {
    /// Build a result from outcomes in coin order.
    pub fn new(outcomes: Vec<Outcome>, backend: impl Into<String>) -> Self {
        let bitstring = outcomes
            .iter()
            .map(|o| if o.bit() { '1' } else { '0' })
            .collect();
        Self {
            outcomes,
            bitstring,
            backend: backend.into(),
        }
    }

    /// Read the measured bitstring out of a single-shot histogram.
    ///
    /// Character `i` of the bitstring is coin `i`. With more than one shot
    /// the most frequent bitstring wins.
    pub fn from_counts(
        counts: &Counts,
        coins: usize,
        backend: impl Into<String>,
    ) -> Result<Self, HalError> {
        let (bitstring, _) = counts
            .most_frequent()
            .ok_or_else(|| HalError::MalformedResult("no measurement returned".into()))?;

        if bitstring.chars().count() != coins {
            return Err(HalError::MalformedResult(format!(
                "expected {coins} bits, got {bitstring:?}"
            )));
        }

        let outcomes = bitstring
            .chars()
            .map(|c| {
                Outcome::from_char(c)
                    .ok_or_else(|| HalError::MalformedResult(format!("not a bit: {c:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            outcomes,
            bitstring: bitstring.clone(),
            backend: backend.into(),
        })
    }

    /// Outcomes in coin order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Outcome of the first coin.
    pub fn first(&self) -> Option<Outcome> {
        self.outcomes.first().copied()
    }

    /// The raw measured bits.
    pub fn bitstring(&self) -> &str {
        &self.bitstring
    }

    /// Name of the backend that produced the bits.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Number of coins.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no coin was flipped.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of heads.
    pub fn heads(&self) -> usize {
        self.outcomes.iter().filter(|&&o| o == Outcome::Heads).count()
    }

    /// Number of tails.
    pub fn tails(&self) -> usize {
        self.outcomes.len() - self.heads()
    }
}

impl fmt::Display for CoinFlipResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Results: {} Heads, {} Tails", self.heads(), self.tails())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_mapping() {
        assert_eq!(Outcome::from_bit(false), Outcome::Heads);
        assert_eq!(Outcome::from_bit(true), Outcome::Tails);
        assert_eq!(Outcome::from_char('0'), Some(Outcome::Heads));
        assert_eq!(Outcome::from_char('1'), Some(Outcome::Tails));
        assert_eq!(Outcome::from_char('x'), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Outcome::Heads.to_string(), "HEADS");
        assert_eq!(Outcome::Tails.label(), "TAILS");
        assert_eq!(Outcome::Heads.letter(), 'H');
        assert_eq!(Outcome::Tails.letter(), 'T');
    }

    #[test]
    fn test_from_single_shot_counts() {
        let counts: Counts = [("1", 1)].into_iter().collect();
        let result = CoinFlipResult::from_counts(&counts, 1, "simulator").unwrap();

        assert_eq!(result.outcomes(), &[Outcome::Tails]);
        assert_eq!(result.first(), Some(Outcome::Tails));
        assert_eq!(result.bitstring(), "1");
        assert_eq!(result.backend(), "simulator");
    }

    #[test]
    fn test_statistics() {
        let counts: Counts = [("01101", 1)].into_iter().collect();
        let result = CoinFlipResult::from_counts(&counts, 5, "yukon").unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.heads(), 2);
        assert_eq!(result.tails(), 3);
        assert_eq!(result.outcomes()[0], Outcome::Heads);
        assert_eq!(result.outcomes()[1], Outcome::Tails);
        assert_eq!(result.to_string(), "Results: 2 Heads, 3 Tails");
    }

    #[test]
    fn test_empty_counts_is_malformed() {
        let err = CoinFlipResult::from_counts(&Counts::new(), 1, "sim").unwrap_err();
        assert!(matches!(err, HalError::MalformedResult(_)));
    }

    #[test]
    fn test_width_mismatch_is_malformed() {
        let counts: Counts = [("01", 1)].into_iter().collect();
        let err = CoinFlipResult::from_counts(&counts, 1, "sim").unwrap_err();
        assert!(matches!(err, HalError::MalformedResult(_)));
    }

    #[test]
    fn test_non_bit_is_malformed() {
        let counts: Counts = [("2", 1)].into_iter().collect();
        let err = CoinFlipResult::from_counts(&counts, 1, "sim").unwrap_err();
        assert!(matches!(err, HalError::MalformedResult(_)));
    }

    #[test]
    fn test_new_builds_bitstring() {
        let result = CoinFlipResult::new(vec![Outcome::Tails, Outcome::Heads], "sim");
        assert_eq!(result.bitstring(), "10");
    }

    proptest! {
        #[test]
        fn prop_zero_is_heads_one_is_tails(bits in proptest::collection::vec(any::<bool>(), 1..24)) {
            let bitstring: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
            let counts: Counts = [(bitstring.as_str(), 1)].into_iter().collect();
            let result = CoinFlipResult::from_counts(&counts, bits.len(), "sim").unwrap();

            for (bit, outcome) in bits.iter().zip(result.outcomes()) {
                prop_assert_eq!(*outcome, if *bit { Outcome::Tails } else { Outcome::Heads });
            }
            prop_assert_eq!(result.heads() + result.tails(), bits.len());
            prop_assert_eq!(result.bitstring(), bitstring.as_str());
        }
    }
}
