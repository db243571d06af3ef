use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Conway's Game of Life: birth on 3, survival on 2 or 3.
pub const B3S23: RuleSet = RuleSet::new(1 << 3, 1 << 2 | 1 << 3);

/// An outer-totalistic Life-like rule.
///
/// Births and survivals are each a 9-bit mask over neighbour counts: bit `n` is set when a cell
/// with `n` live neighbours is born (resp. survives). `B36/S23` is births `0b100_1000`,
/// survivals `0b1100`.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    birth: u16,
    survival: u16,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Bits above the 9th, i.e. counts over 8, are dropped.
    pub const fn new(birth: u16, survival: u16) -> Self {
        Self {
            birth: birth & 0x1FF,
            survival: survival & 0x1FF,
        }
    }

    pub fn births(&self) -> u16 {
        self.birth
    }

    pub fn survivals(&self) -> u16 {
        self.survival
    }

    /// State of a cell in the next generation, given whether it is alive now and how many of its
    /// eight neighbours are.
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > 8 {
            return false;
        }

        let mask = if alive { self.survival } else { self.birth };

        mask >> neighbors & 1 == 1
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rulestring")]
    Empty,

    #[error("Expected a neighbour count in 0..=8, found '{got}'")]
    InvalidCount { got: char },

    #[error("Unexpected character '{got}' in rulestring")]
    InvalidToken { got: char },

    #[error("Neighbour count {n} listed twice")]
    Repeated { n: u32 },
}

/// Accepts `B3/S23`, `b3s23` and the nameless survival/birth form found in RLE `#r` lines, where
/// Life is `23/3`.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum State {
            Birth,
            Survival,
        }

        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let nameless = s.starts_with(|c: char| c.is_ascii_digit() || c == '/');

        // Nameless rules list survivals first
        let mut state = if nameless { State::Survival } else { State::Birth };
        let (mut b, mut surv) = (0u16, 0u16);

        for c in s.chars() {
            match c {
                'b' | 'B' if !nameless => state = State::Birth,
                's' | 'S' if !nameless => state = State::Survival,
                '/' if nameless => state = State::Birth,
                '/' => state = State::Survival,
                c if c.is_ascii_digit() => {
                    let n = c.to_digit(10).ok_or(RuleError::InvalidCount { got: c })?;

                    if n > 8 {
                        return Err(RuleError::InvalidCount { got: c });
                    }

                    let set = match state {
                        State::Birth => &mut b,
                        State::Survival => &mut surv,
                    };

                    if *set & (1 << n) != 0 {
                        return Err(RuleError::Repeated { n });
                    }

                    *set |= 1 << n;
                }
                c => return Err(RuleError::InvalidToken { got: c }),
            }
        }

        Ok(RuleSet::new(b, surv))
    }
}

/// Formats as `B3/S23`.
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |set: u16| -> String {
            (0..=8)
                .filter(|n| set & (1 << n) != 0)
                .map(|n| char::from(b'0' + n as u8))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}
