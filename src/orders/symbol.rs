//! Fixed-width OCC option symbols.
//!
//! A symbol is exactly 21 ASCII characters:
//!
//! ```text
//! AAPL  240315C00150000
//! └────┘└────┘│└──────┘
//!   │     │   │    └─ strike × 1000, eight digits, zero padded
//!   │     │   └────── C or P
//!   │     └────────── expiration, YYMMDD
//!   └──────────────── underlying, space padded to six
//! ```

use super::OrderError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display};


const SYMBOL_LEN: usize = 21;
const UNDERLYING_WIDTH: usize = 6;
const STRIKE_SCALE: u32 = 3;
/// Largest strike whose scaled form still fits in eight digits.
const MAX_SCALED_STRIKE: i128 = 99_999_999;

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ContractType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl ContractType {
    /// Single-letter code used inside option symbols.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl FromStr for ContractType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "CALL" => Ok(Self::Call),
            "P" | "PUT" => Ok(Self::Put),
            other => Err(OrderError::InvalidContractType(other.to_string())),
        }
    }
}

/// Parsed option symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionSymbol {
    underlying: String,
    expiration: NaiveDate,
    contract_type: ContractType,
    strike: Decimal,
}

impl OptionSymbol {
    /// Validates string inputs the way they usually arrive from users.
    ///
    /// `right` accepts `C`, `CALL`, `P` or `PUT`; `strike` is any positive
    /// decimal string and is rounded to thousandths.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidContractType`], [`OrderError::InvalidStrikePrice`],
    /// [`OrderError::InvalidUnderlying`] or [`OrderError::InvalidExpiration`].
    pub fn new(
        underlying: &str,
        expiration: NaiveDate,
        right: &str,
        strike: &str,
    ) -> Result<Self, OrderError> {
        let contract_type = right.parse()?;
        let strike = Decimal::from_str(strike.trim())
            .map_err(|_| OrderError::InvalidStrikePrice(strike.to_string()))?;
        Self::from_parts(underlying, expiration, contract_type, strike)
    }

    /// Validates typed inputs.
    ///
    /// # Errors
    /// Same as [`OptionSymbol::new`], minus the contract type check.
    pub fn from_parts(
        underlying: &str,
        expiration: NaiveDate,
        contract_type: ContractType,
        strike: Decimal,
    ) -> Result<Self, OrderError> {
        validate_underlying(underlying)?;
        if !(2000..=2099).contains(&expiration.year()) {
            return Err(OrderError::InvalidExpiration(expiration));
        }
        if strike <= Decimal::ZERO {
            return Err(OrderError::InvalidStrikePrice(strike.to_string()));
        }

        let rounded = strike
            .round_dp_with_strategy(STRIKE_SCALE, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let scaled = scaled_strike(rounded);
        if scaled == 0 || scaled > MAX_SCALED_STRIKE {
            return Err(OrderError::InvalidStrikePrice(strike.to_string()));
        }

        Ok(Self {
            underlying: underlying.to_string(),
            expiration,
            contract_type,
            strike: rounded,
        })
    }

    /// Parses a 21-character symbol.
    ///
    /// # Errors
    /// Returns [`OrderError::MalformedOptionSymbol`] for anything that
    /// [`OptionSymbol::build`] could not have produced.
    pub fn parse(symbol: &str) -> Result<Self, OrderError> {
        let malformed = |reason| OrderError::MalformedOptionSymbol {
            symbol: symbol.to_string(),
            reason,
        };

        if !symbol.is_ascii() {
            return Err(malformed("symbol must be ASCII"));
        }
        if symbol.len() != SYMBOL_LEN {
            return Err(malformed("symbol must be exactly 21 characters"));
        }

        let underlying = symbol[..UNDERLYING_WIDTH].trim_end_matches(' ');
        if underlying.is_empty() || underlying.contains(char::is_whitespace) {
            return Err(malformed("underlying is empty or contains spaces"));
        }

        let date = &symbol[6..12];
        let year = parse_digits(&date[0..2]).ok_or_else(|| malformed("date is not numeric"))?;
        let month = parse_digits(&date[2..4]).ok_or_else(|| malformed("date is not numeric"))?;
        let day = parse_digits(&date[4..6]).ok_or_else(|| malformed("date is not numeric"))?;
        let expiration = NaiveDate::from_ymd_opt(2000 + year as i32, month as u32, day as u32)
            .ok_or_else(|| malformed("date does not exist"))?;

        let contract_type = match &symbol[12..13] {
            "C" => ContractType::Call,
            "P" => ContractType::Put,
            _ => return Err(malformed("right code must be C or P")),
        };

        let scaled = parse_digits(&symbol[13..]).ok_or_else(|| malformed("strike is not numeric"))?;
        if scaled == 0 {
            return Err(malformed("strike is zero"));
        }

        Ok(Self {
            underlying: underlying.to_string(),
            expiration,
            contract_type,
            strike: Decimal::new(scaled, STRIKE_SCALE).normalize(),
        })
    }

    /// Renders the 21-character symbol.
    #[must_use]
    pub fn build(&self) -> String {
        self.to_string()
    }

    /// Underlying ticker, without padding.
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Expiration date.
    #[must_use]
    pub fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Call or put.
    #[must_use]
    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    /// Strike, rounded to thousandths.
    #[must_use]
    pub fn strike(&self) -> Decimal {
        self.strike
    }
}

impl fmt::Display for OptionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<width$}{}{}{:08}",
            self.underlying,
            self.expiration.format("%y%m%d"),
            self.contract_type.code(),
            scaled_strike(self.strike),
            width = UNDERLYING_WIDTH,
        )
    }
}

impl FromStr for OptionSymbol {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_underlying(underlying: &str) -> Result<(), OrderError> {
    if underlying.is_empty()
        || underlying.len() > UNDERLYING_WIDTH
        || !underlying.is_ascii()
        || underlying.contains(char::is_whitespace)
    {
        return Err(OrderError::InvalidUnderlying(underlying.to_string()));
    }
    Ok(())
}

/// Strike × 1000 as an integer. Input must already be rounded to thousandths.
fn scaled_strike(strike: Decimal) -> i128 {
    let mut scaled = strike;
    scaled.rescale(STRIKE_SCALE);
    scaled.mantissa()
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
