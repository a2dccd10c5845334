//! Exact scaled-integer token amounts.
//!
//! A balance is always carried as a raw big integer tagged with its decimal
//! precision. Arithmetic happens on the raw representation; conversion to a
//! decimal string happens exactly once, at the presentation boundary. No
//! floating point anywhere.

use alloy_primitives::U256;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid number format: {0}")]
    InvalidNumber(String),
    #[error("too many decimal places (max {0})")]
    TooManyDecimalPlaces(u8),
    #[error("decimal precision mismatch: {0} vs {1}")]
    DecimalsMismatch(u8, u8),
    #[error("amount overflow")]
    Overflow,
}

/// A raw integer amount in a token's smallest indivisible unit, tagged with
/// the token's decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    #[must_use]
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    #[must_use]
    pub fn zero(decimals: u8) -> Self {
        Self { raw: U256::ZERO, decimals }
    }

    #[must_use]
    pub fn raw(&self) -> U256 {
        self.raw
    }

    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Exact addition of two amounts at the same precision.
    ///
    /// # Errors
    /// Returns [`AmountError::DecimalsMismatch`] for differing precisions and
    /// [`AmountError::Overflow`] if the sum does not fit in 256 bits.
    pub fn checked_add(&self, other: &Self) -> Result<Self, AmountError> {
        if self.decimals != other.decimals {
            return Err(AmountError::DecimalsMismatch(self.decimals, other.decimals));
        }
        let raw = self.raw.checked_add(other.raw).ok_or(AmountError::Overflow)?;
        Ok(Self { raw, decimals: self.decimals })
    }

    /// Formats the amount as a decimal string, trimming trailing zeros
    /// (`1500000000000000000` at 18 decimals formats as `"1.5"`).
    #[must_use]
    pub fn format(&self) -> String {
        let Some(divisor) = pow10(self.decimals) else {
            // Precision beyond 256 bits: the whole part is always zero.
            return format_fraction_only(self.raw, self.decimals);
        };

        let whole = self.raw / divisor;
        let remainder = self.raw % divisor;

        if remainder.is_zero() {
            return whole.to_string();
        }

        let padded = format!("{:0>width$}", remainder.to_string(), width = self.decimals as usize);
        let trimmed = padded.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{trimmed}")
        }
    }

    /// Parses a decimal string back into a raw amount at the given precision.
    /// The exact inverse of [`TokenAmount::format`] for the same precision.
    ///
    /// # Errors
    /// Rejects malformed numbers, more than one decimal point, and fractions
    /// wider than the precision allows.
    pub fn parse(text: &str, decimals: u8) -> Result<Self, AmountError> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() > 2 {
            return Err(AmountError::InvalidNumber(text.to_string()));
        }

        let whole_part = if parts[0].is_empty() { "0" } else { parts[0] };
        let whole = U256::from_str_radix(whole_part, 10)
            .map_err(|_| AmountError::InvalidNumber(text.to_string()))?;
        let multiplier = pow10(decimals).ok_or(AmountError::Overflow)?;
        let mut raw = whole.checked_mul(multiplier).ok_or(AmountError::Overflow)?;

        if let Some(fraction) = parts.get(1) {
            if fraction.is_empty() {
                return Err(AmountError::InvalidNumber(text.to_string()));
            }
            if fraction.len() > decimals as usize {
                return Err(AmountError::TooManyDecimalPlaces(decimals));
            }
            let fraction_value = U256::from_str_radix(fraction, 10)
                .map_err(|_| AmountError::InvalidNumber(text.to_string()))?;
            let scale = pow10(decimals - fraction.len() as u8).ok_or(AmountError::Overflow)?;
            raw = raw
                .checked_add(fraction_value.checked_mul(scale).ok_or(AmountError::Overflow)?)
                .ok_or(AmountError::Overflow)?;
        }

        Ok(Self { raw, decimals })
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

fn format_fraction_only(raw: U256, decimals: u8) -> String {
    if raw.is_zero() {
        return "0".to_string();
    }
    let padded = format!("{:0>width$}", raw.to_string(), width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    format!("0.{trimmed}")
}
