//! Token amounts and decimals
//!
//! Amounts are 256-bit unsigned integers stored as four little-endian
//! 64-bit limbs. Big-integer arithmetic is only used for decimal
//! rendering; the indexer never does amount math.

use std::fmt;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};

/// 256-bit unsigned integer, four LE u64 limbs (limb 0 least significant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uint(pub [u64; 4]);

impl Uint {
    pub fn to_big(&self) -> BigUint {
        let mut result = BigUint::from(self.0[3]);
        for limb in self.0[..3].iter().rev() {
            result = (result << 64u32) + BigUint::from(*limb);
        }
        result
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_big())
    }
}

/// A raw token amount in its smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amount(pub Uint);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An amount together with the number of decimal places of its token.
///
/// Renders with a decimal point inserted `denom` digits from the
/// right, left-padded with zeros when the digit string is shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DenominatedAmount {
    pub amount: Amount,
    pub denom: u8,
}

impl fmt::Display for DenominatedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.amount.to_string();
        let denom = self.denom as usize;
        if denom == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > denom {
            let pos = digits.len() - denom;
            write!(f, "{}.{}", &digits[..pos], &digits[pos..])
        } else {
            write!(f, "0.{}{}", "0".repeat(denom - digits.len()), digits)
        }
    }
}

impl Serialize for DenominatedAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed-point decimal: a [`Uint`] scaled by 10^12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dec(pub Uint);

const DEC_PRECISION: usize = 12;

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = BigUint::from(10u32).pow(DEC_PRECISION as u32);
        let raw = self.0.to_big();
        let integral = &raw / &scale;
        let fractional = &raw % &scale;
        let frac_digits = format!("{:0width$}", fractional, width = DEC_PRECISION);
        let frac_digits = frac_digits.trim_end_matches('0');
        if frac_digits.is_empty() {
            write!(f, "{integral}")
        } else {
            write!(f, "{integral}.{frac_digits}")
        }
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
