use crate::errors::Error;

/// A Kubernetes resource quantity (`"100m"`, `"1"`, `"512Mi"`, `"1e3"`)
/// held as an exact count of milli-units, so different spellings of the
/// same amount compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity {
    millis: i128,
}

// Longest digit string accepted; larger scaled values are rejected on overflow.
const MAX_DIGITS: usize = 18;

impl Quantity {
    pub fn parse(input: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidQuantity(input.to_owned());

        let s = input.trim();
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let number_end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or_else(|| s.len());
        let (number, mut suffix) = s.split_at(number_end);
        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
        if (int_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
            return Err(invalid());
        }

        // "1E" is exa, "1E3" is a decimal exponent
        let mut exponent: i32 = 0;
        if let Some(exp) = suffix.strip_prefix('e').or_else(|| suffix.strip_prefix('E')) {
            if let Ok(value) = exp.parse::<i32>() {
                exponent = value;
                suffix = "";
            }
        }

        let factor: i128 = match suffix {
            "m" => 1,
            "" => 1_000,
            "k" => 1_000_000,
            "M" => 1_000_000_000,
            "G" => 1_000_000_000_000,
            "T" => 1_000_000_000_000_000,
            "P" => 1_000_000_000_000_000_000,
            "E" => 1_000_000_000_000_000_000_000,
            "Ki" => 1_024 * 1_000,
            "Mi" => 1_024i128.pow(2) * 1_000,
            "Gi" => 1_024i128.pow(3) * 1_000,
            "Ti" => 1_024i128.pow(4) * 1_000,
            "Pi" => 1_024i128.pow(5) * 1_000,
            "Ei" => 1_024i128.pow(6) * 1_000,
            _ => return Err(invalid()),
        };

        let digits = format!("{}{}", int_part, frac_part);
        let digits = digits.trim_start_matches('0');
        if digits.len() > MAX_DIGITS {
            return Err(invalid());
        }
        let mantissa: i128 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| invalid())?
        };

        let numerator = mantissa.checked_mul(factor).ok_or_else(invalid)?;
        let scale = frac_part.len() as i32 - exponent;
        let millis = if scale <= 0 {
            let multiplier = 10i128.checked_pow((-scale) as u32).ok_or_else(invalid)?;
            numerator.checked_mul(multiplier).ok_or_else(invalid)?
        } else {
            // sub-milli precision rounds up
            match 10i128.checked_pow(scale as u32) {
                Some(denominator) => {
                    let rounded = numerator.checked_add(denominator - 1).ok_or_else(invalid)?;
                    rounded / denominator
                }
                None if numerator == 0 => 0,
                None => 1,
            }
        };

        Ok(Quantity {
            millis: if negative { -millis } else { millis },
        })
    }

    pub fn millis(&self) -> i128 {
        self.millis
    }
}

/// True when both strings parse and denote the same amount.
pub fn equivalent_quantities(a: &str, b: &str) -> bool {
    match (Quantity::parse(a), Quantity::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
