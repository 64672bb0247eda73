use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::CatalogError;

/// Lowest and highest rating the input controls offer.
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Upper bound on rendered stars, so a stored rating like `"99999999"` cannot
/// flood the terminal.
pub const MAX_STARS: i64 = 1000;

/// A rating exactly as it is stored.
///
/// Ratings entered through the creation form are coerced to integers, while
/// review and edit ratings keep whatever the input control supplied. The
/// variants mirror the three shapes that can therefore appear in the
/// persisted JSON: a number, a string, or `null` (a NaN coercion result).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Number(i64),
    Text(String),
    NotANumber,
}

impl Rating {
    /// Integer value of this rating under `parse_int` rules.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Rating::Number(n) => Some(*n),
            Rating::Text(text) => parse_int(text),
            Rating::NotANumber => None,
        }
    }

    /// Coerces the rating to an integer, yielding `NotANumber` when no
    /// leading digits exist.
    pub fn coerce_integer(&self) -> Rating {
        match self.as_integer() {
            Some(n) => Rating::Number(n),
            None => Rating::NotANumber,
        }
    }

    /// Number of stars to display: one per rating point. NaN and negatives
    /// show none; absurdly large values stop at `MAX_STARS`.
    pub fn star_count(&self) -> usize {
        self.as_integer()
            .map(|n| n.clamp(0, MAX_STARS) as usize)
            .unwrap_or(0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Number(n) => write!(f, "{}", n),
            Rating::Text(text) => f.write_str(text),
            Rating::NotANumber => f.write_str("NaN"),
        }
    }
}

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Rating::Number(value)
    }
}

impl From<&str> for Rating {
    fn from(value: &str) -> Self {
        Rating::Text(value.to_string())
    }
}

impl From<String> for Rating {
    fn from(value: String) -> Self {
        Rating::Text(value)
    }
}

/// Parses a leading integer: leading whitespace is skipped, an optional sign
/// is accepted, a `0x`/`0X` prefix switches to hexadecimal, and parsing stops
/// at the first character that is not a digit. Returns `None` (NaN) when no
/// digits are found.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits: Vec<i64> = rest
        .chars()
        .map_while(|c| c.to_digit(radix))
        .map(i64::from)
        .collect();
    if digits.is_empty() {
        return None;
    }

    // Saturate instead of overflowing on absurdly long digit runs.
    let magnitude = digits
        .iter()
        .fold(0i64, |acc, d| acc.saturating_mul(i64::from(radix)).saturating_add(*d));

    Some(if negative { -magnitude } else { magnitude })
}

/// How ratings are admitted into the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPolicy {
    /// Creation coerces to an integer; reviews and edits store raw input.
    #[default]
    Lenient,
    /// Every path coerces to an integer in `[1, 5]` and rejects the rest.
    Strict,
}

impl RatingPolicy {
    /// Admits the rating given to a newly created product.
    pub fn admit_product_rating(&self, input: Rating) -> Result<Rating, CatalogError> {
        match self {
            RatingPolicy::Lenient => Ok(input.coerce_integer()),
            RatingPolicy::Strict => strict_rating(&input),
        }
    }

    /// Admits a rating on the review and edit paths.
    pub fn admit_raw_rating(&self, input: Rating) -> Result<Rating, CatalogError> {
        match self {
            RatingPolicy::Lenient => Ok(input),
            RatingPolicy::Strict => strict_rating(&input),
        }
    }

    pub fn admit_name(&self, name: String) -> Result<String, CatalogError> {
        match self {
            RatingPolicy::Strict if name.trim().is_empty() => {
                Err(CatalogError::InvalidName("name must not be blank".to_string()))
            }
            _ => Ok(name),
        }
    }
}

fn strict_rating(input: &Rating) -> Result<Rating, CatalogError> {
    match input.as_integer() {
        Some(n) if (MIN_RATING..=MAX_RATING).contains(&n) => Ok(Rating::Number(n)),
        _ => Err(CatalogError::InvalidRating(input.to_string())),
    }
}

impl std::str::FromStr for RatingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(RatingPolicy::Lenient),
            "strict" => Ok(RatingPolicy::Strict),
            other => Err(format!("unknown rating policy `{}`", other)),
        }
    }
}
