//! Currency namespaces for the platform fund pool
//!
//! Five closed currencies flow through the ledger:
//! - Cash: platform income, dividends and exercise profit
//! - A-Coin: utility token distributed by daily settlement
//! - O-Coin: option token granted to contributors and vested over time
//! - Compute: metered compute-contribution credits
//! - Game Coin: in-game soft currency earned by players
//!
//! Every balance on the ledger is tracked per currency; there is no
//! implicit conversion between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of currencies the economy engines move
///
/// # Invariants
/// - Deterministic ordering (for stable reports and storage keys)
/// - Stable string representation across versions
/// - Case-insensitive parsing
/// - Explicit discriminants for serialization safety
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum Currency {
    /// Fiat-backed cash: commission income in, dividends and profit out
    Cash = 1,

    /// Utility token credited by the daily contribution settlement
    CoinA = 2,

    /// Option token locked in grants and released by vesting
    CoinO = 3,

    /// Compute-contribution credits metered by the platform
    Compute = 4,

    /// In-game soft currency earned through play
    GameCoin = 5,
}

impl Currency {
    /// All currencies in stable order
    pub const ALL: &'static [Currency] = &[
        Currency::Cash,
        Currency::CoinA,
        Currency::CoinO,
        Currency::Compute,
        Currency::GameCoin,
    ];

    /// Count of currencies
    pub const COUNT: usize = 5;

    /// String representation (lowercase, stable across versions)
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Cash => "cash",
            Currency::CoinA => "coin_a",
            Currency::CoinO => "coin_o",
            Currency::Compute => "compute",
            Currency::GameCoin => "game_coin",
        }
    }

    /// Get discriminant value (for serialization safety and storage keys)
    pub const fn discriminant(self) -> u8 {
        self as u8
    }

    /// Decode a discriminant produced by [`discriminant`](Self::discriminant)
    pub fn from_discriminant(value: u8) -> Option<Self> {
        match value {
            1 => Some(Currency::Cash),
            2 => Some(Currency::CoinA),
            3 => Some(Currency::CoinO),
            4 => Some(Currency::Compute),
            5 => Some(Currency::GameCoin),
            _ => None,
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Cash => "Cash",
            Currency::CoinA => "A-Coin",
            Currency::CoinO => "O-Coin",
            Currency::Compute => "Compute Credits",
            Currency::GameCoin => "Game Coin",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cash" | "fiat" => Ok(Currency::Cash),
            "coin_a" | "a_coin" | "acoin" | "a" => Ok(Currency::CoinA),
            "coin_o" | "o_coin" | "ocoin" | "o" => Ok(Currency::CoinO),
            "compute" | "compute_credits" => Ok(Currency::Compute),
            "game_coin" | "gamecoin" | "game" => Ok(Currency::GameCoin),
            _ => Err(CurrencyError::Unknown(s.to_string())),
        }
    }
}

/// Error type for currency parsing at the string boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Unknown currency string
    Unknown(String),
}

impl fmt::Display for CurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyError::Unknown(s) => {
                write!(
                    f,
                    "Unknown currency: '{}'. Valid currencies: cash, coin_a, coin_o, compute, game_coin",
                    s
                )
            }
        }
    }
}

impl std::error::Error for CurrencyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_discriminants() {
        assert_eq!(Currency::Cash.discriminant(), 1);
        assert_eq!(Currency::CoinA.discriminant(), 2);
        assert_eq!(Currency::CoinO.discriminant(), 3);
        assert_eq!(Currency::Compute.discriminant(), 4);
        assert_eq!(Currency::GameCoin.discriminant(), 5);
    }

    #[test]
    fn currency_discriminant_roundtrip() {
        for currency in Currency::ALL {
            let value = currency.discriminant();
            assert_eq!(Currency::from_discriminant(value), Some(*currency));
        }
        assert_eq!(Currency::from_discriminant(0), None);
        assert_eq!(Currency::from_discriminant(6), None);
    }

    #[test]
    fn currency_string_representation() {
        assert_eq!(Currency::Cash.as_str(), "cash");
        assert_eq!(Currency::CoinA.as_str(), "coin_a");
        assert_eq!(Currency::CoinO.as_str(), "coin_o");
        assert_eq!(Currency::Compute.as_str(), "compute");
        assert_eq!(Currency::GameCoin.as_str(), "game_coin");
    }

    #[test]
    fn currency_display_name() {
        assert_eq!(Currency::CoinA.display_name(), "A-Coin");
        assert_eq!(Currency::CoinO.display_name(), "O-Coin");
        assert_eq!(format!("{}", Currency::GameCoin), "Game Coin");
    }

    #[test]
    fn currency_from_str_case_insensitive() {
        assert_eq!("CASH".parse::<Currency>().unwrap(), Currency::Cash);
        assert_eq!("Coin_A".parse::<Currency>().unwrap(), Currency::CoinA);
        assert_eq!("oCoin".parse::<Currency>().unwrap(), Currency::CoinO);
    }

    #[test]
    fn currency_from_str_aliases() {
        assert_eq!("a".parse::<Currency>().unwrap(), Currency::CoinA);
        assert_eq!("o".parse::<Currency>().unwrap(), Currency::CoinO);
        assert_eq!("fiat".parse::<Currency>().unwrap(), Currency::Cash);
        assert_eq!("game".parse::<Currency>().unwrap(), Currency::GameCoin);
    }

    #[test]
    fn currency_from_str_invalid() {
        assert!("doge".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());

        let err = "doge".parse::<Currency>().unwrap_err();
        assert_eq!(err, CurrencyError::Unknown("doge".to_string()));
    }

    #[test]
    fn currency_all_is_complete_and_ordered() {
        assert_eq!(Currency::ALL.len(), Currency::COUNT);

        let mut sorted = Currency::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted.as_slice(), Currency::ALL);
    }

    #[test]
    fn currency_unique_discriminants() {
        let mut discriminants: Vec<u8> =
            Currency::ALL.iter().map(|c| c.discriminant()).collect();
        discriminants.sort();
        discriminants.dedup();
        assert_eq!(discriminants.len(), Currency::COUNT);
    }

    #[test]
    fn currency_parse_roundtrip() {
        for currency in Currency::ALL {
            let parsed: Currency = currency.as_str().parse().unwrap();
            assert_eq!(*currency, parsed);
        }
    }

    #[test]
    fn currency_serialization_roundtrip() {
        for currency in Currency::ALL {
            let bytes = bincode::serialize(currency).unwrap();
            let back: Currency = bincode::deserialize(&bytes).unwrap();
            assert_eq!(*currency, back);

            let json = serde_json::to_string(currency).unwrap();
            let back: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(*currency, back);
        }
    }
}
