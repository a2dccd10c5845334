//! Static token registry and selection state.
//!
//! The balance checker operates over a fixed set of tokens: the native
//! currency, its wrapped ERC-20 form, and two stablecoin variants. Two pairs
//! are combinable (ETH+WETH, USDC+USDCe): when both halves of a pair are
//! selected, balances are fetched for both and summed instead of shown
//! singly. [`TokenSelection`] makes that mode explicit at selection time so
//! downstream code never re-derives it from a loose symbol list.

use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Native-currency symbols treated as ETH-compatible for native balance
/// lookups.
pub const ETH_COMPATIBLE_SYMBOLS: &[&str] = &["ETH", "WETH", "PETH", "RETH", "SETH", "XETH"];

/// Returns `true` if a native currency symbol is ETH or ETH-compatible.
#[must_use]
pub fn is_eth_compatible_symbol(symbol: &str) -> bool {
    ETH_COMPATIBLE_SYMBOLS.contains(&symbol)
}

/// The two combinable pairs: native+wrapped, and the stablecoin variants.
const COMBINABLE_PAIRS: &[(&str, &str)] = &[("ETH", "WETH"), ("USDC", "USDCe")];

/// Statically defined token descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    /// Network key to contract address. An empty string is the explicit
    /// "unavailable on this network" marker; the native token has no entries.
    pub addresses: HashMap<&'static str, &'static str>,
}

impl TokenInfo {
    /// Whether this token is the chain-native currency (no contract).
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.symbol == "ETH"
    }

    /// Contract address for a network, treating the empty-string marker as
    /// absent.
    #[must_use]
    pub fn contract_address(&self, network_key: &str) -> Option<&'static str> {
        self.addresses.get(network_key).copied().filter(|addr| !addr.is_empty())
    }
}

static SUPPORTED_TOKENS: LazyLock<HashMap<&'static str, TokenInfo>> = LazyLock::new(|| {
    let mut tokens = HashMap::new();

    tokens.insert(
        "ETH",
        TokenInfo {
            symbol: "ETH",
            name: "Ethereum",
            decimals: 18,
            addresses: HashMap::new(),
        },
    );

    tokens.insert(
        "WETH",
        TokenInfo {
            symbol: "WETH",
            name: "Wrapped Ethereum",
            decimals: 18,
            addresses: HashMap::from([
                ("ethereum", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                ("arbitrum", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                ("optimism", "0x4200000000000000000000000000000000000006"),
                ("polygon", "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"),
                ("base", "0x4200000000000000000000000000000000000006"),
                ("scroll", "0x5300000000000000000000000000000000000004"),
                ("taiko", "0xA51894664A773981C6C112C43ce576f315d5b1B6"),
                ("linea", "0xe5D7C2a44FfDDf6b295A15c148167daaAf5Cf34f"),
                ("zksync", "0x5AEa5775959fBC2557Cc8789bC1bf90A239D9a91"),
                ("blast", "0x4300000000000000000000000000000000000004"),
                ("worldchain", "0x4200000000000000000000000000000000000006"),
                ("mode", "0x4200000000000000000000000000000000000006"),
                ("morph", "0x5300000000000000000000000000000000000011"),
                ("zircuit", ""),
                ("soneium", "0x4200000000000000000000000000000000000006"),
            ]),
        },
    );

    tokens.insert(
        "USDC",
        TokenInfo {
            symbol: "USDC",
            name: "USD Coin (CCTP)",
            decimals: 6,
            addresses: HashMap::from([
                ("ethereum", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
                ("arbitrum", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831"),
                ("optimism", "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85"),
                ("polygon", "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359"),
                ("base", "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
                ("zksync", "0x1d17CBcF0D6D143135aE902365D2E5e2A16538D4"),
                ("zircuit", ""),
                ("soneium", ""),
            ]),
        },
    );

    tokens.insert(
        "USDCe",
        TokenInfo {
            symbol: "USDCe",
            name: "USD Coin (Bridged)",
            decimals: 6,
            addresses: HashMap::from([
                ("arbitrum", "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8"),
                ("optimism", "0x7F5c764cBc14f9669B88837ca1490cCa17c31607"),
                ("polygon", "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
                ("linea", "0x1C7a460413dD4e964f96D8dFC56E7223cE88CD85"),
                ("scroll", "0x06eFdBFf2a14a7c8E15944D1F4A48F9F95F663A4"),
                ("taiko", "0x19e26B0638bf63aa9fa4d14c6baF8D52eBE86C5C"),
                ("blast", ""),
                ("worldchain", ""),
                ("mode", ""),
                ("morph", ""),
                ("zircuit", ""),
                ("soneium", ""),
            ]),
        },
    );

    tokens
});

/// Looks up a supported token by symbol.
#[must_use]
pub fn token(symbol: &str) -> Option<&'static TokenInfo> {
    SUPPORTED_TOKENS.get(symbol)
}

/// All supported token symbols.
#[must_use]
pub fn supported_symbols() -> Vec<&'static str> {
    let mut symbols: Vec<&'static str> = SUPPORTED_TOKENS.keys().copied().collect();
    symbols.sort_unstable();
    symbols
}

/// Returns `true` if the two symbols form a combinable pair, in either order.
#[must_use]
pub fn is_combinable_pair(a: &str, b: &str) -> bool {
    COMBINABLE_PAIRS
        .iter()
        .any(|(first, second)| (a == *first && b == *second) || (a == *second && b == *first))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unsupported token: {0}")]
    UnsupportedToken(String),
    #[error("no tokens selected")]
    Empty,
    #[error("{0} and {1} cannot be combined")]
    NotCombinable(String, String),
}

/// Explicit token-selection state for one fetch batch.
///
/// Pair mode and single mode are mutually exclusive by construction; the
/// aggregator never inspects a raw symbol list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSelection {
    Single(&'static TokenInfo),
    Pair(&'static TokenInfo, &'static TokenInfo),
}

impl TokenSelection {
    /// Builds a single-token selection.
    ///
    /// # Errors
    /// Returns [`SelectionError::UnsupportedToken`] for unknown symbols.
    pub fn single(symbol: &str) -> Result<Self, SelectionError> {
        token(symbol)
            .map(Self::Single)
            .ok_or_else(|| SelectionError::UnsupportedToken(symbol.to_string()))
    }

    /// Builds a combined-pair selection. The canonical half ordering
    /// (native before wrapped, CCTP before bridged) is applied regardless of
    /// argument order.
    ///
    /// # Errors
    /// Returns [`SelectionError::NotCombinable`] unless the symbols form a
    /// combinable pair.
    pub fn pair(a: &str, b: &str) -> Result<Self, SelectionError> {
        let Some((first_symbol, second_symbol)) = COMBINABLE_PAIRS
            .iter()
            .find(|(x, y)| (a == *x && b == *y) || (a == *y && b == *x))
            .copied()
        else {
            return Err(SelectionError::NotCombinable(a.to_string(), b.to_string()));
        };
        let first =
            token(first_symbol).ok_or_else(|| SelectionError::UnsupportedToken(a.to_string()))?;
        let second =
            token(second_symbol).ok_or_else(|| SelectionError::UnsupportedToken(b.to_string()))?;
        Ok(Self::Pair(first, second))
    }

    /// Derives the selection from a raw symbol list, the way the UI presents
    /// it: if both halves of a combinable pair are present the selection is
    /// that pair; otherwise exactly the first symbol is used.
    ///
    /// # Errors
    /// Returns an error on an empty list or an unknown leading symbol.
    pub fn from_symbols(symbols: &[&str]) -> Result<Self, SelectionError> {
        for (first, second) in COMBINABLE_PAIRS {
            if symbols.contains(first) && symbols.contains(second) {
                return Self::pair(first, second);
            }
        }
        let first = symbols.first().ok_or(SelectionError::Empty)?;
        Self::single(first)
    }

    /// The decimal precision shared by the selection. Combinable pairs always
    /// pair tokens of equal precision.
    #[must_use]
    pub fn decimals(&self) -> u8 {
        match self {
            Self::Single(token) | Self::Pair(token, _) => token.decimals,
        }
    }
}
