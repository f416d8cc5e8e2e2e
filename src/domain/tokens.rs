//! Known stable-coin deployments shown alongside a payment

use serde::Serialize;

/// Token contract details for one `SYMBOL@CHAIN` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub blockchain: &'static str,
    pub decimals: u8,
    pub contract_address: &'static str,
}

const KNOWN_TOKENS: &[TokenInfo] = &[
    TokenInfo { symbol: "USDT", blockchain: "TRON", decimals: 6, contract_address: "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t" },
    TokenInfo { symbol: "USDC", blockchain: "TRON", decimals: 6, contract_address: "TEkxiTehnzSmSe2XqrBj4w32RUN966rdz8" },
    TokenInfo { symbol: "USDT", blockchain: "ETHEREUM", decimals: 6, contract_address: "0xdAC17F958D2ee523a2206206994597C13D831ec7" },
    TokenInfo { symbol: "USDC", blockchain: "ETHEREUM", decimals: 6, contract_address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48" },
    TokenInfo { symbol: "USDT", blockchain: "BSC", decimals: 18, contract_address: "0x55d398326f99059fF775485246999027B3197955" },
    TokenInfo { symbol: "USDT", blockchain: "POLYGON", decimals: 6, contract_address: "0xc2132D05D31c914a87C6611C10748AEb04B58e8F" },
];

impl TokenInfo {
    /// Catalogue key, e.g. `USDT@TRON`
    pub fn key(&self) -> String {
        format!("{}@{}", self.symbol, self.blockchain)
    }
}

/// Look up a token by symbol and chain, case-insensitively
pub fn lookup(symbol: &str, blockchain: &str) -> Option<&'static TokenInfo> {
    KNOWN_TOKENS.iter().find(|token| {
        token.symbol.eq_ignore_ascii_case(symbol) && token.blockchain.eq_ignore_ascii_case(blockchain)
    })
}

/// Look up a token by its `SYMBOL@CHAIN` key
pub fn lookup_key(key: &str) -> Option<&'static TokenInfo> {
    let (symbol, blockchain) = key.split_once('@')?;
    lookup(symbol, blockchain)
}
