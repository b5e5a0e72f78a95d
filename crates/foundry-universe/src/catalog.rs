//! Symbol catalog: the oracle of all tickers a universe may contain.
//!
//! The catalog is external to the core. It is consulted only to compute the
//! "available to add" candidates ([`merge::available_to_add`](crate::merge::available_to_add)).

/// Source of every known ticker symbol.
pub trait SymbolCatalog {
    /// All known tickers, in no particular order.
    fn all_known_tickers(&self) -> Vec<String>;
}

/// A fixed, in-memory catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCatalog {
    tickers: Vec<String>,
}

impl StaticCatalog {
    /// A catalog holding exactly `tickers`.
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticCatalog {
    /// Placeholder NSE/BSE list used until a real ticker feed is wired in.
    fn default() -> Self {
        Self::new([
            "NSE:RELIANCE-EQ",
            "BSE:TCS-EQ",
            "NSE:INFY-EQ",
            "NSE:HDFCBANK",
            "ADANIENT",
            "ASIANPAINT",
            "ICICIBANK",
            "KOTAKBANK",
            "MARUTI",
            "WIPRO",
            "TECHM",
            "TITAN",
            "ULTRACEMCO",
            "HEROMOTOCO",
            "EICHERMOT",
            "TCS",
            "SBIN",
            "BHARTIARTL",
        ])
    }
}

impl SymbolCatalog for StaticCatalog {
    fn all_known_tickers(&self) -> Vec<String> {
        self.tickers.clone()
    }
}
