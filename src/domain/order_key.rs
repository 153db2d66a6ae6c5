// ============================================================
// Layer 3 — OrderKey
// ============================================================
// Basket identifiers arrive as text ("1", "2", ..., "10").
// Comparing them as strings would put "10" before "9", so the
// splitter and the temporal filter compare them through this key:
//
//   - a value that parses as i64 orders numerically
//   - any other value orders lexicographically
//   - every integer orders before every non-integer
//
// The derived Ord on the enum gives exactly that total order,
// because variants compare by declaration order first.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderKey {
    Int(i64),
    Text(String),
}

impl OrderKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n)  => OrderKey::Int(n),
            Err(_) => OrderKey::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Int(n)  => write!(f, "{n}"),
            OrderKey::Text(s) => f.write_str(s),
        }
    }
}
