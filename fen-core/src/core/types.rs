//! Fixed-size market data records and order state.
//!
//! Design notes:
//! - `Symbol` is an inline NUL-padded byte array so `Tick`/`Trade` stay
//!   `Copy` and can be stored in ring slots without serialization.
//! - Prices are `f64`, quantities `i64`, matching the wire-side FIX
//!   formatting (two fractional digits for prices, plain decimal for sizes).
//! - Timestamps come from the monotonic clock (`time::clock`), never from
//!   wall time.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::time::clock::{self, Timestamp};

/// Price in quote currency units.
pub type Price = f64;

/// Signed quantity (shares/contracts).
pub type Qty = i64;

/// Numeric order identifier.
pub type OrderId = u64;

/// Maximum symbol length, including nothing else: names longer than this are
/// truncated on construction.
pub const SYMBOL_LEN: usize = 8;

/// Inline, fixed-capacity ticker symbol.
///
/// Stored as ASCII bytes padded with NUL. `Copy` so every record embedding a
/// symbol stays a flat, fixed-size value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Symbol([u8; SYMBOL_LEN]);

impl Symbol {
    /// Build a symbol from a string, truncating at [`SYMBOL_LEN`] bytes.
    pub fn new(name: &str) -> Self {
        let mut bytes = [0u8; SYMBOL_LEN];
        let n = name.len().min(SYMBOL_LEN);
        bytes[..n].copy_from_slice(&name.as_bytes()[..n]);
        Self(bytes)
    }

    /// The symbol as a string slice (up to the first NUL).
    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(SYMBOL_LEN);
        // Constructed from &str, so the prefix is valid UTF-8.
        std::str::from_utf8(&self.0[..end]).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Top-of-book snapshot plus last trade for one symbol at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Tick {
    pub symbol: Symbol,
    pub bid_price: Price,
    pub ask_price: Price,
    pub bid_size: Qty,
    pub ask_size: Qty,
    pub last_price: Price,
    pub last_size: Qty,
    pub timestamp: Timestamp,
}

impl Tick {
    /// Mid price between bid and ask.
    #[inline]
    pub fn mid(&self) -> Price {
        (self.bid_price + self.ask_price) / 2.0
    }

    /// Absolute bid/ask spread.
    #[inline]
    pub fn spread(&self) -> Price {
        self.ask_price - self.bid_price
    }

    /// Whether this tick satisfies the book invariants: positive sizes,
    /// `bid >= 0.01`, `ask >= bid + 0.01`.
    pub fn is_well_formed(&self) -> bool {
        self.bid_price >= 0.01
            && self.ask_price >= self.bid_price + 0.01
            && self.bid_size > 0
            && self.ask_size > 0
    }
}

impl Default for Tick {
    fn default() -> Self {
        Self {
            symbol: Symbol::default(),
            bid_price: 0.0,
            ask_price: 0.0,
            bid_size: 0,
            ask_size: 0,
            last_price: 0.0,
            last_size: 0,
            timestamp: clock::now(),
        }
    }
}

/// A single execution at a specific price and size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Qty,
    pub timestamp: Timestamp,
    pub buyer_id: OrderId,
    pub seller_id: OrderId,
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderType {
    Market = 0,
    Limit = 1,
    Stop = 2,
}

/// Order lifecycle status. Orders are created `Pending` and move through the
/// remaining states via execution reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OrderStatus {
    Pending = 0,
    Filled = 1,
    PartiallyFilled = 2,
    Cancelled = 3,
    Rejected = 4,
}

/// A client order.
///
/// Invariant: `0 <= filled_quantity <= quantity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub quantity: Qty,
    pub filled_quantity: Qty,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
    pub client_id: String,
}

impl Order {
    /// New pending order stamped with the current monotonic instant.
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Qty,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            order_type,
            price,
            quantity,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            timestamp: clock::now(),
            client_id: client_id.into(),
        }
    }

    #[inline]
    pub fn remaining_quantity(&self) -> Qty {
        self.quantity - self.filled_quantity
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// Latency distribution snapshot from the performance monitor.
///
/// All fields are zero when no samples were recorded. `mean` is the
/// integer-rounded average; `p99` is the sorted sample at index
/// `floor(0.99 * count)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyStats {
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub p99: Duration,
    pub count: u64,
}

/// Throughput counters and derived per-second rates.
///
/// Rates are computed against whole elapsed seconds since monitoring started
/// and are zero while less than a second has elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThroughputStats {
    pub messages_per_second: u64,
    pub bytes_per_second: u64,
    pub total_messages: u64,
    pub total_bytes: u64,
}
