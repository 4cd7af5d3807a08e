//! Market data → FIX conversions.

use crate::core::{Tick, Trade};
use crate::fix::message::{msg_type, tags, FixMessage};

/// Render a tick as a MARKET_DATA_SNAPSHOT (`35=W`) frame.
pub fn tick_to_market_data_snapshot(tick: &Tick) -> FixMessage {
    let mut msg = FixMessage::new();
    msg.set_field(tags::MSG_TYPE, msg_type::MARKET_DATA_SNAPSHOT);
    msg.set_field(tags::SYMBOL, tick.symbol.as_str());
    msg.set_price_field(tags::BID_PX, tick.bid_price);
    msg.set_price_field(tags::ASK_PX, tick.ask_price);
    msg.set_int_field(tags::BID_SIZE, tick.bid_size);
    msg.set_int_field(tags::ASK_SIZE, tick.ask_size);
    msg
}

/// Render a trade as an EXECUTION_REPORT (`35=8`) frame carrying the fill
/// price and size.
pub fn trade_to_execution_report(trade: &Trade) -> FixMessage {
    let mut msg = FixMessage::new();
    msg.set_field(tags::MSG_TYPE, msg_type::EXECUTION_REPORT);
    msg.set_field(tags::SYMBOL, trade.symbol.as_str());
    msg.set_price_field(tags::LAST_PX, trade.price);
    msg.set_int_field(tags::LAST_SHARES, trade.quantity);
    // "F" = trade (fill) per the ExecType enumeration.
    msg.set_field(tags::EXEC_TYPE, "F");
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Symbol;
    use crate::time::clock;

    #[test]
    fn tick_snapshot_carries_book_tags() {
        let tick = Tick {
            symbol: Symbol::new("AAPL"),
            bid_price: 150.25,
            ask_price: 150.35,
            bid_size: 500,
            ask_size: 800,
            last_price: 150.30,
            last_size: 100,
            timestamp: clock::now(),
        };

        let msg = tick_to_market_data_snapshot(&tick);
        assert_eq!(msg.message_type(), Some("W"));
        assert_eq!(msg.get_field(tags::SYMBOL), Some("AAPL"));
        assert_eq!(msg.get_field(tags::BID_PX), Some("150.25"));
        assert_eq!(msg.get_field(tags::ASK_PX), Some("150.35"));
        assert_eq!(msg.get_int_field(tags::BID_SIZE), Some(500));
        assert_eq!(msg.get_int_field(tags::ASK_SIZE), Some(800));
    }

    #[test]
    fn trade_report_carries_fill_tags() {
        let trade = Trade {
            symbol: Symbol::new("MSFT"),
            price: 300.10,
            quantity: 250,
            timestamp: clock::now(),
            buyer_id: 1,
            seller_id: 2,
        };

        let msg = trade_to_execution_report(&trade);
        assert_eq!(msg.message_type(), Some("8"));
        assert_eq!(msg.get_field(tags::SYMBOL), Some("MSFT"));
        assert_eq!(msg.get_field(tags::LAST_PX), Some("300.10"));
        assert_eq!(msg.get_int_field(tags::LAST_SHARES), Some(250));
        assert_eq!(msg.get_field(tags::EXEC_TYPE), Some("F"));
    }
}
