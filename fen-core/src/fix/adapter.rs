//! Exchange-facing facade over a FIX session.
//!
//! Bundles the session with an exchange label and exposes the trading and
//! market-data surface callers actually use, so they never touch raw frames.

use crate::core::{Order, OrderId, Symbol};
use crate::fix::message::msg_type;
use crate::fix::session::{FixSession, MessageHandler, SessionError};

pub struct FixProtocolAdapter {
    session: FixSession,
    exchange_name: String,
}

impl FixProtocolAdapter {
    pub fn new(
        exchange_name: impl Into<String>,
        sender_comp_id: impl Into<String>,
        target_comp_id: impl Into<String>,
    ) -> Self {
        Self {
            session: FixSession::new(sender_comp_id, target_comp_id),
            exchange_name: exchange_name.into(),
        }
    }

    pub fn exchange_name(&self) -> &str {
        &self.exchange_name
    }

    /// Log on to the exchange session.
    pub fn connect(&mut self) -> bool {
        self.session.logon();
        self.session.is_logged_on()
    }

    /// Log out. Safe to call when already disconnected.
    pub fn disconnect(&mut self) {
        self.session.logout();
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_logged_on()
    }

    pub fn submit_order(&mut self, order: &Order) {
        self.session.send_new_order(order);
    }

    pub fn cancel_order(&mut self, order_id: OrderId, symbol: Symbol) {
        self.session.send_cancel_request(order_id, symbol);
    }

    pub fn subscribe_market_data(&mut self, symbols: &[Symbol]) {
        self.session.subscribe_market_data(symbols);
    }

    pub fn unsubscribe_market_data(&mut self, symbols: &[Symbol]) {
        self.session.unsubscribe_market_data(symbols);
    }

    /// Observe inbound execution reports.
    pub fn set_execution_handler(&mut self, handler: MessageHandler) {
        self.session
            .set_message_handler(msg_type::EXECUTION_REPORT, handler);
    }

    /// Observe inbound market-data snapshots.
    pub fn set_market_data_handler(&mut self, handler: MessageHandler) {
        self.session
            .set_message_handler(msg_type::MARKET_DATA_SNAPSHOT, handler);
    }

    /// Feed one raw inbound frame through the session.
    pub fn process_incoming(&mut self, raw: &str) -> Result<(), SessionError> {
        self.session.process_message(raw)
    }

    /// Direct access to the underlying session (outbound sink wiring, stats).
    pub fn session_mut(&mut self) -> &mut FixSession {
        &mut self.session
    }
}
