//! Travel-agency saga: order intake, flight, hotel, payment.

use crate::config::{CompensationPolicy, OrchestratorConfig};
use crate::discovery::ServiceDiscovery;
use crate::orchestrator::SagaOrchestrator;
use crate::saga::Saga;
use crate::services::{FlyBookingService, HotelBookingService, OrderService, WithdrawMoneyService};

/// Chapter: register the order.
pub const INIT_ORDER: &str = "init an order";

/// Chapter: book a flight.
pub const BOOK_FLY: &str = "booking a Fly";

/// Chapter: book a hotel room.
pub const BOOK_HOTEL: &str = "booking a Hotel";

/// Chapter: withdraw the payment.
pub const WITHDRAW_MONEY: &str = "withdrawing Money";

/// An order every service accepts.
pub const GOOD_ORDER: &str = "good_order";

/// An order whose payment is declined.
pub const BAD_ORDER: &str = "bad_order";

/// An order whose payment is declined and whose hotel cannot be cancelled.
pub const CRASHED_ORDER: &str = "crashed_order";

/// Returns the travel saga script.
pub fn travel_saga() -> Saga {
    Saga::create()
        .chapter(INIT_ORDER)
        .chapter(BOOK_FLY)
        .chapter(BOOK_HOTEL)
        .chapter(WITHDRAW_MONEY)
        .build()
}

/// Orchestrator settings for the travel saga: a hotel that cannot be
/// cancelled leaves the customer with a dangling booking, so compensation
/// failures escalate.
pub fn travel_config() -> OrchestratorConfig {
    OrchestratorConfig::default().with_compensation(CompensationPolicy::Escalate)
}

/// Returns a registry with fresh travel services.
pub fn travel_discovery() -> ServiceDiscovery<String> {
    TravelAgency::new().discovery()
}

/// The four travel services, shared so their state can be inspected.
#[derive(Debug, Clone, Default)]
pub struct TravelAgency {
    pub orders: OrderService,
    pub flights: FlyBookingService,
    pub hotels: HotelBookingService,
    pub payments: WithdrawMoneyService,
}

impl TravelAgency {
    /// Creates an agency with empty services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registry over this agency's services.
    pub fn discovery(&self) -> ServiceDiscovery<String> {
        ServiceDiscovery::new()
            .discover(self.orders.clone())
            .discover(self.flights.clone())
            .discover(self.hotels.clone())
            .discover(self.payments.clone())
    }

    /// Returns an orchestrator for the travel saga over this agency.
    pub fn orchestrator(&self) -> SagaOrchestrator<String> {
        SagaOrchestrator::new(travel_saga(), self.discovery()).with_config(travel_config())
    }
}
