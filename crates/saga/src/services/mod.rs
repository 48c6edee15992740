//! In-process travel-agency services standing in for remote calls.

pub mod fly_booking;
pub mod hotel_booking;
pub mod order;
pub mod withdraw_money;

pub use fly_booking::FlyBookingService;
pub use hotel_booking::HotelBookingService;
pub use order::OrderService;
pub use withdraw_money::WithdrawMoneyService;
