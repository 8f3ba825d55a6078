pub mod bookings;
pub mod places;
pub mod users;
