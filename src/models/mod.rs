pub mod booking;
pub mod business;
pub mod schedule;
pub mod service;
pub mod user;

pub use booking::{Booking, BookingDetails};
pub use business::Business;
pub use schedule::WorkSchedule;
pub use service::Service;
pub use user::{Role, User};
