pub mod availability;
pub mod booking;
pub mod business;
pub mod dashboard;
pub mod employee;
pub mod slots;
pub mod work_schedule;
