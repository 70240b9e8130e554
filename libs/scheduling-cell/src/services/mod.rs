pub mod booking;
pub mod roster;

pub use booking::SchedulingService;
pub use roster::DoctorRosterService;
