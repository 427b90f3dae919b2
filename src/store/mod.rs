mod appointments;

pub use appointments::AppointmentStore;
