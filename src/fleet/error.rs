use super::BookingStatus;

/// Errors that can occur during fleet store operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FleetError {
    #[error("booking already exists: {0}")]
    DuplicateBooking(String),

    #[error("driver already exists: {0}")]
    DuplicateDriver(String),

    #[error("booking not found: {0}")]
    BookingNotFound(String),

    #[error("driver not found: {0}")]
    DriverNotFound(String),

    #[error("booking {booking_id} is already assigned to driver {driver_id}")]
    AlreadyAssigned {
        booking_id: String,
        driver_id: String,
    },

    #[error("booking {booking_id} is {status} and cannot be assigned")]
    BookingClosed {
        booking_id: String,
        status: BookingStatus,
    },

    #[error("driver {0} is not active")]
    DriverInactive(String),

    #[error("route of driver {driver_id} changed (expected version {expected}, found {actual})")]
    RouteChanged {
        driver_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("invalid booking {booking_id}: {message}")]
    InvalidBooking { booking_id: String, message: String },

    #[error("invalid driver {driver_id}: {message}")]
    InvalidDriver { driver_id: String, message: String },
}
