//! Persistence layer — key-value storage for state carried between steps.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Keys used for flow persistence.
pub mod keys {
    /// Serialized `RegistrationRecord`.
    pub const REGISTRATION_DATA: &str = "registration_data";
    /// Chosen OTP delivery method.
    pub const OTP_METHOD: &str = "otp_method";
}
