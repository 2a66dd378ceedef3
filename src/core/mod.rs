// Core primitives: object identifiers and id generation

pub mod id_generator;
pub mod object_id;

pub use id_generator::IdGenerator;
pub use object_id::ObjectId;

/// Current time in milliseconds since the Unix epoch.
pub fn current_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
