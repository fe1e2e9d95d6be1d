//! Application, user and scheme records
//!
//! Every collection is a JSON array in the key/value store and is read
//! whole on every call.

pub mod applications;
pub mod model;
pub mod schemes;
mod seed;
pub mod users;

pub use applications::{ApplicationRecords, ApplicationStats, APPLICATIONS_KEY};
pub use model::{
    Application, ApplicationStatus, Scheme, SchemeStatus, StatusChange, User, UserStatus,
};
pub use schemes::{SchemeDraft, SchemeFilter, SchemeRecords, SchemeUpdate, SCHEMES_KEY};
pub use users::{UserRecords, USERS_KEY};
