pub mod alert;
pub mod temple;
pub mod time_slot;
pub mod token;
pub mod user;

pub use alert::{Alert, NewAlert};
pub use temple::Temple;
pub use time_slot::{TimeSlot, TimeSlotError};
pub use token::{NewToken, Token};
pub use user::{LoginRequest, PublicUser, RegisterRequest, Role, User, UserRow};
