pub mod login;

pub use login::{LoginCommand, LoginError, LoginResponse};
