pub mod jwt;
pub mod password;

pub use jwt::{authenticate, issue_token, validate_token, Claims};
pub use password::{hash_password, verify_password};
