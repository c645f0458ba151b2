pub mod ownership;
pub mod password;
pub mod token;

pub use ownership::{ensure_owner, owned_organization};
pub use password::{burn_verification, hash_password, verify_password, PasswordError};
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer};
