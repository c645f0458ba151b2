// handlers/mod.rs - Two-tier handler layout
//
// Public handlers run without credentials. Protected handlers sit behind the bearer-token
// middleware and receive the resolved caller as `Extension<AuthUser>`.
pub mod protected;
pub mod public;
