// handlers/protected/mod.rs - Handlers behind the bearer-token middleware
//
// Ownership is checked per handler: organizations against `created_by`, requirements one
// hop further through their parent organization.

pub mod organization; // POST /organization/, PUT /organization/:id
pub mod requirement; // POST /requirement/, PUT|DELETE /requirement/:id
pub mod user; // GET /user/me
