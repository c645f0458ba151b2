// handlers/public/mod.rs - Handlers that need no credentials

pub mod donation; // GET /donation/
pub mod lookup; // GET /type/, GET /status/
pub mod organization; // GET /organization/, GET /organization/:id
pub mod requirement; // GET /requirement/
pub mod system; // GET /, GET /health
pub mod user; // POST /user/register, POST /user/login
