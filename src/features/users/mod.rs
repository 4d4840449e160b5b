//! User accounts: registration, login, and the public credit-score listing.
//!
//! Credentials are stored as argon2 hashes; the raw password never touches
//! the database.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/users/register` | No | Register a new user |
//! | POST | `/api/users/login` | No | Verify credentials, returns userid |
//! | GET | `/api/users` | No | List users sorted by credit score |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
