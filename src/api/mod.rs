//! KhwopaCoder HTTP API client and types.
//!
//! **Feature flag:** `api` (required to use this module)
//!
//! ## Available Endpoints
//!
//! | Endpoint | Description |
//! |----------|-------------|
//! | `POST /auth/login` | Sign in, returns a bearer token |
//! | `POST /auth/register` | Create an account |
//! | `/auth/me` | The signed-in user |
//! | `/challenges` | List challenges |
//! | `/challenges/{id}` | Get challenge by ID |
//! | `/challenges/random` | Random challenge, optionally by difficulty |
//! | `POST /submissions` | Submit code for judging |
//! | `/submissions` | Filter submissions |
//! | `/submissions/me` | The signed-in user's submissions |
//! | `/submissions/{id}` | Get submission by ID |
//! | `/submissions/challenge/{id}` | Submissions for a challenge |
//! | `/leaderboard` | Overall leaderboard |
//! | `/leaderboard/batch/{batch}` | Leaderboard of one batch |
//! | `/leaderboard/top` | Top performers |
//! | `/leaderboard/me` | The signed-in user's rank |
//! | `/users`, `/users/{id}` | User profiles |
//! | `PUT /users/me` | Update the signed-in profile |
//! | `/users/me/settings` | Read or update (`PUT`) settings |
//! | `/badges`, `/badges/me` | Badges, with progress for `/me` |
//! | `/activities/recent`, `/activities/me` | Activity feeds |

pub mod client;
pub mod types;

pub use client::Client;
