//! Cloud account authentication
//!
//! Sign-up, sign-in and sign-out against Supabase Auth, with the session
//! kept in `session.json` next to the settings.

pub mod session;
pub mod supabase;

pub use session::{Session, SessionStore, SessionUser};
pub use supabase::{SignUpOutcome, SupabaseAuth};
