//! Outbound report delivery.
//!
//! [`Mailer`] is the async trait the report job sends through.
//! [`SesMailer`] delivers via Amazon SES; [`LogMailer`] only logs, for dry runs.

mod client;
mod dry_run;
mod ses;

pub use client::{Email, Mailer};
pub use dry_run::LogMailer;
pub use ses::SesMailer;
