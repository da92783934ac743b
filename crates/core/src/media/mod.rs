//! Media CDN provider.
//!
//! Uploads are signed with the account's API secret; listings use HTTP basic
//! auth against the admin API. Every stored asset lands in the configured
//! folder, which doubles as the listing prefix.

mod client;
mod signature;

pub use client::MediaProvider;

/// Public id the provider stores an upload under.
///
/// The first `.jpg` in the client filename is removed, so `a.jpg` becomes `a`.
/// Other extensions are kept as part of the id.
#[must_use]
pub fn public_id_for(filename: &str) -> String {
    filename.replacen(".jpg", "", 1)
}
