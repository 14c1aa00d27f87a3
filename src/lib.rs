//! # Sesamo (Authentication Bootstrap)
//!
//! `sesamo` bridges a platform-level identity (who logged in at the
//! reverse proxy) and an application-level session for managed-software
//! clients. A platform-authenticated user hits `GET /uauth`; the server
//! classifies the identity against the admin and support ACL groups and,
//! on a positive classification, mints a short-lived session token handed
//! back through a secure cookie.
//!
//! ## Classification
//!
//! Membership is checked in a fixed order: admins first, then support
//! users. A principal present in both groups receives the admin level.
//! A principal in neither group is rejected with the same response as a
//! request without any identity, so group membership is never leaked.
//!
//! ## ACL Groups
//!
//! Groups are layered: statically configured members (CLI/env) extended
//! by rows in the `acl_group_members` table. Support membership can also
//! be resolved against an optional remote group service.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
