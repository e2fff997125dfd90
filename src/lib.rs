//! # Gatehouse
//!
//! `gatehouse` is a small server-rendered web application: username/password
//! registration, login, a session-gated user page and a couple of public pages.
//!
//! ## Authentication
//!
//! Passwords are hashed with `bcrypt` (random salt per hash, configurable cost).
//! A successful login stores a [`auth::SessionUser`] in a server-side session;
//! the password hash never leaves the store layer. The session id travels in a
//! signed cookie handled by `tower-sessions`.
//!
//! Login failures for an unknown username and for a wrong password produce the
//! same status and message, so the form cannot be used to enumerate users.
//!
//! ## Route guards
//!
//! - `/login` and `/register` are only reachable without a session user.
//! - `/user` and `/logout` require one; anything else is redirected to `/login`.
//!
//! ## Storage
//!
//! Users are kept in one logical database behind the [`store::UserStore`]
//! trait, backed by Postgres in production and by a process-local store for
//! tests and local runs.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
