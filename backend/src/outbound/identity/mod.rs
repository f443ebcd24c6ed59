//! Identity provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `IdentityProvider`
//! port backed by an OpenID Connect userinfo endpoint.

mod dto;
mod http_provider;

pub use http_provider::UserinfoIdentityProvider;
