//! gridflow-security
//! -----------------
//! Security-context and shared-configuration hardening layer for the
//! gridflow distributed data-processing runtime. Three concerns live here:
//! impersonating a configured operating identity when calling into the
//! secured storage/cluster layer, propagating delegation credentials
//! between identities without re-authentication, and retrofitting
//! thread-safety onto storage-client configurations that are shared and
//! mutated across many worker threads.
//!
//! The storage/cluster protocol itself, the coordination-service client,
//! and all presentation concerns live elsewhere; this crate only hands them
//! identities and hardened configurations.

pub mod config;
pub mod error;
pub mod identity;
pub mod runtime;
