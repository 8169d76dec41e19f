// src/lib.rs

//! app-install
//!
//! Builds and maintains a cache of the desktop applications available in
//! package repositories, so software centers can list applications that are
//! not installed yet.
//!
//! # Architecture
//!
//! - Database-first: applications and translations live in SQLite
//! - Sources: yum and pisi repositories behind one [`repository::PackageSource`] trait
//! - Packages: RPM, tarball and Pisi archives unpacked into a scratch root
//! - Desktop files: parsed into application rows, icons copied into a hicolor tree

pub mod builder;
pub mod compression;
pub mod db;
pub mod desktop;
mod error;
pub mod icons;
pub mod packages;
pub mod process;
pub mod repository;

pub use error::{Error, Result};
