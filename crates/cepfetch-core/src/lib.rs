//! # cepfetch Core
//!
//! Postal-code (CEP) lookups answered by whichever upstream provider responds
//! first.
//!
//! ## Overview
//!
//! One query is sent to every registered provider at the same time. The first
//! outcome to arrive, success or failure, decides the answer; if nothing
//! arrives before the deadline the lookup times out.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (ViaCEP, BrasilAPI) |
//! | [`coordinator`] | Source registry, builder and lookup entry point |
//! | [`data_source`] | Address source trait, outcomes and lookup errors |
//! | [`dispatch`] | Concurrent fan-out of one query |
//! | [`domain`] | Postal code and address payloads |
//! | [`error`] | Validation and race errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`race`] | First-arrival race with deadline |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cepfetch_core::RaceCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = RaceCoordinator::default();
//!
//!     let (provider, address) = coordinator.lookup("01001000").await?;
//!     println!("{provider}: {}, {}", address.street(), address.city());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ HTTP adapter    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ RaceCoordinator │────▶│ Race (deadline)  │
//! └────────┬────────┘     └────────▲─────────┘
//!          │                       │ first outcome
//!          ▼                       │
//! ┌─────────────────┐     ┌────────┴─────────┐
//! │ dispatch        │────▶│ outcome channel  │
//! └────────┬────────┘     └──────────────────┘
//!          │ one task per source
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ AddressSource   │────▶│ HTTP Client      │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use cepfetch_core::RaceError;
//!
//! fn status_for(error: &RaceError) -> u16 {
//!     match error {
//!         RaceError::MissingParameter => 400,
//!         RaceError::Lookup { .. } => 500,
//!         RaceError::Timeout { .. } => 504,
//!     }
//! }
//! ```

pub mod adapters;
pub mod coordinator;
pub mod data_source;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod race;
pub mod source;

pub use adapters::{BrasilApiSource, ViaCepSource, BRASILAPI_BASE_URL, VIACEP_BASE_URL};

pub use coordinator::{RaceCoordinator, RaceCoordinatorBuilder};

pub use data_source::{
    AddressSource, LookupError, LookupErrorKind, LookupFuture, ProviderOutcome,
};

pub use dispatch::{dispatch, Dispatch};

pub use domain::{Address, BrasilApiAddress, PostalCode, ViaCepAddress};

pub use error::{RaceError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use race::{race, CancellationPolicy, Race, RaceOutcome, DEFAULT_DEADLINE_MS};

pub use source::ProviderId;
