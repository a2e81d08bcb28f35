//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PostalCode`] | Normalized lookup key (CEP) |
//! | [`Address`] | Winning payload, in the answering provider's schema |
//! | [`ViaCepAddress`] | ViaCEP response body |
//! | [`BrasilApiAddress`] | BrasilAPI response body |

mod address;
mod postal_code;

pub use address::{Address, BrasilApiAddress, ViaCepAddress};
pub use postal_code::PostalCode;
