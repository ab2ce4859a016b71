// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Transfer orchestration
//!
//! [`BridgeService`] runs the read-only precheck and the approve, quote and
//! send sequence of a cross-chain transfer against a [`ChainGateway`](crate::traits::ChainGateway).

mod request;
mod service;

pub use request::{PrecheckReport, SupportedDestination, TransferOutcome, TransferRequest};
pub use service::BridgeService;
