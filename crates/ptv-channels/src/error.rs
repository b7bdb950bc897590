//! Errors raised by service channel translators
//!
//! Copyright (c) 2025 PTV Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;
use uuid::Uuid;

/// Failures detected while fixing up a materialized channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The address already belongs to another channel root
    #[error("Address {address} is owned by {owner}, not by channel root {channel_root}")]
    AddressOwnedElsewhere {
        address: Uuid,
        owner: Uuid,
        channel_root: Uuid,
    },

    /// The channel reached propagation without an identity
    #[error("Service channel has no identity to propagate to its children")]
    MissingIdentity,
}
