// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::time::Duration;

use serde::{Deserialize, Serialize};

use ledger_ada_core::DerivationPath;
use ledger_ada_device::Network;

use crate::deriver::DerivationScheme;

/// Signing session configuration
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Network identifier passed to the signing device
    pub network_id: u8,

    /// Network protocol magic passed to the signing device
    pub protocol_magic: u32,

    /// Scheme for non-hardened child derivation
    pub scheme: DerivationScheme,

    /// Staking key path for change outputs and certificates, defaults
    /// to the staking key of the owning account when unset
    pub staking_path: Option<DerivationPath>,

    /// Timeout for derivation requests (seconds)
    pub request_timeout_s: u64,

    /// Timeout for user approval of a transaction (seconds)
    pub user_timeout_s: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network_id: Network::MAINNET.network_id,
            protocol_magic: Network::MAINNET.protocol_magic,
            scheme: DerivationScheme::V2,
            staking_path: None,
            request_timeout_s: 2,
            user_timeout_s: 30,
        }
    }
}

impl SessionConfig {
    pub fn network(&self) -> Network {
        Network {
            network_id: self.network_id,
            protocol_magic: self.protocol_magic,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s)
    }

    pub fn user_timeout(&self) -> Duration {
        Duration::from_secs(self.user_timeout_s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_config() {
        let c: SessionConfig = serde_json::from_str(
            r#"{ "network_id": 0, "protocol_magic": 1097911063, "staking_path": "m/1852'/1815'/3'/2/0" }"#,
        )
        .unwrap();

        assert_eq!(c.network(), Network::TESTNET);
        assert_eq!(c.scheme, DerivationScheme::V2);
        assert_eq!(
            c.staking_path.as_ref().map(|p| p.to_string()),
            Some("m/1852'/1815'/3'/2/0".to_string())
        );
        assert_eq!(c.user_timeout(), Duration::from_secs(30));
    }
}
