//! Algorithm selection (§4.1, §9).
//!
//! The C original keeps the active variant in a process-wide `enum
//! dag_algo` global read by the cache and seed builders, and a pair of
//! process-wide threshold globals (`etchash_epoch`, `ubqhash_epoch`) read
//! by the coin-mapping table. This crate threads both through explicitly:
//! `Algorithm` is passed to every builder that needs it, and `AlgoConfig`
//! carries the thresholds as an ordinary value instead of hidden state.

use serde::{Deserialize, Serialize};

/// Epoch length in blocks for algorithms that count epochs directly
/// (ethash, ubqhash). ETChash blocks are counted in `2 * EPOCH_LENGTH`
/// chunks (§4.1).
pub const EPOCH_LENGTH: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Ethash,
    Etchash,
    Ubqhash,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Ethash => "ethash",
            Algorithm::Etchash => "etchash",
            Algorithm::Ubqhash => "ubqhash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ethash" => Some(Algorithm::Ethash),
            "etchash" => Some(Algorithm::Etchash),
            "ubqhash" => Some(Algorithm::Ubqhash),
            _ => None,
        }
    }
}

/// Returns the epoch for a raw block number under the given algorithm.
pub fn epoch_of(block: u64, algo: Algorithm) -> u64 {
    match algo {
        Algorithm::Ethash | Algorithm::Ubqhash => block / EPOCH_LENGTH,
        Algorithm::Etchash => block / (EPOCH_LENGTH * 2),
    }
}

/// Caller-overridable coin-selection thresholds (§5, §9). Replaces the
/// original's `etchash_epoch`/`ubqhash_epoch` process globals with an
/// explicit, cloneable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgoConfig {
    pub etchash_epoch: u64,
    pub ubqhash_epoch: u64,
}

impl Default for AlgoConfig {
    fn default() -> Self {
        AlgoConfig {
            etchash_epoch: 390,
            ubqhash_epoch: 22,
        }
    }
}

impl AlgoConfig {
    /// Maps a coin tag and raw epoch number to (algorithm, effective
    /// epoch). Exactly `{"etc" -> etc, "ubq" -> ubq, _ -> eth}` (§6).
    ///
    /// `etc` below the threshold stays on ethash with the epoch
    /// unchanged; at or above the threshold it switches to etchash and
    /// halves the epoch. `ubq` below its threshold stays on ethash;
    /// at or above it switches to ubqhash with the epoch unchanged (the
    /// original source does not rescale ubqhash's epoch).
    pub fn map_coin(&self, coin: &str, epoch: u64) -> (Algorithm, u64) {
        match coin {
            "etc" => {
                if epoch < self.etchash_epoch {
                    (Algorithm::Ethash, epoch)
                } else {
                    (Algorithm::Etchash, epoch / 2)
                }
            }
            "ubq" => {
                if epoch < self.ubqhash_epoch {
                    (Algorithm::Ethash, epoch)
                } else {
                    (Algorithm::Ubqhash, epoch)
                }
            }
            _ => (Algorithm::Ethash, epoch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etc_switches_at_threshold() {
        let cfg = AlgoConfig::default();
        assert_eq!(cfg.map_coin("etc", 389), (Algorithm::Ethash, 389));
        assert_eq!(cfg.map_coin("etc", 390), (Algorithm::Etchash, 195));
    }

    #[test]
    fn ubq_switches_at_threshold_without_rescaling() {
        let cfg = AlgoConfig::default();
        assert_eq!(cfg.map_coin("ubq", 21), (Algorithm::Ethash, 21));
        assert_eq!(cfg.map_coin("ubq", 22), (Algorithm::Ubqhash, 22));
    }

    #[test]
    fn unknown_coin_defaults_to_ethash() {
        let cfg = AlgoConfig::default();
        assert_eq!(cfg.map_coin("eth", 500), (Algorithm::Ethash, 500));
        assert_eq!(cfg.map_coin("clo", 12345), (Algorithm::Ethash, 12345));
    }

    #[test]
    fn epoch_of_divides_by_algorithm_specific_length() {
        assert_eq!(epoch_of(30_000 * 5, Algorithm::Ethash), 5);
        assert_eq!(epoch_of(60_000 * 5, Algorithm::Etchash), 5);
        assert_eq!(epoch_of(30_000 * 5, Algorithm::Ubqhash), 5);
    }

    #[test]
    fn thresholds_are_overridable() {
        let cfg = AlgoConfig {
            etchash_epoch: 10,
            ubqhash_epoch: 5,
        };
        assert_eq!(cfg.map_coin("etc", 9), (Algorithm::Ethash, 9));
        assert_eq!(cfg.map_coin("etc", 10), (Algorithm::Etchash, 5));
    }
}
