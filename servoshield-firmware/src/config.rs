//! Board configuration
//!
//! Constants generated by build.rs from shield.toml.

use servoshield_core::{BusAddresses, ShieldConfig};

include!(concat!(env!("OUT_DIR"), "/shield_config.rs"));
