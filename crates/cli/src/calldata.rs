//! Call data for registering systems.
//!
//! Only the `{function, arguments}` pair is produced here; submitting it is
//! left to whatever client holds the signer.

use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};
use protocol::{AbiValue, Address, ResourceId, ResourceType};

/// A contract function name and its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallData {
    pub func: String,
    pub args: Vec<AbiValue>,
}

impl fmt::Display for CallData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.func)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// A system as declared in a project's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    /// On-chain name, used for the resource id.
    pub name: String,
    pub open_access: bool,
}

/// Builds `registerSystem(bytes32 systemId, address system, bool openAccess)`.
///
/// `system_addresses` maps configuration keys (`system_key`) to deployed
/// contract addresses.
pub fn register_system_call_data(
    system_addresses: &HashMap<String, Address>,
    namespace: &str,
    system_key: &str,
    system: &System,
) -> Result<CallData> {
    let address = system_addresses
        .get(system_key)
        .with_context(|| format!("no deployed address for system {system_key:?}"))?;
    let system_id = ResourceId::new(ResourceType::System, namespace, &system.name);

    Ok(CallData {
        func: "registerSystem".to_string(),
        args: vec![
            AbiValue::FixedBytes(system_id.to_word().to_vec()),
            AbiValue::Address(*address),
            AbiValue::Bool(system.open_access),
        ],
    })
}
