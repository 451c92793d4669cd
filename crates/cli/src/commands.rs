//! Subcommands of `protocol-cli`. Each returns the text to print.

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use protocol::{
    decode_key_tuple, decode_record_hex, word_from_hex, Address, PackedCounter, ResourceId,
    ResourceType, Schema,
};
use tracing::debug;

use crate::calldata::{register_system_call_data, System};

/// Inspect and build table record encodings.
#[derive(Parser, Debug)]
#[command(name = "protocol-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a schema word
    Schema { hex: String },

    /// Encode Solidity type names into a schema word
    EncodeSchema {
        #[arg(required = true)]
        types: Vec<String>,
    },

    /// Decode a packed counter word
    Counter { hex: String },

    /// Decode a record blob (static ‖ counter ‖ dynamic) against a value schema word
    DecodeRecord {
        #[arg(long)]
        schema: String,
        data: String,
    },

    /// Decode a key tuple (one hex word per key) against a key schema word
    DecodeKey {
        #[arg(long)]
        schema: String,
        words: Vec<String>,
    },

    /// Build a resource id
    ResourceId {
        #[arg(long = "type")]
        resource_type: ResourceType,
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(long)]
        name: String,
    },

    /// Print registerSystem call data for a deployed system
    RegisterSystem {
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Address,
        #[arg(long)]
        open_access: bool,
    },
}

pub fn run(command: Command) -> Result<String> {
    debug!(?command, "running");
    let mut out = String::new();

    match command {
        Command::Schema { hex } => {
            let schema = Schema::from_hex(&hex)?;
            writeln!(out, "schema:        {schema}")?;
            writeln!(out, "static fields: {}", schema.static_count())?;
            writeln!(out, "dynamic fields: {}", schema.dynamic_count())?;
            writeln!(out, "static length: {}", schema.static_data_length())?;
        }
        Command::EncodeSchema { types } => {
            let schema = Schema::from_abi_types(types.as_slice())?;
            writeln!(out, "{}", schema.to_hex())?;
        }
        Command::Counter { hex } => {
            let counter = PackedCounter::from_hex(&hex)?;
            for (index, length) in counter.lengths().iter().enumerate() {
                let offset = counter.offset_of_field(index)?;
                writeln!(out, "field {index}: length {length} offset {offset}")?;
            }
            writeln!(out, "total: {}", counter.total_length())?;
        }
        Command::DecodeRecord { schema, data } => {
            let schema = Schema::from_hex(&schema)?;
            let values = decode_record_hex(&schema, &data)?;
            for ((index, ty), value) in schema.fields().iter().enumerate().zip(&values) {
                writeln!(out, "{index} {ty}: {value}")?;
            }
        }
        Command::DecodeKey { schema, words } => {
            let schema = Schema::from_hex(&schema)?;
            let tuple = words
                .iter()
                .map(|w| word_from_hex(w).with_context(|| format!("key word {w}")))
                .collect::<Result<Vec<_>>>()?;
            let values = decode_key_tuple(&schema, &tuple)?;
            for ((index, ty), value) in schema.fields().iter().enumerate().zip(&values) {
                writeln!(out, "{index} {ty}: {value}")?;
            }
        }
        Command::ResourceId {
            resource_type,
            namespace,
            name,
        } => {
            let id = ResourceId::new(resource_type, &namespace, &name);
            writeln!(out, "{}", id.to_hex())?;
        }
        Command::RegisterSystem {
            namespace,
            name,
            address,
            open_access,
        } => {
            let addresses = HashMap::from([(name.clone(), address)]);
            let system = System {
                name: name.clone(),
                open_access,
            };
            let call = register_system_call_data(&addresses, &namespace, &name, &system)?;
            writeln!(out, "{call}")?;
        }
    }

    Ok(out)
}
