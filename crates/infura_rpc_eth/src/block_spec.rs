use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantity::U64;

/// A symbolic reference to a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// The most recently mined block.
    Latest,
    /// The genesis block.
    Earliest,
    /// The block currently being assembled.
    Pending,
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockTag::Latest => "latest",
            BlockTag::Earliest => "earliest",
            BlockTag::Pending => "pending",
        })
    }
}

/// A block number or symbolic tag, the block parameter of methods such as
/// `eth_getBalance` and `eth_getCode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BlockSpec {
    /// An explicit block number, hex-encoded on the wire.
    Number(U64),
    /// A symbolic tag.
    Tag(BlockTag),
}

impl BlockSpec {
    /// Constructs an instance for the provided block number.
    pub fn number(block_number: u64) -> Self {
        BlockSpec::Number(U64(block_number))
    }

    /// Constructs an instance for the latest mined block.
    pub fn latest() -> Self {
        BlockSpec::Tag(BlockTag::Latest)
    }

    /// Constructs an instance for the genesis block.
    pub fn earliest() -> Self {
        BlockSpec::Tag(BlockTag::Earliest)
    }

    /// Constructs an instance for the pending block.
    pub fn pending() -> Self {
        BlockSpec::Tag(BlockTag::Pending)
    }
}

impl From<u64> for BlockSpec {
    fn from(block_number: u64) -> Self {
        BlockSpec::number(block_number)
    }
}

impl fmt::Display for BlockSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSpec::Number(block_number) => write!(f, "{:#x}", block_number.0),
            BlockSpec::Tag(tag) => tag.fmt(f),
        }
    }
}
