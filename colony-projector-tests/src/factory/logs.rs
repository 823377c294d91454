use std::str::FromStr;

use colony_projector::contracts::ADD_DOMAIN_FUNCTION_ABIS;
use colony_projector::U256;
use ethers::abi::{encode, HumanReadableParser, Token};
use ethers::types::{Address, Bytes, Log, Transaction, H256};
use ethers::utils::keccak256;
use rand::Rng;

pub const COLONY_NETWORK_ADDRESS: &str = "0x5346D0f80e2816FaD329F2c140c870ffc3c3E2Ef";

pub fn colony_network_address() -> Address {
    Address::from_str(COLONY_NETWORK_ADDRESS).unwrap()
}

/// A fresh colony address, so tests sharing a database never collide.
pub fn random_colony_address() -> Address {
    Address::from(rand::random::<[u8; 20]>())
}

pub fn random_transaction_hash() -> H256 {
    H256::from(rand::random::<[u8; 32]>())
}

pub fn topic(signature: &str) -> H256 {
    H256::from(keccak256(signature))
}

pub fn colony_added_log(colony_id: u64, colony_address: Address, block_number: u64) -> Log {
    Log {
        address: colony_network_address(),
        topics: vec![
            topic("ColonyAdded(uint256,address,address)"),
            H256::from_low_u64_be(colony_id),
            H256::from(colony_address),
        ],
        data: Bytes::from(encode(&[Token::Address(Address::repeat_byte(0x70))])),
        ..log_at(block_number, random_transaction_hash(), 0)
    }
}

pub fn domain_added_log(
    colony_address: Address,
    domain_id: u64,
    block_number: u64,
    transaction_hash: H256,
) -> Log {
    Log {
        address: colony_address,
        topics: vec![topic("DomainAdded(uint256)")],
        data: Bytes::from(encode(&[Token::Uint(U256::from(domain_id))])),
        ..log_at(block_number, transaction_hash, 1)
    }
}

pub fn unknown_log(colony_address: Address, block_number: u64) -> Log {
    Log {
        address: colony_address,
        topics: vec![topic("SomethingUnheardOf(uint256)")],
        data: Bytes::from(encode(&[Token::Uint(U256::from(7))])),
        ..log_at(block_number, random_transaction_hash(), 0)
    }
}

pub fn named_log(colony_address: Address, block_number: u64) -> Log {
    Log {
        address: colony_address,
        topics: vec![topic("TaskAdded(uint256)")],
        data: Bytes::from(encode(&[Token::Uint(U256::from(4))])),
        ..log_at(block_number, random_transaction_hash(), 0)
    }
}

/// The `addDomain(permission, childSkillIndex, parent)` call behind a DomainAdded log.
pub fn add_domain_transaction(
    transaction_hash: H256,
    block_number: u64,
    colony_address: Address,
    eth_parent_domain_id: u64,
) -> Transaction {
    let function = HumanReadableParser::parse_function(ADD_DOMAIN_FUNCTION_ABIS[1]).unwrap();
    let input = function
        .encode_input(&[
            Token::Uint(U256::from(1)),
            Token::Uint(U256::from(rand::thread_rng().gen_range(0..10_u64))),
            Token::Uint(U256::from(eth_parent_domain_id)),
        ])
        .unwrap();

    Transaction {
        hash: transaction_hash,
        block_number: Some(block_number.into()),
        to: Some(colony_address),
        input: Bytes::from(input),
        ..Default::default()
    }
}

fn log_at(block_number: u64, transaction_hash: H256, log_index: u64) -> Log {
    Log {
        block_number: Some(block_number.into()),
        block_hash: Some(random_transaction_hash()),
        transaction_hash: Some(transaction_hash),
        transaction_index: Some(0.into()),
        log_index: Some(log_index.into()),
        removed: Some(false),
        ..Default::default()
    }
}
