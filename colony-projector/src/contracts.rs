use std::collections::HashMap;

use ethers::abi::{Event, Function, HumanReadableParser};
use ethers::types::{Address, Filter, H256, U256};

use crate::hashes::Hashes;
use crate::ingester::DecodeError;

pub type ContractEventTopic = H256;

/// Emitted by the ColonyNetwork contract whenever a colony is deployed.
pub const COLONY_ADDED_EVENT_ABI: &str =
    "event ColonyAdded(uint256 indexed colonyId, address indexed colonyAddress, address token)";

/// Emitted by a colony whenever a domain is created, including the root domain.
pub const DOMAIN_ADDED_EVENT_ABI: &str = "event DomainAdded(uint256 domainId)";

/// Events that are named in the topic registry but carry no projection consequence yet.
pub const NAMED_EVENT_ABIS: [&str; 5] = [
    "event ColonyInitialised(address colonyNetwork, address token)",
    "event TaskAdded(uint256 taskId)",
    "event TaskCompleted(uint256 indexed taskId)",
    "event TaskFinalized(uint256 indexed taskId)",
    "event PaymentAdded(uint256 paymentId)",
];

/// Known shapes of the colony call that creates a domain.
pub const ADD_DOMAIN_FUNCTION_ABIS: [&str; 3] = [
    "function addDomain(uint256 _parentDomainId)",
    "function addDomain(uint256 _permissionDomainId, uint256 _childSkillIndex, uint256 _parentDomainId)",
    "function addDomain(uint256 _permissionDomainId, uint256 _childSkillIndex, uint256 _parentDomainId, string _metadata)",
];

const PARENT_DOMAIN_ID_PARAM: &str = "_parentDomainId";

#[derive(Debug, Clone)]
pub struct ContractEvent {
    pub value: Event,
}

impl ContractEvent {
    pub fn new(abi: &str) -> Self {
        Self {
            value: parse_event(abi),
        }
    }

    pub fn name(&self) -> &str {
        &self.value.name
    }

    pub fn topic(&self) -> ContractEventTopic {
        self.value.signature()
    }
}

// Only ever called with the ABI constants above
fn parse_event(abi: &str) -> Event {
    HumanReadableParser::parse_event(abi)
        .unwrap_or_else(|error| panic!("invalid event ABI {abi}: {error}"))
}

fn parse_function(abi: &str) -> Function {
    HumanReadableParser::parse_function(abi)
        .unwrap_or_else(|error| panic!("invalid function ABI {abi}: {error}"))
}

/// The event interface of the Colony contract family.
#[derive(Debug, Clone)]
pub struct ColonyNetworkContract {
    pub address: Address,
    events: Vec<ContractEvent>,
    add_domain_functions: Vec<Function>,
}

impl ColonyNetworkContract {
    pub fn new(address: Address) -> Self {
        let events = [COLONY_ADDED_EVENT_ABI, DOMAIN_ADDED_EVENT_ABI]
            .into_iter()
            .chain(NAMED_EVENT_ABIS)
            .map(ContractEvent::new)
            .collect();

        Self {
            address,
            events,
            add_domain_functions: ADD_DOMAIN_FUNCTION_ABIS.into_iter().map(parse_function).collect(),
        }
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn group_events_by_topics(&self) -> HashMap<ContractEventTopic, ContractEvent> {
        self.events.iter().map(|event| (event.topic(), event.clone())).collect()
    }

    pub fn colony_added_event(&self) -> ContractEvent {
        ContractEvent::new(COLONY_ADDED_EVENT_ABI)
    }

    pub fn colony_added_filter(&self, from_block: u64, to_block: u64) -> Filter {
        Filter::new()
            .address(self.address)
            .topic0(self.colony_added_event().topic())
            .from_block(from_block)
            .to_block(to_block)
    }

    /// Every log the given colonies emitted in a single block.
    pub fn block_filter(&self, block_number: u64, colony_addresses: Vec<Address>) -> Filter {
        Filter::new()
            .address(colony_addresses)
            .from_block(block_number)
            .to_block(block_number)
    }

    /// Extracts the parent domain id from the call data of a domain-creating transaction.
    pub fn decode_parent_domain_id(&self, input: &[u8]) -> Result<u64, DecodeError> {
        if input.len() < 4 {
            return Err(DecodeError::UnrecognizedCall(Hashes::bytes_to_string(input)));
        }
        let (selector, arguments) = input.split_at(4);
        let unrecognized_call = || DecodeError::UnrecognizedCall(Hashes::bytes_to_string(selector));

        let function = self
            .add_domain_functions
            .iter()
            .find(|f| f.short_signature() == selector)
            .ok_or_else(unrecognized_call)?;

        let position = function
            .inputs
            .iter()
            .position(|param| param.name == PARENT_DOMAIN_ID_PARAM)
            .ok_or_else(unrecognized_call)?;

        let tokens = function
            .decode_input(arguments)
            .map_err(|error| DecodeError::Abi(error.to_string()))?;

        tokens
            .into_iter()
            .nth(position)
            .and_then(|token| token.into_uint())
            .filter(|parent| *parent <= U256::from(u64::MAX))
            .map(|parent| parent.as_u64())
            .ok_or_else(|| DecodeError::Abi(format!("{PARENT_DOMAIN_ID_PARAM} is not a uint")))
    }
}
