use derive_more::Display;
use ethers::abi::{LogParam, RawLog};
use ethers::types::{Address, H256, U256};

use crate::contracts::ContractEventTopic;
use crate::ingester::DecodeError;
use crate::topics::TopicRegistry;

/// A log interpreted through the topic registry.
///
/// Only the kinds that carry a projection consequence are decoded field by
/// field. Registered kinds without a consequence keep just their name, and
/// topics outside the contract interface are kept as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ColonyEvent {
    #[display("ColonyAdded({colony_id}, {colony_address:?})")]
    ColonyAdded {
        colony_id: U256,
        colony_address: Address,
        token: Address,
    },
    #[display("DomainAdded({domain_id})")]
    DomainAdded { domain_id: u64 },
    #[display("{name}")]
    Other { name: String },
    #[display("Unknown({_0:?})")]
    Unknown(ContractEventTopic),
}

impl ColonyEvent {
    pub fn decode(
        topics: &[H256],
        data: &[u8],
        topic_registry: &TopicRegistry,
    ) -> Result<Self, DecodeError> {
        let topic = topics.first().ok_or(DecodeError::MissingTopic)?;

        let Some(contract_event) = topic_registry.get(topic) else {
            return Ok(ColonyEvent::Unknown(*topic));
        };

        let parse_params = || {
            contract_event
                .value
                .parse_log(RawLog {
                    topics: topics.to_vec(),
                    data: data.to_vec(),
                })
                .map(|log| log.params)
                .map_err(|error| DecodeError::Abi(error.to_string()))
        };

        match contract_event.name() {
            "ColonyAdded" => {
                let params = parse_params()?;

                Ok(ColonyEvent::ColonyAdded {
                    colony_id: get_uint(&params, "colonyId")?,
                    colony_address: get_address(&params, "colonyAddress")?,
                    token: get_address(&params, "token")?,
                })
            }
            "DomainAdded" => {
                let params = parse_params()?;
                let domain_id = get_uint(&params, "domainId")?;

                if domain_id > U256::from(i64::MAX) {
                    return Err(DecodeError::Abi(format!("domainId {domain_id} out of range")));
                }

                Ok(ColonyEvent::DomainAdded {
                    domain_id: domain_id.as_u64(),
                })
            }
            name => Ok(ColonyEvent::Other {
                name: name.to_string(),
            }),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ColonyEvent::Unknown(_))
    }
}

fn get_param<'a>(params: &'a [LogParam], name: &str) -> Result<&'a LogParam, DecodeError> {
    params
        .iter()
        .find(|param| param.name == name)
        .ok_or_else(|| DecodeError::Abi(format!("missing param {name}")))
}

fn get_uint(params: &[LogParam], name: &str) -> Result<U256, DecodeError> {
    get_param(params, name)?
        .value
        .clone()
        .into_uint()
        .ok_or_else(|| DecodeError::Abi(format!("{name} is not a uint")))
}

fn get_address(params: &[LogParam], name: &str) -> Result<Address, DecodeError> {
    get_param(params, name)?
        .value
        .clone()
        .into_address()
        .ok_or_else(|| DecodeError::Abi(format!("{name} is not an address")))
}
