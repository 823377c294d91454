use std::collections::HashMap;

use crate::contracts::{ColonyNetworkContract, ContractEvent, ContractEventTopic};

/// Maps event signature topics to the contract events they identify.
///
/// Built once at startup and never mutated afterwards. Lookups for topics
/// outside the contract interface return `None` rather than failing.
#[derive(Debug, Clone)]
pub struct TopicRegistry {
    events_by_topic: HashMap<ContractEventTopic, ContractEvent>,
}

impl TopicRegistry {
    pub fn new(contract: &ColonyNetworkContract) -> Self {
        Self {
            events_by_topic: contract.group_events_by_topics(),
        }
    }

    pub fn get(&self, topic: &ContractEventTopic) -> Option<&ContractEvent> {
        self.events_by_topic.get(topic)
    }

    pub fn get_name(&self, topic: &ContractEventTopic) -> Option<&str> {
        self.get(topic).map(|event| event.name())
    }
}
