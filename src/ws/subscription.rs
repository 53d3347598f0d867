#![expect(
    clippy::module_name_repetitions,
    reason = "Subscription types deliberately include the module name for clarity"
)]

use serde::{Deserialize, Serialize};

/// Control message declaring interest in a topic.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Whether the client subscribes or unsubscribes
    #[serde(rename = "type")]
    pub action: SubscriptionAction,
    /// Topic name
    pub topic: String,
}

impl ControlMessage {
    #[must_use]
    pub fn subscribe(topic: &str) -> Self {
        Self {
            action: SubscriptionAction::Subscribe,
            topic: topic.to_owned(),
        }
    }

    #[must_use]
    pub fn unsubscribe(topic: &str) -> Self {
        Self {
            action: SubscriptionAction::Unsubscribe,
            topic: topic.to_owned(),
        }
    }
}

/// Subscription action type.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionAction {
    /// Subscribe to a topic
    Subscribe,
    /// Unsubscribe from a topic
    Unsubscribe,
}

/// The set of topics the client wants, in first-subscribed order.
///
/// This is the set replayed after every successful (re)connect, so it records intent even
/// while the connection is down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopicSet {
    topics: Vec<String>,
}

impl TopicSet {
    /// Build a set from initial topics, dropping duplicates and keeping first occurrences.
    #[must_use]
    pub fn new(initial: &[String]) -> Self {
        let mut set = Self::default();
        for topic in initial {
            set.insert(topic);
        }
        set
    }

    /// Add a topic. Returns `false` if it was already present.
    pub fn insert(&mut self, topic: &str) -> bool {
        if self.contains(topic) {
            return false;
        }
        self.topics.push(topic.to_owned());
        true
    }

    /// Remove a topic. Returns `false` if it was not present.
    pub fn remove(&mut self, topic: &str) -> bool {
        let before = self.topics.len();
        self.topics.retain(|t| t != topic);
        self.topics.len() != before
    }

    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.topics
    }

    /// Serialized `subscribe` control messages for every topic, in set order.
    pub fn replay_frames(&self) -> Vec<String> {
        self.topics
            .iter()
            .filter_map(|topic| serde_json::to_string(&ControlMessage::subscribe(topic)).ok())
            .collect()
    }
}
