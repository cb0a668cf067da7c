use serde::Serialize;
use strum::{Display, EnumString};

/// Lifecycle of one request binding.
///
/// Transient: each `Query` or `Mutation` owns its own state and nothing else
/// writes to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl RequestState {
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}
