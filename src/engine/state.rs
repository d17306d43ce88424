use crate::updater::Decision;

/// Progress of one updater run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Start,
    LatestFetched,
    Decided,
    Confirmed,
    Cancelled,
    Installed,
    Persisted,
}

/// Working state of a run; only `current_version` outlives it, via the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateSession {
    pub current_version: Option<String>,
    pub latest_version: String,
    pub decision: Decision,
}

impl UpdateSession {
    pub fn new(current_version: Option<String>, latest_version: String) -> Self {
        Self {
            current_version,
            latest_version,
            decision: Decision::UnknownNeedsInput,
        }
    }
}
