use serde::{Deserialize, Serialize};

use crate::{economy::UpgradeTarget, station::StationKind};

/// Player input accepted by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start,
    AssignWorker { station: StationKind },
    RemoveWorker { station: StationKind },
    Upgrade { target: UpgradeTarget },
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_tagged_json() {
        let command: Command =
            serde_json::from_str(r#"{"command":"assign_worker","station":"coal_mine"}"#).unwrap();
        assert_eq!(
            command,
            Command::AssignWorker {
                station: StationKind::CoalMine
            }
        );

        let upgrade = serde_json::to_string(&Command::Upgrade {
            target: UpgradeTarget::Furnace,
        })
        .unwrap();
        assert_eq!(upgrade, r#"{"command":"upgrade","target":"furnace"}"#);
    }
}
