// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

/// A command offered in an icon's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCommand {
    Open,
    Eject,
}

impl MenuCommand {
    /// Menu order.
    pub const ALL: [MenuCommand; 2] = [MenuCommand::Open, MenuCommand::Eject];

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Eject => "Eject",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Eject => "eject",
        }
    }
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_the_token() {
        assert_eq!(MenuCommand::Open.to_string(), "open");
        assert_eq!(MenuCommand::Eject.to_string(), "eject");
    }

    #[test]
    fn menu_order_is_open_then_eject() {
        let labels: Vec<_> = MenuCommand::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["Open", "Eject"]);
    }
}
