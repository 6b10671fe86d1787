//! Current npc/player selection.

use std::fmt;

use persona_console_roster::{Npc, Player};

/// Records selected with `session switch`.
///
/// Owned by the [`Console`](crate::Console); handlers reach it through
/// [`CommandContext`](crate::CommandContext).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    npc: Option<Npc>,
    player: Option<Player>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn npc(&self) -> Option<&Npc> {
        self.npc.as_ref()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Selects an npc, returning the previous selection.
    pub fn select_npc(&mut self, npc: Npc) -> Option<Npc> {
        self.npc.replace(npc)
    }

    /// Selects a player, returning the previous selection.
    pub fn select_player(&mut self, player: Player) -> Option<Player> {
        self.player.replace(player)
    }

    /// One-line summary logged by `session info`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session: npc = ")?;
        match &self.npc {
            Some(npc) => write!(f, "{npc}")?,
            None => f.write_str("none")?,
        }
        f.write_str(", player = ")?;
        match &self.player {
            Some(player) => write!(f, "{player}"),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_empty_session() {
        assert_eq!(
            Session::new().describe(),
            "Session: npc = none, player = none"
        );
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut session = Session::new();
        assert!(session.select_npc(Npc::new("001", "Mira")).is_none());
        let previous = session.select_npc(Npc::new("002", "Osk"));
        assert_eq!(previous.map(|npc| npc.id), Some("001".to_string()));
        session.select_player(Player::new("p1", "Ash"));
        assert_eq!(
            session.describe(),
            "Session: npc = Osk (002), player = Ash (p1)"
        );
    }
}
