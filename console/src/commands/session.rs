use std::sync::Arc;

use persona_console_core::{Inclusivity, ParsedLine, RegistryError, Tag, TagRegistry, TagSet};
use persona_console_roster::{Npc, Player, Roster};
use tracing::debug;

use crate::command::{Command, CommandContext, CommandRegistry, CommandSpec, Flow, Handler};
use crate::error::CommandError;

const NAME: &str = "session";
const USAGE: &str = "session switch --npc \"<id>\" | --player \"<id>\", session info";

/// `session switch` / `session info` over a loaded [`Roster`].
pub struct SessionCommand {
    npc: Tag<Npc>,
    player: Tag<Player>,
    selection: TagSet,
}

impl SessionCommand {
    pub fn new(roster: Arc<Roster>) -> Self {
        let npcs = Arc::clone(&roster);
        let npc = Tag::new(
            "--npc",
            "Select the active npc by id",
            "--npc \"<id>\"",
            "npc",
            move |id| npcs.npc(id).cloned(),
        );
        let player = Tag::new(
            "--player",
            "Select the active player by id",
            "--player \"<id>\"",
            "player",
            move |id| roster.player(id).cloned(),
        );
        let selection = TagSet::new(NAME, Inclusivity::RequiredInclusive)
            .with_tag(&npc)
            .with_tag(&player);

        Self {
            npc,
            player,
            selection,
        }
    }

    /// Registers the command together with its tags and tag set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if `session`, `--npc` or
    /// `--player` is already registered.
    pub fn register(
        self,
        commands: &mut CommandRegistry,
        tags: &mut TagRegistry,
    ) -> Result<(), RegistryError> {
        tags.register_tag(&self.npc)?;
        tags.register_tag(&self.player)?;
        tags.register_set(self.selection.clone())?;

        let spec = CommandSpec::new(NAME, "Show or change the selected npc and player", USAGE)
            .with_tag_set(self.selection.clone());
        commands.register(Command::new(spec, self))
    }

    fn switch(&self, ctx: &mut CommandContext<'_>, line: &ParsedLine) -> Result<Flow, CommandError> {
        self.selection.validate(&line.tags)?;

        let mut changed = false;
        if let Some(tag) = line.tag(self.npc.name()) {
            match self.npc.apply_parsed(tag) {
                Ok(npc) => {
                    debug!(npc = %npc.id, "npc selected");
                    ctx.session.select_npc(npc);
                    changed = true;
                }
                Err(err) => {
                    ctx.logger.warn(err.to_string());
                }
            }
        }
        if let Some(tag) = line.tag(self.player.name()) {
            match self.player.apply_parsed(tag) {
                Ok(player) => {
                    debug!(player = %player.id, "player selected");
                    ctx.session.select_player(player);
                    changed = true;
                }
                Err(err) => {
                    ctx.logger.warn(err.to_string());
                }
            }
        }

        if changed {
            ctx.logger.info(ctx.session.describe());
        }
        Ok(Flow::Continue)
    }
}

impl Handler for SessionCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, line: &ParsedLine) -> Result<Flow, CommandError> {
        let Some(subcommand) = line.arg(0) else {
            return Err(CommandError::MissingSubcommand {
                command: NAME.to_string(),
                usage: USAGE.to_string(),
            });
        };

        match subcommand.to_ascii_lowercase().as_str() {
            "switch" => self.switch(ctx, line),
            "info" => {
                ctx.logger.info(ctx.session.describe());
                Ok(Flow::Continue)
            }
            _ => Err(CommandError::UnknownSubcommand {
                command: NAME.to_string(),
                name: subcommand.to_string(),
                usage: USAGE.to_string(),
            }),
        }
    }
}
