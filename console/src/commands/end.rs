use crate::command::{Command, CommandSpec, Flow};

/// `end`: stops the input loop.
pub fn end_command() -> Command {
    Command::from_fn(
        CommandSpec::new("end", "Shut the console down", "end"),
        |ctx, _line| {
            ctx.logger.info("Shutting down");
            Ok(Flow::Shutdown)
        },
    )
}
