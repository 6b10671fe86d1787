use persona_console_core::ParsedLine;

use crate::command::{Command, CommandContext, CommandRegistry, CommandSpec, Flow};
use crate::error::CommandError;

/// `help [command]`: lists commands, or describes one.
pub fn help_command() -> Command {
    Command::from_fn(
        CommandSpec::new(
            "help",
            "List the available commands or describe one",
            "help [command]",
        ),
        run,
    )
}

fn run(ctx: &mut CommandContext<'_>, line: &ParsedLine) -> Result<Flow, CommandError> {
    match line.arg(0) {
        None => {
            ctx.logger.info(overview(ctx.commands));
        }
        Some(name) => match ctx.commands.get(name) {
            Some(command) => {
                ctx.logger.info(detail(command.spec()));
            }
            None => {
                ctx.logger.warn(format!("'{name}' is not a valid command"));
            }
        },
    }
    Ok(Flow::Continue)
}

fn overview(commands: &CommandRegistry) -> String {
    let mut text = String::from("Available commands:");
    for command in commands.iter() {
        let spec = command.spec();
        text.push_str(&format!("\n{} - {}", spec.name, spec.description));
    }
    text
}

fn detail(spec: &CommandSpec) -> String {
    let mut text = format!("{} - {}\nUsage: {}", spec.name, spec.description, spec.usage);
    for set in &spec.tag_sets {
        text.push_str(&format!(
            "\nTags ({}, {}):",
            set.name(),
            set.inclusivity().describe()
        ));
        for tag in set.tags() {
            text.push_str(&format!("\n  {} - {}", tag.usage, tag.description));
        }
    }
    text
}
