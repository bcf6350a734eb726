//! Long help: per-command examples and a configuration appendix.

use std::fmt::Write;

use clap::{ColorChoice, Command, CommandFactory};
use colored::{Color, Colorize};

use crate::{
    Cli,
    examples::{ExampleGroup, command_examples},
    theme,
};

const CONFIG_KEYS: &[(&str, &str)] = &[
    ("[store] backend", "\"memory\" (default, nothing persists) or \"redis\""),
    ("[store] url", "Redis URL; ${VAR} expands from the environment"),
    ("[store] prefix", "Key namespace, so several networks can share one Redis"),
    ("[rules]", "min_post_length, min_name_length, min_password_length"),
    ("[media]", "directory for uploaded pictures and their public_base URL"),
];

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("REDIS_URL", "Redis connection URL used by the default [store] url"),
    ("RUST_LOG", "Log filter, e.g. friendgraph=debug"),
];

/// The top-level command with themed styles and every help appendix attached.
pub fn command() -> Command {
    let color = *theme::TERMINAL_COLOR;
    let mut command = Cli::command()
        .styles(theme::help_styles())
        .color(if color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(appendix(color));

    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(render_examples(example.groups, color));
        }
    }
    command
}

fn render_examples(groups: &[ExampleGroup], color: bool) -> String {
    let sections: Vec<String> = groups
        .iter()
        .map(|group| {
            let mut section = format!("  {}\n", paint(group.title, theme::HEADING, true, color));
            for line in group.commands {
                let arrow = paint(theme::ARROW, theme::COMMAND, false, color);
                let _ = writeln!(section, "    {arrow} {}", paint(line, theme::COMMAND, false, color));
            }
            section
        })
        .collect();
    format!("{}\n{}", paint("Examples:", theme::TITLE, true, color), sections.join("\n"))
}

fn appendix(color: bool) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{} {}",
        paint("Configuration:", theme::TITLE, true, color),
        paint("friendgraph.toml, or the file given by --config", theme::MUTED, false, color)
    );
    push_pairs(&mut buffer, CONFIG_KEYS, color);

    buffer.push('\n');
    let _ = writeln!(buffer, "{}", paint("Environment Variables:", theme::TITLE, true, color));
    push_pairs(&mut buffer, ENVIRONMENT_VARIABLES, color);

    buffer.push('\n');
    let _ = writeln!(
        buffer,
        "{} {}",
        paint("New here?", theme::TITLE, true, color),
        paint("'friendgraph tour' runs every feature on a throwaway network.", theme::COMMAND, false, color)
    );
    buffer
}

fn push_pairs(buffer: &mut String, pairs: &[(&str, &str)], color: bool) {
    let width = pairs.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, description) in pairs {
        let padded = format!("{key:<width$}");
        let _ = writeln!(
            buffer,
            "  {}  {}",
            paint(&padded, theme::LABEL, true, color),
            paint(description, theme::VALUE, false, color)
        );
    }
}

fn paint(text: &str, color: Color, bold: bool, enabled: bool) -> String {
    match (enabled, bold) {
        (false, _) => text.to_string(),
        (true, false) => text.color(color).to_string(),
        (true, true) => text.color(color).bold().to_string(),
    }
}
