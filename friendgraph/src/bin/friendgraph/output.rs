use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use friendgraph::{FriendStatus, Post, Profile, User, time::relative_age};

use crate::theme::{self, Tone};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// A value rendered as one table row.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
    fn compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display rows according to the configured output format
    pub fn display<T>(&self, rows: &[T]) -> Result<()>
    where
        T: Serialize + TableRow,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(rows)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    self.info("Nothing to show");
                    return Ok(());
                }
                let mut table = self.create_table();
                self.add_table_header(&mut table, T::headers());
                for row in rows {
                    table.add_row(row.cells());
                }
                println!("{table}");
            }
            OutputFormat::Compact => {
                for row in rows {
                    println!("{}", row.compact());
                }
            }
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.tone_line(theme::SUCCESS, message));
        }
    }

    /// Errors print even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.tone_line(theme::FAILURE, message));
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.tone_line(theme::CAUTION, message));
        }
    }

    /// Goes to stderr so `--verbose` never disturbs JSON on stdout.
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.tone_line(theme::DETAIL, message));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.tone_line(theme::NOTICE, message));
        }
    }

    pub fn heading(&self, text: &str) {
        if self.options.quiet {
            return;
        }
        if self.options.no_color {
            println!("\n{text}\n{}", "=".repeat(text.chars().count()));
        } else {
            println!("\n{}", text.color(theme::HEADING).bold());
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if self.options.quiet {
            return;
        }
        if self.options.no_color {
            println!("{key}: {value}");
        } else {
            println!("{}: {}", key.color(theme::LABEL).bold(), value.color(theme::VALUE));
        }
    }

    pub fn bullet(&self, text: &str) {
        self.indented(theme::BULLET, text);
    }

    /// An indented line led by `glyph`, e.g. a like or a reply in the tour.
    pub fn indented(&self, glyph: &str, text: &str) {
        if self.options.quiet {
            return;
        }
        if self.options.no_color {
            println!("  {glyph} {text}");
        } else {
            println!("  {} {text}", glyph.color(theme::MUTED));
        }
    }

    fn tone_line(&self, tone: Tone, message: &str) -> String {
        if self.options.no_color {
            format!("{} {message}", tone.glyph)
        } else {
            format!("{} {}", tone.glyph.color(tone.color), message.color(tone.color))
        }
    }

    /// Create a themed table
    pub fn create_table(&self) -> Table {
        let mut table = Table::new();

        if !self.options.no_color {
            table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        } else {
            table.load_preset(comfy_table::presets::ASCII_FULL);
        }

        table
    }

    /// Add themed header to table
    pub fn add_table_header(&self, table: &mut Table, headers: &[&str]) {
        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|h| {
                let cell = Cell::new(h).add_attribute(Attribute::Bold);
                if self.options.no_color { cell } else { cell.fg(TableColor::Cyan) }
            })
            .collect();
        table.set_header(header_cells);
    }
}

/// User as shown by the CLI; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub joined: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub friends: usize,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            joined: user.join_date.format("%Y-%m-%d").to_string(),
            picture: user.picture.clone(),
            friends: user.friends.len(),
        }
    }
}

impl TableRow for UserRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Joined", "Friends"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.joined.clone(),
            self.friends.to_string(),
        ]
    }

    fn compact(&self) -> String {
        format!("{} {} <{}>", self.id, self.name, self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct PostRow {
    pub id: String,
    pub author: String,
    pub text: String,
    pub posted: String,
    pub likes: usize,
    pub replies: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl PostRow {
    pub fn new(post: &Post, replies: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: post.id.clone(),
            author: post.author.clone(),
            text: post.text.clone(),
            posted: post.posted_relative(now),
            likes: post.likes(),
            replies,
            parent: post.parent.clone(),
        }
    }
}

impl TableRow for PostRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "Author", "Posted", "Likes", "Replies", "Text"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.author.clone(),
            self.posted.clone(),
            format!("{} {}", theme::HEART, self.likes),
            format!("{} {}", theme::REPLY, self.replies),
            self.text.clone(),
        ]
    }

    fn compact(&self) -> String {
        format!("{} [{}] {}", self.id, self.author, self.text)
    }
}

#[derive(Debug, Serialize)]
pub struct StatusRow {
    pub viewer: String,
    pub subject: String,
    pub status: FriendStatus,
}

impl TableRow for StatusRow {
    fn headers() -> &'static [&'static str] {
        &["Viewer", "Subject", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.viewer.clone(), self.subject.clone(), self.status.to_string()]
    }

    fn compact(&self) -> String {
        format!("{} {} {}", self.viewer, self.subject, self.status)
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileRow {
    pub owner: String,
    pub name: String,
    pub status: String,
    pub member_for: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub posts: usize,
}

impl ProfileRow {
    pub fn new(profile: &Profile, user: &User, posts: usize, now: DateTime<Utc>) -> Self {
        Self {
            owner: user.id.clone(),
            name: user.name.clone(),
            status: profile.status.clone(),
            member_for: relative_age(user.join_date, now),
            picture: user.picture.clone(),
            posts,
        }
    }
}

impl TableRow for ProfileRow {
    fn headers() -> &'static [&'static str] {
        &["Owner", "Name", "Status", "Joined", "Picture", "Posts"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.owner.clone(),
            self.name.clone(),
            self.status.clone(),
            self.member_for.clone(),
            self.picture.clone().unwrap_or_default(),
            self.posts.to_string(),
        ]
    }

    fn compact(&self) -> String {
        format!("{} {}: {}", self.owner, self.name, self.status)
    }
}
