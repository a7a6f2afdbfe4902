use terminal_size::{terminal_size, Width};

use crate::model::{Command, Name};

const DEFAULT_TOTAL_WIDTH: usize = 80;
// Allows roughly three average words per wrapped description line.
const MINIMUM_DESCRIPTION_WIDTH: usize = 17;
const PADDING_WIDTH: usize = 2;

/// The usage documentation collected from an option description.
#[derive(Debug, Default)]
pub(crate) struct Usage {
    options: Vec<OptionRow>,
    arguments: Vec<ArgumentRow>,
    commands: Vec<CommandRow>,
}

impl Usage {
    pub(crate) fn option(
        &mut self,
        names: Vec<Name>,
        metavar: Option<String>,
        help: Option<String>,
        repeated: bool,
    ) {
        self.options.push(OptionRow {
            names,
            metavar,
            help,
            repeated,
        });
    }

    pub(crate) fn argument(&mut self, metavar: String, repeated: bool) {
        self.arguments.push(ArgumentRow { metavar, repeated });
    }

    pub(crate) fn command(&mut self, name: String, header: String) {
        self.commands.push(CommandRow { name, header });
    }
}

#[derive(Debug)]
struct OptionRow {
    names: Vec<Name>,
    metavar: Option<String>,
    help: Option<String>,
    repeated: bool,
}

impl OptionRow {
    fn grammar(&self) -> String {
        match &self.metavar {
            Some(metavar) if self.repeated => format!(" {metavar} [...]"),
            Some(metavar) => format!(" {metavar}"),
            None => String::default(),
        }
    }

    fn sort_key(&self) -> String {
        self.names
            .iter()
            .map(|name| match name {
                Name::Long(long) => long.clone(),
                Name::Short(short) => short.to_string(),
            })
            .collect::<Vec<String>>()
            .join(",")
    }

    /// The shortest spelling, for the usage summary line.
    fn summary(&self) -> String {
        let grammar = self.grammar();
        let name = self
            .names
            .iter()
            .find(|name| matches!(name, Name::Short(_)))
            .or_else(|| self.names.first());

        match name {
            Some(name) => format!("[{name}{grammar}]"),
            None => format!("[{grammar}]"),
        }
    }

    /// All spellings, short names first, for the options section.
    fn left_column(&self) -> String {
        let grammar = self.grammar();
        let mut ordered: Vec<&Name> = self
            .names
            .iter()
            .filter(|name| matches!(name, Name::Short(_)))
            .collect();
        ordered.extend(
            self.names
                .iter()
                .filter(|name| matches!(name, Name::Long(_))),
        );

        ordered
            .into_iter()
            .map(|name| format!("{name}{grammar}"))
            .collect::<Vec<String>>()
            .join(", ")
    }
}

#[derive(Debug)]
struct ArgumentRow {
    metavar: String,
    repeated: bool,
}

impl ArgumentRow {
    fn grammar(&self) -> String {
        if self.repeated {
            format!("{} [...]", self.metavar)
        } else {
            self.metavar.clone()
        }
    }
}

#[derive(Debug)]
struct CommandRow {
    name: String,
    header: String,
}

/// The report handed back when a parse fails: the usage documentation of the
/// command plus the user-visible error messages, ready to print.
#[derive(Debug)]
pub struct Help {
    program: String,
    header: String,
    usage: Usage,
    errors: Vec<String>,
    total_width: Option<usize>,
}

impl Help {
    pub(crate) fn from_command<A>(command: &Command<A>) -> Self {
        let mut usage = Usage::default();
        command.opts().document(&mut usage);
        usage.options.sort_by_key(OptionRow::sort_key);

        let total_width = terminal_size().map(|(Width(width), _)| width as usize);

        Self {
            program: command.name().to_string(),
            header: command.header().to_string(),
            usage,
            errors: Vec::default(),
            total_width,
        }
    }

    pub(crate) fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// The user-visible error messages, in the order they arose.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn render(&self, total_width: usize) -> String {
        let mut lines = Vec::default();

        for error in &self.errors {
            lines.push(error.clone());
        }

        if !self.errors.is_empty() {
            lines.push(String::default());
        }

        let mut summary = vec![format!("usage: {}", self.program)];

        for row in &self.usage.options {
            summary.push(row.summary());
        }

        for row in &self.usage.arguments {
            summary.push(row.grammar());
        }

        if !self.usage.commands.is_empty() {
            summary.push("COMMAND".to_string());
        }

        lines.push(summary.join(" "));

        if !self.header.is_empty() {
            lines.push(self.header.clone());
        }

        let mut column_width = 0;

        for row in &self.usage.arguments {
            column_width = column_width.max(row.grammar().len());
        }

        for row in &self.usage.options {
            column_width = column_width.max(row.left_column().len());
        }

        for row in &self.usage.commands {
            column_width = column_width.max(row.name.len());
        }

        let description_width = MINIMUM_DESCRIPTION_WIDTH
            .max(total_width.saturating_sub(column_width + PADDING_WIDTH + 1));

        if !self.usage.arguments.is_empty() {
            lines.push("positional arguments:".to_string());

            for row in &self.usage.arguments {
                push_row(&mut lines, column_width, description_width, row.grammar(), None);
            }
        }

        if !self.usage.options.is_empty() {
            lines.push("options:".to_string());

            for row in &self.usage.options {
                push_row(
                    &mut lines,
                    column_width,
                    description_width,
                    row.left_column(),
                    row.help.as_deref(),
                );
            }
        }

        if !self.usage.commands.is_empty() {
            lines.push("commands:".to_string());

            for row in &self.usage.commands {
                push_row(
                    &mut lines,
                    column_width,
                    description_width,
                    row.name.clone(),
                    Some(&row.header),
                );
            }
        }

        lines.join("\n")
    }
}

impl std::fmt::Display for Help {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.render(self.total_width.unwrap_or(DEFAULT_TOTAL_WIDTH))
        )
    }
}

fn push_row(
    lines: &mut Vec<String>,
    column_width: usize,
    description_width: usize,
    left: String,
    description: Option<&str>,
) {
    let mut wrapped = match description {
        Some(description) => wrap(description, description_width).into_iter(),
        None => Vec::default().into_iter(),
    };

    match wrapped.next() {
        Some(first) => lines.push(format!(" {left:<column_width$}  {first}")),
        None => lines.push(format!(" {left}")),
    }

    for continuation in wrapped {
        lines.push(format!(" {:<column_width$}  {continuation}", ""));
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
