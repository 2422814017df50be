//! Line-oriented command scripts
//!
//! Each non-blank line is one command applied to a [`FileTable`]:
//!
//! ```text
//! create NAME            open NAME             close FD
//! read FD SIZE           write FD TEXT...      ls
//! link TARGET ALIAS      unlink ALIAS          truncate NAME SIZE
//! stat NAME              tell FD
//! ```
//!
//! Lines starting with `#` are comments. `TEXT` runs to the end of the
//! line and understands the escapes `\n`, `\r`, `\t`, `\0` and `\\`.

use crate::model::Fd;
use crate::table::FileTable;
use crate::{Error, Result};
use serde_json::{json, Value};

/// Replays the classic two-file walkthrough: create, link, write, read,
/// close, overwrite at offset 0 and truncate.
pub const DEMO_SCRIPT: &str = r"# two files and a throwaway alias
create file1.txt
create file2.txt
link file1.txt alias1.txt

open file1.txt
open file2.txt

write 0 This is content for file1
write 1 This is content for file2
unlink alias1.txt

ls
read 0 10
close 0

# the offset of fd 1 is still 0, so this overwrites the head of file2
write 1 \nAppended content
read 1 20
truncate file2.txt 10
stat file2.txt
close 1
";

/// A parsed script command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Create { name: String },
    Open { name: String },
    Close { fd: Fd },
    Read { fd: Fd, size: usize },
    Write { fd: Fd, data: Vec<u8> },
    Ls,
    Link { target: String, alias: String },
    Unlink { alias: String },
    Truncate { name: String, size: usize },
    Stat { name: String },
    Tell { fd: Fd },
}

impl Command {
    /// Parse one line. Blank lines and comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some((verb, rest)) = next_token(line) else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }

        let command = match verb {
            "write" => {
                let (fd, text) = next_token(rest)
                    .ok_or_else(|| Error::InvalidArgument("write: missing FD".into()))?;
                let text = text
                    .strip_prefix(|c: char| c.is_whitespace())
                    .unwrap_or(text);
                Command::Write {
                    fd: parse_fd(fd)?,
                    data: unescape(text)?,
                }
            }
            _ => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                Self::parse_args(verb, &args)?
            }
        };

        Ok(Some(command))
    }

    fn parse_args(verb: &str, args: &[&str]) -> Result<Command> {
        let expected = match verb {
            "ls" => 0,
            "create" | "open" | "close" | "unlink" | "stat" | "tell" => 1,
            "read" | "link" | "truncate" => 2,
            _ => return Err(Error::InvalidArgument(format!("unknown command '{}'", verb))),
        };
        if args.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "{}: expected {} argument(s), got {}",
                verb,
                expected,
                args.len()
            )));
        }

        let command = match verb {
            "ls" => Command::Ls,
            "create" => Command::Create {
                name: args[0].to_string(),
            },
            "open" => Command::Open {
                name: args[0].to_string(),
            },
            "close" => Command::Close {
                fd: parse_fd(args[0])?,
            },
            "unlink" => Command::Unlink {
                alias: args[0].to_string(),
            },
            "stat" => Command::Stat {
                name: args[0].to_string(),
            },
            "tell" => Command::Tell {
                fd: parse_fd(args[0])?,
            },
            "read" => Command::Read {
                fd: parse_fd(args[0])?,
                size: parse_size(args[1])?,
            },
            "link" => Command::Link {
                target: args[0].to_string(),
                alias: args[1].to_string(),
            },
            "truncate" => Command::Truncate {
                name: args[0].to_string(),
                size: parse_size(args[1])?,
            },
            _ => unreachable!("verb checked above"),
        };
        Ok(command)
    }

    /// The command's verb as written in scripts
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Open { .. } => "open",
            Command::Close { .. } => "close",
            Command::Read { .. } => "read",
            Command::Write { .. } => "write",
            Command::Ls => "ls",
            Command::Link { .. } => "link",
            Command::Unlink { .. } => "unlink",
            Command::Truncate { .. } => "truncate",
            Command::Stat { .. } => "stat",
            Command::Tell { .. } => "tell",
        }
    }

    /// Run against a table and describe the outcome as JSON
    pub fn apply(&self, table: &mut FileTable) -> Result<Value> {
        let verb = self.verb();
        let value = match self {
            Command::Create { name } => {
                table.create(name.as_str())?;
                json!({ "status": "ok", "command": verb, "name": name })
            }
            Command::Open { name } => {
                let fd = table.open(name)?;
                json!({ "status": "ok", "command": verb, "name": name, "fd": fd })
            }
            Command::Close { fd } => {
                table.close(*fd)?;
                json!({ "status": "ok", "command": verb, "fd": fd })
            }
            Command::Read { fd, size } => {
                let data = table.read(*fd, *size)?;
                let offset = table.offset(*fd)?;
                json!({
                    "status": "ok",
                    "command": verb,
                    "fd": fd,
                    "len": data.len(),
                    "data": String::from_utf8_lossy(&data),
                    "offset": offset
                })
            }
            Command::Write { fd, data } => {
                table.write(*fd, data)?;
                json!({ "status": "ok", "command": verb, "fd": fd, "len": data.len() })
            }
            Command::Ls => {
                let files = table.ls();
                json!({ "status": "ok", "command": verb, "count": files.len(), "files": files })
            }
            Command::Link { target, alias } => {
                table.link(target, alias.as_str())?;
                json!({ "status": "ok", "command": verb, "target": target, "alias": alias })
            }
            Command::Unlink { alias } => {
                table.unlink(alias)?;
                json!({ "status": "ok", "command": verb, "alias": alias })
            }
            Command::Truncate { name, size } => {
                table.truncate(name, *size)?;
                json!({ "status": "ok", "command": verb, "name": name, "size": size })
            }
            Command::Stat { name } => {
                let stat = table.stat(name)?;
                json!({ "status": "ok", "command": verb, "stat": stat })
            }
            Command::Tell { fd } => {
                let offset = table.offset(*fd)?;
                json!({ "status": "ok", "command": verb, "fd": fd, "offset": offset })
            }
        };
        Ok(value)
    }
}

/// Counts from a finished run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands that succeeded
    pub executed: usize,
    /// Commands that failed (only non-zero with `keep_going`)
    pub failed: usize,
}

/// A file table plus the policy for running scripts against it
///
/// State lives as long as the session; nothing is persisted.
#[derive(Debug, Default)]
pub struct Session {
    table: FileTable,
    keep_going: bool,
}

impl Session {
    pub fn new(keep_going: bool) -> Self {
        Session {
            table: FileTable::new(),
            keep_going,
        }
    }

    pub fn table(&self) -> &FileTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut FileTable {
        &mut self.table
    }

    /// Run every line of `script`, handing each result to `emit`
    ///
    /// A failing line is emitted as an error record. Without `keep_going`
    /// the run then stops and returns that error.
    pub fn run(&mut self, script: &str, mut emit: impl FnMut(&Value)) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (index, line) in script.lines().enumerate() {
            let line_no = index + 1;
            let outcome = Command::parse(line).and_then(|command| match command {
                Some(command) => command.apply(&mut self.table).map(Some),
                None => Ok(None),
            });

            match outcome {
                Ok(Some(value)) => {
                    summary.executed += 1;
                    emit(&value);
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("line {}: {}", line_no, err);
                    emit(&json!({
                        "status": "error",
                        "line": line_no,
                        "kind": err.kind(),
                        "message": err.to_string()
                    }));
                    if !self.keep_going {
                        return Err(err);
                    }
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Split off the first whitespace-delimited token
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

fn parse_fd(token: &str) -> Result<Fd> {
    token
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a file descriptor", token)))
}

fn parse_size(token: &str) -> Result<usize> {
    if let Some(magnitude) = token.strip_prefix('-') {
        if magnitude.parse::<usize>().is_ok() {
            return Err(Error::InvalidArgument(format!(
                "size must not be negative: {}",
                token
            )));
        }
    }
    token
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("'{}' is not a size", token)))
}

fn unescape(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let byte = match chars.next() {
            Some('n') => b'\n',
            Some('r') => b'\r',
            Some('t') => b'\t',
            Some('0') => b'\0',
            Some('\\') => b'\\',
            Some(other) => {
                return Err(Error::InvalidArgument(format!(
                    "unknown escape '\\{}'",
                    other
                )))
            }
            None => return Err(Error::InvalidArgument("dangling '\\' at end of text".into())),
        };
        out.push(byte);
    }

    Ok(out)
}
