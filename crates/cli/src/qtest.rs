//! Queue driver
//!
//! Interprets a small command language against a single [`Queue`], echoing
//! each command and the resulting queue, and counting errors.
//!
//! ```text
//! new                 create (or recreate) the queue
//! free                drop the queue
//! ih STR [N]          insert STR at the head, N times
//! it STR [N]          insert STR at the tail, N times
//! rh [EXPECTED]       remove the head into the buffer, compare if given
//! rhq                 remove the head without copying it out
//! size [EXPECTED]     print the size, compare if given
//! reverse             reverse in place
//! show                print the queue
//! option bufsize N    capacity of the rh buffer (NUL included)
//! quit                stop reading commands
//! # ...               comment
//! ```
//!
//! After every command that changes the queue, the structural invariants
//! are verified and a violation counts as an error.

use lab_queue::Queue;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Longest queue prefix printed by `show` and after mutations
const MAX_SHOWN: usize = 20;

/// What a single command asks the session to do next
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Outcome of running a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtestOutcome {
    pub commands: usize,
    pub errors: usize,
}

impl QtestOutcome {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

/// Interpreter state
pub struct QtestSession<W: Write> {
    queue: Option<Queue>,
    buffer_size: usize,
    commands: usize,
    errors: usize,
    out: W,
}

impl<W: Write> QtestSession<W> {
    pub fn new(buffer_size: usize, out: W) -> Self {
        QtestSession {
            queue: None,
            buffer_size,
            commands: 0,
            errors: 0,
            out,
        }
    }

    /// Run every command from `input` until EOF or `quit`
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<QtestOutcome, String> {
        for (lineno, line) in input.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read script: {}", e))?;
            if self.execute_line(lineno + 1, &line)? == Flow::Quit {
                break;
            }
        }
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> QtestOutcome {
        QtestOutcome {
            commands: self.commands,
            errors: self.errors,
        }
    }

    /// Consume the session, returning the writer
    pub fn into_output(self) -> W {
        self.out
    }

    fn execute_line(&mut self, lineno: usize, line: &str) -> Result<Flow, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        self.commands += 1;
        self.emit(&format!("cmd> {}", line))?;
        debug!("qtest line {}: {}", lineno, line);

        let words: Vec<&str> = line.split_whitespace().collect();
        match self.dispatch(&words) {
            Ok(flow) => Ok(flow),
            Err(msg) => {
                self.errors += 1;
                warn!("qtest line {}: {}", lineno, msg);
                self.emit(&format!("ERROR: {}", msg))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, words: &[&str]) -> Result<Flow, String> {
        match words {
            ["new"] => {
                // Dropping the old queue releases all of its nodes
                self.queue = Some(Queue::new());
                self.show_after_change()?;
            }
            ["free"] => {
                self.queue = None;
                self.emit("q = NULL")?;
            }
            ["ih", text, rest @ ..] => {
                let count = parse_count(rest)?;
                let q = self.queue_mut()?;
                for _ in 0..count {
                    q.insert_head(text).map_err(|e| format!("Insertion of {} failed: {}", text, e))?;
                }
                self.show_after_change()?;
            }
            ["it", text, rest @ ..] => {
                let count = parse_count(rest)?;
                let q = self.queue_mut()?;
                for _ in 0..count {
                    q.insert_tail(text).map_err(|e| format!("Insertion of {} failed: {}", text, e))?;
                }
                self.show_after_change()?;
            }
            ["rh"] => self.remove_head(None)?,
            ["rh", expected] => self.remove_head(Some(*expected))?,
            ["rhq"] => {
                self.queue_mut()?
                    .remove_head(None)
                    .map_err(|e| format!("Removal failed: {}", e))?;
                self.show_after_change()?;
            }
            ["size", rest @ ..] => {
                let size = self.queue_ref()?.size();
                self.emit(&format!("Queue size = {}", size))?;
                if let [expected] = rest {
                    let expected: usize = expected
                        .parse()
                        .map_err(|_| format!("Invalid size '{}'", expected))?;
                    if size != expected {
                        return Err(format!("Computed queue size as {}, but expected {}", size, expected));
                    }
                }
            }
            ["reverse"] => {
                self.queue_mut()?.reverse();
                self.show_after_change()?;
            }
            ["show"] => self.show()?,
            ["option", "bufsize", value] => {
                self.buffer_size = value
                    .parse()
                    .map_err(|_| format!("Invalid buffer size '{}'", value))?;
            }
            ["option", name, ..] => return Err(format!("Unknown option '{}'", name)),
            ["quit"] => return Ok(Flow::Quit),
            [cmd, ..] => return Err(format!("Unknown command '{}'", cmd)),
            [] => {}
        }
        Ok(Flow::Continue)
    }

    fn remove_head(&mut self, expected: Option<&str>) -> Result<(), String> {
        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(self.buffer_size)
            .map_err(|e| format!("Cannot allocate a {}-byte buffer: {}", self.buffer_size, e))?;
        buf.resize(self.buffer_size, 0);
        let out = if buf.is_empty() { None } else { Some(buf.as_mut_slice()) };
        let copied = self
            .queue_mut()?
            .remove_head(out)
            .map_err(|e| format!("Removal failed: {}", e))?;

        let removed = String::from_utf8_lossy(&buf[..copied]).into_owned();
        self.emit(&format!("Removed {} from queue", removed))?;
        self.show_after_change()?;

        match expected {
            Some(expected) if expected != removed => Err(format!(
                "Removed value {} != expected value {}",
                removed, expected
            )),
            _ => Ok(()),
        }
    }

    fn queue_ref(&self) -> Result<&Queue, String> {
        self.queue.as_ref().ok_or_else(|| "No queue (use 'new' first)".to_string())
    }

    fn queue_mut(&mut self) -> Result<&mut Queue, String> {
        self.queue.as_mut().ok_or_else(|| "No queue (use 'new' first)".to_string())
    }

    fn show_after_change(&mut self) -> Result<(), String> {
        if let Some(q) = &self.queue {
            q.check_invariants()
                .map_err(|e| format!("Queue structure broken: {}", e))?;
        }
        self.show()
    }

    fn show(&mut self) -> Result<(), String> {
        let line = match &self.queue {
            None => "q = NULL".to_string(),
            Some(q) => format_queue(q),
        };
        self.emit(&line)
    }

    fn emit(&mut self, line: &str) -> Result<(), String> {
        writeln!(self.out, "{}", line).map_err(|e| format!("Failed to write output: {}", e))
    }
}

/// `q = [a b c]`, eliding after [`MAX_SHOWN`] elements
pub fn format_queue(q: &Queue) -> String {
    let shown: Vec<_> = q.iter().lossy().take(MAX_SHOWN).collect();
    let more = if q.size() > MAX_SHOWN { " ..." } else { "" };
    format!("q = [{}{}]", shown.join(" "), more)
}

fn parse_count(rest: &[&str]) -> Result<usize, String> {
    match rest {
        [] => Ok(1),
        [n] => n.parse().map_err(|_| format!("Invalid repeat count '{}'", n)),
        _ => Err("Too many arguments".to_string()),
    }
}
