use std::collections::HashSet;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;

use log::{debug, info};

use super::reply_parser::ReplyReader;
use crate::analysis::ProfileStats;
use crate::domain::ResolveError;
use crate::profiling::AddressCounts;

/// Symbolizer used when none is configured
pub const DEFAULT_SYMBOLIZER: &str = "arm-none-eabi-addr2line";

/// How to launch the symbolizer subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolizerCommand {
    pub program: String,
    pub args: Vec<OsString>,
}

impl SymbolizerCommand {
    #[must_use]
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect() }
    }

    /// An `addr2line`-compatible tool reading addresses for `elf`
    #[must_use]
    pub fn addr2line(program: impl Into<String>, elf: &Path) -> Self {
        let mut exe = OsString::from("--exe=");
        exe.push(elf);
        Self::new(program, [OsString::from("--addresses"), OsString::from("--functions"), exe])
    }

    fn spawn(&self) -> Result<Child, ResolveError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ResolveError::Launch { program: self.program.clone(), source })
    }
}

/// Resolves sampled addresses to source locations through an external tool
///
/// The whole address set goes to a single subprocess. Requests are written
/// from the calling thread while a scoped thread drains the replies; writing
/// everything first would deadlock as soon as the tool's output fills the
/// pipe buffer.
pub struct Symbolizer {
    command: SymbolizerCommand,
}

impl Symbolizer {
    #[must_use]
    pub fn new(command: SymbolizerCommand) -> Self {
        Self { command }
    }

    #[must_use]
    pub fn command(&self) -> &SymbolizerCommand {
        &self.command
    }

    /// Resolve every address in `counts` and fold the results into statistics
    ///
    /// # Errors
    /// Returns an error if the symbolizer cannot be launched, breaks the
    /// reply protocol, or exits unsuccessfully. No partial statistics are
    /// returned.
    pub fn resolve_all(&self, counts: &AddressCounts) -> Result<ProfileStats, ResolveError> {
        if counts.is_empty() {
            return Ok(ProfileStats::new());
        }

        info!("Resolving {} addresses with {}", counts.len(), self.command.program);
        let mut child = self.command.spawn()?;

        let outcome = exchange(&mut child, counts);

        match outcome {
            Ok(stats) => {
                let status = child.wait()?;
                if !status.success() {
                    return Err(ResolveError::SymbolizerFailed(status));
                }
                Ok(stats)
            }
            Err(e) => {
                // Already exited if it hit a closed pipe
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }
}

fn exchange(child: &mut Child, counts: &AddressCounts) -> Result<ProfileStats, ResolveError> {
    let stdin = child.stdin.take().ok_or(ResolveError::PipeUnavailable("stdin"))?;
    let stdout = child.stdout.take().ok_or(ResolveError::PipeUnavailable("stdout"))?;

    thread::scope(|scope| -> Result<ProfileStats, ResolveError> {
        let reader = thread::Builder::new()
            .name("symbolizer-reply".to_string())
            .spawn_scoped(scope, move || collect_replies(BufReader::new(stdout), counts))?;

        let written = write_requests(stdin, counts);
        let replies = reader.join().map_err(|_| ResolveError::ReaderPanicked)?;

        // A reply error explains a failed write (broken pipe), not vice versa
        let stats = replies?;
        written?;
        Ok(stats)
    })
}

/// Write one `0x<hex>` request per address, then close the stream
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn write_requests<W: Write>(out: W, counts: &AddressCounts) -> std::io::Result<()> {
    let mut writer = BufWriter::new(out);
    for address in counts.addresses() {
        writeln!(writer, "0x{:x}", address.0)?;
    }
    writer.flush()?;
    debug!("Sent {} symbolizer requests", counts.len());
    Ok(())
}

/// Read replies until end-of-stream and fold them into statistics
///
/// Replies may arrive in any order; they are matched by the echoed address.
///
/// # Errors
/// Returns an error for malformed replies, replies for addresses that were
/// never requested, duplicate replies, or requests left unanswered
pub fn collect_replies<R: BufRead>(
    reader: R,
    counts: &AddressCounts,
) -> Result<ProfileStats, ResolveError> {
    let mut stats = ProfileStats::new();
    let mut answered = HashSet::with_capacity(counts.len());

    for reply in ReplyReader::new(reader) {
        let resolution = reply?;
        let Some(count) = counts.get(resolution.address) else {
            return Err(ResolveError::UnexpectedAddress(resolution.address));
        };
        if !answered.insert(resolution.address) {
            return Err(ResolveError::DuplicateReply(resolution.address));
        }
        stats.record(&resolution, count);
    }

    if answered.len() != counts.len() {
        return Err(ResolveError::MissingReplies {
            expected: counts.len(),
            received: answered.len(),
        });
    }

    debug!(
        "Resolved {} addresses into {} lines, {} functions, {} files",
        answered.len(),
        stats.lines().len(),
        stats.functions().len(),
        stats.files().len()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, FileDefinition, FunctionDefinition, LineDefinition};

    fn counts(pairs: &[(u32, u64)]) -> AddressCounts {
        pairs
            .iter()
            .flat_map(|&(pc, n)| std::iter::repeat(Address(pc)).take(n as usize))
            .collect()
    }

    #[test]
    fn test_addr2line_arguments() {
        let elf = Path::new("cleanflight_NAZE.elf");
        let cmd = SymbolizerCommand::addr2line(DEFAULT_SYMBOLIZER, elf);
        assert_eq!(cmd.program, "arm-none-eabi-addr2line");
        assert_eq!(
            cmd.args,
            vec![
                OsString::from("--addresses"),
                OsString::from("--functions"),
                OsString::from("--exe=cleanflight_NAZE.elf"),
            ]
        );
    }

    #[test]
    fn test_requests_are_hex_lines() {
        let counts = counts(&[(0x0800_00ff, 2)]);
        let mut out = Vec::new();
        write_requests(&mut out, &counts).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0x80000ff\n");
    }

    #[test]
    fn test_reply_count_is_weighted_by_samples() {
        let counts = counts(&[(0x1, 5)]);
        let stats = collect_replies("0x1\nfoo\n./bar.c:10\n".as_bytes(), &counts).unwrap();

        let file = FileDefinition::new("bar.c");
        let line = LineDefinition {
            function: FunctionDefinition { name: "foo".to_string(), file: file.clone() },
            line: 10,
        };
        assert_eq!(stats.lines()[&line].count, 5);
        assert_eq!(stats.files()[&file].count, 5);
        assert_eq!(stats.total_samples(), 5);
    }

    #[test]
    fn test_replies_match_by_address_not_order() {
        let counts = counts(&[(0x10, 1), (0x20, 3)]);
        let replies = "0x00000020\nb\nb.c:2\n0x00000010\na\na.c:1\n";
        let stats = collect_replies(replies.as_bytes(), &counts).unwrap();

        assert_eq!(stats.files()[&FileDefinition::new("b.c")].count, 3);
        assert_eq!(stats.files()[&FileDefinition::new("a.c")].count, 1);
    }

    #[test]
    fn test_unrequested_address_is_fatal() {
        let counts = counts(&[(0x1, 1)]);
        let replies = "0x1\nf\nf.c:1\n0x2\ng\ng.c:1\n";
        let err = collect_replies(replies.as_bytes(), &counts).unwrap_err();
        assert!(matches!(err, ResolveError::UnexpectedAddress(Address(2))));
    }

    #[test]
    fn test_duplicate_reply_is_fatal() {
        let counts = counts(&[(0x1, 1)]);
        let replies = "0x1\nf\nf.c:1\n0x1\nf\nf.c:1\n";
        let err = collect_replies(replies.as_bytes(), &counts).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateReply(Address(1))));
    }

    #[test]
    fn test_missing_reply_is_fatal() {
        let counts = counts(&[(0x1, 1), (0x2, 1)]);
        let err = collect_replies("0x1\nf\nf.c:1\n".as_bytes(), &counts).unwrap_err();
        assert!(matches!(err, ResolveError::MissingReplies { expected: 2, received: 1 }));
    }

    #[test]
    fn test_empty_counts_skip_the_subprocess() {
        let symbolizer = Symbolizer::new(SymbolizerCommand::new("/nonexistent/addr2line", ["-e"]));
        let stats = symbolizer.resolve_all(&AddressCounts::new()).unwrap();
        assert_eq!(stats.total_samples(), 0);
    }
}
