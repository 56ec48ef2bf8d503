//! Live dialogue with a prompting child process
//!
//! `git svn init` may stop at any point to ask for a password or for a
//! certificate-trust decision. The prompt is written to its error stream
//! without a newline and the child then blocks on its input stream, so the
//! stream is consumed one byte at a time and every byte is echoed to the
//! user as soon as it arrives.
//!
//! # Turns
//!
//! A session is a sequence of turns. Each turn scans bytes until either a
//! recognized prompt has been seen and no further bytes are immediately
//! available, or the stream ends. A turn that found a prompt is answered
//! and followed by a new turn; a turn that found nothing ends the session.
//!
//! # Example
//!
//! ```rust
//! use svn2git::runner::{ChunkedStream, InteractiveSession, SecretSource};
//!
//! struct NoOperator;
//! impl SecretSource for NoOperator {
//!     fn read_secret(&mut self) -> std::io::Result<String> {
//!         unreachable!("password is supplied")
//!     }
//! }
//!
//! let stream = ChunkedStream::new(vec![b"Password for 'alice': ".to_vec(), b"done\n".to_vec()]);
//! let mut input = Vec::new();
//! let mut echo = Vec::new();
//! InteractiveSession::new(stream, &mut input, &mut echo, NoOperator)
//!     .with_secret(Some("s3cret"))
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(input, b"s3cret\n");
//! assert_eq!(echo, b"Password for 'alice': done\n");
//! ```

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use console::Term;
use dialoguer::Password;
use tracing::{debug, warn};

use crate::core::{PromptScanner, PromptSignal};
use crate::error::Result;

const READ_CHUNK_SIZE: usize = 1024;

/// Byte source that can tell whether more bytes are ready right now.
pub trait PromptStream {
    /// Blocks for the next byte; `None` once the stream has ended.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;

    /// True when a byte can be read without blocking.
    fn has_pending(&mut self) -> bool;
}

impl<T: PromptStream + ?Sized> PromptStream for &mut T {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).next_byte()
    }

    fn has_pending(&mut self) -> bool {
        (**self).has_pending()
    }
}

/// Stream fed by a background thread that drains a pipe.
///
/// Pipes offer no non-blocking peek, so a reader thread forwards bytes
/// through a channel and pending data is detected with `try_recv`.
pub struct ChannelStream {
    receiver: Receiver<io::Result<u8>>,
    peeked: Option<io::Result<u8>>,
}

impl ChannelStream {
    /// Starts draining `reader` on a background thread.
    pub fn spawn<R: Read + Send + 'static>(mut reader: R) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = [0u8; READ_CHUNK_SIZE];
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => {
                        if buffer[..n].iter().any(|b| sender.send(Ok(*b)).is_err()) {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = sender.send(Err(e));
                        break;
                    }
                }
            }
        });
        Self {
            receiver,
            peeked: None,
        }
    }
}

impl PromptStream for ChannelStream {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let next = match self.peeked.take() {
            Some(next) => next,
            None => match self.receiver.recv() {
                Ok(next) => next,
                Err(_) => return Ok(None),
            },
        };
        next.map(Some)
    }

    fn has_pending(&mut self) -> bool {
        if self.peeked.is_some() {
            return true;
        }
        match self.receiver.try_recv() {
            Ok(next) => {
                self.peeked = Some(next);
                true
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }
}

/// Scripted stream made of chunks.
///
/// Bytes within a chunk are immediately available; the boundary between two
/// chunks behaves like a child that is blocked waiting for input.
#[derive(Debug, Default)]
pub struct ChunkedStream {
    chunks: VecDeque<VecDeque<u8>>,
    consumed: usize,
}

impl ChunkedStream {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(VecDeque::from).collect(),
            consumed: 0,
        }
    }

    /// Number of bytes handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl PromptStream for ChunkedStream {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        while let Some(chunk) = self.chunks.front_mut() {
            if let Some(byte) = chunk.pop_front() {
                self.consumed += 1;
                return Ok(Some(byte));
            }
            self.chunks.pop_front();
        }
        Ok(None)
    }

    fn has_pending(&mut self) -> bool {
        self.chunks.front().is_some_and(|chunk| !chunk.is_empty())
    }
}

/// Where a password comes from when none was supplied up front.
pub trait SecretSource {
    fn read_secret(&mut self) -> io::Result<String>;
}

/// Reads the password from the terminal without echoing it.
///
/// The child has already printed its own prompt, so nothing is displayed
/// before reading.
#[derive(Debug, Default)]
pub struct TerminalSecretSource;

/// How the operator's password is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretInput {
    /// Hidden entry through dialoguer, which draws on stderr.
    Hidden,
    /// One line from stdin, for scripted runs without a terminal.
    Line,
}

impl SecretInput {
    /// Picks hidden entry whenever stderr is a terminal, whatever stdout is
    /// redirected to.
    pub fn for_stderr(stderr_is_term: bool) -> Self {
        if stderr_is_term {
            SecretInput::Hidden
        } else {
            SecretInput::Line
        }
    }

    pub fn detect() -> Self {
        Self::for_stderr(Term::stderr().is_term())
    }
}

impl SecretSource for TerminalSecretSource {
    fn read_secret(&mut self) -> io::Result<String> {
        match SecretInput::detect() {
            SecretInput::Hidden => Password::new()
                .allow_empty_password(true)
                .report(false)
                .interact_on(&Term::stderr())
                .map_err(|e| io::Error::other(e.to_string())),
            SecretInput::Line => {
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
                Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
            }
        }
    }
}

/// Scanning state within one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No prompt recognized yet in this turn.
    Scanning,
    /// A prompt was recognized; draining whatever output is still ready.
    AwaitingResponse(PromptSignal),
}

impl SessionState {
    fn signal(self) -> PromptSignal {
        match self {
            SessionState::Scanning => PromptSignal::None,
            SessionState::AwaitingResponse(signal) => signal,
        }
    }
}

/// Drives one prompting child process.
///
/// `S` is the child's error stream, `I` its input stream, `O` the
/// user-visible echo target and `P` the operator fallback for passwords.
pub struct InteractiveSession<S, I, O, P> {
    stream: S,
    input: I,
    output: O,
    secret_source: P,
    secret: Option<String>,
    scanner: PromptScanner,
}

impl<S, I, O, P> InteractiveSession<S, I, O, P>
where
    S: PromptStream,
    I: Write,
    O: Write,
    P: SecretSource,
{
    pub fn new(stream: S, input: I, output: O, secret_source: P) -> Self {
        Self {
            stream,
            input,
            output,
            secret_source,
            secret: None,
            scanner: PromptScanner::new(),
        }
    }

    /// Supplies the password used for every password prompt.
    pub fn with_secret(mut self, secret: Option<&str>) -> Self {
        self.secret = secret.map(str::to_string);
        self
    }

    /// Runs turns until one ends without a prompt.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let signal = self.read_turn()?;
            if signal.is_none() {
                return Ok(());
            }
            self.respond(signal)?;
        }
    }

    fn read_turn(&mut self) -> Result<PromptSignal> {
        let mut state = SessionState::Scanning;
        loop {
            if let SessionState::AwaitingResponse(signal) = state {
                if !self.stream.has_pending() {
                    return Ok(signal);
                }
            }

            // A NUL byte counts as end of stream, like a non-positive read.
            let byte = match self.stream.next_byte()? {
                Some(byte) if byte > 0 => byte,
                _ => return Ok(state.signal()),
            };

            self.output.write_all(&[byte])?;
            self.output.flush()?;

            if state == SessionState::Scanning {
                let signal = self.scanner.feed(byte);
                if !signal.is_none() {
                    debug!(?signal, "Prompt recognized");
                    state = SessionState::AwaitingResponse(signal);
                }
            }
        }
    }

    fn respond(&mut self, signal: PromptSignal) -> Result<()> {
        let line = match signal.fixed_response() {
            Some(response) => response.to_string(),
            None => match &self.secret {
                Some(secret) => secret.clone(),
                None => self.secret_source.read_secret()?,
            },
        };

        let written = writeln!(self.input, "{line}").and_then(|_| self.input.flush());
        match written {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                warn!(?signal, "Child closed its input before the prompt was answered");
            }
            Err(e) => return Err(e.into()),
        }

        self.scanner.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Operator that counts how often it was asked.
    struct CountingOperator {
        answer: String,
        asked: Rc<Cell<usize>>,
    }

    impl SecretSource for CountingOperator {
        fn read_secret(&mut self) -> io::Result<String> {
            self.asked.set(self.asked.get() + 1);
            Ok(self.answer.clone())
        }
    }

    fn operator(answer: &str) -> (CountingOperator, Rc<Cell<usize>>) {
        let asked = Rc::new(Cell::new(0));
        (
            CountingOperator {
                answer: answer.to_string(),
                asked: Rc::clone(&asked),
            },
            asked,
        )
    }

    /// Stream that publishes its read position so writes can be correlated.
    struct TrackedStream {
        inner: ChunkedStream,
        position: Rc<Cell<usize>>,
    }

    impl PromptStream for TrackedStream {
        fn next_byte(&mut self) -> io::Result<Option<u8>> {
            let byte = self.inner.next_byte();
            self.position.set(self.inner.consumed());
            byte
        }

        fn has_pending(&mut self) -> bool {
            self.inner.has_pending()
        }
    }

    /// Input stream that records the stream position at every write.
    struct TrackedInput {
        position: Rc<Cell<usize>>,
        writes: Rc<RefCell<Vec<(usize, Vec<u8>)>>>,
    }

    impl Write for TrackedInput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes
                .borrow_mut()
                .push((self.position.get(), buf.to_vec()));
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn chunks(parts: &[&str]) -> ChunkedStream {
        ChunkedStream::new(parts.iter().map(|p| p.as_bytes().to_vec()).collect())
    }

    #[test]
    fn test_password_prompt_without_secret_asks_operator_once() {
        let prompt = "Password for foo:";
        let position = Rc::new(Cell::new(0));
        let writes = Rc::new(RefCell::new(Vec::new()));
        let stream = TrackedStream {
            inner: chunks(&[prompt]),
            position: Rc::clone(&position),
        };
        let input = TrackedInput {
            position: Rc::clone(&position),
            writes: Rc::clone(&writes),
        };
        let (op, asked) = operator("hunter2");
        let mut echo = Vec::new();

        InteractiveSession::new(stream, input, &mut echo, op)
            .run()
            .unwrap();

        assert_eq!(asked.get(), 1);
        let written: Vec<u8> = writes.borrow().iter().flat_map(|(_, b)| b.clone()).collect();
        assert_eq!(written, b"hunter2\n");
        assert!(writes.borrow().iter().all(|(pos, _)| *pos >= prompt.len()));
        assert_eq!(echo, prompt.as_bytes());
    }

    #[test]
    fn test_supplied_secret_skips_operator() {
        let (op, asked) = operator("unused");
        let mut input = Vec::new();
        let mut echo = Vec::new();

        InteractiveSession::new(
            chunks(&["Password for 'bob': ", "Checked out HEAD\n"]),
            &mut input,
            &mut echo,
            op,
        )
        .with_secret(Some("pw"))
        .run()
        .unwrap();

        assert_eq!(asked.get(), 0);
        assert_eq!(input, b"pw\n");
        assert_eq!(echo, b"Password for 'bob': Checked out HEAD\n");
    }

    #[test]
    fn test_remaining_ready_bytes_are_drained_before_answering() {
        let position = Rc::new(Cell::new(0));
        let writes = Rc::new(RefCell::new(Vec::new()));
        let first = "Password for 'bob': ";
        let stream = TrackedStream {
            inner: chunks(&[first, "next"]),
            position: Rc::clone(&position),
        };
        let input = TrackedInput {
            position: Rc::clone(&position),
            writes: Rc::clone(&writes),
        };
        let (op, _) = operator("pw");

        InteractiveSession::new(stream, input, io::sink(), op)
            .run()
            .unwrap();

        let writes = writes.borrow();
        assert!(!writes.is_empty());
        assert!(writes.iter().all(|(pos, _)| *pos == first.len()));
    }

    #[test]
    fn test_certificate_prompts_get_fixed_answers() {
        let (op, asked) = operator("unused");
        let mut input = Vec::new();

        InteractiveSession::new(
            chunks(&[
                "Error validating server certificate\n(R)eject, accept (t)emporarily or accept (p)ermanently? ",
                "(R)eject or accept (t)emporarily? ",
                "r42 = abc\n",
            ]),
            &mut input,
            io::sink(),
            op,
        )
        .run()
        .unwrap();

        assert_eq!(asked.get(), 0);
        assert_eq!(input, b"p\nt\n");
    }

    #[test]
    fn test_no_prompt_writes_nothing() {
        let (op, asked) = operator("unused");
        let mut input = Vec::new();
        let mut echo = Vec::new();

        InteractiveSession::new(chunks(&["Initialized empty Git repository\n"]), &mut input, &mut echo, op)
            .run()
            .unwrap();

        assert!(input.is_empty());
        assert_eq!(asked.get(), 0);
        assert_eq!(echo, b"Initialized empty Git repository\n");
    }

    #[test]
    fn test_prompt_at_end_of_stream_is_still_answered() {
        let (op, _) = operator("pw");
        let mut input = Vec::new();

        InteractiveSession::new(chunks(&["Password for x"]), &mut input, io::sink(), op)
            .run()
            .unwrap();

        assert_eq!(input, b"pw\n");
    }

    #[test]
    fn test_only_first_prompt_per_turn_counts() {
        let (op, asked) = operator("pw");
        let mut input = Vec::new();

        InteractiveSession::new(
            chunks(&["Password for a Password for b"]),
            &mut input,
            io::sink(),
            op,
        )
        .run()
        .unwrap();

        assert_eq!(asked.get(), 1);
        assert_eq!(input, b"pw\n");
    }

    #[test]
    fn test_nul_byte_ends_turn() {
        let (op, _) = operator("pw");
        let mut echo = Vec::new();

        InteractiveSession::new(chunks(&["abc\0def"]), io::sink(), &mut echo, op)
            .run()
            .unwrap();

        assert_eq!(echo, b"abc");
    }

    #[test]
    fn test_broken_input_pipe_is_not_fatal() {
        struct ClosedInput;
        impl Write for ClosedInput {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let (op, _) = operator("pw");
        let result = InteractiveSession::new(chunks(&["Password for x"]), ClosedInput, io::sink(), op)
            .run();
        assert!(result.is_ok());
    }

    #[test]
    fn test_channel_stream_reports_pending_bytes() {
        let mut stream = ChannelStream::spawn(io::Cursor::new(b"ab".to_vec()));
        assert_eq!(stream.next_byte().unwrap(), Some(b'a'));
        assert_eq!(stream.next_byte().unwrap(), Some(b'b'));
        assert_eq!(stream.next_byte().unwrap(), None);
        assert!(!stream.has_pending());
    }

    #[test]
    fn test_secret_input_follows_stderr_only() {
        assert_eq!(SecretInput::for_stderr(true), SecretInput::Hidden);
        assert_eq!(SecretInput::for_stderr(false), SecretInput::Line);
        assert_eq!(
            SecretInput::detect(),
            SecretInput::for_stderr(Term::stderr().is_term())
        );
    }
}
