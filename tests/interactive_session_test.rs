use std::io;

use svn2git::runner::{ChannelStream, ChunkedStream, InteractiveSession, SecretSource};

struct Operator {
    answer: &'static str,
    asked: usize,
}

impl SecretSource for &mut Operator {
    fn read_secret(&mut self) -> io::Result<String> {
        self.asked += 1;
        Ok(self.answer.to_string())
    }
}

#[test]
fn test_password_then_certificate_dialogue() {
    let stream = ChunkedStream::new(vec![
        b"Error validating server certificate for 'https://svn.example.com:443':\n".to_vec(),
        b"(R)eject, accept (t)emporarily or accept (p)ermanently? ".to_vec(),
        b"Authentication realm: <https://svn.example.com:443>\n".to_vec(),
        b"Password for 'alice': ".to_vec(),
        b"r1 = 0123abcd (refs/remotes/svn/trunk)\n".to_vec(),
    ]);
    let mut operator = Operator {
        answer: "typed",
        asked: 0,
    };
    let mut input = Vec::new();
    let mut echo = Vec::new();

    InteractiveSession::new(stream, &mut input, &mut echo, &mut operator)
        .run()
        .unwrap();

    assert_eq!(input, b"p\ntyped\n");
    assert_eq!(operator.asked, 1);
    assert!(String::from_utf8(echo)
        .unwrap()
        .ends_with("(refs/remotes/svn/trunk)\n"));
}

#[test]
fn test_limited_certificate_prompt_accepts_temporarily() {
    let stream = ChunkedStream::new(vec![
        b"(R)eject or accept (t)emporarily? ".to_vec(),
        b"done\n".to_vec(),
    ]);
    let mut operator = Operator {
        answer: "unused",
        asked: 0,
    };
    let mut input = Vec::new();

    InteractiveSession::new(stream, &mut input, io::sink(), &mut operator)
        .run()
        .unwrap();

    assert_eq!(input, b"t\n");
    assert_eq!(operator.asked, 0);
}

#[test]
fn test_nothing_written_before_prompt_completes() {
    // The phrase is split across chunks; the partial phrase must not trigger.
    let stream = ChunkedStream::new(vec![b"Password f".to_vec(), b"or bob: ".to_vec()]);
    let mut operator = Operator {
        answer: "pw",
        asked: 0,
    };
    let mut input = Vec::new();

    InteractiveSession::new(stream, &mut input, io::sink(), &mut operator)
        .with_secret(Some("given"))
        .run()
        .unwrap();

    assert_eq!(input, b"given\n");
    assert_eq!(operator.asked, 0);
}

#[test]
fn test_channel_stream_from_reader() {
    let reader = io::Cursor::new(b"Password for x: ".to_vec());
    let mut operator = Operator {
        answer: "pw",
        asked: 0,
    };
    let mut input = Vec::new();
    let mut echo = Vec::new();

    InteractiveSession::new(
        ChannelStream::spawn(reader),
        &mut input,
        &mut echo,
        &mut operator,
    )
    .run()
    .unwrap();

    assert_eq!(input, b"pw\n");
    assert_eq!(echo, b"Password for x: ");
}
