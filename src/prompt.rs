use std::io::{self, Write};

use crate::session::Session;

pub struct ShellPrompt;

impl ShellPrompt {
    /// Display the prompt and read one line, retrying transparently when
    /// the read is interrupted by a signal. `None` means EOF (Ctrl-D).
    pub fn read_line(session: &Session) -> io::Result<Option<String>> {
        loop {
            print!("{} ", session.prompt);
            io::stdout().flush()?;

            let mut buf = String::new();
            match io::stdin().read_line(&mut buf) {
                Ok(0) => {
                    println!();
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(buf.trim_end_matches('\n').to_string())),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
