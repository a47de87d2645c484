use crate::command;
use crate::executor;
use crate::prompt::ShellPrompt;
use crate::session::Session;
use crate::tokenizer;

/// The interactive read loop. Returns the shell's exit status.
pub fn start(session: &mut Session) -> i32 {
    loop {
        let line = match ShellPrompt::read_line(session) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("minish: read error: {}", e);
                return 1;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == "exit" {
            break;
        }

        let tokens = match tokenizer::tokenize(&line) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("minish: {}", e);
                continue;
            }
        };

        let commands = match command::segment(&tokens) {
            Ok(commands) if commands.is_empty() => continue,
            Ok(commands) => commands,
            Err(e) => {
                eprintln!("minish: {}", e);
                continue;
            }
        };

        // Only resource errors escape the dispatcher; everything else was
        // already reported against the offending command.
        if let Err(e) = executor::run_sequence(&tokens, &commands, session) {
            eprintln!("minish: {}", e);
            return 1;
        }
    }
    0
}
